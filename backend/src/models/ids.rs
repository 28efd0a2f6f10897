//! Integer identifiers shared by the portal's records.
//!
//! All ids are plain `i64` values on the wire and parse leniently from form
//! strings (surrounding whitespace is ignored).

macro_rules! portal_ids {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug,
                Copy,
                Clone,
                PartialEq,
                Eq,
                PartialOrd,
                Ord,
                Hash,
                serde::Serialize,
                serde::Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(pub i64);

            impl $name {
                pub fn new(value: i64) -> Self {
                    Self(value)
                }

                pub fn value(&self) -> i64 {
                    self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl std::str::FromStr for $name {
                type Err = std::num::ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.trim().parse().map(Self)
                }
            }

            impl From<i64> for $name {
                fn from(value: i64) -> Self {
                    Self(value)
                }
            }
        )+
    };
}

portal_ids! {
    /// A bookable laboratory or classroom.
    SpaceId,
    /// A class period of the time-block catalog.
    TimeBlockId,
    ReservationId,
    UserId,
    AuditId,
    FacultyId,
    SchoolId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_parse_form_values() {
        assert_eq!(" 12 ".parse::<TimeBlockId>().unwrap(), TimeBlockId::new(12));
        assert!("abc".parse::<TimeBlockId>().is_err());
    }

    #[test]
    fn test_ids_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&SpaceId::new(4)).unwrap(), "4");
        let id: ReservationId = serde_json::from_str("31").unwrap();
        assert_eq!(id.value(), 31);
    }
}
