//! Weekday columns of the weekly schedule grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::text::fold_trimmed;

/// Column of the weekly grid. Sunday has no classes and no column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Lunes")]
    Monday,
    #[serde(rename = "Martes")]
    Tuesday,
    #[serde(rename = "Miercoles")]
    Wednesday,
    #[serde(rename = "Jueves")]
    Thursday,
    #[serde(rename = "Viernes")]
    Friday,
    #[serde(rename = "Sabado")]
    Saturday,
}

impl Weekday {
    /// Grid columns in display order.
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Unaccented key used to match schedule entries.
    pub fn key(&self) -> &'static str {
        match self {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miercoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
            Weekday::Saturday => "Sabado",
        }
    }

    /// Column header shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miércoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
            Weekday::Saturday => "Sábado",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }

    /// Whether a free-text weekday name (accented or not, any case) names this column.
    pub fn matches(&self, raw: &str) -> bool {
        normalize_weekday(raw) == normalize_weekday(self.key())
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Weekday {
    type Err = String;

    /// Accepts Spanish names with or without accents and English names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = normalize_weekday(s);
        Weekday::ALL
            .iter()
            .copied()
            .find(|day| normalize_weekday(day.key()) == folded || day.english() == folded)
            .ok_or_else(|| format!("Unknown weekday: {}", s))
    }
}

/// Canonical form of a weekday name for comparisons.
pub fn normalize_weekday(raw: &str) -> String {
    fold_trimmed(raw)
}
