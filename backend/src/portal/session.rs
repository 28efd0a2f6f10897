//! Access to the signed-in user's session.
//!
//! The portal never reads browser storage or globals directly; whatever hosts
//! it supplies a [`SessionProvider`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AcademicCatalog, SchoolId, UserId};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session data is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Session storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    Academic,
    #[serde(other)]
    Other,
}

/// The authenticated user as handed over by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub login_type: Option<LoginType>,
    #[serde(rename = "codigo", default)]
    pub code: Option<String>,
}

impl PortalUser {
    pub fn is_academic(&self) -> bool {
        self.login_type == Some(LoginType::Academic)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProfile {
    #[serde(rename = "escuela", default)]
    pub school: Option<String>,
}

/// Profile data stored by the academic backend at sign-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSession {
    #[serde(rename = "perfil", default)]
    pub profile: Option<SessionProfile>,
}

impl BackendSession {
    pub fn school_name(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|p| p.school.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}

pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> &PortalUser;

    /// `Ok(None)` when no backend session was stored.
    fn backend_session(&self) -> Result<Option<BackendSession>, SessionError>;
}

/// Provider over an already-parsed session.
#[derive(Debug, Clone)]
pub struct StaticSessionProvider {
    user: PortalUser,
    session: Option<BackendSession>,
}

impl StaticSessionProvider {
    pub fn new(user: PortalUser, session: Option<BackendSession>) -> Self {
        Self { user, session }
    }
}

impl SessionProvider for StaticSessionProvider {
    fn current_user(&self) -> &PortalUser {
        &self.user
    }

    fn backend_session(&self) -> Result<Option<BackendSession>, SessionError> {
        Ok(self.session.clone())
    }
}

/// Provider over the raw JSON blob kept in client storage.
#[derive(Debug, Clone)]
pub struct JsonSessionProvider {
    user: PortalUser,
    raw: Option<String>,
}

impl JsonSessionProvider {
    pub fn new(user: PortalUser, raw: Option<String>) -> Self {
        Self { user, raw }
    }
}

impl SessionProvider for JsonSessionProvider {
    fn current_user(&self) -> &PortalUser {
        &self.user
    }

    fn backend_session(&self) -> Result<Option<BackendSession>, SessionError> {
        match self.raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
        }
    }
}

/// School used to filter the spaces list.
///
/// Only academic logins are filtered. A missing or unreadable session, or a
/// school name the catalog does not know, disables the filter.
pub fn resolve_school_id(
    provider: &dyn SessionProvider,
    catalog: &AcademicCatalog,
) -> Option<SchoolId> {
    if !provider.current_user().is_academic() {
        return None;
    }

    let session = match provider.backend_session() {
        Ok(Some(session)) => session,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Could not read the user's school from the session: {}", e);
            return None;
        }
    };

    let school = session.school_name()?;
    let resolved = catalog.school_id_by_name(school);
    if resolved.is_none() {
        log::debug!("School '{}' is not in the academic catalog", school);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Faculty, FacultyId, School};

    fn user(login_type: Option<LoginType>) -> PortalUser {
        PortalUser {
            id: UserId::new(12),
            email: "alumno@virtual.upt.pe".to_string(),
            name: "Alumno UPT".to_string(),
            role: None,
            login_type,
            code: Some("2021071234".to_string()),
        }
    }

    fn catalog() -> AcademicCatalog {
        AcademicCatalog::new(
            vec![Faculty {
                id: FacultyId::new(1),
                name: "FAING".to_string(),
            }],
            vec![School {
                id: SchoolId::new(10),
                name: "Ingeniería de Sistemas".to_string(),
                faculty_id: FacultyId::new(1),
            }],
        )
    }

    fn session_json() -> Option<String> {
        Some(r#"{"perfil": {"escuela": "Ingenieria de Sistemas"}}"#.to_string())
    }

    #[test]
    fn test_academic_user_resolves_school() {
        let provider = JsonSessionProvider::new(user(Some(LoginType::Academic)), session_json());
        assert_eq!(resolve_school_id(&provider, &catalog()), Some(SchoolId::new(10)));
    }

    #[test]
    fn test_non_academic_user_is_not_filtered() {
        let provider = JsonSessionProvider::new(user(Some(LoginType::Other)), session_json());
        assert_eq!(resolve_school_id(&provider, &catalog()), None);

        let provider = JsonSessionProvider::new(user(None), session_json());
        assert_eq!(resolve_school_id(&provider, &catalog()), None);
    }

    #[test]
    fn test_missing_or_broken_session() {
        let academic = || user(Some(LoginType::Academic));

        let provider = JsonSessionProvider::new(academic(), None);
        assert_eq!(resolve_school_id(&provider, &catalog()), None);

        let provider = JsonSessionProvider::new(academic(), Some("{not json".to_string()));
        assert!(matches!(
            provider.backend_session(),
            Err(SessionError::Malformed(_))
        ));
        assert_eq!(resolve_school_id(&provider, &catalog()), None);

        let provider =
            JsonSessionProvider::new(academic(), Some(r#"{"perfil": null}"#.to_string()));
        assert_eq!(resolve_school_id(&provider, &catalog()), None);
    }

    #[test]
    fn test_unknown_school_name() {
        let session = BackendSession {
            profile: Some(SessionProfile {
                school: Some("Medicina Humana".to_string()),
            }),
        };
        let provider = StaticSessionProvider::new(user(Some(LoginType::Academic)), Some(session));
        assert_eq!(resolve_school_id(&provider, &catalog()), None);
    }

    #[test]
    fn test_login_type_wire_values() {
        let parsed: LoginType = serde_json::from_str("\"academic\"").unwrap();
        assert_eq!(parsed, LoginType::Academic);
        let parsed: LoginType = serde_json::from_str("\"google\"").unwrap();
        assert_eq!(parsed, LoginType::Other);
    }
}
