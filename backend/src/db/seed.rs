//! JSON fixtures used to pre-populate the in-memory repository.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{
    AuditRecord, Faculty, Reservation, ScheduleEntry, School, Space, SpaceId, TimeBlock,
    UserProfile,
};

/// Weekly occupation of one space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSchedule {
    #[serde(rename = "espacioId")]
    pub space_id: SpaceId,
    #[serde(rename = "horarios", default)]
    pub entries: Vec<ScheduleEntry>,
}

/// Contents of a seed file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSeed {
    #[serde(rename = "espacios", default)]
    pub spaces: Vec<Space>,
    #[serde(rename = "bloques", default)]
    pub time_blocks: Vec<TimeBlock>,
    #[serde(rename = "horarios", default)]
    pub schedules: Vec<SpaceSchedule>,
    #[serde(rename = "reservas", default)]
    pub reservations: Vec<Reservation>,
    #[serde(rename = "usuarios", default)]
    pub users: Vec<UserProfile>,
    #[serde(rename = "facultades", default)]
    pub faculties: Vec<Faculty>,
    #[serde(rename = "escuelas", default)]
    pub schools: Vec<School>,
    #[serde(rename = "auditoria", default)]
    pub audit: Vec<AuditRecord>,
}

impl PortalSeed {
    pub fn from_json(json: &str) -> RepositoryResult<Self> {
        let seed: PortalSeed = serde_json::from_str(json)
            .map_err(|e| RepositoryError::from(e).with_operation("load_seed"))?;
        seed.validate()?;
        Ok(seed)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to read seed file: {}", e),
                ErrorContext::new("load_seed").with_details(path.display().to_string()),
            )
        })?;
        log::debug!("Loading portal seed from {}", path.display());
        Self::from_json(&contents)
    }

    /// Schedules must reference known spaces.
    fn validate(&self) -> RepositoryResult<()> {
        for schedule in &self.schedules {
            if !self.spaces.iter().any(|s| s.id == schedule.space_id) {
                return Err(RepositoryError::configuration_with_context(
                    format!("Schedule references unknown space {}", schedule.space_id),
                    ErrorContext::new("load_seed")
                        .with_entity("space")
                        .with_entity_id(schedule.space_id),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_seed() {
        let seed = PortalSeed::from_json("{}").unwrap();
        assert_eq!(seed, PortalSeed::default());
    }

    #[test]
    fn test_schedule_for_unknown_space_is_rejected() {
        let json = r#"{"horarios": [{"espacioId": 9, "horarios": []}]}"#;
        let err = PortalSeed::from_json(json).unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
        assert_eq!(err.context().entity_id.as_deref(), Some("9"));
    }

    #[test]
    fn test_blank_and_null_space_fields_get_placeholders() {
        let json = r#"{"espacios": [
            {"id": 1, "codigo": "LC-01", "nombre": "Laboratorio 1", "ubicacion": "",
             "tipo": "LAB", "capacidad": 30, "equipamiento": null, "facultad": "FAING",
             "escuela": "Ingeniería de Sistemas", "estado": "D"},
            {"id": 2, "codigo": "A-101", "nombre": "Aula 101", "ubicacion": null,
             "tipo": "aula", "capacidad": 40, "facultad": "FAING",
             "escuela": "Ingeniería Civil", "estado": "D"}
        ]}"#;
        let seed = PortalSeed::from_json(json).unwrap();
        for space in &seed.spaces {
            assert_eq!(space.location, crate::models::DEFAULT_LOCATION);
            assert_eq!(space.equipment, crate::models::DEFAULT_EQUIPMENT);
        }
    }

    #[test]
    fn test_bundled_seed_parses() {
        let json = include_str!("../../data/portal-seed.json");
        let seed = PortalSeed::from_json(json).unwrap();
        assert!(!seed.spaces.is_empty());
        assert!(!seed.time_blocks.is_empty());
        assert!(!seed.schools.is_empty());
    }
}
