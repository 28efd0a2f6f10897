//! Faculties and schools.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{FacultyId, SchoolId};
use super::text::fold_trimmed;

/// `{id, nombre}` pair exposed by the catalog endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: FacultyId,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "facultadId")]
    pub faculty_id: FacultyId,
}

/// Faculties and their schools, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcademicCatalog {
    faculties: BTreeMap<FacultyId, Faculty>,
    schools: BTreeMap<SchoolId, School>,
}

impl AcademicCatalog {
    pub fn new(faculties: Vec<Faculty>, schools: Vec<School>) -> Self {
        Self {
            faculties: faculties.into_iter().map(|f| (f.id, f)).collect(),
            schools: schools.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    pub fn faculties(&self) -> Vec<CatalogItem> {
        self.faculties
            .values()
            .map(|f| CatalogItem {
                id: f.id.value(),
                nombre: f.name.clone(),
            })
            .collect()
    }

    /// All schools, or only those of one faculty.
    pub fn schools(&self, faculty: Option<FacultyId>) -> Vec<CatalogItem> {
        self.schools
            .values()
            .filter(|s| faculty.map_or(true, |id| s.faculty_id == id))
            .map(|s| CatalogItem {
                id: s.id.value(),
                nombre: s.name.clone(),
            })
            .collect()
    }

    pub fn school(&self, id: SchoolId) -> Option<&School> {
        self.schools.get(&id)
    }

    /// Resolve a school name as written on a space record, ignoring accents and case.
    pub fn school_id_by_name(&self, name: &str) -> Option<SchoolId> {
        let wanted = fold_trimmed(name);
        if wanted.is_empty() {
            return None;
        }
        self.schools
            .values()
            .find(|s| fold_trimmed(&s.name) == wanted)
            .map(|s| s.id)
    }
}
