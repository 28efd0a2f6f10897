//! Bookable rooms and labs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::ids::SpaceId;
use super::text::fold_trimmed;

pub const DEFAULT_LOCATION: &str = "Ubicación no especificada";
pub const DEFAULT_EQUIPMENT: &str = "Equipamiento no especificado";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpaceKind {
    Laboratory,
    Classroom,
}

impl SpaceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SpaceKind::Laboratory => "Laboratorio",
            SpaceKind::Classroom => "Aula",
        }
    }
}

impl fmt::Display for SpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SpaceKind {
    type Err = String;

    /// Backend type codes vary (`"LAB"`, `"Laboratorio"`, `"aula"`, `"AULA_TEORIA"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold_trimmed(s);
        if folded.starts_with("lab") {
            Ok(SpaceKind::Laboratory)
        } else if folded.starts_with("aula") || folded.starts_with("salon") {
            Ok(SpaceKind::Classroom)
        } else {
            Err(format!("Unknown space type: {}", s))
        }
    }
}

impl TryFrom<String> for SpaceKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SpaceKind> for String {
    fn from(kind: SpaceKind) -> Self {
        kind.label().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpaceState {
    Available,
    Maintenance,
}

impl SpaceState {
    pub fn label(&self) -> &'static str {
        match self {
            SpaceState::Available => "Disponible",
            SpaceState::Maintenance => "Mantenimiento",
        }
    }
}

impl fmt::Display for SpaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SpaceState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_trimmed(s).as_str() {
            "disponible" | "d" | "1" | "activo" | "available" => Ok(SpaceState::Available),
            "mantenimiento" | "m" | "0" | "inactivo" | "maintenance" => {
                Ok(SpaceState::Maintenance)
            }
            _ => Err(format!("Unknown space state: {}", s)),
        }
    }
}

impl TryFrom<String> for SpaceState {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SpaceState> for String {
    fn from(state: SpaceState) -> Self {
        state.label().to_string()
    }
}

/// A bookable room or lab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(
        rename = "ubicacion",
        default = "default_location",
        deserialize_with = "location_or_placeholder"
    )]
    pub location: String,
    #[serde(rename = "tipo")]
    pub kind: SpaceKind,
    #[serde(rename = "capacidad")]
    pub capacity: u32,
    #[serde(
        rename = "equipamiento",
        default = "default_equipment",
        deserialize_with = "equipment_or_placeholder"
    )]
    pub equipment: String,
    #[serde(rename = "facultad")]
    pub faculty: String,
    #[serde(rename = "escuela")]
    pub school: String,
    #[serde(rename = "estado")]
    pub state: SpaceState,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_equipment() -> String {
    DEFAULT_EQUIPMENT.to_string()
}

/// Null and blank values count as missing.
fn non_blank_or<'de, D>(deserializer: D, placeholder: &str) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| placeholder.to_string()))
}

fn location_or_placeholder<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    non_blank_or(deserializer, DEFAULT_LOCATION)
}

fn equipment_or_placeholder<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    non_blank_or(deserializer, DEFAULT_EQUIPMENT)
}

impl Space {
    /// Only available spaces accept reservations.
    pub fn is_bookable(&self) -> bool {
        self.state == SpaceState::Available
    }
}
