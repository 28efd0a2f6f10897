//! Time blocks, occupied-slot records and the weekly grid they render into.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ids::{SpaceId, TimeBlockId};
use super::time::{format_time, is_available};
use super::weekday::Weekday;

/// Shown instead of a table when a space has no configured blocks.
pub const EMPTY_GRID_MESSAGE: &str =
    "No se encontraron bloques de horarios configurados para este espacio.";

/// A class period slot from the time-block catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: TimeBlockId,
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "horaInicio", default)]
    pub start: Option<String>,
    #[serde(rename = "horaFinal", default)]
    pub end: Option<String>,
    #[serde(rename = "orden", default)]
    pub order: Option<i64>,
}

impl TimeBlock {
    pub fn new(id: i64, start: &str, end: &str) -> Self {
        Self {
            id: TimeBlockId::new(id),
            name: None,
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            order: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

/// Time blocks keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeBlockCatalog {
    blocks: BTreeMap<TimeBlockId, TimeBlock>,
}

impl TimeBlockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block: TimeBlock) -> Option<TimeBlock> {
        self.blocks.insert(block.id, block)
    }

    pub fn get(&self, id: TimeBlockId) -> Option<&TimeBlock> {
        self.blocks.get(&id)
    }

    pub fn contains(&self, id: TimeBlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in ascending id order.
    pub fn iter(&self) -> btree_map::Values<'_, TimeBlockId, TimeBlock> {
        self.blocks.values()
    }

    /// Zero-based position of every block when sorted by rank.
    ///
    /// Blocks without a rank sort last; equal ranks keep id order.
    pub fn fallback_order(&self) -> HashMap<TimeBlockId, i64> {
        let mut ranked: Vec<&TimeBlock> = self.blocks.values().collect();
        ranked.sort_by_key(|block| block.order.unwrap_or(i64::MAX));
        ranked
            .into_iter()
            .enumerate()
            .map(|(index, block)| (block.id, index as i64))
            .collect()
    }
}

impl FromIterator<TimeBlock> for TimeBlockCatalog {
    fn from_iter<I: IntoIterator<Item = TimeBlock>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().map(|block| (block.id, block)).collect(),
        }
    }
}

/// One occupied (or explicitly free) slot of a space's weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(rename = "bloqueId")]
    pub block_id: TimeBlockId,
    /// Free text, accented or not (`"Miércoles"`, `"miercoles"`).
    #[serde(rename = "diaSemana")]
    pub weekday: String,
    #[serde(rename = "ocupado", default)]
    pub occupied: bool,
    #[serde(rename = "curso", default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(rename = "docente", default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(rename = "horaInicio", default)]
    pub start: Option<String>,
    #[serde(rename = "horaFinal", default)]
    pub end: Option<String>,
}

impl ScheduleEntry {
    pub fn new(block_id: i64, weekday: impl Into<String>) -> Self {
        Self {
            block_id: TimeBlockId::new(block_id),
            weekday: weekday.into(),
            occupied: false,
            course: None,
            instructor: None,
            start: None,
            end: None,
        }
    }

    pub fn occupied_by(mut self, course: impl Into<String>) -> Self {
        self.occupied = true;
        self.course = Some(course.into());
        self
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    pub fn with_times(mut self, start: &str, end: &str) -> Self {
        self.start = Some(start.to_string());
        self.end = Some(end.to_string());
        self
    }

    pub fn mark_occupied(mut self) -> Self {
        self.occupied = true;
        self
    }
}

/// What a single grid cell shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "estado")]
pub enum CellView {
    #[serde(rename = "disponible")]
    Available,
    #[serde(rename = "ocupado")]
    Occupied {
        #[serde(rename = "titulo")]
        title: String,
        #[serde(rename = "docente", skip_serializing_if = "Option::is_none")]
        instructor: Option<String>,
        #[serde(rename = "horario", skip_serializing_if = "Option::is_none")]
        time_range: Option<String>,
    },
}

impl CellView {
    /// Render a resolved cell. Entries not flagged as occupied show as available.
    pub fn from_entry(entry: Option<&ScheduleEntry>) -> Self {
        let entry = match entry {
            Some(entry) if entry.occupied => entry,
            _ => return CellView::Available,
        };

        let course = entry.course.as_deref().filter(|c| !c.is_empty());
        let title = course.unwrap_or("Bloque reservado").to_string();
        let instructor = course.map(|_| {
            entry
                .instructor
                .as_deref()
                .filter(|name| !name.is_empty())
                .unwrap_or("Docente no asignado")
                .to_string()
        });

        let start = format_time(entry.start.as_deref());
        let end = format_time(entry.end.as_deref());
        let time_range = if is_available(&start) || is_available(&end) {
            Some(format!("{} - {}", start, end))
        } else {
            None
        };

        CellView::Occupied {
            title,
            instructor,
            time_range,
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, CellView::Occupied { .. })
    }
}

/// A weekday column of one row together with the entry resolved for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    #[serde(rename = "dia")]
    pub weekday: Weekday,
    #[serde(rename = "horario", skip_serializing_if = "Option::is_none")]
    pub entry: Option<ScheduleEntry>,
    #[serde(rename = "vista")]
    pub view: CellView,
}

/// One time block of the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRow {
    pub id: TimeBlockId,
    /// `"HH:MM a HH:MM"`
    pub label: String,
    #[serde(rename = "horaInicio")]
    pub start: String,
    #[serde(rename = "horaFinal")]
    pub end: String,
    #[serde(rename = "orden")]
    pub rank: i64,
    /// Always one cell per [`Weekday::ALL`] column, in that order.
    #[serde(rename = "celdas")]
    pub cells: Vec<GridCell>,
}

impl GridRow {
    pub fn cell(&self, weekday: Weekday) -> Option<&GridCell> {
        self.cells.iter().find(|cell| cell.weekday == weekday)
    }

    /// The entry resolved for a weekday, if any.
    pub fn entry(&self, weekday: Weekday) -> Option<&ScheduleEntry> {
        self.cell(weekday).and_then(|cell| cell.entry.as_ref())
    }
}

/// Column header of the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayColumn {
    #[serde(rename = "clave")]
    pub key: Weekday,
    #[serde(rename = "etiqueta")]
    pub label: String,
}

/// Everything needed to render a space's weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyGrid {
    #[serde(rename = "espacioId")]
    pub space_id: SpaceId,
    #[serde(rename = "dias")]
    pub columns: Vec<WeekdayColumn>,
    #[serde(rename = "bloques")]
    pub rows: Vec<GridRow>,
    /// Set when there are no rows to show.
    #[serde(rename = "mensajeVacio", skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl WeeklyGrid {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn occupied_cells(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|cell| cell.view.is_occupied())
            .count()
    }
}

/// A selectable block in the booking forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOption {
    pub id: TimeBlockId,
    /// `"<name> (HH:MM - HH:MM)"`
    pub label: String,
    #[serde(rename = "horaInicio")]
    pub start: String,
    #[serde(rename = "horaFinal")]
    pub end: String,
    #[serde(rename = "orden")]
    pub rank: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_order_ranks_missing_last() {
        let catalog: TimeBlockCatalog = vec![
            TimeBlock::new(1, "8:00", "8:50"),
            TimeBlock::new(2, "7:00", "7:50").with_order(2),
            TimeBlock::new(3, "9:00", "9:50").with_order(1),
        ]
        .into_iter()
        .collect();

        let order = catalog.fallback_order();
        assert_eq!(order[&TimeBlockId::new(3)], 0);
        assert_eq!(order[&TimeBlockId::new(2)], 1);
        assert_eq!(order[&TimeBlockId::new(1)], 2);
    }

    #[test]
    fn test_cell_view_available_when_not_occupied() {
        let entry = ScheduleEntry::new(1, "Lunes");
        assert_eq!(CellView::from_entry(Some(&entry)), CellView::Available);
        assert_eq!(CellView::from_entry(None), CellView::Available);
    }

    #[test]
    fn test_cell_view_with_course() {
        let entry = ScheduleEntry::new(1, "Lunes")
            .occupied_by("Algebra")
            .with_times("8:00:00", "8:50:00");

        assert_eq!(
            CellView::from_entry(Some(&entry)),
            CellView::Occupied {
                title: "Algebra".to_string(),
                instructor: Some("Docente no asignado".to_string()),
                time_range: Some("08:00 - 08:50".to_string()),
            }
        );
    }

    #[test]
    fn test_cell_view_reserved_without_course() {
        let entry = ScheduleEntry::new(1, "Lunes").mark_occupied();

        assert_eq!(
            CellView::from_entry(Some(&entry)),
            CellView::Occupied {
                title: "Bloque reservado".to_string(),
                instructor: None,
                time_range: None,
            }
        );
    }

    #[test]
    fn test_entry_deserializes_wire_names() {
        let json = r#"{"bloqueId": 4, "diaSemana": "Miércoles", "ocupado": true,
                       "curso": "Redes", "docente": "R. Paz",
                       "horaInicio": "10:00:00", "horaFinal": "10:50:00"}"#;
        let entry: ScheduleEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.block_id, TimeBlockId::new(4));
        assert!(entry.occupied);
        assert_eq!(entry.instructor.as_deref(), Some("R. Paz"));
    }
}
