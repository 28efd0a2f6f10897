//! Weekly schedule grid construction.
//!
//! Turns a space's occupied-slot records and the time-block catalog into the
//! rows (time blocks) and columns (weekdays) of the weekly schedule table.
//! Everything here is pure: grids are rebuilt from upstream data on every
//! request and never cached.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::models::{
    format_time, is_available, normalize_weekday, BlockOption, CellView, GridCell, GridRow,
    ScheduleEntry, SpaceId, TimeBlock, TimeBlockCatalog, TimeBlockId, Weekday, WeekdayColumn,
    WeeklyGrid, EMPTY_GRID_MESSAGE,
};

/// Rows of the weekly grid, one per distinct block id referenced by `entries`.
///
/// Start and end come from the catalog, falling back to the first entry seen
/// for that block and finally to `"N/A"`. The rank is the catalog `orden`,
/// else the block's position in `fallback_order`, else the id itself.
///
/// Rows are sorted by rank, then by start time when both rows have one, then by id.
pub fn derive_rows(
    entries: &[ScheduleEntry],
    catalog: &TimeBlockCatalog,
    fallback_order: &HashMap<TimeBlockId, i64>,
) -> Vec<GridRow> {
    let mut seen = HashSet::new();
    let mut rows: Vec<GridRow> = entries
        .iter()
        .filter(|entry| seen.insert(entry.block_id))
        .map(|entry| {
            let block = catalog.get(entry.block_id);
            let start = format_time(pick(
                block.and_then(|b| b.start.as_deref()),
                entry.start.as_deref(),
            ));
            let end = format_time(pick(
                block.and_then(|b| b.end.as_deref()),
                entry.end.as_deref(),
            ));
            let rank = block
                .and_then(|b| b.order)
                .or_else(|| fallback_order.get(&entry.block_id).copied())
                .unwrap_or_else(|| entry.block_id.value());

            GridRow {
                id: entry.block_id,
                label: format!("{} a {}", start, end),
                cells: resolve_cells(entry.block_id, entries),
                start,
                end,
                rank,
            }
        })
        .collect();

    rows.sort_by(compare_rows);
    rows
}

/// First non-empty value of the two.
fn pick<'a>(primary: Option<&'a str>, secondary: Option<&'a str>) -> Option<&'a str> {
    primary
        .filter(|value| !value.is_empty())
        .or_else(|| secondary.filter(|value| !value.is_empty()))
}

fn compare_rows(a: &GridRow, b: &GridRow) -> Ordering {
    a.rank
        .cmp(&b.rank)
        .then_with(|| {
            if is_available(&a.start) && is_available(&b.start) {
                a.start.cmp(&b.start)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.id.cmp(&b.id))
}

fn resolve_cells(block_id: TimeBlockId, entries: &[ScheduleEntry]) -> Vec<GridCell> {
    Weekday::ALL
        .iter()
        .map(|&weekday| {
            let entry = resolve_cell(block_id, weekday.key(), entries);
            GridCell {
                weekday,
                view: CellView::from_entry(entry),
                entry: entry.cloned(),
            }
        })
        .collect()
}

/// The first entry scheduled in `block_id` on `weekday`.
///
/// Weekday names are compared without accents, case or surrounding whitespace,
/// so `"Miércoles"` and `" miercoles"` name the same column.
pub fn resolve_cell<'a>(
    block_id: TimeBlockId,
    weekday: &str,
    entries: &'a [ScheduleEntry],
) -> Option<&'a ScheduleEntry> {
    if entries.is_empty() {
        return None;
    }

    let wanted = normalize_weekday(weekday);
    entries
        .iter()
        .find(|entry| entry.block_id == block_id && normalize_weekday(&entry.weekday) == wanted)
}

/// The full weekly grid for one space.
pub fn build_weekly_grid(
    space_id: SpaceId,
    entries: &[ScheduleEntry],
    catalog: &TimeBlockCatalog,
) -> WeeklyGrid {
    let rows = derive_rows(entries, catalog, &catalog.fallback_order());
    let empty_message = rows.is_empty().then(|| EMPTY_GRID_MESSAGE.to_string());

    WeeklyGrid {
        space_id,
        columns: weekday_columns(),
        rows,
        empty_message,
    }
}

/// Column headers in fixed Monday..Saturday order.
pub fn weekday_columns() -> Vec<WeekdayColumn> {
    Weekday::ALL
        .iter()
        .map(|&key| WeekdayColumn {
            key,
            label: key.label().to_string(),
        })
        .collect()
}

/// Every catalog block as a booking-form option, ordered by rank then id.
pub fn block_options(catalog: &TimeBlockCatalog) -> Vec<BlockOption> {
    let fallback = catalog.fallback_order();
    let mut options: Vec<BlockOption> = catalog
        .iter()
        .map(|block| block_option(block, &fallback))
        .collect();
    options.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.id.cmp(&b.id)));
    options
}

fn block_option(block: &TimeBlock, fallback: &HashMap<TimeBlockId, i64>) -> BlockOption {
    let start = format_time(block.start.as_deref());
    let end = format_time(block.end.as_deref());
    let name = block
        .name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("Bloque {}", block.id));

    BlockOption {
        id: block.id,
        label: format!("{} ({} - {})", name, start, end),
        start,
        end,
        rank: block
            .order
            .or_else(|| fallback.get(&block.id).copied())
            .unwrap_or_else(|| block.id.value()),
    }
}

#[cfg(test)]
#[path = "schedule_grid_tests.rs"]
mod schedule_grid_tests;
