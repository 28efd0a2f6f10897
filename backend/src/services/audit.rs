//! Queries and maintenance over the reservation audit trail.
//!
//! Every function takes the current time explicitly so windows such as
//! "last 7 days" are deterministic under test.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{
    unknown_user_name, AuditRecord, ReservationId, ReservationStatus, UserId, UserProfile,
};

pub const RECENT_DAYS: i64 = 7;
pub const STATISTICS_DAYS: i64 = 30;
pub const RETENTION_MONTHS: u32 = 12;

/// Optional criteria of the filtered audit search. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilter {
    #[serde(default)]
    pub id_reserva: Option<ReservationId>,
    #[serde(default)]
    pub usuario_cambio: Option<UserId>,
    #[serde(default)]
    pub estado_anterior: Option<String>,
    #[serde(default)]
    pub estado_nuevo: Option<String>,
    /// Inclusive lower bound on the change timestamp.
    #[serde(default)]
    pub fecha_inicio: Option<NaiveDateTime>,
    /// Inclusive upper bound on the change timestamp.
    #[serde(default)]
    pub fecha_fin: Option<NaiveDateTime>,
}

impl AuditFilter {
    pub fn matches(&self, record: &AuditRecord) -> bool {
        self.id_reserva.map_or(true, |id| record.id_reserva == id)
            && self.usuario_cambio.map_or(true, |id| record.changed_by == id)
            && same_status(self.estado_anterior.as_deref(), &record.previous_status)
            && same_status(self.estado_nuevo.as_deref(), &record.new_status)
            && self.fecha_inicio.map_or(true, |from| record.changed_at >= from)
            && self.fecha_fin.map_or(true, |to| record.changed_at <= to)
    }
}

fn same_status(wanted: Option<&str>, actual: &str) -> bool {
    match wanted.map(str::trim).filter(|s| !s.is_empty()) {
        Some(wanted) => wanted.eq_ignore_ascii_case(actual.trim()),
        None => true,
    }
}

/// Changes recorded on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub fecha: NaiveDate,
    pub cantidad: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStatistics {
    pub total: usize,
    pub aprobadas: usize,
    pub canceladas: usize,
    pub rechazadas: usize,
    pub pendientes: usize,
    /// Last 30 days, newest day first. Days without changes are omitted.
    pub por_dia: Vec<DailyCount>,
}

/// Newest change first; equal timestamps put the later audit id first.
pub fn sort_newest_first(records: &mut [AuditRecord]) {
    records.sort_by(|a, b| {
        b.changed_at
            .cmp(&a.changed_at)
            .then_with(|| b.id_audit.cmp(&a.id_audit))
    });
}

pub fn search(records: &[AuditRecord], filter: &AuditFilter) -> Vec<AuditRecord> {
    let mut found: Vec<AuditRecord> = records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect();
    sort_newest_first(&mut found);
    found
}

pub fn for_reservation(records: &[AuditRecord], reservation: ReservationId) -> Vec<AuditRecord> {
    search(
        records,
        &AuditFilter {
            id_reserva: Some(reservation),
            ..AuditFilter::default()
        },
    )
}

/// Records whose previous or new status contains `text`, ignoring case.
pub fn search_text(records: &[AuditRecord], text: &str) -> Vec<AuditRecord> {
    let needle = text.trim().to_lowercase();
    let mut found: Vec<AuditRecord> = records
        .iter()
        .filter(|r| {
            r.previous_status.to_lowercase().contains(&needle)
                || r.new_status.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    sort_newest_first(&mut found);
    found
}

/// Changes made in the last [`RECENT_DAYS`] days.
pub fn recent_changes(records: &[AuditRecord], now: NaiveDateTime) -> Vec<AuditRecord> {
    search(
        records,
        &AuditFilter {
            fecha_inicio: Some(now - Duration::days(RECENT_DAYS)),
            ..AuditFilter::default()
        },
    )
}

pub fn statistics(records: &[AuditRecord], now: NaiveDateTime) -> AuditStatistics {
    let count_new = |status: ReservationStatus| {
        records
            .iter()
            .filter(|r| r.new_status == status.audit_label())
            .count()
    };

    let since = now - Duration::days(STATISTICS_DAYS);
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| r.changed_at >= since && r.changed_at <= now)
    {
        *per_day.entry(record.changed_at.date()).or_default() += 1;
    }

    AuditStatistics {
        total: records.len(),
        aprobadas: count_new(ReservationStatus::Approved),
        canceladas: count_new(ReservationStatus::Cancelled),
        rechazadas: count_new(ReservationStatus::Rejected),
        pendientes: count_new(ReservationStatus::Pending),
        por_dia: per_day
            .into_iter()
            .rev()
            .map(|(fecha, cantidad)| DailyCount { fecha, cantidad })
            .collect(),
    }
}

/// Change count for every month (1..=12) of `year`.
pub fn monthly_summary(records: &[AuditRecord], year: i32) -> BTreeMap<u32, usize> {
    let mut months: BTreeMap<u32, usize> = (1..=12).map(|m| (m, 0)).collect();
    for record in records.iter().filter(|r| r.changed_at.year() == year) {
        *months.entry(record.changed_at.month()).or_default() += 1;
    }
    months
}

pub fn latest_for(records: &[AuditRecord], reservation: ReservationId) -> Option<&AuditRecord> {
    records
        .iter()
        .filter(|r| r.id_reserva == reservation)
        .max_by(|a, b| {
            a.changed_at
                .cmp(&b.changed_at)
                .then_with(|| a.id_audit.cmp(&b.id_audit))
        })
}

pub fn change_count(records: &[AuditRecord], reservation: ReservationId) -> usize {
    records.iter().filter(|r| r.id_reserva == reservation).count()
}

/// Drop records older than [`RETENTION_MONTHS`] months. Returns how many were removed.
pub fn prune_older_than_retention(records: &mut Vec<AuditRecord>, now: NaiveDateTime) -> usize {
    let cutoff = now
        .checked_sub_months(Months::new(RETENTION_MONTHS))
        .unwrap_or(NaiveDateTime::MIN);
    let before = records.len();
    records.retain(|r| r.changed_at >= cutoff);
    before - records.len()
}

pub fn distinct_reservations(records: &[AuditRecord]) -> Vec<ReservationId> {
    records
        .iter()
        .map(|r| r.id_reserva)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn distinct_users(records: &[AuditRecord]) -> Vec<UserId> {
    records
        .iter()
        .map(|r| r.changed_by)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fill in the display names of a record.
///
/// A changing user missing from the directory is shown as `"Usuario {id}"`.
pub fn enrich(
    mut record: AuditRecord,
    changed_by: Option<&UserProfile>,
    space_name: Option<&str>,
    requester: Option<&UserProfile>,
) -> AuditRecord {
    record.changed_by_name = Some(
        changed_by
            .map(UserProfile::full_name)
            .unwrap_or_else(|| unknown_user_name(record.changed_by)),
    );
    record.space_name = space_name.map(str::to_string);
    record.requester_name = requester.map(UserProfile::full_name);
    record
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod audit_tests;
