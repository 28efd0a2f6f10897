//! Status-change records of the reservation audit trail.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ids::{AuditId, ReservationId, UserId};

/// One status transition of a reservation.
///
/// Statuses are stored with their audit spelling (`"Aprobada"`, `"Cancelado"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id_audit: AuditId,
    pub id_reserva: ReservationId,
    #[serde(rename = "estadoAnterior")]
    pub previous_status: String,
    #[serde(rename = "estadoNuevo")]
    pub new_status: String,
    #[serde(rename = "fechaCambio")]
    pub changed_at: NaiveDateTime,
    #[serde(rename = "usuarioCambio")]
    pub changed_by: UserId,
    #[serde(rename = "nombreUsuario", default, skip_serializing_if = "Option::is_none")]
    pub changed_by_name: Option<String>,
    #[serde(rename = "espacioReserva", default, skip_serializing_if = "Option::is_none")]
    pub space_name: Option<String>,
    #[serde(rename = "solicitanteReserva", default, skip_serializing_if = "Option::is_none")]
    pub requester_name: Option<String>,
}

impl AuditRecord {
    pub fn new(
        id: AuditId,
        reservation: ReservationId,
        previous_status: impl Into<String>,
        new_status: impl Into<String>,
        changed_at: NaiveDateTime,
        changed_by: UserId,
    ) -> Self {
        Self {
            id_audit: id,
            id_reserva: reservation,
            previous_status: previous_status.into(),
            new_status: new_status.into(),
            changed_at,
            changed_by,
            changed_by_name: None,
            space_name: None,
            requester_name: None,
        }
    }
}

/// Name shown for a changing user that is not in the user directory.
pub fn unknown_user_name(id: UserId) -> String {
    format!("Usuario {}", id)
}

/// A portal user as known to the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(rename = "nombres")]
    pub first_names: String,
    #[serde(rename = "apellidos")]
    pub last_names: String,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_names)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_record_wire_names() {
        let at = NaiveDate::from_ymd_opt(2025, 10, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let record = AuditRecord::new(
            AuditId::new(1),
            ReservationId::new(40),
            "Pendiente",
            "Aprobada",
            at,
            UserId::new(2),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["idAudit"], 1);
        assert_eq!(value["idReserva"], 40);
        assert_eq!(value["estadoAnterior"], "Pendiente");
        assert_eq!(value["estadoNuevo"], "Aprobada");
        assert_eq!(value["fechaCambio"], "2025-10-01T09:30:00");
        assert!(value.get("nombreUsuario").is_none());
    }

    #[test]
    fn test_user_names() {
        let user = UserProfile {
            id: UserId::new(5),
            first_names: "Ana".to_string(),
            last_names: "Quispe".to_string(),
        };
        assert_eq!(user.full_name(), "Ana Quispe");
        assert_eq!(unknown_user_name(UserId::new(9)), "Usuario 9");
    }
}
