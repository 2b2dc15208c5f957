// REST API response types
//
// Models for CVP's classic configlet endpoints. Fields use
// `#[serde(default)]` liberally because the API is inconsistent about
// field presence across releases. Timestamps arrive as epoch
// milliseconds; chrono accessors are provided next to each raw field.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, ServiceFault};

// ── Embedded error fields ────────────────────────────────────────────

/// Embedded failure indicator present on every response envelope.
///
/// The service reports most logical failures inside HTTP 200 bodies:
/// ```json
/// { "errorCode": "132801", "errorMessage": "Entity does not exist" }
/// ```
/// An absent or empty `errorCode` means success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ErrorResponse {
    /// The embedded error code, filtered to non-empty.
    pub fn code(&self) -> Option<&str> {
        self.error_code.as_deref().filter(|c| !c.is_empty())
    }

    /// Classification of the embedded code, if it maps to a known fault.
    pub fn fault(&self) -> Option<ServiceFault> {
        self.code().and_then(ServiceFault::from_code)
    }
}

/// Capability shared by every response envelope: report an embedded
/// failure. Checked uniformly after decode via [`Envelope::ensure_ok`].
pub(crate) trait Envelope {
    fn error_response(&self) -> &ErrorResponse;

    /// Promote an embedded service error to an operation error.
    fn ensure_ok(&self, operation: &'static str) -> Result<(), Error> {
        match self.error_response().code() {
            Some(code) => Err(Error::Api {
                operation,
                code: code.to_owned(),
                message: self
                    .error_response()
                    .error_message
                    .clone()
                    .unwrap_or_default(),
            }),
            None => Ok(()),
        }
    }
}

// Bare-acknowledgement endpoints (delete, fire-and-forget update) decode
// straight to the error fields.
impl Envelope for ErrorResponse {
    fn error_response(&self) -> &ErrorResponse {
        self
    }
}

// ── Configlet ────────────────────────────────────────────────────────

/// A named, reusable block of device configuration text.
///
/// `key` is the opaque identifier the service assigns at creation;
/// update and delete require it. `name` is unique portal-wide.
/// Single-entity fetches return this struct at top level with the
/// embedded error fields alongside, so it doubles as its own envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configlet {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// The configuration text itself.
    #[serde(default)]
    pub config: String,
    /// Configlet class, e.g. `"Static"` or `"Generated"`.
    #[serde(default, rename = "type")]
    pub configlet_type: String,
    #[serde(default)]
    pub note: String,
    /// User who last edited the configlet.
    #[serde(default)]
    pub user: String,
    /// Last-modified time in epoch milliseconds.
    #[serde(default)]
    pub date_time_in_long_format: i64,
    /// The service sends `"yes"`/`"no"` strings here, not booleans.
    #[serde(default)]
    pub is_default: String,
    #[serde(default)]
    pub is_auto_builder: String,
    #[serde(default)]
    pub reconciled: bool,
    /// Number of containers the configlet is attached to.
    #[serde(default)]
    pub container_count: i64,
    /// Number of devices the configlet is attached to.
    #[serde(default)]
    pub net_element_count: i64,
    #[serde(default)]
    pub factory_id: i64,
    #[serde(flatten)]
    pub(crate) error: ErrorResponse,
}

impl Configlet {
    /// Last-modified time as a UTC timestamp.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.date_time_in_long_format)
            .single()
    }
}

impl std::fmt::Display for Configlet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl Envelope for Configlet {
    fn error_response(&self) -> &ErrorResponse {
        &self.error
    }
}

// ── History ──────────────────────────────────────────────────────────

/// One edit in a configlet's audit trail.
///
/// Append-only: the service creates an entry on every update and never
/// mutates or deletes existing ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigletHistoryEntry {
    #[serde(default)]
    pub configlet_id: String,
    #[serde(default)]
    pub old_user_id: String,
    #[serde(default)]
    pub new_user_id: String,
    #[serde(default)]
    pub old_config: String,
    #[serde(default)]
    pub new_config: String,
    #[serde(default)]
    pub old_date: String,
    #[serde(default)]
    pub new_date: String,
    /// Epoch milliseconds.
    #[serde(default)]
    pub old_date_time_in_long_format: i64,
    /// Epoch milliseconds.
    #[serde(default)]
    pub updated_date_time_in_long_format: i64,
    #[serde(default)]
    pub factory_id: i64,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub id: i64,
}

impl ConfigletHistoryEntry {
    /// Edit time as a UTC timestamp.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.updated_date_time_in_long_format)
            .single()
    }
}

// ── Applied device ───────────────────────────────────────────────────

/// A managed device a configlet is applied to. Read-only projection
/// from `getAppliedDevices.do`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDevice {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub container_name: String,
    /// User who applied the configlet.
    #[serde(default)]
    pub applied_by: String,
    /// Applied time in epoch milliseconds.
    #[serde(default)]
    pub applied_date: i64,
    #[serde(default)]
    pub total_devices_count: i64,
}

impl AppliedDevice {
    /// Applied time as a UTC timestamp.
    pub fn applied_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.applied_date).single()
    }
}

// ── Envelopes ────────────────────────────────────────────────────────

/// Search / list result. Order is service-defined (relevance-ranked for
/// searches). `total` counts all matches, not just the returned page.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigletList {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub data: Vec<Configlet>,
    #[serde(flatten)]
    pub(crate) error: ErrorResponse,
}

impl Envelope for ConfigletList {
    fn error_response(&self) -> &ErrorResponse {
        &self.error
    }
}

/// Applied-device listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceList {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub data: Vec<AppliedDevice>,
    #[serde(flatten)]
    pub(crate) error: ErrorResponse,
}

impl Envelope for DeviceList {
    fn error_response(&self) -> &ErrorResponse {
        &self.error
    }
}

/// Paged history result, newest first as delivered by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigletHistoryList {
    #[serde(default)]
    pub total: i64,
    #[serde(default, rename = "configletHistory")]
    pub entries: Vec<ConfigletHistoryEntry>,
    #[serde(flatten)]
    pub(crate) error: ErrorResponse,
}

impl Envelope for ConfigletHistoryList {
    fn error_response(&self) -> &ErrorResponse {
        &self.error
    }
}

/// Envelope for create, wrapping the stored entity.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigletOpReturn {
    #[serde(default)]
    pub data: Option<Configlet>,
    #[serde(flatten)]
    pub(crate) error: ErrorResponse,
}

impl Envelope for ConfigletOpReturn {
    fn error_response(&self) -> &ErrorResponse {
        &self.error
    }
}

/// Envelope for the synchronous update, carrying the ids of any tasks
/// the update spawned. `task_ids` is empty exactly when the service
/// reported no device work.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReturn {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub task_ids: Vec<String>,
    #[serde(flatten)]
    pub(crate) error: ErrorResponse,
}

impl Envelope for UpdateReturn {
    fn error_response(&self) -> &ErrorResponse {
        &self.error
    }
}

/// Result of validating configuration text against a device.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateReturn {
    #[serde(default)]
    pub warning_count: i64,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(flatten)]
    pub(crate) error: ErrorResponse,
}

impl Envelope for ValidateReturn {
    fn error_response(&self) -> &ErrorResponse {
        &self.error
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn configlet_decodes_wire_names() {
        let body = serde_json::json!({
            "key": "configlet_17_22",
            "id": 17,
            "name": "mgmt-vrf",
            "config": "vrf instance MGMT\n",
            "type": "Static",
            "note": "managed by automation",
            "user": "cvpadmin",
            "dateTimeInLongFormat": 1_700_000_000_000_i64,
            "isDefault": "no",
            "isAutoBuilder": "",
            "reconciled": false,
            "containerCount": 2,
            "netElementCount": 7,
            "factoryId": 1
        });

        let configlet: Configlet = serde_json::from_value(body).expect("decode");
        assert_eq!(configlet.key, "configlet_17_22");
        assert_eq!(configlet.configlet_type, "Static");
        assert_eq!(configlet.net_element_count, 7);
        assert_eq!(configlet.is_default, "no");
        assert!(configlet.error.code().is_none());
        assert_eq!(configlet.to_string(), "mgmt-vrf");

        let modified = configlet.modified_at().expect("timestamp");
        assert_eq!(modified.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn flattened_error_fields_are_captured() {
        let body = serde_json::json!({
            "errorCode": "132801",
            "errorMessage": "Entity does not exist"
        });

        let configlet: Configlet = serde_json::from_value(body).expect("decode");
        assert_eq!(configlet.error.code(), Some("132801"));
        assert_eq!(
            configlet.error.fault(),
            Some(ServiceFault::EntityNotFound)
        );
    }

    #[test]
    fn empty_error_code_means_success() {
        let resp = ErrorResponse {
            error_code: Some(String::new()),
            error_message: None,
        };
        assert_eq!(resp.code(), None);
        assert!(resp.ensure_ok("op").is_ok());
    }

    #[test]
    fn ensure_ok_promotes_embedded_errors() {
        let resp = ErrorResponse {
            error_code: Some("122801".into()),
            error_message: Some("boom".into()),
        };
        let err = resp.ensure_ok("delete_configlet").expect_err("must fail");
        match err {
            Error::Api {
                operation,
                code,
                message,
            } => {
                assert_eq!(operation, "delete_configlet");
                assert_eq!(code, "122801");
                assert_eq!(message, "boom");
            }
            other => panic!("expected Api error, got: {other:?}"),
        }
    }

    #[test]
    fn history_list_uses_wire_field_name() {
        let body = serde_json::json!({
            "total": 1,
            "configletHistory": [{
                "configletId": "configlet_17_22",
                "oldUserId": "alice",
                "newUserId": "bob",
                "oldConfig": "hostname a",
                "newConfig": "hostname b",
                "updatedDateTimeInLongFormat": 1_700_000_000_000_i64,
                "key": "hist_1",
                "id": 1
            }]
        });

        let list: ConfigletHistoryList = serde_json::from_value(body).expect("decode");
        assert_eq!(list.total, 1);
        assert_eq!(list.entries.len(), 1);
        assert_eq!(list.entries[0].new_user_id, "bob");
        assert!(list.entries[0].updated_at().is_some());
    }

    #[test]
    fn update_return_defaults_to_no_tasks() {
        let body = serde_json::json!({ "data": "Configlet is successfully updated" });
        let ret: UpdateReturn = serde_json::from_value(body).expect("decode");
        assert!(ret.task_ids.is_empty());
        assert!(ret.ensure_ok("update_configlet").is_ok());
    }

    #[test]
    fn configlet_serializes_without_empty_error_fields() {
        let configlet = Configlet {
            key: "k".into(),
            id: 1,
            name: "n".into(),
            config: String::new(),
            configlet_type: "Static".into(),
            note: String::new(),
            user: String::new(),
            date_time_in_long_format: 0,
            is_default: "no".into(),
            is_auto_builder: "no".into(),
            reconciled: false,
            container_count: 0,
            net_element_count: 0,
            factory_id: 0,
            error: ErrorResponse::default(),
        };
        let value = serde_json::to_value(&configlet).expect("encode");
        assert!(value.get("errorCode").is_none());
        assert_eq!(value["type"], "Static");
    }
}
