//! Boundary parsing helpers shared by HTTP handlers.
//!
//! Path and body fields arrive as strings; these helpers parse them into
//! domain types, producing `invalid_request` errors that name the
//! offending field in `details`.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, ServiceStatus};

/// Name of the field being validated, as spelled in the payload.
#[derive(Debug, Clone, Copy)]
pub struct FieldName(&'static str);

impl FieldName {
    /// Wrap a payload field name.
    pub fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The wrapped name.
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

/// Parse a UUID field, rejecting malformed values.
pub fn parse_uuid(raw: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(&raw).map_err(|_| {
        Error::invalid_request(format!("{} must be a UUID", field.as_str())).with_details(json!({
            "field": field.as_str(),
            "value": raw,
        }))
    })
}

/// Parse a service status label into the closed enum.
///
/// Unknown values are a validation error; the closed set is part of the
/// API contract.
pub fn parse_service_status(raw: String, field: FieldName) -> Result<ServiceStatus, Error> {
    raw.parse::<ServiceStatus>().map_err(|_| {
        Error::invalid_request("Invalid status value").with_details(json!({
            "field": field.as_str(),
            "value": raw,
            "allowed": ServiceStatus::ALL
                .iter()
                .map(|status| status.as_str())
                .collect::<Vec<_>>(),
        }))
    })
}
