//! Services and their discrete health status.
//!
//! Status is a closed four-value enum; unknown values are rejected at the
//! mutation boundary by construction rather than by scattered membership
//! checks. There is no state machine between statuses: any status may move
//! to any other directly.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Discrete health status of a single service.
///
/// Serialised with the operator-facing labels (`"Degraded Performance"`,
/// not `"degraded_performance"`) so payloads match what the public status
/// page displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ServiceStatus {
    /// The service is healthy.
    #[serde(rename = "Operational")]
    Operational,
    /// The service is up but degraded.
    #[serde(rename = "Degraded Performance")]
    DegradedPerformance,
    /// Part of the service is down.
    #[serde(rename = "Partial Outage")]
    PartialOutage,
    /// The service is down.
    #[serde(rename = "Major Outage")]
    MajorOutage,
}

impl ServiceStatus {
    /// All statuses in ascending severity order.
    pub const ALL: [Self; 4] = [
        Self::Operational,
        Self::DegradedPerformance,
        Self::PartialOutage,
        Self::MajorOutage,
    ];

    /// The operator-facing label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Operational => "Operational",
            Self::DegradedPerformance => "Degraded Performance",
            Self::PartialOutage => "Partial Outage",
            Self::MajorOutage => "Major Outage",
        }
    }

    /// Severity rank used by the aggregator; higher is worse.
    pub fn severity(self) -> u8 {
        match self {
            Self::Operational => 0,
            Self::DegradedPerformance => 1,
            Self::PartialOutage => 2,
            Self::MajorOutage => 3,
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceStatus {
    type Err = ParseServiceStatusError;

    /// Parse the operator-facing label, case-sensitively.
    ///
    /// # Examples
    /// ```
    /// use statuspage::domain::ServiceStatus;
    ///
    /// let status: ServiceStatus = "Major Outage".parse().expect("known status");
    /// assert_eq!(status, ServiceStatus::MajorOutage);
    /// assert!("Unknown".parse::<ServiceStatus>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Operational" => Ok(Self::Operational),
            "Degraded Performance" => Ok(Self::DegradedPerformance),
            "Partial Outage" => Ok(Self::PartialOutage),
            "Major Outage" => Ok(Self::MajorOutage),
            other => Err(ParseServiceStatusError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Error raised when parsing a status label outside the four-value enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid service status: {value}")]
pub struct ParseServiceStatusError {
    /// The rejected input.
    pub value: String,
}

/// A named service whose status operators set manually.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    /// Primary identifier.
    pub id: Uuid,
    /// Service name as shown on the status page.
    pub name: String,
    /// Current health status.
    pub status: ServiceStatus,
    /// Owning organization.
    pub organization_id: Uuid,
}
