//! Status aggregation: one organization-wide label from many services.
//!
//! A pure, total reduction with no hidden state. Callers must re-derive
//! the result on every read; it is never cached or persisted, since
//! service statuses change between reads.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::service::ServiceStatus;

/// Derived severity-ranked summary of all services in an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OverallStatus {
    /// No services registered; nothing to aggregate.
    #[serde(rename = "Unknown")]
    Unknown,
    /// Every service is operational.
    #[serde(rename = "All Systems Operational")]
    AllSystemsOperational,
    /// At least one service is degraded, none worse.
    #[serde(rename = "Degraded Performance")]
    DegradedPerformance,
    /// At least one partial outage, no major outage.
    #[serde(rename = "Partial Outage")]
    PartialOutage,
    /// At least one major outage.
    #[serde(rename = "Major Outage")]
    MajorOutage,
}

impl OverallStatus {
    /// The viewer-facing label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::AllSystemsOperational => "All Systems Operational",
            Self::DegradedPerformance => "Degraded Performance",
            Self::PartialOutage => "Partial Outage",
            Self::MajorOutage => "Major Outage",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the overall status from a collection of service statuses.
///
/// Highest severity wins: any `Major Outage` dominates, then
/// `Partial Outage`, then `Degraded Performance`; otherwise everything is
/// operational. An empty collection yields [`OverallStatus::Unknown`].
/// Input order never affects the result.
///
/// # Examples
/// ```
/// use statuspage::domain::{OverallStatus, ServiceStatus, overall_status};
///
/// assert_eq!(overall_status([]), OverallStatus::Unknown);
/// assert_eq!(
///     overall_status([ServiceStatus::Operational, ServiceStatus::DegradedPerformance]),
///     OverallStatus::DegradedPerformance,
/// );
/// ```
pub fn overall_status(statuses: impl IntoIterator<Item = ServiceStatus>) -> OverallStatus {
    let worst = statuses
        .into_iter()
        .max_by_key(|status| status.severity());
    match worst {
        None => OverallStatus::Unknown,
        Some(ServiceStatus::Operational) => OverallStatus::AllSystemsOperational,
        Some(ServiceStatus::DegradedPerformance) => OverallStatus::DegradedPerformance,
        Some(ServiceStatus::PartialOutage) => OverallStatus::PartialOutage,
        Some(ServiceStatus::MajorOutage) => OverallStatus::MajorOutage,
    }
}
