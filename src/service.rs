use serde::Deserialize;
use std::fmt;

pub type ServiceId = u32;
pub type CertificationId = u32;

/// How a service's certification list is interpreted against a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CertRequirement {
    #[serde(rename = "All", alias = "ALL")]
    All,
    #[serde(rename = "Any", alias = "ANY")]
    Any,
}

/// The category drives which constraint family applies to a service. The
/// JSON codes are "F"/"C"/"M"; the legacy "MT"/"S"/"FX" spellings are
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ServiceCategory {
    /// Several may be held on one flight, limited by exclusions and the
    /// cross-utilization limit.
    #[serde(rename = "F", alias = "MT")]
    FlightLevel,
    /// At most one per flight, and it shuts out every other category there.
    #[serde(rename = "C", alias = "S")]
    CommonLevel,
    /// Like CommonLevel on a single flight, and across flights the staff is
    /// pinned to one service id.
    #[serde(rename = "M", alias = "FX")]
    MultiFlight,
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ServiceCategory::FlightLevel => "F",
            ServiceCategory::CommonLevel => "C",
            ServiceCategory::MultiFlight => "M",
        };
        write!(f, "{}", code)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    #[serde(default)]
    pub certifications: Vec<CertificationId>,
    pub certification_requirement: CertRequirement,
    #[serde(rename = "type")]
    pub category: ServiceCategory,
    #[serde(default)]
    pub cross_utilization_limit: u32,
    #[serde(default)]
    pub exclude_services: Vec<ServiceId>,
}

impl Service {
    pub fn excludes(&self, other: ServiceId) -> bool {
        self.exclude_services.contains(&other)
    }
}
