use crate::service::{CertRequirement, CertificationId, Service};
use crate::time::Time;
use serde::Deserialize;

pub type StaffId = u32;

/// A contiguous on-duty interval within the day.
#[derive(Debug, Clone, Deserialize)]
pub struct Shift {
    pub start: Time,
    pub end: Time,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub certifications: Vec<CertificationId>,
    pub shifts: Vec<Shift>,
}

impl Staff {
    /// True iff some single shift fully contains `[start, end]`.
    pub fn is_available(&self, start: Time, end: Time) -> bool {
        self.shifts
            .iter()
            .any(|shift| shift.start <= start && shift.end >= end)
    }

    pub fn can_perform(&self, service: &Service) -> bool {
        match service.certification_requirement {
            CertRequirement::All => service
                .certifications
                .iter()
                .all(|cert| self.certifications.contains(cert)),
            // Any over an empty list is false, matching the product rule
            CertRequirement::Any => service
                .certifications
                .iter()
                .any(|cert| self.certifications.contains(cert)),
        }
    }
}
