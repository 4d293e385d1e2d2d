use crate::error::Error;
use serde::Deserialize;

/// Scheduler tuning knobs. `overlap_tolerance_buffer` is the symmetric
/// tolerance applied to staff transitions between bays, `default_travel_time`
/// the fallback when a bay pair has no entry in the travel matrix.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub overlap_tolerance_buffer: i32,
    pub default_travel_time: i32,
    pub max_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            overlap_tolerance_buffer: 15,
            default_travel_time: 5,
            max_retries: 3,
        }
    }
}

impl Settings {
    pub fn new(
        overlap_tolerance_buffer: i32,
        default_travel_time: i32,
        max_retries: u32,
    ) -> Result<Self, Error> {
        let settings = Settings {
            overlap_tolerance_buffer,
            default_travel_time,
            max_retries,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.overlap_tolerance_buffer < 0 {
            return Err(Error::InvalidSettings(
                "overlap tolerance buffer must be non-negative".to_string(),
            ));
        }
        if self.default_travel_time <= 0 {
            return Err(Error::InvalidSettings(
                "default travel time must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
