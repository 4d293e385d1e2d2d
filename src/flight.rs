use crate::bay::BayId;
use crate::service::ServiceId;
use crate::time::{ServiceTimeExpr, Time};
use serde::Deserialize;
use std::sync::Arc;
use tabled::Tabled;

pub type FlightNumber = Arc<str>;

/// A catalog service requested on a concrete flight, with its own staffing
/// count and a time window relative to the flight's arrival/departure.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightService {
    pub id: ServiceId,
    pub count: u32,
    pub start: ServiceTimeExpr,
    pub end: ServiceTimeExpr,
}

#[derive(Debug, Clone, Deserialize, Tabled)]
pub struct Flight {
    #[tabled(rename = "Flight")]
    pub number: FlightNumber,
    #[tabled(rename = "Arrival")]
    pub arrival: Time,
    #[tabled(rename = "Departure")]
    pub departure: Time,
    #[tabled(rename = "Bay")]
    pub bay_number: BayId,
    #[tabled(rename = "Services", display = "display_services")]
    pub flight_services: Vec<FlightService>,
}

impl Flight {
    /// Absolute window of a service on this flight.
    pub fn service_window(&self, fs: &FlightService) -> (Time, Time) {
        (
            fs.start.resolve(self.arrival, self.departure),
            fs.end.resolve(self.arrival, self.departure),
        )
    }

    /// Re-times the flight, e.g. after a delay. Service windows follow since
    /// they are anchored to arrival/departure.
    pub fn shift_by(&mut self, minutes: i32) {
        self.arrival = self.arrival + minutes;
        self.departure = self.departure + minutes;
    }
}

fn display_services(services: &Vec<FlightService>) -> String {
    services.len().to_string()
}
