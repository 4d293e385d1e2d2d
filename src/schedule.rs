use crate::flight::FlightNumber;
use crate::service::{ServiceCategory, ServiceId};
use crate::staff::StaffId;
use crate::time::Time;
use colored::Colorize;
use itertools::Itertools;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

#[derive(Debug, Clone, PartialEq)]
pub struct StaffAssignment {
    pub id: StaffId,
    pub name: String,
}

/// One requested service on one flight, with whoever the solver put on it.
/// Unfilled slots keep an empty staff list so gaps stay visible.
#[derive(Debug, Clone)]
pub struct ServiceSlot {
    pub service_id: ServiceId,
    pub service_name: String,
    pub category: ServiceCategory,
    pub staff: Vec<StaffAssignment>,
    pub required_count: u32,
}

#[derive(Debug, Clone)]
pub struct FlightAllocation {
    pub flight_number: FlightNumber,
    pub arrival: Time,
    pub departure: Time,
    pub services: Vec<ServiceSlot>,
}

/// Human-oriented roll-up of a solved model, one row per service slot.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub flights: Vec<FlightAllocation>,
}

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "Flight")]
    flight: String,
    #[tabled(rename = "Arrival")]
    arrival: String,
    #[tabled(rename = "Departure")]
    departure: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Type")]
    category: String,
    #[tabled(rename = "Staff")]
    staff: String,
    #[tabled(rename = "Filled")]
    filled: String,
}

impl Schedule {
    /// Total service slots and how many have their full required staffing.
    pub fn coverage(&self) -> (usize, usize) {
        let slots = self.flights.iter().map(|f| f.services.len()).sum();
        let filled = self
            .flights
            .iter()
            .flat_map(|f| &f.services)
            .filter(|slot| slot.staff.len() as u32 >= slot.required_count)
            .count();
        (filled, slots)
    }

    pub fn table(&self) -> Table {
        let rows: Vec<ScheduleRow> = self
            .flights
            .iter()
            .flat_map(|flight| {
                flight.services.iter().map(|slot| {
                    let staff = if slot.staff.is_empty() {
                        "no staff assigned".red().to_string()
                    } else {
                        slot.staff
                            .iter()
                            .map(|member| format!("{} ({})", member.name, member.id))
                            .join(", ")
                    };
                    let assigned = slot.staff.len() as u32;
                    let filled = format!("{}/{}", assigned, slot.required_count);
                    let filled = if assigned >= slot.required_count {
                        filled.green().to_string()
                    } else {
                        filled.yellow().to_string()
                    };
                    ScheduleRow {
                        flight: flight.flight_number.to_string(),
                        arrival: flight.arrival.to_string(),
                        departure: flight.departure.to_string(),
                        service: slot.service_name.clone(),
                        category: slot.category.to_string(),
                        staff,
                        filled,
                    }
                })
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        table.with(Alignment::left());
        table
    }
}
