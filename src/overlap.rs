use crate::bay::TravelTimes;
use crate::flight::{Flight, FlightNumber};
use crate::service::{Service, ServiceCategory, ServiceId};
use crate::time::Time;
use log::debug;
use std::collections::HashMap;

/// Directed map from a flight to the later flights it can conflict with for
/// some staff member. A missing entry means no conflict is possible.
pub type OverlapMap = HashMap<FlightNumber, Vec<FlightNumber>>;

/// Pre-solver pass that prunes the quadratic flight-pair transition search
/// down to pairs that can actually collide once bay travel and the tolerance
/// buffer are accounted for.
pub struct OverlapDetector<'a> {
    flights: &'a [Flight],
    travel: &'a TravelTimes,
    service_map: &'a HashMap<ServiceId, Service>,
    buffer_minutes: i32,
}

impl<'a> OverlapDetector<'a> {
    pub fn new(
        flights: &'a [Flight],
        travel: &'a TravelTimes,
        service_map: &'a HashMap<ServiceId, Service>,
        buffer_minutes: i32,
    ) -> Self {
        OverlapDetector {
            flights,
            travel,
            service_map,
            buffer_minutes,
        }
    }

    pub fn detect(&self) -> OverlapMap {
        debug!("building flight overlap map");

        // Sorting by earliest service start (not arrival) keeps earliest_start
        // non-decreasing along the sweep, which is what makes the early exit
        // below sound.
        let mut sorted: Vec<&Flight> = self.flights.iter().collect();
        sorted.sort_by_key(|flight| (self.earliest_start(flight), flight.number.clone()));

        let mut overlap_map = OverlapMap::new();
        for (i, flight_a) in sorted.iter().enumerate() {
            let a_end = self.latest_end(flight_a);
            for flight_b in &sorted[i + 1..] {
                let b_start = self.earliest_start(flight_b);
                let travel = self.travel.between(&flight_a.bay_number, &flight_b.bay_number);
                let required_gap = (travel - self.buffer_minutes).max(0);

                if a_end + required_gap > b_start {
                    debug!(
                        "overlap: {} (ends {}) conflicts with {} (starts {}), gap {} min",
                        flight_a.number, a_end, flight_b.number, b_start, required_gap
                    );
                    overlap_map
                        .entry(flight_a.number.clone())
                        .or_insert_with(Vec::new)
                        .push(flight_b.number.clone());
                } else {
                    break;
                }
            }
        }
        overlap_map
    }

    /// Latest end over the flight's services that are bound to this flight.
    /// MultiFlight services span flights, so they do not anchor the sweep;
    /// a flight with none of the others falls back to its departure.
    fn latest_end(&self, flight: &Flight) -> Time {
        flight
            .flight_services
            .iter()
            .filter(|fs| self.service_map[&fs.id].category != ServiceCategory::MultiFlight)
            .map(|fs| flight.service_window(fs).1)
            .max()
            .unwrap_or(flight.departure)
    }

    fn earliest_start(&self, flight: &Flight) -> Time {
        flight
            .flight_services
            .iter()
            .filter(|fs| self.service_map[&fs.id].category != ServiceCategory::MultiFlight)
            .map(|fs| flight.service_window(fs).0)
            .min()
            .unwrap_or(flight.arrival)
    }
}
