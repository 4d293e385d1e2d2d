use crate::error::Error;
use crate::flight::{Flight, FlightNumber};
use crate::schedule::{FlightAllocation, Schedule, ServiceSlot, StaffAssignment};
use crate::service::{Service, ServiceId};
use crate::staff::{Staff, StaffId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Dense boolean assignment tensor from one solver run, keyed
/// flight -> service -> staff. Serialized between runs so a re-solve after a
/// disruption can take the previous day plan as hints; the `remove_*`
/// operations let the caller drop entries invalidated by the disruption
/// before feeding the plan back in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationPlan {
    allocations: BTreeMap<FlightNumber, BTreeMap<ServiceId, BTreeMap<StaffId, bool>>>,
}

impl AllocationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, flight: FlightNumber, service: ServiceId, staff: StaffId, value: bool) {
        self.allocations
            .entry(flight)
            .or_default()
            .entry(service)
            .or_default()
            .insert(staff, value);
    }

    pub fn get(&self, flight: &str, service: ServiceId, staff: StaffId) -> Option<bool> {
        self.allocations
            .get(flight)?
            .get(&service)?
            .get(&staff)
            .copied()
    }

    pub fn remove_flight(&mut self, flight: &str) {
        self.allocations.remove(flight);
    }

    pub fn remove_service(&mut self, service: ServiceId) {
        for services in self.allocations.values_mut() {
            services.remove(&service);
        }
    }

    pub fn remove_staff(&mut self, staff: StaffId) {
        for services in self.allocations.values_mut() {
            for assignments in services.values_mut() {
                assignments.remove(&staff);
            }
        }
    }

    /// Triples whose stored value is true, in key order.
    pub fn assigned(&self) -> impl Iterator<Item = (&FlightNumber, ServiceId, StaffId)> + '_ {
        self.allocations.iter().flat_map(|(flight, services)| {
            services.iter().flat_map(move |(service, assignments)| {
                assignments
                    .iter()
                    .filter(|(_, assigned)| **assigned)
                    .map(move |(staff, _)| (flight, *service, *staff))
            })
        })
    }

    pub fn serialize(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn deserialize(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Projects the plan onto the catalogs without re-solving. Every service
    /// a flight requests gets a slot; the staff list stays empty where the
    /// plan has no positive entry. Plan entries for flights or services the
    /// catalogs no longer know are skipped.
    pub fn to_schedule(
        &self,
        flights: &[Flight],
        service_map: &HashMap<ServiceId, Service>,
        staff_map: &HashMap<StaffId, Staff>,
    ) -> Schedule {
        let mut allocations = Vec::new();
        for flight in flights {
            let plan_services = self.allocations.get(&flight.number);
            let mut services = Vec::new();
            for fs in &flight.flight_services {
                let Some(service) = service_map.get(&fs.id) else {
                    continue;
                };
                let staff = plan_services
                    .and_then(|services| services.get(&fs.id))
                    .map(|assignments| {
                        assignments
                            .iter()
                            .filter(|(_, assigned)| **assigned)
                            .filter_map(|(id, _)| staff_map.get(id))
                            .map(|member| StaffAssignment {
                                id: member.id,
                                name: member.name.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                services.push(ServiceSlot {
                    service_id: service.id,
                    service_name: service.name.clone(),
                    category: service.category,
                    staff,
                    required_count: fs.count,
                });
            }
            allocations.push(FlightAllocation {
                flight_number: flight.number.clone(),
                arrival: flight.arrival,
                departure: flight.departure,
                services,
            });
        }
        Schedule { flights: allocations }
    }
}
