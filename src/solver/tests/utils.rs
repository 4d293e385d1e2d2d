use crate::bay::Bay;
use crate::flight::{Flight, FlightService};
use crate::plan::AllocationPlan;
use crate::schedule::Schedule;
use crate::service::{CertRequirement, Service, ServiceCategory, ServiceId};
use crate::settings::Settings;
use crate::solver::{Outcome, Scheduler};
use crate::staff::{Shift, Staff};
use crate::time::Time;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub fn t(s: &str) -> Time {
    s.parse().unwrap()
}

pub fn service(
    id: ServiceId,
    name: &str,
    certs: &[u32],
    requirement: CertRequirement,
    category: ServiceCategory,
    cross_utilization_limit: u32,
    exclude_services: &[u32],
) -> Service {
    Service {
        id,
        name: name.to_string(),
        certifications: certs.to_vec(),
        certification_requirement: requirement,
        category,
        cross_utilization_limit,
        exclude_services: exclude_services.to_vec(),
    }
}

pub fn flight_service(id: ServiceId, count: u32, start: &str, end: &str) -> FlightService {
    FlightService {
        id,
        count,
        start: start.parse().unwrap(),
        end: end.parse().unwrap(),
    }
}

pub fn flight(
    number: &str,
    arrival: &str,
    departure: &str,
    bay: &str,
    flight_services: Vec<FlightService>,
) -> Flight {
    Flight {
        number: Arc::from(number),
        arrival: t(arrival),
        departure: t(departure),
        bay_number: Arc::from(bay),
        flight_services,
    }
}

pub fn staff_member(id: u32, name: &str, certs: &[u32], shifts: &[(&str, &str)]) -> Staff {
    Staff {
        id,
        name: name.to_string(),
        certifications: certs.to_vec(),
        shifts: shifts
            .iter()
            .map(|(start, end)| Shift {
                start: t(start),
                end: t(end),
            })
            .collect(),
    }
}

pub fn bay(number: &str, travel: &[(&str, i32)]) -> Bay {
    Bay {
        number: Arc::from(number),
        travel_time: travel
            .iter()
            .map(|(to, minutes)| (Arc::from(*to), *minutes))
            .collect(),
    }
}

/// Two stands 40 minutes apart, far enough that the default 15 minute
/// buffer cannot absorb the walk.
pub fn apron() -> Vec<Bay> {
    vec![bay("A1", &[("B7", 40)]), bay("B7", &[("A1", 40)])]
}

pub fn solve(services: Vec<Service>, flights: Vec<Flight>, roster: Vec<Staff>) -> Scheduler {
    solve_with_hints(services, flights, roster, None)
}

pub fn solve_with_hints(
    services: Vec<Service>,
    flights: Vec<Flight>,
    roster: Vec<Staff>,
    hints: Option<AllocationPlan>,
) -> Scheduler {
    solve_on(services, flights, roster, apron(), hints)
}

pub fn solve_on(
    services: Vec<Service>,
    flights: Vec<Flight>,
    roster: Vec<Staff>,
    bays: Vec<Bay>,
    hints: Option<AllocationPlan>,
) -> Scheduler {
    let mut scheduler =
        Scheduler::new(services, flights, roster, bays, Settings::default(), hints).unwrap();
    assert_eq!(scheduler.run().unwrap(), Outcome::Found);
    scheduler
}

/// Staff ids on a given service slot.
pub fn assigned_staff(schedule: &Schedule, flight: &str, service: ServiceId) -> Vec<u32> {
    schedule
        .flights
        .iter()
        .find(|f| f.flight_number.as_ref() == flight)
        .and_then(|f| f.services.iter().find(|slot| slot.service_id == service))
        .map(|slot| slot.staff.iter().map(|member| member.id).collect())
        .unwrap_or_default()
}

/// Checks the business rules every solved schedule must obey: staffing
/// counts, category singleness, flight-level exclusions and limits, and
/// the cross-flight multi-flight pin.
pub fn validate_schedule(schedule: &Schedule, services: &[Service]) {
    let catalog: HashMap<ServiceId, &Service> =
        services.iter().map(|service| (service.id, service)).collect();
    let mut multi_flight_held: HashMap<u32, HashSet<ServiceId>> = HashMap::new();

    for flight in &schedule.flights {
        let mut per_staff: HashMap<u32, Vec<ServiceId>> = HashMap::new();
        for slot in &flight.services {
            assert!(
                slot.staff.len() as u32 <= slot.required_count,
                "flight {} service {} wants {} staff, got {}",
                flight.flight_number,
                slot.service_id,
                slot.required_count,
                slot.staff.len()
            );
            for member in &slot.staff {
                per_staff.entry(member.id).or_default().push(slot.service_id);
                if slot.category == ServiceCategory::MultiFlight {
                    multi_flight_held
                        .entry(member.id)
                        .or_default()
                        .insert(slot.service_id);
                }
            }
        }

        for (staff_id, held) in &per_staff {
            let exclusive = held.iter().any(|id| {
                matches!(
                    catalog[id].category,
                    ServiceCategory::CommonLevel | ServiceCategory::MultiFlight
                )
            });
            if exclusive {
                assert_eq!(
                    held.len(),
                    1,
                    "staff {} mixes an exclusive service with others on flight {}: {:?}",
                    staff_id,
                    flight.flight_number,
                    held
                );
            }

            let level: Vec<&Service> = held
                .iter()
                .map(|id| catalog[id])
                .filter(|service| service.category == ServiceCategory::FlightLevel)
                .collect();
            for (i, a) in level.iter().enumerate() {
                for b in &level[i + 1..] {
                    assert!(
                        !a.excludes(b.id) && !b.excludes(a.id),
                        "staff {} holds excluded pair {}/{} on flight {}",
                        staff_id,
                        a.id,
                        b.id,
                        flight.flight_number
                    );
                }
            }
            if level.len() > 1 {
                for service in &level {
                    assert!(
                        level.len() as u32 <= service.cross_utilization_limit,
                        "staff {} stacks {} flight-level services on flight {}, limit for {} is {}",
                        staff_id,
                        level.len(),
                        flight.flight_number,
                        service.id,
                        service.cross_utilization_limit
                    );
                }
            }
        }
    }

    for (staff_id, ids) in &multi_flight_held {
        assert!(
            ids.len() <= 1,
            "staff {} is pinned to multiple multi-flight services: {:?}",
            staff_id,
            ids
        );
    }
}
