//! The constraint families. Each builder walks the shared inputs and emits
//! linear constraints over the boolean assignment variables; builders are
//! independent and their order does not change the solution set.

use super::{ModelCtx, ModelInputs};
use crate::flight::Flight;
use crate::service::{ServiceCategory, ServiceId};
use crate::staff::StaffId;
use good_lp::{Expression, Variable, constraint};
use log::debug;
use std::collections::BTreeMap;

/// Staff without a shift fully covering a service window cannot take it.
pub(crate) fn apply_availability(ctx: &mut ModelCtx, inputs: &ModelInputs) {
    debug!("adding availability constraints");
    for flight in inputs.flights {
        for fs in &flight.flight_services {
            let (start, end) = flight.service_window(fs);
            for member in inputs.roster {
                if !member.is_available(start, end) {
                    let var = inputs.var(&flight.number, fs.id, member.id);
                    ctx.add(constraint!(Expression::from(var) == 0));
                }
            }
        }
    }
}

/// Staff failing a service's All/Any certification rule cannot take it.
pub(crate) fn apply_certification(ctx: &mut ModelCtx, inputs: &ModelInputs) {
    debug!("adding certification constraints");
    for flight in inputs.flights {
        for fs in &flight.flight_services {
            let service = &inputs.service_map[&fs.id];
            for member in inputs.roster {
                if !member.can_perform(service) {
                    let var = inputs.var(&flight.number, fs.id, member.id);
                    ctx.add(constraint!(Expression::from(var) == 0));
                }
            }
        }
    }
}

/// At most `count` staff per (flight, service) slot.
pub(crate) fn apply_staff_count(ctx: &mut ModelCtx, inputs: &ModelInputs) {
    debug!("adding staff count constraints");
    for flight in inputs.flights {
        for fs in &flight.flight_services {
            let assigned: Expression = inputs
                .roster
                .iter()
                .map(|member| inputs.var(&flight.number, fs.id, member.id))
                .sum();
            ctx.add(constraint!(assigned <= fs.count as f64));
        }
    }
}

/// Flight-level services may be stacked on one flight, limited by pairwise
/// exclusions and each service's cross-utilization limit.
pub(crate) fn apply_flight_level(ctx: &mut ModelCtx, inputs: &ModelInputs) {
    debug!("adding flight-level service constraints");
    for flight in inputs.flights {
        let level: Vec<_> = flight
            .flight_services
            .iter()
            .filter(|fs| inputs.service_map[&fs.id].category == ServiceCategory::FlightLevel)
            .collect();
        if level.len() < 2 {
            continue;
        }

        for member in inputs.roster {
            // exclusion is symmetric: either side declaring the other
            // blocks the pair
            for (i, a) in level.iter().enumerate() {
                for b in &level[i + 1..] {
                    let service_a = &inputs.service_map[&a.id];
                    let service_b = &inputs.service_map[&b.id];
                    if service_a.excludes(b.id) || service_b.excludes(a.id) {
                        let var_a = inputs.var(&flight.number, a.id, member.id);
                        let var_b = inputs.var(&flight.number, b.id, member.id);
                        ctx.add(constraint!(var_a + var_b <= 1));
                        debug!(
                            "exclusion: staff {} cannot stack services {} and {} on {}",
                            member.id, a.id, b.id, flight.number
                        );
                    }
                }
            }

            // the service itself plus every compatible peer it could be
            // stacked with stays within its cross-utilization limit
            for fs in &level {
                let service = &inputs.service_map[&fs.id];
                let compatible: Vec<Variable> = level
                    .iter()
                    .filter(|other| other.id != fs.id)
                    .filter(|other| {
                        let peer = &inputs.service_map[&other.id];
                        !service.excludes(other.id) && !peer.excludes(fs.id)
                    })
                    .map(|other| inputs.var(&flight.number, other.id, member.id))
                    .collect();
                if compatible.is_empty() {
                    continue;
                }
                let held: Expression = compatible
                    .into_iter()
                    .chain(std::iter::once(inputs.var(&flight.number, fs.id, member.id)))
                    .sum();
                ctx.add(constraint!(held <= service.cross_utilization_limit as f64));
            }
        }
    }
}

/// Common-level services: at most one per staff per flight, and holding one
/// shuts out every other category on that flight.
pub(crate) fn apply_common_level(ctx: &mut ModelCtx, inputs: &ModelInputs) {
    debug!("adding common-level service constraints");
    apply_category_exclusivity(ctx, inputs, ServiceCategory::CommonLevel);
}

/// Multi-flight services: the common-level rules within a flight, plus the
/// cross-flight pin: a staff member holds at most one distinct multi-flight
/// service id over the whole day.
pub(crate) fn apply_multi_flight(ctx: &mut ModelCtx, inputs: &ModelInputs) {
    debug!("adding multi-flight service constraints");
    apply_category_exclusivity(ctx, inputs, ServiceCategory::MultiFlight);

    for member in inputs.roster {
        let mut per_service: BTreeMap<ServiceId, Vec<Variable>> = BTreeMap::new();
        for flight in inputs.flights {
            for fs in &flight.flight_services {
                if inputs.service_map[&fs.id].category == ServiceCategory::MultiFlight {
                    per_service
                        .entry(fs.id)
                        .or_default()
                        .push(inputs.var(&flight.number, fs.id, member.id));
                }
            }
        }
        if per_service.len() < 2 {
            continue;
        }

        // indicator y per service id: y = 1 iff the staff holds that id on
        // any flight; at most one indicator may fire
        let mut indicators: Vec<Variable> = Vec::new();
        for (service, vars) in &per_service {
            let indicator = ctx.new_bool();
            let held: Expression = vars.iter().copied().sum();
            ctx.add(constraint!(Expression::from(indicator) - held.clone() <= 0));
            ctx.add(constraint!(held - vars.len() as f64 * indicator <= 0));
            indicators.push(indicator);
            debug!(
                "staff {}: multi-flight candidate service {} tracked across {} flights",
                member.id,
                service,
                vars.len()
            );
        }
        let picked: Expression = indicators.into_iter().sum();
        ctx.add(constraint!(picked <= 1));
    }
}

fn apply_category_exclusivity(
    ctx: &mut ModelCtx,
    inputs: &ModelInputs,
    category: ServiceCategory,
) {
    for flight in inputs.flights {
        for member in inputs.roster {
            let in_category: Vec<Variable> = vars_of(inputs, flight, member.id, |c| c == category);
            if in_category.is_empty() {
                continue;
            }
            let category_sum: Expression = in_category.into_iter().sum();
            ctx.add(constraint!(category_sum.clone() <= 1));

            let others: Vec<Variable> = vars_of(inputs, flight, member.id, |c| c != category);
            if others.is_empty() {
                continue;
            }
            // indicator h = 1 iff a service of this category is held; the
            // equality is exact because the category sum is capped at 1
            let held = ctx.new_bool();
            ctx.add(constraint!(category_sum - held == 0));
            let other_sum: Expression = others.iter().copied().sum();
            let cap = others.len() as f64;
            ctx.add(constraint!(other_sum + cap * held <= cap));
        }
    }
}

fn vars_of(
    inputs: &ModelInputs,
    flight: &Flight,
    staff: StaffId,
    keep: impl Fn(ServiceCategory) -> bool,
) -> Vec<Variable> {
    flight
        .flight_services
        .iter()
        .filter(|fs| keep(inputs.service_map[&fs.id].category))
        .map(|fs| inputs.var(&flight.number, fs.id, staff))
        .collect()
}

/// A staff member cannot work two services whose windows, plus the bay
/// travel in between, collide beyond the tolerance buffer. Only pairs the
/// overlap map flags are examined; multi-flight services span flights and
/// are exempt. Skipping staff-ineligible ends changes nothing semantically
/// (those variables are already forced to 0) but keeps the model small.
pub(crate) fn apply_flight_transition(ctx: &mut ModelCtx, inputs: &ModelInputs) {
    debug!("adding flight transition constraints");
    for member in inputs.roster {
        for flight_a in inputs.flights {
            let Some(successors) = inputs.overlaps.get(&flight_a.number) else {
                continue;
            };
            for number_b in successors {
                let flight_b = &inputs.flights[inputs.flight_index[number_b]];
                let travel = inputs
                    .travel
                    .between(&flight_a.bay_number, &flight_b.bay_number);

                for service_a in &flight_a.flight_services {
                    let catalog_a = &inputs.service_map[&service_a.id];
                    if catalog_a.category == ServiceCategory::MultiFlight {
                        continue;
                    }
                    let (a_start, a_end) = flight_a.service_window(service_a);
                    if !member.is_available(a_start, a_end) || !member.can_perform(catalog_a) {
                        continue;
                    }

                    for service_b in &flight_b.flight_services {
                        let catalog_b = &inputs.service_map[&service_b.id];
                        if catalog_b.category == ServiceCategory::MultiFlight {
                            continue;
                        }
                        let (b_start, b_end) = flight_b.service_window(service_b);
                        if !member.is_available(b_start, b_end) || !member.can_perform(catalog_b) {
                            continue;
                        }

                        if a_end + travel > b_start + inputs.buffer_minutes {
                            let var_a = inputs.var(&flight_a.number, service_a.id, member.id);
                            let var_b = inputs.var(&flight_b.number, service_b.id, member.id);
                            ctx.add(constraint!(var_a + var_b <= 1));
                            debug!(
                                "transition conflict: staff {} cannot take {}@{} (ends {}) then {}@{} (starts {})",
                                member.id,
                                service_a.id,
                                flight_a.number,
                                a_end,
                                service_b.id,
                                flight_b.number,
                                b_start
                            );
                        }
                    }
                }
            }
        }
    }
}
