use crate::bay::{Bay, TravelTimes};
use crate::error::Error;
use crate::flight::{Flight, FlightNumber};
use crate::overlap::{OverlapDetector, OverlapMap};
use crate::plan::AllocationPlan;
use crate::schedule::Schedule;
use crate::service::{Service, ServiceId};
use crate::settings::Settings;
use crate::staff::{Staff, StaffId};
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, default_solver,
    variable,
};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

pub mod constraints;
#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    NotFound,
}

pub(crate) type VarKey = (FlightNumber, ServiceId, StaffId);

/// Model under construction. Constraint builders draw fresh indicator
/// variables from `problem` and push finished constraints; the driver loads
/// them into the backend once the objective is fixed.
pub(crate) struct ModelCtx<'a> {
    problem: &'a mut ProblemVariables,
    constraints: &'a mut Vec<good_lp::Constraint>,
}

impl ModelCtx<'_> {
    pub(crate) fn new_bool(&mut self) -> Variable {
        self.problem.add(variable().binary())
    }

    pub(crate) fn add(&mut self, constraint: good_lp::Constraint) {
        self.constraints.push(constraint);
    }
}

/// Read-only view of the problem shared by all constraint builders.
pub(crate) struct ModelInputs<'a> {
    pub flights: &'a [Flight],
    pub roster: &'a [Staff],
    pub service_map: &'a HashMap<ServiceId, Service>,
    pub flight_index: &'a HashMap<FlightNumber, usize>,
    pub travel: &'a TravelTimes,
    pub overlaps: &'a OverlapMap,
    pub buffer_minutes: i32,
    pub vars: &'a BTreeMap<VarKey, Variable>,
}

impl ModelInputs<'_> {
    pub(crate) fn var(&self, flight: &FlightNumber, service: ServiceId, staff: StaffId) -> Variable {
        self.vars[&(flight.clone(), service, staff)]
    }
}

pub struct Scheduler {
    flights: Vec<Flight>,
    roster: Vec<Staff>,
    settings: Settings,
    hints: Option<AllocationPlan>,
    service_map: HashMap<ServiceId, Service>,
    staff_map: HashMap<StaffId, Staff>,
    flight_index: HashMap<FlightNumber, usize>,
    travel: TravelTimes,
    overlap_map: OverlapMap,
    plan: Option<AllocationPlan>,
}

impl Scheduler {
    /// Validates every cross-reference up front; nothing fails mid-solve.
    pub fn new(
        services: Vec<Service>,
        flights: Vec<Flight>,
        roster: Vec<Staff>,
        bays: Vec<Bay>,
        settings: Settings,
        hints: Option<AllocationPlan>,
    ) -> Result<Self, Error> {
        settings.validate()?;

        let service_map: HashMap<ServiceId, Service> =
            services.iter().map(|service| (service.id, service.clone())).collect();
        let staff_map: HashMap<StaffId, Staff> =
            roster.iter().map(|member| (member.id, member.clone())).collect();
        let bay_ids: HashSet<_> = bays.iter().map(|bay| bay.number.clone()).collect();

        for flight in &flights {
            if !bay_ids.contains(&flight.bay_number) {
                return Err(Error::UnknownReference {
                    kind: "bay",
                    id: flight.bay_number.to_string(),
                });
            }
            for fs in &flight.flight_services {
                if !service_map.contains_key(&fs.id) {
                    return Err(Error::UnknownReference {
                        kind: "service",
                        id: fs.id.to_string(),
                    });
                }
            }
        }
        for service in &services {
            for excluded in &service.exclude_services {
                if !service_map.contains_key(excluded) {
                    return Err(Error::UnknownReference {
                        kind: "service",
                        id: excluded.to_string(),
                    });
                }
            }
        }

        let flight_index: HashMap<FlightNumber, usize> = flights
            .iter()
            .enumerate()
            .map(|(i, flight)| (flight.number.clone(), i))
            .collect();
        let travel = TravelTimes::build(&bays, settings.default_travel_time);
        let overlap_map = OverlapDetector::new(
            &flights,
            &travel,
            &service_map,
            settings.overlap_tolerance_buffer,
        )
        .detect();

        Ok(Scheduler {
            flights,
            roster,
            settings,
            hints,
            service_map,
            staff_map,
            flight_index,
            travel,
            overlap_map,
            plan: None,
        })
    }

    /// One blocking solve. Constraints only restrict, so the all-zero
    /// assignment keeps the model feasible; `NotFound` is the backend telling
    /// us otherwise and is surfaced rather than retried.
    pub fn run(&mut self) -> Result<Outcome, Error> {
        info!(
            "starting allocation solve: {} flights, {} staff, {} services",
            self.flights.len(),
            self.roster.len(),
            self.service_map.len()
        );
        debug!(
            "settings: buffer {} min, default travel {} min, max retries {}",
            self.settings.overlap_tolerance_buffer,
            self.settings.default_travel_time,
            self.settings.max_retries
        );

        let mut problem = ProblemVariables::new();
        let mut vars: BTreeMap<VarKey, Variable> = BTreeMap::new();
        for flight in &self.flights {
            for fs in &flight.flight_services {
                for member in &self.roster {
                    let var = problem.add(variable().binary());
                    vars.insert((flight.number.clone(), fs.id, member.id), var);
                }
            }
        }
        debug!("created {} assignment variables", vars.len());

        let mut emitted = Vec::new();
        {
            let mut ctx = ModelCtx {
                problem: &mut problem,
                constraints: &mut emitted,
            };
            let inputs = ModelInputs {
                flights: &self.flights,
                roster: &self.roster,
                service_map: &self.service_map,
                flight_index: &self.flight_index,
                travel: &self.travel,
                overlaps: &self.overlap_map,
                buffer_minutes: self.settings.overlap_tolerance_buffer,
                vars: &vars,
            };
            constraints::apply_availability(&mut ctx, &inputs);
            constraints::apply_certification(&mut ctx, &inputs);
            constraints::apply_staff_count(&mut ctx, &inputs);
            constraints::apply_flight_level(&mut ctx, &inputs);
            constraints::apply_common_level(&mut ctx, &inputs);
            constraints::apply_multi_flight(&mut ctx, &inputs);
            constraints::apply_flight_transition(&mut ctx, &inputs);
        }
        debug!("emitted {} constraints", emitted.len());

        let objective = self.objective(&vars);
        let mut model = problem.maximise(objective).using(default_solver);
        for constraint in emitted {
            model.add_constraint(constraint);
        }

        match model.solve() {
            Ok(solution) => {
                info!("solution found");
                let mut plan = AllocationPlan::new();
                for ((flight, service, staff), var) in &vars {
                    plan.add(flight.clone(), *service, *staff, solution.value(*var) > 0.5);
                }
                self.plan = Some(plan);
                Ok(Outcome::Found)
            }
            Err(ResolutionError::Infeasible) => {
                warn!("no feasible allocation");
                self.plan = None;
                Ok(Outcome::NotFound)
            }
            Err(other) => Err(Error::Backend(other.to_string())),
        }
    }

    /// Maximizes coverage while preferring staff with fewer certifications,
    /// so broadly-skilled staff stay free for the assignments only they can
    /// take. Weights are kept integral: with denom = lcm(1..=max certs) the
    /// per-staff weight is denom + denom/|certs|. Hints from a previous plan
    /// form a strict tie-break layer underneath: primary weights are scaled
    /// past the largest possible hint total, so hints can steer the choice
    /// between optima but never displace one.
    fn objective(&self, vars: &BTreeMap<VarKey, Variable>) -> Expression {
        let max_certs = self
            .roster
            .iter()
            .map(|member| member.certifications.len())
            .max()
            .unwrap_or(0)
            .max(1);
        let denom = (1..=max_certs as i64).fold(1, lcm);
        let weights: HashMap<StaffId, i64> = self
            .roster
            .iter()
            .map(|member| {
                let certs = member.certifications.len().max(1) as i64;
                (member.id, denom + denom / certs)
            })
            .collect();
        let hint_scale = match &self.hints {
            Some(plan) => plan.assigned().count() as i64 + 1,
            None => 1,
        };

        vars.iter()
            .map(|((flight, service, staff), var)| {
                let mut weight = weights[staff] * hint_scale;
                if let Some(hints) = &self.hints {
                    if hints.get(flight, *service, *staff) == Some(true) {
                        debug!("hinting {} / {} / {} towards 1", flight, service, staff);
                        weight += 1;
                    }
                }
                weight as f64 * *var
            })
            .sum()
    }

    pub fn allocation_plan(&self) -> Option<&AllocationPlan> {
        self.plan.as_ref()
    }

    pub fn schedule(&self) -> Option<Schedule> {
        self.plan
            .as_ref()
            .map(|plan| plan.to_schedule(&self.flights, &self.service_map, &self.staff_map))
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn lcm(a: i64, b: i64) -> i64 {
    a / gcd(a, b) * b
}
