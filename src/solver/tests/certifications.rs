use crate::service::CertRequirement::{All, Any};
use crate::service::ServiceCategory::FlightLevel;
use crate::solver::tests::utils::*;

#[test]
fn test_only_certified_and_on_shift_staff_assignable() {
    let services = vec![service(1, "Toilet Cleaning", &[1], All, FlightLevel, 2, &[])];
    let flights = vec![flight(
        "DL101",
        "05:30",
        "06:45",
        "A1",
        vec![flight_service(1, 1, "A-10", "A+15")],
    )];
    let roster = vec![
        // no certification
        staff_member(1, "Alice Carter", &[], &[("04:00", "08:00")]),
        // certified, but the shift misses the 05:20-05:45 window
        staff_member(2, "Bob Mensah", &[1], &[("06:00", "10:00")]),
        // certified and available
        staff_member(3, "Cara Novak", &[1], &[("05:00", "09:00")]),
    ];

    let scheduler = solve(services.clone(), flights, roster);
    let schedule = scheduler.schedule().unwrap();

    assert_eq!(assigned_staff(&schedule, "DL101", 1), vec![3]);
    validate_schedule(&schedule, &services);
}

#[test]
fn test_any_requirement_needs_one_matching_certification() {
    let services = vec![service(2, "Refueling", &[3, 4], Any, FlightLevel, 2, &[])];
    let flights = vec![flight(
        "DL101",
        "05:30",
        "06:45",
        "A1",
        vec![flight_service(2, 1, "A", "D")],
    )];
    let roster = vec![
        staff_member(1, "Alice Carter", &[4], &[("05:00", "09:00")]),
        staff_member(2, "Bob Mensah", &[5], &[("05:00", "09:00")]),
    ];

    let scheduler = solve(services, flights, roster);
    let schedule = scheduler.schedule().unwrap();

    assert_eq!(assigned_staff(&schedule, "DL101", 2), vec![1]);
}

#[test]
fn test_any_with_empty_certification_list_blocks_everyone() {
    let services = vec![service(2, "Refueling", &[], Any, FlightLevel, 2, &[])];
    let flights = vec![flight(
        "DL101",
        "05:30",
        "06:45",
        "A1",
        vec![flight_service(2, 1, "A", "D")],
    )];
    let roster = vec![staff_member(1, "Alice Carter", &[1, 2], &[("05:00", "09:00")])];

    let scheduler = solve(services, flights, roster);
    let schedule = scheduler.schedule().unwrap();

    assert!(assigned_staff(&schedule, "DL101", 2).is_empty());
}

#[test]
fn test_all_with_empty_certification_list_allows_anyone() {
    let services = vec![service(2, "Marshalling", &[], All, FlightLevel, 2, &[])];
    let flights = vec![flight(
        "DL101",
        "05:30",
        "06:45",
        "A1",
        vec![flight_service(2, 1, "A", "D")],
    )];
    let roster = vec![staff_member(1, "Alice Carter", &[], &[("05:00", "09:00")])];

    let scheduler = solve(services, flights, roster);
    let schedule = scheduler.schedule().unwrap();

    assert_eq!(assigned_staff(&schedule, "DL101", 2), vec![1]);
}

#[test]
fn test_less_certified_staff_preferred_on_ties() {
    let services = vec![service(1, "Toilet Cleaning", &[1], All, FlightLevel, 2, &[])];
    let flights = vec![flight(
        "DL101",
        "05:30",
        "06:45",
        "A1",
        vec![flight_service(1, 1, "A", "D")],
    )];
    let roster = vec![
        staff_member(1, "Alice Carter", &[1], &[("05:00", "09:00")]),
        // equally able, but holds scarce certifications worth saving
        staff_member(2, "Bob Mensah", &[1, 2, 3], &[("05:00", "09:00")]),
    ];

    let scheduler = solve(services, flights, roster);
    let schedule = scheduler.schedule().unwrap();

    assert_eq!(assigned_staff(&schedule, "DL101", 1), vec![1]);
}
