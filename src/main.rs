use crate::dataset::Dataset;
use crate::plan::AllocationPlan;
use crate::solver::{Outcome, Scheduler};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::path::PathBuf;
use tabled::settings::Style;

mod bay;
mod dataset;
mod error;
mod flight;
mod overlap;
mod plan;
mod schedule;
mod service;
mod settings;
mod solver;
mod staff;
mod time;

#[derive(Parser)]
#[command(about = "Ground-handling staff allocation for a day of flights")]
struct Args {
    /// Directory with bays.json, services.json, flights.json and roster.json
    #[arg(short, long, value_name = "DIR", default_value = "data")]
    data_dir: PathBuf,
    /// Seed the solve with a previously saved allocation plan
    #[arg(long, value_name = "FILE")]
    plan: Option<PathBuf>,
    /// Write the resulting allocation plan to FILE
    #[arg(long, value_name = "FILE")]
    save_plan: Option<PathBuf>,
    /// Drop into the interactive console after the initial solve
    #[arg(short, long)]
    interactive: bool,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let dataset = Dataset::load(&args.data_dir)?;
    println!(
        "Apron control online. Loaded {} flights and {} staff from {}",
        dataset.flights.len(),
        dataset.roster.len(),
        args.data_dir.display()
    );

    let hints = match &args.plan {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Some(AllocationPlan::deserialize(&json)?)
        }
        None => None,
    };

    let mut scheduler = Scheduler::new(
        dataset.services.clone(),
        dataset.flights.clone(),
        dataset.roster.clone(),
        dataset.bays.clone(),
        dataset.settings.clone(),
        hints,
    )?;

    match scheduler.run()? {
        Outcome::Found => {
            print_schedule(&scheduler);
            if let (Some(path), Some(plan)) = (&args.save_plan, scheduler.allocation_plan()) {
                std::fs::write(path, plan.serialize()?)?;
                println!("Allocation plan saved to {}", path.display());
            }
        }
        Outcome::NotFound => {
            eprintln!("{}", "No feasible staff allocation exists.".red());
            std::process::exit(1);
        }
    }

    if args.interactive {
        console(dataset, scheduler)?;
    }
    Ok(())
}

fn print_schedule(scheduler: &Scheduler) {
    if let Some(schedule) = scheduler.schedule() {
        println!("{}", schedule.table());
        let (filled, slots) = schedule.coverage();
        println!("Fully staffed: {} of {} service slots\n", filled, slots);
    }
}

/// Interactive console for working a day of disruptions: delay a flight,
/// re-solve with the previous plan as hints, inspect the result.
fn console(
    mut dataset: Dataset,
    mut scheduler: Scheduler,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "schedule".to_string(),
            "delay".to_string(),
            "save".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        let mut table = tabled::Table::new(&dataset.flights);
                        table.with(Style::rounded());
                        table.with(tabled::settings::Alignment::left());
                        println!("{}", table);
                    }
                    "schedule" => print_schedule(&scheduler),
                    "delay" => {
                        if let (Some(number), Some(minutes)) = (parts.get(1), parts.get(2)) {
                            let minutes = minutes.parse::<i32>().unwrap_or(0);
                            match apply_delay(&mut dataset, &scheduler, number, minutes)? {
                                Some(resolved) => {
                                    scheduler = resolved;
                                    println!("\nFlight {} delayed by {} min, re-solved.\n", number, minutes);
                                    print_schedule(&scheduler);
                                }
                                None => println!("Unknown flight or no feasible re-plan: {}", number),
                            }
                        } else {
                            println!("Usage: delay <flight> <minutes>");
                        }
                    }
                    "save" => {
                        if let Some(path) = parts.get(1) {
                            match scheduler.allocation_plan() {
                                Some(plan) => {
                                    std::fs::write(path, plan.serialize()?)?;
                                    println!("Allocation plan saved to {}", path);
                                }
                                None => println!("No solved plan to save"),
                            }
                        } else {
                            println!("Usage: save <file>");
                        }
                    }
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls                  - List the day's flights");
                        println!("  schedule            - Show the current staff schedule");
                        println!(
                            "  delay <id> <m>      - Delay flight <id> by <m> minutes and re-solve"
                        );
                        println!("  save <file>         - Save the allocation plan to <file>");
                        println!("  help / ?            - Show this help menu");
                        println!("  exit / quit         - Leave the console\n");
                    }
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

/// Re-times one flight and re-solves. The delayed flight's stale entries are
/// dropped from the previous plan first; everything still valid is fed back
/// as hints so undisturbed flights keep their crews.
fn apply_delay(
    dataset: &mut Dataset,
    scheduler: &Scheduler,
    number: &str,
    minutes: i32,
) -> Result<Option<Scheduler>, Box<dyn std::error::Error>> {
    let Some(flight) = dataset
        .flights
        .iter_mut()
        .find(|flight| flight.number.as_ref() == number)
    else {
        return Ok(None);
    };
    flight.shift_by(minutes);

    let hints = scheduler.allocation_plan().map(|plan| {
        let mut hints = plan.clone();
        hints.remove_flight(number);
        hints
    });

    let mut resolved = Scheduler::new(
        dataset.services.clone(),
        dataset.flights.clone(),
        dataset.roster.clone(),
        dataset.bays.clone(),
        dataset.settings.clone(),
        hints,
    )?;
    match resolved.run()? {
        Outcome::Found => Ok(Some(resolved)),
        Outcome::NotFound => Ok(None),
    }
}
