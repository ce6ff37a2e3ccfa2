// src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::io::{stdin, stdout, Write};
use tracing_subscriber::EnvFilter;

use gym_planner_lib::{
    parse_color, CatalogEntry, CatalogError, PlanEntry, PlanError, PlannerService, Units, Weekday,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args();

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    // Initialize the service (loads config, opens the store, reads state)
    let mut service = PlannerService::initialize().context("Failed to initialize planner")?;
    let header_color = resolve_header_color(&service);
    let units = service.config.units;

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Catalog => {
            print_catalog_table(service.catalog_entries(), header_color);
        }
        cli::Commands::AddExercise { name, description } => {
            match service.add_catalog_exercise(&name, &description) {
                Ok(()) => println!("Added '{}' to the catalog.", name.trim()),
                Err(e) if e.downcast_ref::<CatalogError>().is_some() => println!("{e}"),
                Err(e) => bail!("Error adding exercise: {e}"),
            }
        }
        cli::Commands::Show { day } => {
            let day = day.unwrap_or_else(today);
            print_day_table(day, service.day_entries(day), header_color, units);
        }
        cli::Commands::Week => {
            use strum::IntoEnumIterator;
            for day in Weekday::iter() {
                print_day_table(day, service.day_entries(day), header_color, units);
            }
        }
        cli::Commands::Assign { day, exercises } => {
            for exercise in exercises {
                match service.assign_exercise(day, &exercise) {
                    Ok(()) => println!("Assigned '{}' to {day}.", exercise.trim()),
                    Err(e) if e.downcast_ref::<PlanError>().is_some() => println!("{e}"),
                    Err(e) => bail!("Error assigning '{exercise}': {e}"),
                }
            }
        }
        cli::Commands::SetWeight {
            day,
            exercise,
            set,
            weight,
        } => {
            if set == 0 {
                bail!("Set numbers start at 1.");
            }
            match service.set_weight(day, &exercise, set - 1, weight) {
                Ok(()) => println!(
                    "Recorded {weight} {} for set {set} of '{}' on {day}.",
                    units.weight_label(),
                    exercise.trim()
                ),
                Err(e) if e.downcast_ref::<PlanError>().is_some() => println!("{e}"),
                Err(e) => bail!("Error recording weight: {e}"),
            }
        }
        cli::Commands::Unassign { day, exercise } => {
            match service.unassign_exercise(day, &exercise) {
                Ok(removed) => println!("Removed '{}' from {day}.", removed.name),
                Err(e) if e.downcast_ref::<PlanError>().is_some() => println!("{e}"),
                Err(e) => bail!("Error removing '{exercise}': {e}"),
            }
        }
        cli::Commands::ClearDay { day, yes } => {
            if !yes && !confirm_clear_day(day)? {
                println!("Aborted.");
                return Ok(());
            }
            let removed = service.clear_day(day)?;
            println!("Removed {removed} exercise(s) from {day}.");
        }
        cli::Commands::ExportCsv { day } => {
            use strum::IntoEnumIterator;
            let days: Vec<Weekday> = match day {
                Some(day) => vec![day],
                None => Weekday::iter().collect(),
            };
            export_csv(&service, &days)?;
        }
        cli::Commands::StorePath => {
            println!("{}", service.get_store_path().display());
        }
        cli::Commands::SetWeightSlots { slots } => match service.set_weight_slots(slots) {
            Ok(()) => println!("Newly assigned exercises will get {slots} weight slot(s)."),
            Err(e) => bail!("Error setting weight slots: {e}"),
        },
        cli::Commands::SetUnits { units } => {
            let units = Units::from(units);
            service
                .set_units(units)
                .context("Error setting display units")?;
            println!("Weights will be displayed in {}.", units.weight_label());
        }
    }

    Ok(())
}

fn today() -> Weekday {
    Weekday::from(Local::now().weekday())
}

fn resolve_header_color(service: &PlannerService) -> Color {
    parse_color(&service.config.theme.header_color)
        .map(Color::from)
        .unwrap_or(Color::Green)
}

/// Asks for confirmation before wiping a whole day.
/// Returns Ok(true) only on an explicit yes.
fn confirm_clear_day(day: Weekday) -> Result<bool> {
    print!("Delete every exercise assigned to {day}? [y/N]: ");
    stdout().flush()?;
    let mut input = String::new();
    stdin().read_line(&mut input)?;
    let trimmed = input.trim();
    Ok(trimmed.eq_ignore_ascii_case("y") || trimmed.eq_ignore_ascii_case("yes"))
}

fn print_catalog_table(entries: &[CatalogEntry], header_color: Color) {
    if entries.is_empty() {
        println!("The catalog is empty.");
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Exercise").fg(header_color),
            Cell::new("Description").fg(header_color),
        ]);
    for entry in entries {
        table.add_row(vec![entry.name.as_str(), entry.description.as_str()]);
    }
    println!("{table}");
}

fn print_day_table(day: Weekday, entries: &[PlanEntry], header_color: Color, units: Units) {
    println!("--- {day} ---");
    if entries.is_empty() {
        println!("No exercises assigned.\n");
        return;
    }

    let max_slots = entries.iter().map(|e| e.weights.len()).max().unwrap_or(0);
    let mut header = vec![
        Cell::new("Exercise").fg(header_color),
        Cell::new("Description").fg(header_color),
    ];
    for i in 1..=max_slots {
        header.push(Cell::new(format!("Set {i} ({})", units.weight_label())).fg(header_color));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    for entry in entries {
        let mut row = vec![entry.name.clone(), entry.description.clone()];
        row.extend(entry.weights.iter().map(ToString::to_string));
        row.extend((entry.weights.len()..max_slots).map(|_| String::new()));
        table.add_row(row);
    }
    println!("{table}\n");
}

fn export_csv(service: &PlannerService, days: &[Weekday]) -> Result<()> {
    let max_slots = days
        .iter()
        .flat_map(|d| service.day_entries(*d))
        .map(|e| e.weights.len())
        .max()
        .unwrap_or(0);

    let mut writer = csv::Writer::from_writer(stdout());
    let mut header = vec![
        "Day".to_string(),
        "Exercise".to_string(),
        "Description".to_string(),
    ];
    header.extend((1..=max_slots).map(|i| format!("Set {i}")));
    writer.write_record(&header)?;

    for &day in days {
        for entry in service.day_entries(day) {
            let mut record = vec![day.to_string(), entry.name.clone(), entry.description.clone()];
            record.extend(entry.weights.iter().map(ToString::to_string));
            record.extend((entry.weights.len()..max_slots).map(|_| String::new()));
            writer.write_record(&record)?;
        }
    }
    writer.flush()?;
    Ok(())
}
