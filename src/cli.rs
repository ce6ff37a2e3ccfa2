// src/cli.rs
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use gym_planner_lib::{Units, Weekday};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan gym exercises per weekday and track weights", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitsCli {
    Metric,
    Imperial,
}

impl From<UnitsCli> for Units {
    fn from(value: UnitsCli) -> Self {
        match value {
            UnitsCli::Metric => Self::Metric,
            UnitsCli::Imperial => Self::Imperial,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every exercise in the catalog
    Catalog,
    /// Define a new exercise in the catalog
    AddExercise {
        /// Name of the exercise (e.g., "Burpees")
        #[arg(short, long)]
        name: String,
        /// Short description of how the exercise is performed
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Show the plan for one day (defaults to today)
    Show {
        /// Day of the week (e.g., "lunes", "Miércoles")
        day: Option<Weekday>,
    },
    /// Show the plan for the whole week
    Week,
    /// Assign one or more catalog exercises to a day
    Assign {
        /// Day of the week
        day: Weekday,
        /// Exercise names (quote names containing spaces)
        #[arg(required = true)]
        exercises: Vec<String>,
    },
    /// Record a weight for one set of an assigned exercise
    SetWeight {
        /// Day of the week
        day: Weekday,
        /// Name of the assigned exercise
        exercise: String,
        /// Set number, starting at 1
        set: usize,
        /// Weight to record
        weight: f64,
    },
    /// Remove one exercise from a day
    Unassign {
        /// Day of the week
        day: Weekday,
        /// Name of the assigned exercise
        exercise: String,
    },
    /// Remove every exercise assigned to a day
    ClearDay {
        /// Day of the week
        day: Weekday,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export the plan as CSV to stdout
    ExportCsv {
        /// Limit the export to one day (whole week when omitted)
        day: Option<Weekday>,
    },
    /// Show the path to the store file
    StorePath,
    /// Set how many weight slots newly assigned exercises get
    SetWeightSlots { slots: usize },
    /// Set the display units for weights
    SetUnits {
        #[arg(value_enum)]
        units: UnitsCli,
    },
    /// Generate shell completion scripts
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

// Expose the command structure for completion generation
pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
