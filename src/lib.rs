// src/lib.rs
use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

// --- Declare modules ---
pub mod catalog;
mod config;
pub mod plan;
pub mod store;

// --- Expose public types ---
pub use catalog::{CatalogEntry, CatalogError, ExerciseCatalog};
pub use config::{
    get_config_path as get_config_path_util,
    load as load_config_util,
    parse_color,
    save as save_config_util,
    Config,
    Error as ConfigError,
    StandardColor,
    Theme,
    Units,
    DEFAULT_WEIGHT_SLOTS,
};
pub use plan::{PlanEntry, PlanError, Weekday, WeeklyPlan};
pub use store::{get_store_path as get_store_path_util, StoreError};

/// Description given to exercises assigned by name without a catalog match.
pub const DEFAULT_DESCRIPTION: &str = "Sin descripción";

/// Characters reserved by the flat-string record format.
const RESERVED_DELIMITERS: [char; 2] = ['|', ';'];

pub struct PlannerService {
    pub config: Config,
    pub conn: Connection,
    pub catalog: ExerciseCatalog,
    pub plan: WeeklyPlan,
    pub store_path: PathBuf,
    pub config_path: PathBuf,
}

impl PlannerService {
    /// Initializes the planner service: loads config, opens the store and
    /// reads the persisted catalog and weekly plan.
    /// # Errors
    /// Returns `anyhow::Error` if config/store path determination, loading,
    /// or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let store_path = store::get_store_path().context("Failed to determine store path")?;
        let conn = store::open_store(&store_path)
            .with_context(|| format!("Failed to open store at {store_path:?}"))?;
        store::init_store(&conn).context("Failed to initialize store schema")?;

        let mut service = Self {
            config,
            conn,
            catalog: ExerciseCatalog::builtin(),
            plan: WeeklyPlan::new(),
            store_path,
            config_path,
        };
        service.reload().context("Failed to load persisted state")?;
        Ok(service)
    }

    /// Re-reads the catalog and plan from the store, discarding any
    /// in-memory state. The built-in exercises are always present; stored
    /// catalog records are merged over them.
    pub fn reload(&mut self) -> Result<()> {
        let mut catalog = ExerciseCatalog::builtin();
        if let Some(raw) = store::get(&self.conn, store::CATALOG_NAMESPACE, store::CATALOG_KEY)
            .context("Failed to read the exercise catalog")?
        {
            for entry in ExerciseCatalog::deserialize(&raw) {
                catalog.merge(entry);
            }
        }
        self.catalog = catalog;

        let mut plan = WeeklyPlan::new();
        for day in Weekday::iter() {
            if let Some(raw) = store::get(&self.conn, store::PLAN_NAMESPACE, &day.to_string())
                .with_context(|| format!("Failed to read the plan for {day}"))?
            {
                plan.load_day(day, &raw);
            }
        }
        self.plan = plan;
        Ok(())
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_store_path(&self) -> &Path {
        &self.store_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Sets how many weight slots newly assigned exercises carry.
    /// # Errors
    /// - `ConfigError::InvalidWeightSlots` if `slots` is 0.
    /// - `ConfigError` variants if saving fails.
    pub fn set_weight_slots(&mut self, slots: usize) -> Result<(), ConfigError> {
        if slots == 0 {
            return Err(ConfigError::InvalidWeightSlots(slots));
        }
        self.config.weight_slots = slots;
        self.save_config()
    }

    /// Sets the display units for weights.
    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_units(&mut self, units: Units) -> Result<(), ConfigError> {
        self.config.units = units;
        self.save_config()
    }

    /// All catalog entries, sorted by name ascending.
    pub fn catalog_entries(&self) -> &[CatalogEntry] {
        self.catalog.entries()
    }

    /// The plan entries assigned to a day, sorted by name ascending.
    pub fn day_entries(&self, day: Weekday) -> &[PlanEntry] {
        self.plan.entries(day)
    }

    /// Adds a new exercise definition to the catalog and persists it.
    /// # Errors
    /// Returns `anyhow::Error` wrapping `CatalogError::AlreadyExists` on a
    /// duplicate name, or plain `anyhow::Error` for invalid input and
    /// persistence failures.
    pub fn add_catalog_exercise(&mut self, name: &str, description: &str) -> Result<()> {
        let trimmed_name = name.trim();
        if trimmed_name.is_empty() {
            bail!("Exercise name cannot be empty.");
        }
        let trimmed_description = description.trim();
        validate_field("Exercise name", trimmed_name)?;
        validate_field("Description", trimmed_description)?;

        self.catalog
            .add(trimmed_name, trimmed_description)
            .map_err(anyhow::Error::new)?;
        self.persist_catalog()
    }

    /// Assigns an exercise to a day with a zeroed weight vector of
    /// `config.weight_slots` slots and persists the day. A name missing from
    /// the catalog is assigned with a placeholder description and folded
    /// back into the catalog so it persists globally.
    /// # Errors
    /// Returns `anyhow::Error` wrapping `PlanError::AlreadyPresent` when the
    /// day already holds the exercise, or plain `anyhow::Error` for invalid
    /// input and persistence failures.
    pub fn assign_exercise(&mut self, day: Weekday, name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            bail!("Exercise name cannot be empty.");
        }
        validate_field("Exercise name", trimmed)?;

        let description = self
            .catalog
            .get(trimmed)
            .map_or(DEFAULT_DESCRIPTION, |e| e.description.as_str())
            .to_string();
        let entry = PlanEntry::new(trimmed, description.clone(), self.config.weight_slots);
        self.plan.assign(day, entry).map_err(anyhow::Error::new)?;
        self.persist_day(day)?;

        if self.catalog.merge(CatalogEntry::new(trimmed, description)) {
            self.persist_catalog()?;
        }
        Ok(())
    }

    /// Records a weight in one slot of an assigned exercise and persists
    /// the day. Slots beyond the current vector length grow it, zero-filling
    /// any gap.
    /// # Errors
    /// Returns `anyhow::Error` wrapping `PlanError::ExerciseNotFound` when
    /// the exercise is not on that day, or plain `anyhow::Error` for invalid
    /// input and persistence failures.
    pub fn set_weight(&mut self, day: Weekday, name: &str, slot: usize, value: f64) -> Result<()> {
        if value < 0.0 {
            bail!("Weight must not be negative.");
        }
        self.plan
            .set_weight(day, name.trim(), slot, value)
            .map_err(anyhow::Error::new)?;
        self.persist_day(day)
    }

    /// Removes one exercise from a day and persists the day.
    /// # Errors
    /// Returns `anyhow::Error` wrapping `PlanError::ExerciseNotFound` when
    /// the exercise is not on that day.
    pub fn unassign_exercise(&mut self, day: Weekday, name: &str) -> Result<PlanEntry> {
        let removed = self
            .plan
            .unassign(day, name.trim())
            .map_err(anyhow::Error::new)?;
        self.persist_day(day)?;
        Ok(removed)
    }

    /// Empties a day's list and persists the empty day. Confirmation is the
    /// caller's responsibility.
    /// # Errors
    /// Returns `anyhow::Error` if persistence fails.
    pub fn clear_day(&mut self, day: Weekday) -> Result<usize> {
        let removed = self.plan.clear_day(day);
        self.persist_day(day)?;
        Ok(removed)
    }

    fn persist_catalog(&self) -> Result<()> {
        store::put(
            &self.conn,
            store::CATALOG_NAMESPACE,
            store::CATALOG_KEY,
            &self.catalog.serialize(),
        )
        .context("Failed to persist the exercise catalog")
    }

    fn persist_day(&self, day: Weekday) -> Result<()> {
        store::put(
            &self.conn,
            store::PLAN_NAMESPACE,
            &day.to_string(),
            &self.plan.serialize_day(day),
        )
        .with_context(|| format!("Failed to persist the plan for {day}"))
    }
}

fn validate_field(label: &str, value: &str) -> Result<()> {
    if value.contains(&RESERVED_DELIMITERS[..]) {
        bail!("{label} cannot contain '|' or ';': '{value}'");
    }
    Ok(())
}
