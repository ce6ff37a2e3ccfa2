// src/store.rs
use rusqlite::{named_params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Namespace holding one key per weekday label.
pub const PLAN_NAMESPACE: &str = "Exercises";
/// Namespace holding the single catalog key.
pub const CATALOG_NAMESPACE: &str = "GlobalExercises";
/// The catalog's key within `CATALOG_NAMESPACE`.
pub const CATALOG_KEY: &str = "exercises";

const STORE_FILE_NAME: &str = "planner.sqlite";
const APP_DATA_DIR: &str = "gym-planner";
const STORE_ENV_VAR: &str = "GYM_PLANNER_DATA_DIR";

/// Version stamped into the SQLite `user_version` pragma. Covers both the
/// kv table shape and the flat-string record formats stored in it.
const SCHEMA_VERSION: i32 = 1;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing store file")]
    Io(#[from] std::io::Error),
    #[error("Store schema version {found} is newer than supported version {supported}")]
    UnsupportedSchemaVersion { found: i32, supported: i32 },
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database insert failed: {0}")]
    InsertFailed(rusqlite::Error),
    #[error("Database update failed: {0}")]
    UpdateFailed(rusqlite::Error),
    #[error("Database delete failed: {0}")]
    DeleteFailed(rusqlite::Error),
}

/// Gets the path to the store file within the app's data directory.
/// Exposed at crate root as `get_store_path_util`.
pub fn get_store_path() -> Result<PathBuf, StoreError> {
    let data_dir = if let Ok(path_str) = std::env::var(STORE_ENV_VAR) {
        PathBuf::from(path_str)
    } else {
        dirs::data_dir().ok_or(StoreError::DataDir)?.join(APP_DATA_DIR)
    };
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
    }
    Ok(data_dir.join(STORE_FILE_NAME))
}

/// Opens a connection to the SQLite store.
pub fn open_store<P: AsRef<Path>>(path: P) -> Result<Connection, StoreError> {
    Connection::open(path).map_err(StoreError::Connection)
}

/// Creates the kv table if missing and stamps the schema version.
/// # Errors
/// Returns `StoreError::UnsupportedSchemaVersion` when the file was written
/// by a newer version of this tool.
pub fn init_store(conn: &Connection) -> Result<(), StoreError> {
    let found: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(StoreError::QueryFailed)?;
    if found > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchemaVersion {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            namespace TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (namespace, key)
        )",
        [],
    )
    .map_err(StoreError::Connection)?;

    if found < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(StoreError::UpdateFailed)?;
    }

    Ok(())
}

/// Reads one value, or `None` when the key was never written.
pub fn get(conn: &Connection, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
    conn.query_row(
        "SELECT value FROM kv WHERE namespace = :ns AND key = :key",
        named_params! { ":ns": namespace, ":key": key },
        |row| row.get(0),
    )
    .optional()
    .map_err(StoreError::QueryFailed)
}

/// Writes one value, replacing any previous value under the same key.
pub fn put(conn: &Connection, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO kv (namespace, key, value) VALUES (:ns, :key, :value)
         ON CONFLICT (namespace, key) DO UPDATE SET value = excluded.value",
        named_params! { ":ns": namespace, ":key": key, ":value": value },
    )
    .map_err(StoreError::InsertFailed)?;
    Ok(())
}

/// Removes one key, returning how many rows were deleted (0 or 1).
pub fn delete(conn: &Connection, namespace: &str, key: &str) -> Result<usize, StoreError> {
    conn.execute(
        "DELETE FROM kv WHERE namespace = :ns AND key = :key",
        named_params! { ":ns": namespace, ":key": key },
    )
    .map_err(StoreError::DeleteFailed)
}
