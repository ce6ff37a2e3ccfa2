use anyhow::Result;
use gym_planner_lib::{
    store, CatalogError, Config, PlanEntry, PlanError, PlannerService, StoreError, Units, Weekday,
    WeeklyPlan, DEFAULT_DESCRIPTION,
};
use rusqlite::Connection;

// Helper function to create a test service with an in-memory store
fn create_test_service() -> Result<PlannerService> {
    let conn = Connection::open_in_memory()?;
    store::init_store(&conn)?;

    Ok(PlannerService {
        config: Config::default(),
        conn,
        catalog: gym_planner_lib::ExerciseCatalog::builtin(),
        plan: WeeklyPlan::new(),
        store_path: ":memory:".into(),
        config_path: std::env::temp_dir().join("gym-planner-test-config.toml"),
    })
}

fn is_sorted_by_name(entries: &[PlanEntry]) -> bool {
    entries.windows(2).all(|w| w[0].name <= w[1].name)
}

#[test]
fn test_catalog_starts_with_builtins() -> Result<()> {
    let service = create_test_service()?;
    let entries = service.catalog_entries();

    assert_eq!(entries.len(), 25);
    assert!(entries.windows(2).all(|w| w[0].name <= w[1].name));
    assert!(service.catalog.get("Sentadillas").is_some());

    Ok(())
}

#[test]
fn test_add_catalog_exercise_sorts_and_persists() -> Result<()> {
    let mut service = create_test_service()?;

    service.add_catalog_exercise("Burpees", "Salto con flexión")?;
    assert_eq!(service.catalog_entries().len(), 26);
    assert!(service
        .catalog_entries()
        .windows(2)
        .all(|w| w[0].name <= w[1].name));

    // Persisted under the catalog namespace
    let raw = store::get(&service.conn, store::CATALOG_NAMESPACE, store::CATALOG_KEY)?
        .expect("catalog should be persisted");
    assert!(raw.contains("Burpees|Salto con flexión"));

    // Duplicate names are rejected and leave the catalog unchanged
    let result = service.add_catalog_exercise("Burpees", "otra descripción");
    assert!(result.is_err());
    assert_eq!(
        result.unwrap_err().downcast_ref::<CatalogError>(),
        Some(&CatalogError::AlreadyExists("Burpees".to_string()))
    );
    assert_eq!(service.catalog_entries().len(), 26);

    Ok(())
}

#[test]
fn test_assign_twice_returns_already_present() -> Result<()> {
    let mut service = create_test_service()?;

    service.assign_exercise(Weekday::Lunes, "Sentadillas")?;
    let result = service.assign_exercise(Weekday::Lunes, "Sentadillas");

    assert!(result.is_err());
    assert_eq!(
        result.unwrap_err().downcast_ref::<PlanError>(),
        Some(&PlanError::AlreadyPresent(
            "Sentadillas".to_string(),
            Weekday::Lunes
        ))
    );
    assert_eq!(service.day_entries(Weekday::Lunes).len(), 1);

    Ok(())
}

#[test]
fn test_assign_keeps_day_sorted() -> Result<()> {
    let mut service = create_test_service()?;

    service.assign_exercise(Weekday::Martes, "Sentadillas")?;
    service.assign_exercise(Weekday::Martes, "Dominadas")?;
    service.assign_exercise(Weekday::Martes, "Press de banca")?;

    let entries = service.day_entries(Weekday::Martes);
    assert_eq!(entries.len(), 3);
    assert!(is_sorted_by_name(entries));
    assert_eq!(entries[0].name, "Dominadas");
    assert_eq!(entries[2].name, "Sentadillas");

    Ok(())
}

#[test]
fn test_assign_uses_catalog_description_and_slot_count() -> Result<()> {
    let mut service = create_test_service()?;
    service.config.weight_slots = 3;

    service.assign_exercise(Weekday::Jueves, "Plancha")?;

    let entries = service.day_entries(Weekday::Jueves);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].weights, vec![0.0; 3]);
    assert!(entries[0].description.starts_with("Mantener el cuerpo recto"));

    Ok(())
}

#[test]
fn test_freeform_assign_folds_back_into_catalog() -> Result<()> {
    let mut service = create_test_service()?;

    service.assign_exercise(Weekday::Viernes, "Salto al cajón")?;

    let entry = service
        .catalog
        .get("Salto al cajón")
        .expect("freeform name should be folded back into the catalog");
    assert_eq!(entry.description, DEFAULT_DESCRIPTION);
    assert_eq!(service.catalog_entries().len(), 26);

    let raw = store::get(&service.conn, store::CATALOG_NAMESPACE, store::CATALOG_KEY)?
        .expect("catalog should be persisted");
    assert!(raw.contains("Salto al cajón"));

    Ok(())
}

#[test]
fn test_set_weight_updates_slot_and_persists() -> Result<()> {
    let mut service = create_test_service()?;

    service.assign_exercise(Weekday::Lunes, "Peso muerto")?;
    service.set_weight(Weekday::Lunes, "Peso muerto", 1, 82.5)?;

    let entries = service.day_entries(Weekday::Lunes);
    assert_eq!(entries[0].weights, vec![0.0, 82.5, 0.0, 0.0, 0.0]);

    // The flush happens inline: a reload sees the new value
    service.reload()?;
    let entries = service.day_entries(Weekday::Lunes);
    assert_eq!(entries[0].weights, vec![0.0, 82.5, 0.0, 0.0, 0.0]);

    Ok(())
}

#[test]
fn test_set_weight_grows_vector_and_zero_fills_gap() -> Result<()> {
    let mut service = create_test_service()?;
    service.config.weight_slots = 3;

    service.assign_exercise(Weekday::Martes, "Zancadas")?;
    service.set_weight(Weekday::Martes, "Zancadas", 4, 12.5)?;

    let entries = service.day_entries(Weekday::Martes);
    assert_eq!(entries[0].weights, vec![0.0, 0.0, 0.0, 0.0, 12.5]);

    Ok(())
}

#[test]
fn test_set_weight_rejects_unknown_exercise_and_negative_value() -> Result<()> {
    let mut service = create_test_service()?;
    service.assign_exercise(Weekday::Lunes, "Sentadillas")?;

    let result = service.set_weight(Weekday::Lunes, "Remo con barra", 0, 50.0);
    assert!(result.is_err());
    assert_eq!(
        result.unwrap_err().downcast_ref::<PlanError>(),
        Some(&PlanError::ExerciseNotFound(
            "Remo con barra".to_string(),
            Weekday::Lunes
        ))
    );

    let result = service.set_weight(Weekday::Lunes, "Sentadillas", 0, -5.0);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("must not be negative"));

    Ok(())
}

#[test]
fn test_unassign_removes_single_entry() -> Result<()> {
    let mut service = create_test_service()?;

    service.assign_exercise(Weekday::Sabado, "Dominadas")?;
    service.assign_exercise(Weekday::Sabado, "Plancha")?;

    let removed = service.unassign_exercise(Weekday::Sabado, "Dominadas")?;
    assert_eq!(removed.name, "Dominadas");
    assert_eq!(service.day_entries(Weekday::Sabado).len(), 1);

    let result = service.unassign_exercise(Weekday::Sabado, "Dominadas");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("is not assigned"));

    Ok(())
}

#[test]
fn test_clear_day_empties_and_persists() -> Result<()> {
    let mut service = create_test_service()?;

    service.assign_exercise(Weekday::Domingo, "Russian twist")?;
    service.assign_exercise(Weekday::Domingo, "Plancha")?;

    let removed = service.clear_day(Weekday::Domingo)?;
    assert_eq!(removed, 2);
    assert!(service.day_entries(Weekday::Domingo).is_empty());

    let raw = store::get(&service.conn, store::PLAN_NAMESPACE, "Domingo")?;
    assert_eq!(raw.as_deref(), Some(""));

    service.reload()?;
    assert!(service.day_entries(Weekday::Domingo).is_empty());

    Ok(())
}

#[test]
fn test_day_round_trip() -> Result<()> {
    let mut service = create_test_service()?;

    service.assign_exercise(Weekday::Miercoles, "Hip thrust")?;
    service.assign_exercise(Weekday::Miercoles, "Face pull")?;
    service.set_weight(Weekday::Miercoles, "Hip thrust", 0, 60.0)?;
    service.set_weight(Weekday::Miercoles, "Face pull", 2, 17.5)?;

    let raw = service.plan.serialize_day(Weekday::Miercoles);
    let parsed = WeeklyPlan::deserialize_day(&raw);
    assert_eq!(parsed, service.day_entries(Weekday::Miercoles));

    Ok(())
}

#[test]
fn test_malformed_plan_record_is_skipped() -> Result<()> {
    let mut service = create_test_service()?;

    // "Remo" is missing its description and weights fields; the neighboring
    // record must still load.
    store::put(
        &service.conn,
        store::PLAN_NAMESPACE,
        "Martes",
        "Remo;Press de banca|En banco plano|80,80,75,0,0",
    )?;
    service.reload()?;

    let entries = service.day_entries(Weekday::Martes);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Press de banca");
    assert_eq!(entries[0].weights, vec![80.0, 80.0, 75.0, 0.0, 0.0]);

    Ok(())
}

#[test]
fn test_plan_record_with_bad_weight_is_skipped() -> Result<()> {
    let mut service = create_test_service()?;

    store::put(
        &service.conn,
        store::PLAN_NAMESPACE,
        "Viernes",
        "Remo en máquina|Tirar de un mango|40,mucho,40;Plancha|Core|0,0",
    )?;
    service.reload()?;

    let entries = service.day_entries(Weekday::Viernes);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Plancha");

    Ok(())
}

#[test]
fn test_malformed_catalog_record_is_skipped() -> Result<()> {
    let mut service = create_test_service()?;

    store::put(
        &service.conn,
        store::CATALOG_NAMESPACE,
        store::CATALOG_KEY,
        "Burpees|Salto con flexión;SinDescripcion",
    )?;
    service.reload()?;

    assert!(service.catalog.get("Burpees").is_some());
    assert!(service.catalog.get("SinDescripcion").is_none());
    assert_eq!(service.catalog_entries().len(), 26);

    Ok(())
}

#[test]
fn test_state_survives_reload() -> Result<()> {
    let mut service = create_test_service()?;

    service.add_catalog_exercise("Burpees", "Salto con flexión")?;
    service.assign_exercise(Weekday::Lunes, "Burpees")?;
    service.assign_exercise(Weekday::Lunes, "Sentadillas")?;
    service.set_weight(Weekday::Lunes, "Sentadillas", 0, 100.0)?;

    service.reload()?;

    assert_eq!(service.catalog_entries().len(), 26);
    let entries = service.day_entries(Weekday::Lunes);
    assert_eq!(entries.len(), 2);
    assert!(is_sorted_by_name(entries));
    assert_eq!(entries[0].name, "Burpees");
    assert_eq!(entries[1].weights[0], 100.0);

    Ok(())
}

#[test]
fn test_reserved_delimiters_are_rejected() -> Result<()> {
    let mut service = create_test_service()?;

    let result = service.add_catalog_exercise("Press|banca", "desc");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("cannot contain"));

    let result = service.assign_exercise(Weekday::Lunes, "a;b");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("cannot contain"));

    let result = service.add_catalog_exercise("   ", "desc");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("cannot be empty"));

    Ok(())
}

#[test]
fn test_store_put_get_delete() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    store::init_store(&conn)?;

    assert_eq!(store::get(&conn, "Exercises", "Lunes")?, None);

    store::put(&conn, "Exercises", "Lunes", "Sentadillas|desc|0,0,0,0,0")?;
    store::put(&conn, "Exercises", "Lunes", "Sentadillas|desc|100,0,0,0,0")?;
    assert_eq!(
        store::get(&conn, "Exercises", "Lunes")?.as_deref(),
        Some("Sentadillas|desc|100,0,0,0,0")
    );

    assert_eq!(store::delete(&conn, "Exercises", "Lunes")?, 1);
    assert_eq!(store::get(&conn, "Exercises", "Lunes")?, None);
    assert_eq!(store::delete(&conn, "Exercises", "Lunes")?, 0);

    Ok(())
}

#[test]
fn test_store_refuses_newer_schema_version() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    conn.pragma_update(None, "user_version", 99)?;

    let result = store::init_store(&conn);
    assert!(matches!(
        result,
        Err(StoreError::UnsupportedSchemaVersion { found: 99, .. })
    ));

    Ok(())
}

#[test]
fn test_weekday_parsing_and_labels() -> Result<()> {
    assert_eq!("lunes".parse::<Weekday>()?, Weekday::Lunes);
    assert_eq!("Miercoles".parse::<Weekday>()?, Weekday::Miercoles);
    assert_eq!("miércoles".parse::<Weekday>()?, Weekday::Miercoles);
    assert_eq!("sábado".parse::<Weekday>()?, Weekday::Sabado);
    assert!("funday".parse::<Weekday>().is_err());

    assert_eq!(Weekday::Miercoles.to_string(), "Miércoles");
    assert_eq!(Weekday::Sabado.to_string(), "Sábado");

    assert_eq!(Weekday::from(chrono::Weekday::Mon), Weekday::Lunes);
    assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Domingo);

    Ok(())
}

#[test]
fn test_set_weight_slots_validates_and_saves() -> Result<()> {
    let mut service = create_test_service()?;

    let result = service.set_weight_slots(0);
    assert!(result.is_err());

    service.set_weight_slots(4)?;
    assert_eq!(service.config.weight_slots, 4);

    service.assign_exercise(Weekday::Jueves, "Sentadillas")?;
    assert_eq!(service.day_entries(Weekday::Jueves)[0].weights.len(), 4);

    Ok(())
}

#[test]
fn test_config_round_trips_through_toml() -> Result<()> {
    let path = std::env::temp_dir().join("gym-planner-config-roundtrip.toml");

    let config = Config {
        weight_slots: 7,
        units: Units::Imperial,
        ..Default::default()
    };
    gym_planner_lib::save_config_util(&path, &config)?;

    let loaded = gym_planner_lib::load_config_util(&path)?;
    assert_eq!(loaded.weight_slots, 7);
    assert_eq!(loaded.units, Units::Imperial);

    std::fs::remove_file(&path).ok();
    Ok(())
}
