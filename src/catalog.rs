// src/catalog.rs
use thiserror::Error;
use tracing::warn;

const RECORD_SEP: char = ';';
const FIELD_SEP: char = '|';

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Exercise '{0}' already exists in the catalog")]
    AlreadyExists(String),
}

/// A named exercise definition. Names are the unique key of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub description: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    fn serialize(&self) -> String {
        format!("{}{FIELD_SEP}{}", self.name, self.description)
    }
}

/// The registry of known exercises, seeded from the built-in list and kept
/// sorted by name ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for ExerciseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ExerciseCatalog {
    /// Catalog containing only the built-in exercises.
    pub fn builtin() -> Self {
        let mut catalog = Self {
            entries: builtin_exercises(),
        };
        catalog.sort();
        catalog
    }

    /// Adds a new exercise definition.
    /// # Errors
    /// Returns `CatalogError::AlreadyExists` on an exact name match; the
    /// catalog is left unchanged in that case.
    pub fn add(&mut self, name: &str, description: &str) -> Result<(), CatalogError> {
        if self.get(name).is_some() {
            return Err(CatalogError::AlreadyExists(name.to_string()));
        }
        self.entries.push(CatalogEntry::new(name, description));
        self.sort();
        Ok(())
    }

    /// Inserts the entry only if its name is unknown. Returns whether the
    /// catalog changed.
    pub fn merge(&mut self, entry: CatalogEntry) -> bool {
        if self.get(&entry.name).is_some() {
            return false;
        }
        self.entries.push(entry);
        self.sort();
        true
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// All entries, sorted by name ascending.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flat-string form: `name|description` records joined by `;`.
    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(CatalogEntry::serialize)
            .collect::<Vec<_>>()
            .join(&RECORD_SEP.to_string())
    }

    /// Parses the flat-string form. A record with fewer than 2 fields is
    /// logged and dropped without aborting the rest of the load; fields
    /// beyond the second are ignored.
    pub fn deserialize(raw: &str) -> Vec<CatalogEntry> {
        raw.split(RECORD_SEP)
            .filter(|record| !record.is_empty())
            .filter_map(|record| {
                let mut fields = record.split(FIELD_SEP);
                match (fields.next(), fields.next()) {
                    (Some(name), Some(description)) => {
                        Some(CatalogEntry::new(name, description))
                    }
                    _ => {
                        warn!("Skipping malformed catalog record '{record}'");
                        None
                    }
                }
            })
            .collect()
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

fn builtin_exercises() -> Vec<CatalogEntry> {
    [
        ("Press de banca", "Acostado en un banco, bajar y subir una barra con pesas para trabajar el pecho."),
        ("Sentadillas", "Flexionar las rodillas y caderas como si fueras a sentarte, para fortalecer piernas y glúteos."),
        ("Peso muerto", "Levantar una barra desde el suelo hasta la cadera, trabajando espalda y piernas."),
        ("Dominadas", "Colgarse de una barra y subir el cuerpo, ejercitando la espalda y los brazos."),
        ("Curl de bíceps", "Flexionar los codos para levantar pesas hacia los hombros, fortaleciendo los bíceps."),
        ("Extensiones de tríceps", "Extender los brazos sobre la cabeza con pesas para trabajar los tríceps."),
        ("Press militar", "Levantar una barra o mancuernas por encima de la cabeza, enfocándose en los hombros."),
        ("Remo con barra", "Inclinar el torso y tirar de una barra hacia el abdomen, ejercitando la espalda."),
        ("Zancadas", "Dar pasos largos alternando las piernas, fortaleciendo cuádriceps y glúteos."),
        ("Crunch abdominal", "Elevar el torso desde una posición acostada para trabajar los abdominales."),
        ("Elevaciones laterales", "Levantar mancuernas a los lados hasta la altura de los hombros."),
        ("Prensa de piernas", "Empujar una plataforma con los pies en una máquina, para trabajar piernas."),
        ("Pull-ups", "Similar a las dominadas, pero con las palmas mirando hacia ti."),
        ("Fondos en paralelas", "Bajar y subir el cuerpo entre dos barras paralelas, para pecho y tríceps."),
        ("Face pull", "Tirar de una cuerda hacia la cara, trabajando hombros y parte superior de la espalda."),
        ("Hip thrust", "Elevar las caderas acostado con la espalda en un banco, para glúteos y piernas."),
        ("Plancha", "Mantener el cuerpo recto apoyado en antebrazos y pies, fortaleciendo el core."),
        ("Peso muerto rumano", "Similar al peso muerto, pero sin bajar la barra hasta el suelo, para isquiotibiales."),
        ("Remo en máquina", "Tirar de un mango hacia el abdomen en posición sentada, para la espalda."),
        ("Extensiones de cuádriceps", "Extender las piernas en una máquina, aislando los cuádriceps."),
        ("Curl de piernas", "Flexionar las piernas en una máquina, trabajando los isquiotibiales."),
        ("Press de pecho inclinado", "Similar al press de banca, pero en un banco inclinado."),
        ("Elevaciones de pantorrillas", "Pararse en el borde de un escalón y elevar los talones."),
        ("Pulldown en polea alta", "Tirar de una barra hacia abajo frente al pecho, para la espalda."),
        ("Russian twist", "Girar el torso de lado a lado sentado con las piernas elevadas, para oblicuos."),
    ]
    .into_iter()
    .map(|(name, description)| CatalogEntry::new(name, description))
    .collect()
}
