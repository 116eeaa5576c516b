use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::schedule::HourBudget;

/// A subject and how many teaching hours per week it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub weekly_hours: f64,
}

/// Teachers, rooms and subjects a section's placements can reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub teachers: Vec<String>,
    pub rooms: Vec<String>,
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    kind: String,
    name: String,
    weekly_hours: Option<f64>,
}

impl Catalog {
    pub fn has_teacher(&self, name: &str) -> bool {
        self.teachers.iter().any(|t| t == name)
    }

    pub fn has_room(&self, name: &str) -> bool {
        self.rooms.iter().any(|r| r == name)
    }

    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }

    pub fn add_teacher(&mut self, name: &str) {
        if !self.has_teacher(name) {
            self.teachers.push(name.to_string());
        }
    }

    pub fn add_room(&mut self, name: &str) {
        if !self.has_room(name) {
            self.rooms.push(name.to_string());
        }
    }

    /// Adds a subject, or replaces the hours of an existing one.
    pub fn add_subject(&mut self, name: &str, weekly_hours: f64) {
        match self.subjects.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.weekly_hours = weekly_hours,
            None => self.subjects.push(Subject {
                name: name.to_string(),
                weekly_hours,
            }),
        }
    }

    /// Budget for a fresh section: every subject at its full weekly hours.
    pub fn initial_budget(&self) -> HourBudget {
        self.subjects
            .iter()
            .map(|s| (s.name.clone(), s.weekly_hours))
            .collect()
    }
}

/// Loads a catalog from a CSV file with header `kind,name,weekly_hours`.
pub fn load_catalog<P: AsRef<Path>>(csv_path: P) -> Result<Catalog, CatalogError> {
    let reader = ReaderBuilder::new().trim(Trim::All).from_path(csv_path)?;
    read_rows(reader)
}

/// Same as [`load_catalog`] but from any reader.
pub fn read_catalog<R: Read>(input: R) -> Result<Catalog, CatalogError> {
    read_rows(ReaderBuilder::new().trim(Trim::All).from_reader(input))
}

fn read_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<Catalog, CatalogError> {
    let mut catalog = Catalog::default();

    for (index, result) in reader.deserialize::<CatalogRow>().enumerate() {
        let row = result?;
        // Header is line 1
        let line = index + 2;

        if row.name.is_empty() {
            continue;
        }

        match row.kind.to_lowercase().as_str() {
            "teacher" => catalog.add_teacher(&row.name),
            "room" => catalog.add_room(&row.name),
            "subject" => match row.weekly_hours {
                Some(hours) if hours.is_finite() && hours >= 0.0 => catalog.add_subject(&row.name, hours),
                _ => {
                    return Err(CatalogError::MissingHours {
                        row: line,
                        name: row.name,
                    })
                }
            },
            _ => {
                return Err(CatalogError::UnknownKind {
                    row: line,
                    kind: row.kind,
                })
            }
        }
    }

    Ok(catalog)
}
