use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{info, warn};

use crate::request::PlacementRequest;
use crate::schedule::{Commit, Placement, PlacementId};
use crate::sections::Sections;

#[derive(Debug, Deserialize)]
struct ActionRow {
    section: String,
    action: String,
    #[serde(default)]
    day: String,
    #[serde(default)]
    start: String,
    #[serde(default)]
    end: String,
    #[serde(default)]
    teacher: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    room: String,
    extra_day: Option<String>,
    extra_start: Option<String>,
    extra_end: Option<String>,
    target: Option<usize>,
}

/// What happened to one row of the actions file.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Committed { row: usize, section: String, commit: Commit },
    Deleted { row: usize, section: String, placement: Placement },
    Rejected { row: usize, section: String, reason: String },
    Skipped { row: usize, reason: String },
}

impl RowOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, RowOutcome::Committed { .. })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Applies every row of an actions CSV to `sections` in order.
///
/// Rows are numbered from 1 (the header is not counted). A `delete` row's
/// `target` names the row of an earlier committed proposal.
pub fn replay_actions<R: Read>(input: R, sections: &mut Sections) -> Result<Vec<RowOutcome>, csv::Error> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);
    let mut outcomes = Vec::new();
    let mut committed: HashMap<usize, (String, PlacementId)> = HashMap::new();

    for (index, result) in reader.deserialize::<ActionRow>().enumerate() {
        let row = index + 1;
        let action = match result {
            Ok(action) => action,
            Err(e) => {
                warn!(row, error = %e, "malformed row");
                outcomes.push(RowOutcome::Skipped {
                    row,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let outcome = match action.action.to_lowercase().as_str() {
            "propose" => {
                let section = action.section.clone();
                let req = PlacementRequest {
                    day: action.day,
                    start: action.start,
                    end: action.end,
                    teacher: action.teacher,
                    subject: action.subject,
                    room: action.room,
                    extra_day: non_empty(action.extra_day),
                    extra_start: non_empty(action.extra_start),
                    extra_end: non_empty(action.extra_end),
                    editing: None,
                };
                match sections.submit(&section, &req) {
                    Ok(commit) => {
                        committed.insert(row, (section.clone(), commit.primary));
                        RowOutcome::Committed { row, section, commit }
                    }
                    Err(e) => RowOutcome::Rejected {
                        row,
                        section,
                        reason: e.to_string(),
                    },
                }
            }
            "delete" => match action.target.and_then(|target| committed.get(&target)) {
                Some((section, id)) => match sections.get_mut(section).and_then(|grid| grid.delete_placement(*id)) {
                    Some(placement) => RowOutcome::Deleted {
                        row,
                        section: section.clone(),
                        placement,
                    },
                    None => RowOutcome::Skipped {
                        row,
                        reason: format!("placement {} already deleted", id),
                    },
                },
                None => RowOutcome::Skipped {
                    row,
                    reason: "delete target is not a committed proposal".to_string(),
                },
            },
            other => RowOutcome::Skipped {
                row,
                reason: format!("unknown action '{}'", other),
            },
        };

        match &outcome {
            RowOutcome::Committed { section, commit, .. } => {
                info!(row, section = %section, subject = %commit.subject, "row committed")
            }
            RowOutcome::Deleted { section, placement, .. } => {
                info!(row, section = %section, subject = %placement.subject, "row deleted")
            }
            RowOutcome::Rejected { section, reason, .. } => {
                info!(row, section = %section, reason = %reason, "row rejected")
            }
            RowOutcome::Skipped { reason, .. } => warn!(row, reason = %reason, "row skipped"),
        }
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Opens `csv_path` and replays it.
pub fn replay_file<P: AsRef<Path>>(csv_path: P, sections: &mut Sections) -> Result<Vec<RowOutcome>, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(csv_path)?;
    Ok(replay_actions(file, sections)?)
}

/// Logs remaining hours for every section.
pub fn log_budget_summary(sections: &Sections) {
    for (name, grid) in sections.iter() {
        for (subject, hours) in grid.budget().entries() {
            info!(section = name, subject, remaining = hours, "budget");
        }
    }
}
