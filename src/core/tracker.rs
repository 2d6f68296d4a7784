// src/core/tracker.rs
//
// Durable, append-only history of configuration runs. Each run is persisted
// as one JSON file under `<project>/.configurator/iterations/<id>.json` and
// is never mutated afterwards.

use crate::core::{paths, stamp};
use crate::models::{
    ComponentCategory, Iteration, IterationDiff, IterationSummary, SelectedComponents,
    UserRequirements,
};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// Errors raised by the iteration store.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Iteration '{id}' not found in the project history.")]
    IterationNotFound { id: String },
    #[error("Iteration file '{id}.json' is not valid JSON: {source}")]
    Malformed {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize iteration record: {0}")]
    Serialize(#[source] serde_json::Error),
}

type TrackerResult<T> = Result<T, TrackerError>;

/// Records one configuration run and returns its generated id.
///
/// The iterations directory is created if needed (idempotent); the record is
/// written pretty-printed. I/O failures propagate to the caller unretried.
pub fn save_iteration(
    project_dir: &Path,
    selected: &SelectedComponents,
    requirements: &UserRequirements,
) -> TrackerResult<String> {
    let timestamp = stamp::now_iso();
    let id = stamp::to_dashed(&timestamp);

    let dir = paths::iterations_dir(project_dir);
    fs::create_dir_all(&dir)?;

    let iteration = Iteration {
        id: id.clone(),
        timestamp,
        selected_components: selected.clone(),
        user_requirements: requirements.clone(),
    };
    let json = serde_json::to_string_pretty(&iteration).map_err(TrackerError::Serialize)?;
    fs::write(dir.join(format!("{id}.json")), json)?;

    log::debug!("Recorded iteration '{}' for project {}", id, project_dir.display());
    Ok(id)
}

/// Lists all recorded iterations, most recent first.
///
/// A missing iterations directory yields an empty list, not an error. A file
/// that cannot be read or parsed is skipped with a warning: one corrupt
/// history entry must not block visibility into the rest.
pub fn list_iterations(project_dir: &Path) -> TrackerResult<Vec<IterationSummary>> {
    let dir = paths::iterations_dir(project_dir);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut summaries = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match read_iteration_file(&path) {
            Ok(iteration) => summaries.push(IterationSummary {
                id: iteration.id,
                timestamp: iteration.timestamp,
            }),
            Err(e) => {
                log::warn!("Skipping unreadable iteration file '{}': {}", path.display(), e);
            }
        }
    }

    // ISO-8601 strings compare chronologically, so a plain string sort is enough.
    summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(summaries)
}

/// Loads the full record of a single iteration.
///
/// Unlike listing, this is a hard failure on a missing or malformed file:
/// the caller explicitly asked for one known iteration.
pub fn get_iteration(project_dir: &Path, id: &str) -> TrackerResult<Iteration> {
    let path = paths::iterations_dir(project_dir).join(format!("{id}.json"));
    let text = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            TrackerError::IterationNotFound { id: id.to_string() }
        } else {
            TrackerError::Io(e)
        }
    })?;
    serde_json::from_str(&text).map_err(|e| TrackerError::Malformed {
        id: id.to_string(),
        source: e,
    })
}

/// Computes the per-category set difference between two iterations.
///
/// Each category is compared independently: `added` holds names present in
/// `id_b` but not `id_a`, `removed` the converse, `unchanged` the
/// intersection. Order within each list follows first-seen order of its
/// source list.
pub fn compare_iterations(
    project_dir: &Path,
    id_a: &str,
    id_b: &str,
) -> TrackerResult<IterationDiff> {
    let a = get_iteration(project_dir, id_a)?;
    let b = get_iteration(project_dir, id_b)?;

    let mut diff = IterationDiff::default();
    for category in ComponentCategory::ALL {
        let names_a = a.selected_components.category(category);
        let names_b = b.selected_components.category(category);
        let set_a: HashSet<&str> = names_a.iter().map(String::as_str).collect();
        let set_b: HashSet<&str> = names_b.iter().map(String::as_str).collect();

        for name in names_b {
            if !set_a.contains(name.as_str()) {
                diff.added.category_mut(category).push(name.clone());
            }
        }
        for name in names_a {
            if set_b.contains(name.as_str()) {
                diff.unchanged.category_mut(category).push(name.clone());
            } else {
                diff.removed.category_mut(category).push(name.clone());
            }
        }
    }
    Ok(diff)
}

fn read_iteration_file(path: &Path) -> anyhow::Result<Iteration> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn requirements() -> UserRequirements {
        let mut map = UserRequirements::new();
        map.insert("project-type".to_string(), json!("web-api"));
        map.insert("languages".to_string(), json!(["rust", "sql"]));
        map
    }

    fn selection(agents: &[&str]) -> SelectedComponents {
        SelectedComponents {
            agents: agents.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Writes an iteration file directly, with a caller-chosen timestamp.
    /// `save_iteration` derives ids from the clock, which is too coarse to
    /// produce distinct ordered entries inside a fast test.
    fn write_iteration(project: &Path, timestamp: &str, selected: &SelectedComponents) -> String {
        let id = stamp::to_dashed(timestamp);
        let dir = paths::iterations_dir(project);
        fs::create_dir_all(&dir).unwrap();
        let iteration = Iteration {
            id: id.clone(),
            timestamp: timestamp.to_string(),
            selected_components: selected.clone(),
            user_requirements: UserRequirements::new(),
        };
        fs::write(
            dir.join(format!("{id}.json")),
            serde_json::to_string_pretty(&iteration).unwrap(),
        )
        .unwrap();
        id
    }

    #[test]
    fn save_then_get_round_trips() {
        let project = tempdir().unwrap();
        let selected = selection(&["a1", "a2"]);
        let reqs = requirements();

        let id = save_iteration(project.path(), &selected, &reqs).unwrap();
        let loaded = get_iteration(project.path(), &id).unwrap();

        assert_eq!(loaded.id, id);
        assert_eq!(loaded.selected_components, selected);
        assert_eq!(loaded.user_requirements, reqs);
        assert_eq!(stamp::to_dashed(&loaded.timestamp), id);
    }

    #[test]
    fn iteration_file_uses_the_documented_wire_shape() {
        let project = tempdir().unwrap();
        let id = save_iteration(project.path(), &selection(&["a1"]), &requirements()).unwrap();

        let path = paths::iterations_dir(project.path()).join(format!("{id}.json"));
        let text = fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["id"], json!(id));
        assert_eq!(value["selectedComponents"]["agents"], json!(["a1"]));
        assert_eq!(value["userRequirements"]["project-type"], json!("web-api"));
        // Pretty-printed, 2-space indent.
        assert!(text.starts_with("{\n  \""));
    }

    #[test]
    fn listing_without_a_history_directory_is_empty_not_an_error() {
        let project = tempdir().unwrap();
        assert_eq!(list_iterations(project.path()).unwrap(), Vec::new());
    }

    #[test]
    fn listing_is_newest_first_and_idempotent() {
        let project = tempdir().unwrap();
        let sel = selection(&["a1"]);
        let id1 = write_iteration(project.path(), "2026-08-30T09:00:00.000Z", &sel);
        let id3 = write_iteration(project.path(), "2026-08-30T11:00:00.000Z", &sel);
        let id2 = write_iteration(project.path(), "2026-08-30T10:00:00.000Z", &sel);

        let first = list_iterations(project.path()).unwrap();
        let ids: Vec<&str> = first.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![id3.as_str(), id2.as_str(), id1.as_str()]);

        let second = list_iterations(project.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn a_corrupt_entry_is_skipped_without_hiding_the_rest() {
        let project = tempdir().unwrap();
        let sel = selection(&["a1"]);
        write_iteration(project.path(), "2026-08-30T09:00:00.000Z", &sel);
        write_iteration(project.path(), "2026-08-30T10:00:00.000Z", &sel);

        let dir = paths::iterations_dir(project.path());
        fs::write(dir.join("broken.json"), "{ not json").unwrap();
        // Non-JSON files are ignored entirely.
        fs::write(dir.join("notes.txt"), "unrelated").unwrap();

        let listed = list_iterations(project.path()).unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn getting_an_unknown_iteration_is_a_hard_error() {
        let project = tempdir().unwrap();
        let result = get_iteration(project.path(), "2026-01-01T00-00-00-000Z");
        assert!(matches!(result, Err(TrackerError::IterationNotFound { .. })));
    }

    #[test]
    fn getting_a_malformed_iteration_is_a_hard_error() {
        let project = tempdir().unwrap();
        let dir = paths::iterations_dir(project.path());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("bad-id.json"), "{ nope").unwrap();

        let result = get_iteration(project.path(), "bad-id");
        assert!(matches!(result, Err(TrackerError::Malformed { .. })));
    }

    #[test]
    fn compare_computes_per_category_set_differences() {
        let project = tempdir().unwrap();
        let id_a = write_iteration(
            project.path(),
            "2026-08-30T09:00:00.000Z",
            &selection(&["x", "y"]),
        );
        let id_b = write_iteration(
            project.path(),
            "2026-08-30T10:00:00.000Z",
            &selection(&["y", "z"]),
        );

        let diff = compare_iterations(project.path(), &id_a, &id_b).unwrap();
        assert_eq!(diff.added.agents, vec!["z"]);
        assert_eq!(diff.removed.agents, vec!["x"]);
        assert_eq!(diff.unchanged.agents, vec!["y"]);
        // Categories are independent: nothing leaked into the others.
        assert!(diff.added.commands.is_empty());
        assert!(diff.removed.hooks.is_empty());
        assert!(diff.unchanged.mcps.is_empty());
    }

    #[test]
    fn example_scenario_single_agent_run() {
        let project = tempdir().unwrap();
        let id = save_iteration(project.path(), &selection(&["a1"]), &UserRequirements::new())
            .unwrap();

        let listed = list_iterations(project.path()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);

        let details = get_iteration(project.path(), &id).unwrap();
        assert_eq!(details.selected_components.agents, vec!["a1"]);
    }
}
