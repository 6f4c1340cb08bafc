use super::types::{StoreState, STATE_VERSION};
use crate::scoring::{validate_employee, validate_weights};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the default state file path (~/.config/wp-rank/state.json)
pub fn get_state_path() -> PathBuf {
    crate::config::get_config_dir().join("state.json")
}

/// Load store state from a JSON file
///
/// If the file doesn't exist, returns a new empty state with default weights.
/// Invalid records (bad scores, negative weights, duplicate ids) are load
/// errors; nothing is coerced.
pub fn load_state(path: &Path) -> Result<StoreState> {
    if !path.exists() {
        debug!(path = %path.display(), "no state file, starting empty");
        return Ok(StoreState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open state file at {}", path.display()))?;

    let mut state: StoreState = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse state file at {}", path.display()))?;

    if state.version != STATE_VERSION {
        anyhow::bail!("Unsupported state file version: {}", state.version);
    }

    check_records(&state)
        .map_err(|errors| anyhow::anyhow!("Invalid state file {}: {}", path.display(), errors.join("; ")))?;

    state.repair_next_id();
    debug!(
        path = %path.display(),
        employees = state.employees.len(),
        "loaded state"
    );
    Ok(state)
}

fn check_records(state: &StoreState) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for employee in &state.employees {
        if !seen.insert(employee.id) {
            errors.push(format!("employees: duplicate id {}", employee.id));
        }
        if let Err(mut e) = validate_employee(&employee.name, &employee.scores) {
            errors.append(&mut e);
        }
    }
    if let Err(mut e) = validate_weights(&state.weights) {
        errors.append(&mut e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Save store state to a JSON file atomically
///
/// The file is either the old or the new document, never a partial write.
/// Creates the parent directory if it doesn't exist.
pub fn save_state(path: &Path, state: &StoreState) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create state directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize store state")?;

    file.commit().context("Failed to save store state")?;

    debug!(path = %path.display(), employees = state.employees.len(), "saved state");
    Ok(())
}
