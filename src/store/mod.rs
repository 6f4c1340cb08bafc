pub mod storage;
pub mod types;

pub use storage::{get_state_path, load_state, save_state};
pub use types::{Employee, EmployeeDraft, EmployeeId, EmployeeUpdate, StoreState};

use crate::scoring::{validate_employee, validate_weights, WeightVector};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("no employee with id {0}")]
    NotFound(EmployeeId),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Immutable view of the store at one revision
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub employees: Arc<[Employee]>,
    pub weights: WeightVector,
    pub revision: u64,
}

/// Owned employee and weight state with write-through persistence.
///
/// Every mutation writes the complete new state to disk before it becomes
/// visible in memory. `revision()` increases after each successful mutation;
/// callers poll it (or compare snapshot revisions) to decide when to
/// recompute a ranking.
#[derive(Debug)]
pub struct ScoreStore {
    path: PathBuf,
    state: StoreState,
    revision: u64,
}

impl ScoreStore {
    /// Open the store backed by `path`, loading existing state if present
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = load_state(&path)?;
        Ok(Self {
            path,
            state,
            revision: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn employees(&self) -> &[Employee] {
        &self.state.employees
    }

    pub fn weights(&self) -> &WeightVector {
        &self.state.weights
    }

    pub fn get(&self, id: EmployeeId) -> Option<&Employee> {
        self.state.employees.iter().find(|e| e.id == id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            employees: self.state.employees.clone().into(),
            weights: self.state.weights,
            revision: self.revision,
        }
    }

    /// Persist `next` and then make it the current state
    fn commit(&mut self, next: StoreState) -> Result<(), StoreError> {
        save_state(&self.path, &next)?;
        self.state = next;
        self.revision += 1;
        Ok(())
    }

    pub fn add_employee(&mut self, draft: EmployeeDraft) -> Result<Employee, StoreError> {
        let name = draft.name.trim().to_string();
        validate_employee(&name, &draft.scores).map_err(StoreError::Validation)?;

        let mut next = self.state.clone();
        let employee = Employee {
            id: EmployeeId(next.next_id),
            name,
            scores: draft.scores,
            created_at: Utc::now(),
        };
        next.next_id += 1;
        next.employees.push(employee.clone());

        self.commit(next)?;
        debug!(id = %employee.id, name = %employee.name, "added employee");
        Ok(employee)
    }

    /// Remove an employee. Returns true if the employee existed.
    pub fn remove_employee(&mut self, id: EmployeeId) -> Result<bool, StoreError> {
        let Some(idx) = self.state.position(id) else {
            debug!(id = %id, "remove skipped, no such employee");
            return Ok(false);
        };

        let mut next = self.state.clone();
        next.employees.remove(idx);

        self.commit(next)?;
        debug!(id = %id, "removed employee");
        Ok(true)
    }

    pub fn update_employee(
        &mut self,
        id: EmployeeId,
        update: EmployeeUpdate,
    ) -> Result<Employee, StoreError> {
        let idx = self.state.position(id).ok_or(StoreError::NotFound(id))?;

        let merged = update.merged_into(&self.state.employees[idx]);
        validate_employee(&merged.name, &merged.scores).map_err(StoreError::Validation)?;

        let mut next = self.state.clone();
        next.employees[idx] = merged.clone();

        self.commit(next)?;
        debug!(id = %id, "updated employee");
        Ok(merged)
    }

    /// Replace the whole weight vector
    pub fn set_weights(&mut self, weights: WeightVector) -> Result<(), StoreError> {
        validate_weights(&weights).map_err(StoreError::Validation)?;

        let mut next = self.state.clone();
        next.weights = weights;

        self.commit(next)?;
        debug!(total = weights.total(), "replaced weights");
        Ok(())
    }

    /// Clear all employees and restore default weights in one write.
    /// The id counter keeps counting so old ids are never handed out again.
    pub fn reset_all(&mut self) -> Result<(), StoreError> {
        let next = StoreState {
            next_id: self.state.next_id,
            ..StoreState::new()
        };

        self.commit(next)?;
        debug!("reset store");
        Ok(())
    }
}
