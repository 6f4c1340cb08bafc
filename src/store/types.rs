use crate::scoring::{CriterionMap, Scores, WeightVector};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub u64);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EmployeeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(EmployeeId)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(flatten)]
    pub scores: Scores,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.created_at
    }
}

/// Input for a new employee (everything but the id)
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    pub name: String,
    pub scores: Scores,
}

impl EmployeeDraft {
    pub fn new(name: impl Into<String>, scores: Scores) -> Self {
        Self {
            name: name.into(),
            scores,
        }
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub scores: CriterionMap<Option<u8>>,
}

impl EmployeeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.scores.iter().all(|(_, s)| s.is_none())
    }

    /// Apply onto a copy of `employee`
    pub fn merged_into(&self, employee: &Employee) -> Employee {
        let mut merged = employee.clone();
        if let Some(ref name) = self.name {
            merged.name = name.trim().to_string();
        }
        for (criterion, score) in self.scores.iter() {
            if let Some(score) = score {
                merged.scores[criterion] = score;
            }
        }
        merged
    }
}

/// Everything the store persists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub version: u32,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub weights: WeightVector,
    /// Next id to hand out; ids are never reused
    #[serde(default)]
    pub next_id: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreState {
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION,
            employees: Vec::new(),
            weights: WeightVector::default(),
            next_id: 1,
        }
    }

    /// Bump `next_id` past every id already in use (older files may omit it)
    pub fn repair_next_id(&mut self) {
        let max_id = self.employees.iter().map(|e| e.id.0).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1).max(1);
    }

    pub fn position(&self, id: EmployeeId) -> Option<usize> {
        self.employees.iter().position(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Criterion;

    fn sample_employee() -> Employee {
        Employee {
            id: EmployeeId(3),
            name: "Alice".to_string(),
            scores: Scores::splat(6),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_state_defaults() {
        let state = StoreState::new();
        assert_eq!(state.version, STATE_VERSION);
        assert!(state.employees.is_empty());
        assert_eq!(state.weights, WeightVector::default());
        assert_eq!(state.next_id, 1);
    }

    #[test]
    fn test_employee_serializes_flat() {
        let json = serde_json::to_value(sample_employee()).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["workQuality"], 6);
        assert!(json.get("scores").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_employee_without_timestamp_parses() {
        let json = r#"{"id":7,"name":"Bob","discipline":1,"productivity":2,"workQuality":3,
            "teamwork":4,"initiative":5,"loyalty":6}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, EmployeeId(7));
        assert_eq!(employee.scores.loyalty, 6);
    }

    #[test]
    fn test_employee_missing_criterion_is_rejected() {
        let json = r#"{"id":7,"name":"Bob","discipline":1}"#;
        assert!(serde_json::from_str::<Employee>(json).is_err());
    }

    #[test]
    fn test_employee_negative_score_is_rejected() {
        let json = r#"{"id":7,"name":"Bob","discipline":-1,"productivity":2,"workQuality":3,
            "teamwork":4,"initiative":5,"loyalty":6}"#;
        assert!(serde_json::from_str::<Employee>(json).is_err());
    }

    #[test]
    fn test_update_merges_only_given_fields() {
        let mut update = EmployeeUpdate::default();
        assert!(update.is_empty());
        update.scores[Criterion::Initiative] = Some(9);
        update.name = Some("  Alicia ".to_string());

        let merged = update.merged_into(&sample_employee());
        assert_eq!(merged.name, "Alicia");
        assert_eq!(merged.scores.initiative, 9);
        assert_eq!(merged.scores.discipline, 6);
        assert_eq!(merged.id, EmployeeId(3));
    }

    #[test]
    fn test_repair_next_id() {
        let mut state = StoreState::new();
        state.employees.push(sample_employee());
        state.next_id = 0;
        state.repair_next_id();
        assert_eq!(state.next_id, 4);
    }

    #[test]
    fn test_parse_employee_id() {
        assert_eq!("12".parse::<EmployeeId>().unwrap(), EmployeeId(12));
        assert_eq!("#5".parse::<EmployeeId>().unwrap(), EmployeeId(5));
        assert!("abc".parse::<EmployeeId>().is_err());
    }
}
