use super::criteria::{Criterion, CriterionMap, WeightVector};
use crate::store::types::Employee;

/// Fixed top of the 1-10 score scale
pub const SCORE_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingWarning {
    /// Weights sum to zero; every total is 0 and the order is insertion order
    ZeroTotalWeight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub employee: Employee,
    pub normalized: CriterionMap<f64>, // score / 10
    pub weighted: CriterionMap<f64>,   // normalized * normalized weight
    pub total_score: f64,              // 0.0 ..= 1.0
    pub rank: usize,                   // 1 = best
}

impl RankedResult {
    /// Total score as a percentage rounded to two decimals
    pub fn percentage(&self) -> f64 {
        to_percentage(self.total_score)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub results: Vec<RankedResult>,
    pub normalized_weights: CriterionMap<f64>,
    pub warnings: Vec<RankingWarning>,
}

impl Ranking {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn top(&self) -> Option<&RankedResult> {
        self.results.first()
    }
}

pub fn to_percentage(score: f64) -> f64 {
    (score * 100.0 * 100.0).round() / 100.0
}

/// Divide each weight by the total. A zero total yields all-zero weights
/// instead of a division by zero.
pub fn normalize_weights(weights: &WeightVector) -> CriterionMap<f64> {
    let total = weights.total();
    CriterionMap::from_fn(|c| {
        if total > 0.0 {
            weights.get(c) / total
        } else {
            0.0
        }
    })
}

/// Rank employees with the Weighted Point Method.
///
/// Employees and weights are expected to have passed store validation. The
/// sort is stable, so equal totals keep the input order and get consecutive
/// distinct ranks.
pub fn compute(employees: &[Employee], weights: &WeightVector) -> Ranking {
    let normalized_weights = normalize_weights(weights);
    let mut warnings = Vec::new();
    if weights.total() == 0.0 {
        warnings.push(RankingWarning::ZeroTotalWeight);
    }

    let mut results: Vec<RankedResult> = employees
        .iter()
        .map(|employee| {
            let normalized = employee.scores.map(|raw| f64::from(raw) / SCORE_SCALE);
            let weighted =
                CriterionMap::from_fn(|c: Criterion| normalized[c] * normalized_weights[c]);
            let total_score = weighted.iter().map(|(_, v)| v).sum();

            RankedResult {
                employee: employee.clone(),
                normalized,
                weighted,
                total_score,
                rank: 0,
            }
        })
        .collect();

    // Vec::sort_by is stable: ties keep insertion order
    results.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

    for (idx, result) in results.iter_mut().enumerate() {
        result.rank = idx + 1;
    }

    Ranking {
        results,
        normalized_weights,
        warnings,
    }
}
