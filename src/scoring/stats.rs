use super::criteria::{Criterion, CriterionMap};
use crate::store::types::Employee;

/// Overview numbers for the whole evaluated group
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub employee_count: usize,
    pub criterion_averages: CriterionMap<f64>,
    /// Mean of every employee's mean score, on the 1-10 scale
    pub overall_average: f64,
    /// Highest plain (unweighted) mean score; the first one wins ties
    pub top_employee: Option<String>,
}

fn mean_score(employee: &Employee) -> f64 {
    let sum: f64 = employee.scores.iter().map(|(_, s)| f64::from(s)).sum();
    sum / Criterion::ALL.len() as f64
}

pub fn summarize(employees: &[Employee]) -> Summary {
    if employees.is_empty() {
        return Summary {
            employee_count: 0,
            criterion_averages: CriterionMap::splat(0.0),
            overall_average: 0.0,
            top_employee: None,
        };
    }

    let count = employees.len() as f64;
    let criterion_averages = CriterionMap::from_fn(|c| {
        employees
            .iter()
            .map(|e| f64::from(e.scores[c]))
            .sum::<f64>()
            / count
    });

    let overall_average = employees.iter().map(mean_score).sum::<f64>() / count;

    let mut top: Option<(&Employee, f64)> = None;
    for employee in employees {
        let mean = mean_score(employee);
        match top {
            Some((_, best)) if mean <= best => {}
            _ => top = Some((employee, mean)),
        }
    }

    Summary {
        employee_count: employees.len(),
        criterion_averages,
        overall_average,
        top_employee: top.map(|(e, _)| e.name.clone()),
    }
}
