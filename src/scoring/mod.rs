pub mod criteria;
pub mod engine;
pub mod stats;
pub mod validation;

pub use criteria::{Criterion, CriterionMap, Scores, WeightVector};
pub use engine::{compute, normalize_weights, RankedResult, Ranking, RankingWarning};
pub use stats::{summarize, Summary};
pub use validation::{validate_employee, validate_weights};
