use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// One of the six fixed evaluation dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    Discipline,
    Productivity,
    WorkQuality,
    Teamwork,
    Initiative,
    Loyalty,
}

impl Criterion {
    /// All criteria in display order
    pub const ALL: [Criterion; 6] = [
        Criterion::Discipline,
        Criterion::Productivity,
        Criterion::WorkQuality,
        Criterion::Teamwork,
        Criterion::Initiative,
        Criterion::Loyalty,
    ];

    /// Persisted key, also accepted on the command line
    pub fn key(self) -> &'static str {
        match self {
            Criterion::Discipline => "discipline",
            Criterion::Productivity => "productivity",
            Criterion::WorkQuality => "workQuality",
            Criterion::Teamwork => "teamwork",
            Criterion::Initiative => "initiative",
            Criterion::Loyalty => "loyalty",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::Discipline => "Discipline",
            Criterion::Productivity => "Productivity",
            Criterion::WorkQuality => "Work Quality",
            Criterion::Teamwork => "Teamwork",
            Criterion::Initiative => "Initiative",
            Criterion::Loyalty => "Loyalty",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Criterion::Discipline => "Punctuality and adherence to rules",
            Criterion::Productivity => "Volume and speed of completed work",
            Criterion::WorkQuality => "Thoroughness of finished work",
            Criterion::Teamwork => "Ability to collaborate with colleagues",
            Criterion::Initiative => "Proactive action and new ideas",
            Criterion::Loyalty => "Dedication and commitment to the company",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Criterion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted = s.trim();
        Criterion::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow::anyhow!("Unknown criterion: {}", wanted))
    }
}

/// Exactly one value per criterion.
///
/// Serialized as a flat object keyed by the criterion's camelCase key, so a
/// `CriterionMap<u8>` can be flattened straight into an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionMap<T> {
    pub discipline: T,
    pub productivity: T,
    pub work_quality: T,
    pub teamwork: T,
    pub initiative: T,
    pub loyalty: T,
}

impl<T: Copy> CriterionMap<T> {
    /// Same value for every criterion
    pub fn splat(value: T) -> Self {
        Self {
            discipline: value,
            productivity: value,
            work_quality: value,
            teamwork: value,
            initiative: value,
            loyalty: value,
        }
    }

    pub fn from_fn(mut f: impl FnMut(Criterion) -> T) -> Self {
        Self {
            discipline: f(Criterion::Discipline),
            productivity: f(Criterion::Productivity),
            work_quality: f(Criterion::WorkQuality),
            teamwork: f(Criterion::Teamwork),
            initiative: f(Criterion::Initiative),
            loyalty: f(Criterion::Loyalty),
        }
    }

    pub fn get(&self, criterion: Criterion) -> T {
        self[criterion]
    }

    pub fn map<U: Copy>(&self, mut f: impl FnMut(T) -> U) -> CriterionMap<U> {
        CriterionMap::from_fn(|c| f(self[c]))
    }

    /// (criterion, value) pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Criterion, T)> + '_ {
        Criterion::ALL.into_iter().map(move |c| (c, self[c]))
    }
}

impl<T> Index<Criterion> for CriterionMap<T> {
    type Output = T;

    fn index(&self, criterion: Criterion) -> &T {
        match criterion {
            Criterion::Discipline => &self.discipline,
            Criterion::Productivity => &self.productivity,
            Criterion::WorkQuality => &self.work_quality,
            Criterion::Teamwork => &self.teamwork,
            Criterion::Initiative => &self.initiative,
            Criterion::Loyalty => &self.loyalty,
        }
    }
}

impl<T> IndexMut<Criterion> for CriterionMap<T> {
    fn index_mut(&mut self, criterion: Criterion) -> &mut T {
        match criterion {
            Criterion::Discipline => &mut self.discipline,
            Criterion::Productivity => &mut self.productivity,
            Criterion::WorkQuality => &mut self.work_quality,
            Criterion::Teamwork => &mut self.teamwork,
            Criterion::Initiative => &mut self.initiative,
            Criterion::Loyalty => &mut self.loyalty,
        }
    }
}

/// Raw 1-10 score per criterion
pub type Scores = CriterionMap<u8>;

/// Relative importance per criterion, any non-negative scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector(pub CriterionMap<f64>);

impl Default for WeightVector {
    fn default() -> Self {
        Self(CriterionMap::splat(1.0))
    }
}

impl WeightVector {
    pub fn total(&self) -> f64 {
        self.0.iter().map(|(_, w)| w).sum()
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        self.0[criterion]
    }

    pub fn set(&mut self, criterion: Criterion, weight: f64) {
        self.0[criterion] = weight;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        self.0.iter()
    }
}
