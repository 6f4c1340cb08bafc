use crate::scoring::{Criterion, Ranking, Scores};
use serde::Serialize;

/// The winning employee as sent to the insight service
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopEntry {
    pub name: String,
    /// Total score x 100, rounded to 2 decimals
    pub score: f64,
    pub scores: Scores,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: usize,
    pub name: String,
    pub score: f64,
}

/// Request payload for the insight service.
///
/// Carries both the structured ranking and a ready-made prompt so the
/// service can use either.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub top: TopEntry,
    pub others: Vec<RankedEntry>,
    pub language: String,
    pub prompt: String,
    /// Store revision the ranking was computed from; not sent
    #[serde(skip)]
    pub revision: u64,
}

impl InsightRequest {
    /// Build a request from a ranking. Returns None for an empty ranking.
    pub fn from_ranking(ranking: &Ranking, language: &str, revision: u64) -> Option<Self> {
        let (first, rest) = ranking.results.split_first()?;

        let top = TopEntry {
            name: first.employee.name.clone(),
            score: first.percentage(),
            scores: first.employee.scores,
        };
        let others: Vec<RankedEntry> = rest
            .iter()
            .map(|r| RankedEntry {
                rank: r.rank,
                name: r.employee.name.clone(),
                score: r.percentage(),
            })
            .collect();

        let prompt = render_prompt(&top, &others, language);

        Some(Self {
            top,
            others,
            language: language.to_string(),
            prompt,
            revision,
        })
    }
}

fn render_prompt(top: &TopEntry, others: &[RankedEntry], language: &str) -> String {
    let mut lines = vec![
        "Employee evaluation results using the Weighted Point Method:".to_string(),
        String::new(),
        format!("Top employee: {}", top.name),
        format!("Total score: {:.2}", top.score),
        String::new(),
        "Scores per criterion:".to_string(),
    ];
    lines.extend(
        Criterion::ALL
            .iter()
            .map(|c| format!("- {}: {}/10", c.label(), top.scores[*c])),
    );

    if !others.is_empty() {
        lines.push(String::new());
        lines.push("Other employees:".to_string());
        lines.extend(
            others
                .iter()
                .map(|e| format!("{}. {} - Score: {:.2}", e.rank, e.name, e.score)),
        );
    }

    lines.extend([
        String::new(),
        format!("Write an analysis in {} that covers:", language),
        "1. Why this employee ranked first (2-3 sentences)".to_string(),
        "2. Their main strengths (bullet points)".to_string(),
        "3. Short, specific development advice for the next 2-3 highest scoring employees"
            .to_string(),
        String::new(),
        "Format the output as clean markdown.".to_string(),
    ]);

    lines.join("\n")
}
