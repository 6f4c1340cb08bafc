use std::io::IsTerminal;
use chrono::Duration;
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{
    normalize_weights, Criterion, CriterionMap, Ranking, RankingWarning, Scores, Summary,
    WeightVector,
};
use crate::store::types::{Employee, EmployeeId};

const EMPTY_MESSAGE: &str = "No employees found.";

/// Name column width used for the breakdown tables
const NAME_WIDTH: usize = 16;

/// Criterion column width, fits "Work Quality" plus padding
const CRITERION_WIDTH: usize = 13;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a 0..1 score as a percentage with two decimals ("87.50")
pub fn format_percentage(score: f64) -> String {
    format!("{:.2}", crate::scoring::engine::to_percentage(score))
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the ranking as a table: Rank, Score, Name, Id
/// No headers (minimal format)
/// Rank column: 3 chars (fits "99."), right-aligned
/// Score column is right-aligned, 6 chars wide (fits "100.00")
pub fn format_ranking_table(ranking: &Ranking, use_colors: bool) -> String {
    if ranking.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let term_width = get_terminal_width();
    let rank_width = 3;
    let score_width = 6;
    let separator = "  ";

    ranking
        .results
        .iter()
        .map(|result| {
            let rank_str = format!("{:>2}.", result.rank);
            let score_padded = format!(
                "{:>width$}",
                format_percentage(result.total_score),
                width = score_width
            );
            let id_str = format!("#{}", result.employee.id);

            let fixed_width = rank_width + 1 + score_width + separator.len() * 2 + id_str.len();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&result.employee.name, width - fixed_width)
                }
                Some(_) => truncate_name(&result.employee.name, 20),
                None => result.employee.name.clone(),
            };

            if use_colors {
                let score_colored = if result.rank == 1 {
                    score_padded.bold().yellow().to_string()
                } else {
                    score_padded.bold().to_string()
                };
                format!(
                    "{} {}{}{}{}{}",
                    rank_str.dimmed(),
                    score_colored,
                    separator,
                    name,
                    separator,
                    id_str.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, score_padded, separator, name, separator, id_str
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the ranking as tab-separated values for scripting
/// Columns: rank, score, name, id (no headers, no colors)
pub fn format_tsv(ranking: &Ranking) -> String {
    ranking
        .results
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}",
                r.rank,
                format_percentage(r.total_score),
                r.employee.name,
                r.employee.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankingRow<'a> {
    rank: usize,
    id: EmployeeId,
    name: &'a str,
    total_score: f64,
    percentage: f64,
    scores: Scores,
    normalized: CriterionMap<f64>,
    weighted: CriterionMap<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankingDocument<'a> {
    normalized_weights: CriterionMap<f64>,
    zero_total_weight: bool,
    results: Vec<RankingRow<'a>>,
}

/// Format the full ranking (including per-criterion values) as pretty JSON
pub fn format_json(ranking: &Ranking) -> serde_json::Result<String> {
    let document = RankingDocument {
        normalized_weights: ranking.normalized_weights,
        zero_total_weight: ranking.warnings.contains(&RankingWarning::ZeroTotalWeight),
        results: ranking
            .results
            .iter()
            .map(|r| RankingRow {
                rank: r.rank,
                id: r.employee.id,
                name: &r.employee.name,
                total_score: r.total_score,
                percentage: r.percentage(),
                scores: r.employee.scores,
                normalized: r.normalized,
                weighted: r.weighted,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&document)
}

fn criterion_header(first: &str, trailing: Option<&str>) -> String {
    let mut header = format!("{:<width$}", first, width = NAME_WIDTH);
    for criterion in Criterion::ALL {
        header.push_str(&format!(
            "{:>width$}",
            criterion.label(),
            width = CRITERION_WIDTH
        ));
    }
    if let Some(trailing) = trailing {
        header.push_str(&format!("{:>width$}", trailing, width = CRITERION_WIDTH));
    }
    header
}

fn criterion_row(
    name: &str,
    values: impl Iterator<Item = String>,
    trailing: Option<String>,
) -> String {
    let mut row = format!(
        "{:<width$}",
        truncate_name(name, NAME_WIDTH - 1),
        width = NAME_WIDTH
    );
    for value in values {
        row.push_str(&format!("{:>width$}", value, width = CRITERION_WIDTH));
    }
    if let Some(trailing) = trailing {
        row.push_str(&format!("{:>width$}", trailing, width = CRITERION_WIDTH));
    }
    row
}

/// Raw, normalized and weighted tables, one row per employee in rank order
pub fn format_breakdown(ranking: &Ranking, use_colors: bool) -> String {
    if ranking.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let title = |s: &str| {
        if use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    };

    let mut sections = Vec::new();

    let mut raw = vec![title("Raw scores (1-10)"), criterion_header("Name", None)];
    for r in &ranking.results {
        raw.push(criterion_row(
            &r.employee.name,
            r.employee.scores.iter().map(|(_, v)| v.to_string()),
            None,
        ));
    }
    sections.push(raw.join("\n"));

    let mut normalized = vec![title("Normalized (0-1)"), criterion_header("Name", None)];
    for r in &ranking.results {
        normalized.push(criterion_row(
            &r.employee.name,
            r.normalized.iter().map(|(_, v)| format!("{:.2}", v)),
            None,
        ));
    }
    sections.push(normalized.join("\n"));

    let mut weighted = vec![
        title("Weighted"),
        criterion_header("Name", Some("Total")),
    ];
    for r in &ranking.results {
        weighted.push(criterion_row(
            &r.employee.name,
            r.weighted.iter().map(|(_, v)| format!("{:.4}", v)),
            Some(format_percentage(r.total_score)),
        ));
    }
    sections.push(weighted.join("\n"));

    sections.join("\n\n")
}

/// Weights with their share of the total
pub fn format_weights(weights: &WeightVector, use_colors: bool) -> String {
    let total = weights.total();
    let shares = normalize_weights(weights);

    let mut lines: Vec<String> = Criterion::ALL
        .iter()
        .map(|&c| {
            let label = format!("{:<14}", c.label());
            let weight = format!("{:>6.1}", weights.get(c));
            let share = format!("{:>6.1}%", shares[c] * 100.0);
            if use_colors {
                format!("{}{}  {}", label, weight.bold(), share.dimmed())
            } else {
                format!("{}{}  {}", label, weight, share)
            }
        })
        .collect();

    lines.push(format!("{:<14}{:>6.1}", "Total", total));
    lines.join("\n")
}

pub fn format_warning(warning: RankingWarning) -> &'static str {
    match warning {
        RankingWarning::ZeroTotalWeight => {
            "All weights are zero: every score is 0 and employees are listed in the order they were added."
        }
    }
}

/// Dashboard-style overview
pub fn format_summary(summary: &Summary, use_colors: bool) -> String {
    let mut lines = vec![
        format!("Employees:       {}", summary.employee_count),
        format!("Average score:   {:.2} / 10", summary.overall_average),
        format!(
            "Top employee:    {}",
            summary.top_employee.as_deref().unwrap_or("-")
        ),
    ];
    if use_colors {
        lines[2] = format!(
            "Top employee:    {}",
            summary.top_employee.as_deref().unwrap_or("-").bold()
        );
    }

    lines.push(String::new());
    lines.push("Average per criterion:".to_string());
    for (criterion, avg) in summary.criterion_averages.iter() {
        lines.push(format!("  {:<14}{:>6.2}", criterion.label(), avg));
    }
    lines.join("\n")
}

/// One line per employee with id, name, raw scores and age
pub fn format_employee_list(employees: &[Employee], use_colors: bool) -> String {
    if employees.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    employees
        .iter()
        .map(|e| {
            let id_str = format!("{:>4}", format!("#{}", e.id));
            let scores = e
                .scores
                .iter()
                .map(|(_, s)| format!("{:>2}", s))
                .collect::<Vec<_>>()
                .join(" ");
            let age = format_age(e.age());
            if use_colors {
                format!("{}  {}  {}  {}", id_str.dimmed(), scores, e.name.bold(), age.dimmed())
            } else {
                format!("{}  {}  {}  {}", id_str, scores, e.name, age)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
