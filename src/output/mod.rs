pub mod formatter;

pub use formatter::{
    format_age, format_breakdown, format_employee_list, format_json, format_percentage,
    format_ranking_table, format_summary, format_tsv, format_warning, format_weights,
    should_use_colors,
};
