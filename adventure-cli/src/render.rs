use std::fmt::Write;

use adventure_core::{format_duration, parse_duration, CellKey, GridMonth};
use time::macros::format_description;

use crate::{api::CategoryDto, sheet::GridSheet};

const DAY_WIDTH: usize = 10;
const MIN_COLUMN_WIDTH: usize = 6;

/// Render the month as a text table: one row per day, one column per category,
/// and a total row at the bottom.
pub fn month_table(month: GridMonth, categories: &[CategoryDto], sheet: &GridSheet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{month}");

    if categories.is_empty() {
        out.push_str("No categories yet. Add one with `adventure-cli add-category <name>`.\n");
        return out;
    }

    let widths: Vec<usize> = categories
        .iter()
        .map(|c| c.name.chars().count().max(MIN_COLUMN_WIDTH))
        .collect();

    let _ = write!(out, "{:<DAY_WIDTH$}", "");
    for (category, width) in categories.iter().zip(widths.iter().copied()) {
        let _ = write!(out, " | {:>width$}", category.name);
    }
    out.push('\n');
    out.push_str(&separator(&widths));

    let label = format_description!("[month]-[day] [weekday repr:short]");
    let mut totals = vec![0u64; categories.len()];
    for day in month.days() {
        let day_label = day.format(label).unwrap_or_else(|_| day.to_string());
        let _ = write!(out, "{:<DAY_WIDTH$}", day_label);
        for ((category, width), total) in categories
            .iter()
            .zip(widths.iter().copied())
            .zip(&mut totals)
        {
            let text = sheet.display(&CellKey::new(day, category.id));
            *total += cell_minutes(text);
            let _ = write!(out, " | {:>width$}", text);
        }
        out.push('\n');
    }

    out.push_str(&separator(&widths));
    let _ = write!(out, "{:<DAY_WIDTH$}", "Total");
    for (total, width) in totals.iter().zip(widths.iter().copied()) {
        let text = format_duration(i64::try_from(*total).unwrap_or(i64::MAX));
        let _ = write!(out, " | {:>width$}", text);
    }
    out.push('\n');

    out
}

pub fn category_list(categories: &[CategoryDto]) -> String {
    if categories.is_empty() {
        return "No categories yet.\n".to_string();
    }
    categories
        .iter()
        .map(|c| format!("{:>4}  {}\n", c.id.as_i32(), c.name))
        .collect()
}

fn separator(widths: &[usize]) -> String {
    let mut line = "-".repeat(DAY_WIDTH);
    for width in widths {
        line.push_str("-+-");
        line.push_str(&"-".repeat(*width));
    }
    line.push('\n');
    line
}

fn cell_minutes(text: &str) -> u64 {
    parse_duration(text)
        .ok()
        .and_then(|input| input.minutes())
        .map(u64::from)
        .unwrap_or(0)
}
