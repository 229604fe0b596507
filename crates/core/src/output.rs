use colored_json::ToColoredJson;
use serde::Serialize;
use serde_json::json;
use tabled::{Table, Tabled, settings::Style};

use crate::models::{ChapterRecord, PageRecord, SearchCandidate};

/// `{ "results": [...], "count": n }`, colored when stdout is a terminal.
pub fn print_pretty_json<T: Serialize>(results: &[T]) {
    print_pretty_value(&json!({
        "results": results,
        "count": results.len(),
    }));
}

pub fn print_pretty_value<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => match s.to_colored_json_auto() {
            Ok(cs) => println!("{cs}"),
            Err(_) => println!("{s}"),
        },
        Err(e) => eprintln!("failed to serialize results: {e}"),
    }
}

pub fn print_table<'a, T>(results: &'a [T])
where
    T: 'a,
    DisplayRow: From<&'a T>,
{
    if results.is_empty() {
        println!("No results.");
        return;
    }
    let rows: Vec<DisplayRow> = results.iter().map(DisplayRow::from).collect();
    println!("{}", render_rows(&rows));
}

fn render_rows(rows: &[DisplayRow]) -> String {
    if std::env::var("NO_TABLE").ok().as_deref() == Some("1") {
        return rows
            .iter()
            .map(|r| format!("  {} - {} ({})", r.key, r.title, r.url))
            .collect::<Vec<_>>()
            .join("\n");
    }
    let mut table = Table::new(rows.to_vec());
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Clone, Tabled)]
pub struct DisplayRow {
    #[tabled(rename = "#")]
    key: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&SearchCandidate> for DisplayRow {
    fn from(c: &SearchCandidate) -> Self {
        Self {
            key: "-".into(),
            title: c.title.clone(),
            url: c.url.clone(),
        }
    }
}

impl From<&ChapterRecord> for DisplayRow {
    fn from(c: &ChapterRecord) -> Self {
        Self {
            key: c.number.to_string(),
            title: c.title.clone(),
            url: c.url.clone(),
        }
    }
}

impl From<&PageRecord> for DisplayRow {
    fn from(p: &PageRecord) -> Self {
        Self {
            key: p.page.to_string(),
            title: format!("Page {}", p.page),
            url: p.url.clone(),
        }
    }
}
