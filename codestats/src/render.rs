//! Template rendering for CLI output using outstanding

use codestatslib::{FileRecord, Report, ScanConfig, ScanResult, Summaries, SummaryTable};
use console::Style;
use outstanding::{render_auto, render_with_output, Theme};
use serde::Serialize;
use std::path::Path;

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

/// One summary table. Every cell arrives pre-padded.
const SUMMARY_TABLE_TEMPLATE: &str = r#"{{ title | style("title") }}
{{ header.label | style("header") }}{% for cell in header.cells %}  {{ cell | style("header") }}{% endfor %}
{{ separator }}
{% for row in rows %}{{ row.label }}{% for cell in row.cells %}  {{ cell }}{% endfor %}
{% endfor %}{{ separator }}
{{ footer.label | style("total") }}{% for cell in footer.cells %}  {{ cell | style("total") }}{% endfor %}
"#;

const ANOMALY_NOTE_TEMPLATE: &str = r#"{{ message | style("note") }}
"#;

/// Labels longer than this are shortened from the left.
const MAX_LABEL_WIDTH: usize = 60;

/// Row data for template rendering (pre-formatted)
#[derive(Debug, Serialize)]
struct TemplateRow {
    /// Pre-padded label (left-aligned)
    label: String,
    /// Pre-padded cells (right-aligned)
    cells: Vec<String>,
}

/// Data context for the summary table template
#[derive(Debug, Serialize)]
struct SummaryTableContext {
    title: String,
    header: TemplateRow,
    /// Separator line (dashes)
    separator: String,
    rows: Vec<TemplateRow>,
    footer: TemplateRow,
}

#[derive(Debug, Serialize)]
struct AnomalyNoteContext {
    message: String,
}

/// Everything the JSON output contains
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    config: &'a ScanConfig,
    records: &'a [FileRecord],
    summaries: &'a Summaries,
}

/// Truncate a name to fit within max_len, adding ".." prefix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() > max_len {
        let tail: String = chars[chars.len() - (max_len - 2)..].iter().collect();
        format!("..{}", tail)
    } else {
        name.to_string()
    }
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

/// Convert a label and its values to a TemplateRow, pre-formatting cells
fn to_template_row(label: &str, values: &[String], widths: &[usize]) -> TemplateRow {
    let cells = values
        .iter()
        .zip(&widths[1..])
        .map(|(value, width)| {
            let pad = width.saturating_sub(display_width(value));
            format!("{}{}", " ".repeat(pad), value)
        })
        .collect();
    let pad = widths[0].saturating_sub(display_width(label));

    TemplateRow {
        label: format!("{}{}", label, " ".repeat(pad)),
        cells,
    }
}

/// Create the theme with styles
fn create_theme() -> Theme {
    Theme::new()
        .add("title", Style::new().bold())
        .add("header", Style::new().bold())
        .add("total", Style::new().bold())
        .add("note", Style::new().yellow())
}

/// Column widths of a table, label column first.
fn column_widths(table: &SummaryTable, labels: &[String], footer_label: &str) -> Vec<usize> {
    let mut widths = vec![0; table.width()];
    for (i, header) in table.headers.iter().enumerate() {
        widths[i] = display_width(header);
    }

    let body = labels.iter().map(String::as_str).zip(&table.rows);
    for (label, row) in body.chain(std::iter::once((footer_label, &table.footer))) {
        widths[0] = widths[0].max(display_width(label));
        for (i, value) in row.values.iter().enumerate() {
            if let Some(width) = widths.get_mut(i + 1) {
                *width = (*width).max(display_width(value));
            }
        }
    }
    widths
}

fn ensure_trailing_newline(mut out: String) -> String {
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Render one table: title, header, separator, rows, separator, footer.
///
/// Labels are left-aligned, values right-aligned. Padding is computed on the
/// plain text so styling never shifts columns.
pub fn render_table(
    table: &SummaryTable,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let theme = create_theme();

    let labels: Vec<String> = table
        .rows
        .iter()
        .map(|r| truncate_name(&r.label, MAX_LABEL_WIDTH))
        .collect();
    let footer_label = truncate_name(&table.footer.label, MAX_LABEL_WIDTH);
    let widths = column_widths(table, &labels, &footer_label);

    let context = SummaryTableContext {
        title: table.title.clone(),
        header: to_template_row(&table.headers[0], &table.headers[1..], &widths),
        separator: "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)),
        rows: labels
            .iter()
            .zip(&table.rows)
            .map(|(label, row)| to_template_row(label, &row.values, &widths))
            .collect(),
        footer: to_template_row(&footer_label, &table.footer.values, &widths),
    };

    let rendered = render_with_output(SUMMARY_TABLE_TEMPLATE, &context, &theme, output_mode)?;
    Ok(ensure_trailing_newline(rendered))
}

/// Render every table of a report, separated by blank lines.
pub fn render_report(
    report: &Report,
    anomalies: usize,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let tables = report
        .tables()
        .into_iter()
        .map(|table| render_table(table, output_mode))
        .collect::<Result<Vec<_>, _>>()?;
    let mut out = tables.join("\n");

    if anomalies > 0 {
        let context = AnomalyNoteContext {
            message: format!(
                "note: {} file(s) had blank counts clamped to zero by legacy docstring accounting",
                anomalies
            ),
        };
        let note = render_with_output(ANOMALY_NOTE_TEMPLATE, &context, &create_theme(), output_mode)?;
        out.push('\n');
        out.push_str(&ensure_trailing_newline(note));
    }

    Ok(out)
}

/// Render a scan using outstanding's auto dispatch
///
/// `base` shortens per-file labels when the breakdown is requested.
pub fn render_scan(
    config: &ScanConfig,
    result: &ScanResult,
    by_file: bool,
    base: Option<&Path>,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let summaries = result.summarize();

    // For JSON mode, use outstanding's render_auto for serialization
    if matches!(output_mode, OutputMode::Json) {
        let output = JsonOutput {
            config,
            records: &result.records,
            summaries: &summaries,
        };
        let rendered = render_auto(SUMMARY_TABLE_TEMPLATE, &output, &create_theme(), output_mode)?;
        return Ok(ensure_trailing_newline(rendered));
    }

    let mut report = Report::new(&summaries);
    if by_file {
        report = report.with_files(&result.records, base);
    }

    render_report(&report, result.anomalies().count(), output_mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codestatslib::TableRow;

    fn table() -> SummaryTable {
        SummaryTable {
            title: "Files".to_string(),
            headers: vec!["Extension".to_string(), "Files".to_string()],
            rows: vec![
                TableRow {
                    label: ".py".to_string(),
                    values: vec!["12".to_string()],
                },
                TableRow {
                    label: ".js".to_string(),
                    values: vec!["3".to_string()],
                },
            ],
            footer: TableRow {
                label: "Total".to_string(),
                values: vec!["15".to_string()],
            },
        }
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 10), "short");
        assert_eq!(truncate_name("a/very/long/path.py", 10), "../path.py");
        assert_eq!(truncate_name("a/very/long/path.py", 10).chars().count(), 10);
    }

    #[test]
    fn test_column_widths_cover_headers_and_values() {
        let table = table();
        let labels = vec![".py".to_string(), ".js".to_string()];

        assert_eq!(column_widths(&table, &labels, "Total"), vec![9, 5]);
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let out = render_table(&table(), OutputMode::Text).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Files");
        assert_eq!(lines[1], "Extension  Files");
        assert_eq!(lines[2], "----------------");
        assert_eq!(lines[3], format!(".py{}12", " ".repeat(11)));
        assert_eq!(lines[4], format!(".js{}3", " ".repeat(12)));
        assert_eq!(lines[5], "----------------");
        assert_eq!(lines[6], format!("Total{}15", " ".repeat(9)));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_render_report_mentions_anomalies() {
        let report = Report::new(&codestatslib::aggregate(&[]));

        let clean = render_report(&report, 0, OutputMode::Text).unwrap();
        let flagged = render_report(&report, 2, OutputMode::Text).unwrap();

        assert!(!clean.contains("clamped"));
        assert!(flagged.contains("2 file(s) had blank counts clamped"));
        assert!(clean.contains("Total Line Counts by File Type"));
        assert!(clean.contains("File Counts by Type"));
    }

    #[test]
    fn test_render_scan_json_mode() {
        let config = ScanConfig::new().root("/tmp/project");
        let result = ScanResult::default();

        let out = render_scan(&config, &result, false, None, OutputMode::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert!(parsed["records"].as_array().unwrap().is_empty());
        assert!(parsed["summaries"]["by_extension"].is_object());
        assert!(parsed["config"]["roots"].is_array());
    }

    #[test]
    fn test_render_scan_table_mode() {
        let result = ScanResult::default();

        let out = render_scan(&ScanConfig::new(), &result, true, None, OutputMode::Text).unwrap();

        assert!(out.contains("Line Count Distribution by Month and File Type"));
        assert!(out.contains("Line Counts by File"));
    }
}
