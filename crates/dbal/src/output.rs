use clap::ValueEnum;
use dbal_access::{Row, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One JSON object per row
    Json,
    /// Aligned text table
    Pretty,
}

pub fn rows(rows: &[Row], format: Format) {
    match format {
        Format::Json => {
            for row in rows {
                match serde_json::to_string(row) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!(error = %e, "row could not be serialized"),
                }
            }
        }
        Format::Pretty => print!("{}", table(rows)),
    }
}

fn cell(v: &Value) -> String {
    match v {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render rows as an ASCII table sized to the widest cell of each column.
pub fn table(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return "(no rows)\n".to_string();
    };
    let header: Vec<String> = first.columns().to_vec();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| r.values().iter().map(cell).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in &body {
        for (w, c) in widths.iter_mut().zip(line) {
            *w = (*w).max(c.chars().count());
        }
    }

    let rule = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let rule = format!("+{rule}+\n");

    let mut out = String::new();
    out.push_str(&rule);
    out.push_str(&table_line(&header, &widths));
    out.push_str(&rule);
    for line in &body {
        out.push_str(&table_line(line, &widths));
    }
    out.push_str(&rule);
    out
}

fn table_line(cells: &[String], widths: &[usize]) -> String {
    let inner = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!(" {c}{} ", " ".repeat(w - c.chars().count())))
        .collect::<Vec<_>>()
        .join("|");
    format!("|{inner}|\n")
}
