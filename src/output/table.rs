//! Aligned text-table rendering

use std::io::Write;

use anyhow::Result;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::diff::{DiffRecord, NOTE_ONLY_LEFT, NOTE_ONLY_RIGHT};
use crate::model::Table;

/// Render a table's rows as an aligned grid in schema order.
pub fn render_table(table: &Table, writer: &mut dyn Write) -> Result<()> {
    let mut data: Vec<Vec<String>> = Vec::with_capacity(table.row_count() + 1);
    data.push(table.schema.clone());
    for row in &table.rows {
        data.push(
            table
                .schema
                .iter()
                .map(|column| row.get(column).map(|v| v.to_text()).unwrap_or_default())
                .collect(),
        );
    }
    write!(writer, "{}", build_grid(&data))?;
    Ok(())
}

/// Render diff records one block at a time: a colored note header followed
/// by a three-row grid (columns, left values, right values).
pub fn render_diffs(records: &[DiffRecord], writer: &mut dyn WriteColor) -> Result<()> {
    for record in records {
        writer.set_color(ColorSpec::new().set_fg(Some(note_color(&record.note))).set_bold(true))?;
        writeln!(writer, "{}", record.note)?;
        writer.reset()?;

        let mut header = vec![String::new()];
        header.extend(record.columns.iter().cloned());
        let mut left = vec!["left".to_string()];
        left.extend(record.left.iter().map(|v| v.to_text()));
        let mut right = vec!["right".to_string()];
        right.extend(record.right.iter().map(|v| v.to_text()));

        write!(writer, "{}", build_grid(&[header, left, right]))?;
        writeln!(writer)?;
    }
    writeln!(writer, "{} rows with differences", records.len())?;
    Ok(())
}

fn note_color(note: &str) -> Color {
    match note {
        NOTE_ONLY_LEFT => Color::Red,
        NOTE_ONLY_RIGHT => Color::Green,
        _ => Color::Yellow,
    }
}

/// Build a box-drawing grid; the first row is the header.
fn build_grid(data: &[Vec<String>]) -> String {
    if data.is_empty() || data[0].is_empty() {
        return String::new();
    }

    let col_count = data[0].len();
    let mut widths: Vec<usize> = vec![0; col_count];
    for row in data {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let border = |left: char, mid: char, right: char| {
        let mut line = String::new();
        line.push(left);
        for (i, width) in widths.iter().enumerate() {
            line.push_str(&"─".repeat(width + 2));
            line.push(if i < widths.len() - 1 { mid } else { right });
        }
        line.push('\n');
        line
    };
    let format_row = |row: &[String]| {
        let mut line = String::from("│");
        for (i, width) in widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&format!(" {:width$} │", cell, width = width));
        }
        line.push('\n');
        line
    };

    let mut output = border('┌', '┬', '┐');
    output.push_str(&format_row(&data[0]));
    output.push_str(&border('├', '┼', '┤'));
    for row in data.iter().skip(1) {
        output.push_str(&format_row(row));
    }
    output.push_str(&border('└', '┴', '┘'));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Row, Value};
    use termcolor::NoColor;

    #[test]
    fn test_render_table_uses_schema_order() {
        let mut table = Table::new(vec!["a".to_string(), "b".to_string()]);
        let mut row = Row::new();
        row.insert("b", Value::Int(2));
        row.insert("a", Value::Int(1));
        table.push_row(row);

        let mut out = Vec::new();
        render_table(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let header = text.lines().nth(1).unwrap();
        assert!(header.find(" a ").unwrap() < header.find(" b ").unwrap());
    }

    #[test]
    fn test_render_diffs_writes_note_and_count() {
        let mut record = DiffRecord::new(NOTE_ONLY_LEFT);
        record.push("k", Value::Int(1), Value::Null);

        let mut out = NoColor::new(Vec::new());
        render_diffs(&[record], &mut out).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains(NOTE_ONLY_LEFT));
        assert!(text.contains("1 rows with differences"));
    }
}
