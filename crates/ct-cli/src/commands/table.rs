//! Plain ASCII grid tables for terminal output.

use std::fmt::Write;

/// A table with a header row and any number of body rows.
///
/// Rendered as a grid: `=` under the header, `-` between body rows, and
/// every column padded to its widest cell. Header cells are centred, body
/// cells left-aligned. Cells are never wrapped.
#[derive(Debug, Clone)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Missing cells render empty; extra cells are dropped.
    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = row.into_iter().map(Into::into).collect();
        cells.resize(self.header.len(), String::new());
        self.rows.push(cells);
    }

    fn column_widths(&self) -> Vec<usize> {
        self.header
            .iter()
            .enumerate()
            .map(|(col, title)| {
                self.rows
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(title.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut output = String::new();

        writeln!(output, "{}", separator(&widths, '-')).unwrap();
        writeln!(output, "{}", row_line(&self.header, &widths, Align::Center)).unwrap();
        writeln!(output, "{}", separator(&widths, '=')).unwrap();
        for row in &self.rows {
            writeln!(output, "{}", row_line(row, &widths, Align::Left)).unwrap();
            writeln!(output, "{}", separator(&widths, '-')).unwrap();
        }

        output
    }
}

fn separator(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat_n(fill, width + 2));
        line.push('+');
    }
    line
}

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
}

fn row_line(cells: &[String], widths: &[usize], align: Align) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        match align {
            Align::Left => write!(line, " {cell:<width$} |").unwrap(),
            // Odd leftover padding goes to the right.
            Align::Center => write!(line, " {cell:^width$} |").unwrap(),
        }
    }
    line
}
