// Plain-text table rendering for shell views

use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
    max_width: usize,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            aligns: vec![Align::Left; headers.len()],
            rows: Vec::new(),
            max_width: usize::MAX,
        }
    }

    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.aligns.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Cells wider than this are cut and end in `...`.
    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = width.max(4);
        self
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.rows.is_empty() {
            return writeln!(out, "(no results)");
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, value) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(value.chars().count());
                }
            }
        }
        for width in &mut widths {
            *width = (*width).min(self.max_width);
        }

        self.render_line(out, &self.headers, &widths)?;
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "{}", separator.join("-+-"))?;
        for row in &self.rows {
            self.render_line(out, row, &widths)?;
        }
        Ok(())
    }

    fn render_line(&self, out: &mut dyn Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
        let rendered: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let value = truncate(cells.get(i).map(String::as_str).unwrap_or(""), *width);
                match self.aligns.get(i).copied().unwrap_or(Align::Left) {
                    Align::Left => format!("{:<width$}", value, width = *width),
                    Align::Right => format!("{:>width$}", value, width = *width),
                }
            })
            .collect();
        writeln!(out, "{}", rendered.join(" | ").trim_end())
    }
}

/// Cut `value` to `width` characters, marking the cut with `...`.
pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut cut: String = value.chars().take(keep).collect();
    cut.push_str("...");
    cut
}
