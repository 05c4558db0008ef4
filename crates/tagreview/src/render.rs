//! Plain-text tables for the review report.

use owo_colors::{OwoColorize, Stream};

/// A boxed ASCII table.
///
/// Cells are flattened to a single line; headers are drawn in green when
/// stdout supports colors (see [`crate::ColorChoice`]).
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given column headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render empty; extra cells are dropped.
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(|c| flatten(c.as_ref()))
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
        self
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Render the table, one trailing newline included.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let border = border(&widths);
        let mut out = String::new();

        out.push_str(&border);
        out.push('|');
        for (header, width) in self.headers.iter().zip(&widths) {
            let header = pad(header, *width);
            out.push_str(&format!(
                " {} |",
                header.if_supports_color(Stream::Stdout, |h| h.green())
            ));
        }
        out.push('\n');
        out.push_str(&border);

        for row in &self.rows {
            out.push('|');
            for (cell, width) in row.iter().zip(&widths) {
                out.push_str(&format!(" {} |", pad(cell, *width)));
            }
            out.push('\n');
        }
        if !self.rows.is_empty() {
            out.push_str(&border);
        }
        out
    }
}

fn border(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{text}{}", " ".repeat(fill))
}

/// Collapse line breaks and runs of whitespace into single spaces.
fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        owo_colors::set_override(false);
    }

    #[test]
    fn renders_boxed_table() {
        plain();
        let mut table = Table::new(["Fixes", "Features"]);
        table.row(["1", "12"]);

        assert_eq!(
            table.render(),
            "\
+-------+----------+
| Fixes | Features |
+-------+----------+
| 1     | 12       |
+-------+----------+
"
        );
    }

    #[test]
    fn column_grows_to_widest_cell() {
        plain();
        let mut table = Table::new(["Tag"]);
        table.row(["v10.20.30"]);
        let rendered = table.render();
        assert!(rendered.contains("| Tag       |"));
        assert!(rendered.contains("| v10.20.30 |"));
    }

    #[test]
    fn multiline_cells_are_flattened() {
        plain();
        let mut table = Table::new(["Commit Message"]);
        table.row(["first line\n\nsecond   line"]);
        assert!(table.render().contains("| first line second line |"));
    }

    #[test]
    fn short_rows_are_padded() {
        plain();
        let mut table = Table::new(["A", "B"]);
        table.row(["x"]);
        assert!(table.render().contains("| x |   |"));
    }

    #[test]
    fn every_row_is_boxed() {
        plain();
        let mut table = Table::new(["Tag", "Author"]);
        table.row(["v1.1.0", "Ada"]).row(["v1.0.0", "Grace"]);

        assert_eq!(
            table.render(),
            "\
+--------+--------+
| Tag    | Author |
+--------+--------+
| v1.1.0 | Ada    |
| v1.0.0 | Grace  |
+--------+--------+
"
        );
    }

    #[test]
    fn empty_table_has_header_only() {
        plain();
        let table = Table::new(["A"]);
        assert_eq!(table.render(), "+---+\n| A |\n+---+\n");
    }
}
