//! Plain-text tables for the report totals and grant listings.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: String,
    pub width: usize,
    pub align: Align,
}

impl Column {
    pub fn new(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width: width.max(header.len()),
            align: Align::Left,
        }
    }

    /// Right-aligned column, for durations and counters.
    pub fn right(header: &str, width: usize) -> Self {
        Self {
            align: Align::Right,
            ..Self::new(header, width)
        }
    }

    fn cell(&self, value: &str) -> String {
        match self.align {
            Align::Left => format!("{:<w$}", value, w = self.width),
            Align::Right => format!("{:>w$}", value, w = self.width),
        }
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells must not carry ANSI codes; widths are counted in chars.
    pub fn render(&self) -> String {
        let line = |cells: Vec<String>| cells.join(" ").trim_end().to_string() + "\n";

        let mut out = line(self.columns.iter().map(|c| c.cell(&c.header)).collect());
        out += &line(self.columns.iter().map(|c| "-".repeat(c.width)).collect());

        for row in &self.rows {
            let cells = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, c)| c.cell(row.get(i).map(String::as_str).unwrap_or("")))
                .collect();
            out += &line(cells);
        }

        out
    }
}
