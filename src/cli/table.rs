//! Padded-column table rendering for the KPI overview.

use colored::Colorize;

/// Declarative description of a table column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub width: usize,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, width: usize) -> Self {
        Self {
            header: header.into(),
            width,
        }
    }
}

/// Simple table model used for rendering read-only overviews.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<T: Into<String>>(title: Option<T>, columns: Vec<TableColumn>) -> Self {
        Self {
            title: title.map(|value| value.into()),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows
            .push(cells.into_iter().map(|value| value.into()).collect());
    }
}

/// Renders [`Table`] instances using simple padded columns.
pub struct TableRenderer;

impl TableRenderer {
    pub fn render(table: &Table) {
        if let Some(title) = &table.title {
            println!("{}", title.bold());
        }

        if table.columns.is_empty() {
            return;
        }

        let total_width = table
            .columns
            .iter()
            .map(|col| col.width + 1)
            .sum::<usize>()
            .max(1);

        println!("{}", "-".repeat(total_width));
        let header = table
            .columns
            .iter()
            .map(|col| format!("{:width$} ", col.header, width = col.width))
            .collect::<String>();
        println!("{}", header.trim_end().bold());
        println!("{}", "-".repeat(total_width));

        for row in &table.rows {
            let line = table
                .columns
                .iter()
                .zip(row)
                .map(|(col, cell)| format!("{:width$} ", cell, width = col.width))
                .collect::<String>();
            println!("{}", line.trim_end());
        }
    }
}
