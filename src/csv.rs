//! In-memory CSV table.
//!
//! [`CsvTable`] collects an ordered set of columns and rows and renders them
//! as comma-separated text. There is no quoting: commas are stripped from
//! string values when a row is added, which is lossy but keeps every line
//! splittable on `,`.

use std::fmt;

use crate::error::{CleanupError, Result};

/// Name given to a column added with an empty name.
pub const DEFAULT_COLUMN_NAME: &str = "column";

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// String; commas are stripped when the row is added.
    Text(String),
    /// Floating-point number, rendered with `Display`.
    Number(f64),
    /// Whole number.
    Integer(i64),
    /// Rendered as `true` or `false`.
    Bool(bool),
}

impl CellValue {
    fn sanitized(self) -> Self {
        match self {
            CellValue::Text(s) => CellValue::Text(s.replace(',', "")),
            other => other,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Integer(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(i64::from(value))
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Integer(i64::from(value))
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(n) => CellValue::Integer(n),
            Err(_) => CellValue::Number(value as f64),
        }
    }
}

/// A named column and its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub order: u32,
}

/// One cell of a row being added: the column it belongs to and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub column: String,
    pub value: CellValue,
}

impl Cell {
    pub fn new(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// A stored row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based position among stored rows.
    pub number: usize,
    cells: Vec<Cell>,
}

impl Row {
    /// Value for `column`, if the row has one.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|c| c.column == column)
            .map(|c| &c.value)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Columns plus rows, rendered as CSV text.
///
/// # Example
///
/// ```
/// use contentful_cleanup::csv::{Cell, CsvTable};
///
/// let mut table = CsvTable::new();
/// table.add_column("A", 1).unwrap();
/// table.add_column("B", 2).unwrap();
/// table.add_row(vec![Cell::new("A", "x,y"), Cell::new("B", 5)]);
///
/// assert_eq!(table.render(), "A,B\nxy,5\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl CsvTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column at `order`.
    ///
    /// If another column already uses `order`, it and every column after it
    /// move up by one first, so orders stay unique.
    ///
    /// # Errors
    ///
    /// Returns [`CleanupError::InvalidArgument`] if that shift would push a
    /// column past `u32::MAX`. The table is left unchanged.
    pub fn add_column(&mut self, name: &str, order: u32) -> Result<()> {
        if self.columns.iter().any(|c| c.order == order) {
            let shifted = self
                .columns
                .iter()
                .map(|c| {
                    if c.order >= order {
                        c.order.checked_add(1)
                    } else {
                        Some(c.order)
                    }
                })
                .collect::<Option<Vec<u32>>>()
                .ok_or_else(|| {
                    CleanupError::InvalidArgument(format!(
                        "no free column order at or above {order} for '{name}'"
                    ))
                })?;
            for (column, new_order) in self.columns.iter_mut().zip(shifted) {
                column.order = new_order;
            }
        }

        let name = if name.is_empty() {
            DEFAULT_COLUMN_NAME
        } else {
            name
        };

        self.columns.push(Column {
            name: name.to_string(),
            order,
        });
        Ok(())
    }

    /// Add a row from `cells`.
    ///
    /// Cells for unknown columns are dropped, as are repeat cells for a
    /// column already seen in this row. Commas are stripped from text. A row
    /// left with no cells is not stored and does not use up a row number.
    ///
    /// Returns the stored row's number.
    pub fn add_row<I>(&mut self, cells: I) -> Option<usize>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut kept: Vec<Cell> = Vec::new();

        for cell in cells {
            let known = self.columns.iter().any(|c| c.name == cell.column);
            let duplicate = kept.iter().any(|k| k.column == cell.column);
            if known && !duplicate {
                kept.push(Cell {
                    column: cell.column,
                    value: cell.value.sanitized(),
                });
            }
        }

        if kept.is_empty() {
            tracing::trace!("Dropping row with no known columns");
            return None;
        }

        let number = self.rows.len() + 1;
        self.rows.push(Row {
            number,
            cells: kept,
        });
        Some(number)
    }

    /// Columns sorted by order.
    pub fn columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.order);
        columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the header and every row, each line ending in `\n`.
    ///
    /// A row with no value for a column gets an empty field.
    pub fn render(&self) -> String {
        let columns = self.columns();
        let mut out = String::new();

        let header: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for row in &self.rows {
            let fields: Vec<String> = columns
                .iter()
                .map(|c| row.get(&c.name).map(ToString::to_string).unwrap_or_default())
                .collect();
            out.push_str(&fields.join(","));
            out.push('\n');
        }

        out
    }
}

impl fmt::Display for CsvTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders(table: &CsvTable) -> Vec<(String, u32)> {
        table
            .columns()
            .into_iter()
            .map(|c| (c.name.clone(), c.order))
            .collect()
    }

    #[test]
    fn test_render_strips_commas() {
        let mut table = CsvTable::new();
        table.add_column("A", 1).unwrap();
        table.add_column("B", 2).unwrap();
        table.add_row(vec![Cell::new("A", "x,y"), Cell::new("B", 5)]);

        assert_eq!(table.render(), "A,B\nxy,5\n");
    }

    #[test]
    fn test_colliding_order_shifts_later_columns() {
        let mut table = CsvTable::new();
        table.add_column("A", 1).unwrap();
        table.add_column("B", 2).unwrap();
        table.add_column("C", 3).unwrap();
        table.add_column("X", 2).unwrap();

        assert_eq!(
            orders(&table),
            vec![
                ("A".to_string(), 1),
                ("X".to_string(), 2),
                ("B".to_string(), 3),
                ("C".to_string(), 4),
            ]
        );
    }

    #[test]
    fn test_same_order_twice_gives_distinct_orders() {
        let mut table = CsvTable::new();
        table.add_column("first", 5).unwrap();
        table.add_column("second", 5).unwrap();

        let orders = orders(&table);
        assert_eq!(orders.len(), 2);
        assert_ne!(orders[0].1, orders[1].1);
        assert_eq!(table.render(), "second,first\n");
    }

    #[test]
    fn test_free_order_does_not_shift() {
        let mut table = CsvTable::new();
        table.add_column("A", 1).unwrap();
        table.add_column("C", 10).unwrap();
        table.add_column("B", 5).unwrap();

        assert_eq!(
            orders(&table),
            vec![
                ("A".to_string(), 1),
                ("B".to_string(), 5),
                ("C".to_string(), 10),
            ]
        );
    }

    #[test]
    fn test_shift_past_max_order_is_rejected() {
        let mut table = CsvTable::new();
        table.add_column("A", u32::MAX - 1).unwrap();
        table.add_column("B", u32::MAX).unwrap();

        let result = table.add_column("X", u32::MAX - 1);
        assert!(matches!(result, Err(CleanupError::InvalidArgument(_))));
        assert_eq!(
            orders(&table),
            vec![("A".to_string(), u32::MAX - 1), ("B".to_string(), u32::MAX)]
        );

        // No collision, no shift.
        table.add_column("C", 0).unwrap();
        assert_eq!(table.render(), "C,A,B\n");
    }

    #[test]
    fn test_empty_column_name_defaults() {
        let mut table = CsvTable::new();
        table.add_column("", 0).unwrap();
        assert_eq!(table.render(), "column\n");
    }

    #[test]
    fn test_unknown_and_duplicate_cells_are_dropped() {
        let mut table = CsvTable::new();
        table.add_column("A", 0).unwrap();
        table.add_column("B", 1).unwrap();

        table.add_row(vec![
            Cell::new("A", "first"),
            Cell::new("Z", "ignored"),
            Cell::new("A", "second"),
        ]);

        assert_eq!(table.render(), "A,B\nfirst,\n");
    }

    #[test]
    fn test_row_with_only_unknown_columns_is_dropped() {
        let mut table = CsvTable::new();
        table.add_column("A", 0).unwrap();

        assert_eq!(table.add_row(vec![Cell::new("A", 1)]), Some(1));
        assert_eq!(table.add_row(vec![Cell::new("nope", 2)]), None);
        assert_eq!(table.add_row(Vec::new()), None);
        assert_eq!(table.add_row(vec![Cell::new("A", 3)]), Some(2));

        assert_eq!(table.len(), 2);
        let numbers: Vec<usize> = table.rows().iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(table.render(), "A\n1\n3\n");
    }

    #[test]
    fn test_scalar_rendering() {
        let mut table = CsvTable::new();
        table.add_column("text", 0).unwrap();
        table.add_column("int", 1).unwrap();
        table.add_column("float", 2).unwrap();
        table.add_column("flag", 3).unwrap();

        table.add_row(vec![
            Cell::new("text", "a,b,c"),
            Cell::new("int", 42u64),
            Cell::new("float", 1.5),
            Cell::new("flag", false),
        ]);

        assert_eq!(table.render(), "text,int,float,flag\nabc,42,1.5,false\n");
    }

    #[test]
    fn test_cells_follow_column_order_not_insertion_order() {
        let mut table = CsvTable::new();
        table.add_column("B", 2).unwrap();
        table.add_column("A", 1).unwrap();
        table.add_row(vec![Cell::new("B", "b"), Cell::new("A", "a")]);

        assert_eq!(table.render(), "A,B\na,b\n");
    }

    #[test]
    fn test_empty_table_renders_header_only() {
        let mut table = CsvTable::new();
        table.add_column("Asset ID", 0).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.render(), "Asset ID\n");
    }
}
