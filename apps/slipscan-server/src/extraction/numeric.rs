//! Numeric projection of table columns
//!
//! Takes the first run of ASCII digits in each cell. Units, signs and
//! decimals are dropped: `"$4,200.50"` becomes `4`.

use super::table::AttributeTable;

/// Numeric values of one column, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericSeries {
    pub column: String,
    /// `(document id, value)`; documents without digits are absent
    pub points: Vec<(String, u64)>,
}

impl NumericSeries {
    pub fn values(&self) -> Vec<u64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|(id, _)| id.as_str()).collect()
    }
}

/// First contiguous digit run as an integer.
///
/// `None` when there are no digits or the run overflows `u64`.
pub fn first_integer(text: &str) -> Option<u64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits = &text[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Project one column; `None` if no cell holds a number
pub fn project_column(table: &AttributeTable, column: &str) -> Option<NumericSeries> {
    let points: Vec<(String, u64)> = table
        .column(column)
        .into_iter()
        .filter_map(|(id, cell)| Some((id.to_string(), first_integer(cell?)?)))
        .collect();

    if points.is_empty() {
        return None;
    }

    Some(NumericSeries {
        column: column.to_string(),
        points,
    })
}

/// Project every field column, skipping those with no numbers
pub fn project_table(table: &AttributeTable) -> Vec<NumericSeries> {
    table
        .field_columns()
        .filter_map(|column| project_column(table, column))
        .collect()
}
