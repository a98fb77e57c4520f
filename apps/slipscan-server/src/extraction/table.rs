//! Attribute table assembly

use serde::Serialize;
use serde_json::Value;

use super::fields::parse_numbered_fields;
use super::records::{ExtractionRecords, ExtractionValue};

/// Name of the identifier column
pub const ID_COLUMN: &str = "Image";

/// One row per document; `columns[0]` is always [`ID_COLUMN`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributeTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl AttributeTable {
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Data columns, excluding the identifier
    pub fn field_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().skip(1).map(String::as_str)
    }

    /// `(document id, cell)` pairs of one column, in row order
    pub fn column(&self, name: &str) -> Vec<(&str, Option<&str>)> {
        let Some(index) = self.column_index(name) else {
            return Vec::new();
        };

        self.rows
            .iter()
            .map(|row| {
                let id = row.first().and_then(|c| c.as_deref()).unwrap_or("");
                (id, row.get(index).and_then(|c| c.as_deref()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Table plus the documents that produced no fields at all
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableBuild {
    pub table: AttributeTable,
    pub unparsed: Vec<String>,
}

/// Flatten extraction records into an attribute table.
///
/// Columns are `Image` followed by every discovered field in first-seen
/// order. Cells a document did not provide stay `None`.
pub fn build_table(records: &ExtractionRecords) -> TableBuild {
    let mut columns = vec![ID_COLUMN.to_string()];
    let mut sparse: Vec<(String, Vec<(usize, Option<String>)>)> = Vec::with_capacity(records.len());
    let mut unparsed = Vec::new();

    for (id, value) in records.iter() {
        let fields = record_fields(value);
        if fields.is_empty() {
            unparsed.push(id.to_string());
        }

        let cells = fields
            .into_iter()
            .map(|(label, cell)| {
                let index = match columns.iter().position(|c| *c == label) {
                    Some(index) => index,
                    None => {
                        columns.push(label);
                        columns.len() - 1
                    }
                };
                (index, cell)
            })
            .collect();
        sparse.push((id.to_string(), cells));
    }

    let rows = sparse
        .into_iter()
        .map(|(id, cells)| {
            let mut row = vec![None; columns.len()];
            row[0] = Some(id);
            for (index, cell) in cells {
                row[index] = cell;
            }
            row
        })
        .collect();

    TableBuild {
        table: AttributeTable { columns, rows },
        unparsed,
    }
}

fn record_fields(value: &ExtractionValue) -> Vec<(String, Option<String>)> {
    match value {
        ExtractionValue::Structured(map) => map
            .iter()
            .filter(|(key, _)| key.as_str() != ID_COLUMN)
            .map(|(key, v)| (key.clone(), cell_text(v)))
            .collect(),
        ExtractionValue::Raw(text) => parse_numbered_fields(text)
            .into_iter()
            .filter(|(label, _)| label != ID_COLUMN)
            .map(|(label, v)| (label, Some(v)))
            .collect(),
        ExtractionValue::Failed { .. } => Vec::new(),
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn structured(value: Value) -> ExtractionValue {
        match value {
            Value::Object(map) => ExtractionValue::Structured(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_mixed_records() {
        let mut records = ExtractionRecords::new();
        records.insert("a.jpg", ExtractionValue::Raw("1. Gross Salary: 5000\n2. Net Salary: 4200".into()));
        records.insert("b.jpg", structured(json!({"Net Salary": 3900, "Bonus": null, "Paid": true})));
        records.insert("c.jpg", ExtractionValue::failed("rate limited"));
        records.insert("d.jpg", ExtractionValue::Raw("no list here".into()));

        let build = build_table(&records);
        let table = &build.table;

        assert_eq!(table.len(), 4);
        assert_eq!(table.columns[0], "Image");
        assert_eq!(&table.columns[1..3], &["Gross Salary".to_string(), "Net Salary".to_string()]);
        assert_eq!(
            table.column("Net Salary"),
            vec![
                ("a.jpg", Some("4200")),
                ("b.jpg", Some("3900")),
                ("c.jpg", None),
                ("d.jpg", None),
            ]
        );
        assert_eq!(table.column("Paid")[1], ("b.jpg", Some("true")));
        assert_eq!(table.column("Bonus")[1], ("b.jpg", None));
        assert_eq!(build.unparsed, vec!["c.jpg".to_string(), "d.jpg".to_string()]);
    }

    #[test]
    fn test_rows_are_padded_to_width() {
        let mut records = ExtractionRecords::new();
        records.insert("first.png", ExtractionValue::Raw("1. Amount: 10".into()));
        records.insert("second.png", ExtractionValue::Raw("1. Date: 2024\n2. Bank: X".into()));

        let table = build_table(&records).table;
        assert_eq!(table.columns, vec!["Image", "Amount", "Date", "Bank"]);
        assert!(table.rows.iter().all(|row| row.len() == 4));
        assert_eq!(table.rows[0][2], None);
    }

    #[test]
    fn test_empty_records() {
        let build = build_table(&ExtractionRecords::new());
        assert!(build.table.is_empty());
        assert_eq!(build.table.columns, vec!["Image"]);
        assert!(build.unparsed.is_empty());
    }

    #[test]
    fn test_unknown_column_is_empty() {
        let table = build_table(&ExtractionRecords::new()).table;
        assert!(table.column("Nope").is_empty());
    }
}
