//! Extraction results to tables and numbers
//!
//! - [`records`]: per-document LLM output, structured or raw
//! - [`fields`]: numbered-list parser for raw replies
//! - [`table`]: attribute table assembly
//! - [`numeric`]: first-integer projection for charting

pub mod fields;
pub mod numeric;
pub mod records;
pub mod table;

pub use fields::parse_numbered_fields;
pub use numeric::{first_integer, project_column, project_table, NumericSeries};
pub use records::{ExtractionRecords, ExtractionValue};
pub use table::{build_table, AttributeTable, TableBuild, ID_COLUMN};
