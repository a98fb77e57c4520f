//! Invariants of the attribute table and numeric projection

use proptest::prelude::*;

use slipscan_server::extraction::{
    build_table, first_integer, project_table, ExtractionRecords, ExtractionValue, ID_COLUMN,
};

fn value_strategy() -> impl Strategy<Value = ExtractionValue> {
    prop_oneof![
        prop::collection::vec(("[A-Z][a-z]{1,8}( [A-Z][a-z]{1,8})?", "[ -~]{0,12}"), 0..5).prop_map(|fields| {
            let text = fields
                .iter()
                .enumerate()
                .map(|(i, (label, value))| format!("{}. {}: {}", i + 1, label, value))
                .collect::<Vec<_>>()
                .join("\n");
            ExtractionValue::Raw(text)
        }),
        "[ -~]{0,40}".prop_map(ExtractionValue::Raw),
        "[a-z ]{1,20}".prop_map(|e: String| ExtractionValue::failed(e)),
    ]
}

fn records_strategy() -> impl Strategy<Value = ExtractionRecords> {
    prop::collection::vec(("[a-z]{1,6}\\.(png|jpg)", value_strategy()), 0..12)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn row_count_matches_records(records in records_strategy()) {
        let build = build_table(&records);
        prop_assert_eq!(build.table.rows.len(), records.len());
        prop_assert_eq!(build.table.columns[0].as_str(), ID_COLUMN);

        for (row, (id, _)) in build.table.rows.iter().zip(records.iter()) {
            prop_assert_eq!(row.len(), build.table.columns.len());
            prop_assert_eq!(row[0].as_deref(), Some(id));
        }
    }

    #[test]
    fn unparsed_rows_carry_only_the_id(records in records_strategy()) {
        let build = build_table(&records);
        for (row, (id, _)) in build.table.rows.iter().zip(records.iter()) {
            if build.unparsed.iter().any(|u| u == id) {
                prop_assert!(row[1..].iter().all(Option::is_none));
            }
        }
    }

    #[test]
    fn projection_never_invents_points(records in records_strategy()) {
        let build = build_table(&records);
        let table = &build.table;

        for series in project_table(table) {
            prop_assert!(!series.points.is_empty());
            let cells = table.column(&series.column);

            // every point comes from a non-null cell with digits, in row order
            let expected: Vec<(String, u64)> = cells
                .iter()
                .filter_map(|(id, cell)| Some((id.to_string(), first_integer((*cell)?)?)))
                .collect();
            prop_assert_eq!(&series.points, &expected);
        }
    }

    #[test]
    fn first_integer_reads_leading_run(prefix in "[^0-9]{0,10}", n in any::<u32>(), suffix in "[^0-9]{0,10}") {
        let text = format!("{}{}{}", prefix, n, suffix);
        prop_assert_eq!(first_integer(&text), Some(n as u64));
    }
}
