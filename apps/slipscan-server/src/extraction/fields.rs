//! Numbered-list field parser
//!
//! LLM replies look like `1. Gross Salary: 5000`. The parser only
//! understands that shape; anything else yields no fields.

use std::sync::LazyLock;

use regex::Regex;

static NUMBERED_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s*([A-Za-z\s]+):\s*([^\n]+)").expect("valid field pattern"));

/// Parse `<index>. <label>: <value>` lines into `(label, value)` pairs.
///
/// Labels and values are trimmed and the index is dropped. A label seen
/// again replaces the earlier value but keeps its original position.
pub fn parse_numbered_fields(text: &str) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::new();

    for caps in NUMBERED_FIELD.captures_iter(text) {
        let label = caps[1].trim();
        let value = caps[2].trim();
        if label.is_empty() {
            continue;
        }

        match fields.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, slot)) => *slot = value.to_string(),
            None => fields.push((label.to_string(), value.to_string())),
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_salary_fields() {
        let fields = parse_numbered_fields("1. Gross Salary: 5000\n2. Net Salary: 4200");
        assert_eq!(fields, pairs(&[("Gross Salary", "5000"), ("Net Salary", "4200")]));
    }

    #[test]
    fn test_surrounding_prose_is_ignored() {
        let text = "Here are the details:\n\n1.  Amount :  Rs. 300 \n2. Transaction Date: 01/02/2024\nThanks!";
        let fields = parse_numbered_fields(text);
        assert_eq!(
            fields,
            pairs(&[("Amount", "Rs. 300"), ("Transaction Date", "01/02/2024")])
        );
    }

    #[test]
    fn test_duplicate_label_overwrites() {
        let fields = parse_numbered_fields("1. Balance: 10\n2. Date: today\n3. Balance: 20");
        assert_eq!(fields, pairs(&[("Balance", "20"), ("Date", "today")]));
    }

    #[test]
    fn test_unstructured_text_yields_nothing() {
        assert!(parse_numbered_fields("The slip shows a net salary of 4200.").is_empty());
        assert!(parse_numbered_fields("").is_empty());
    }
}
