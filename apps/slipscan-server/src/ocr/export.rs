//! CSV export of OCR tokens

use super::types::OcrToken;

/// File name of the per-request token export
pub const CSV_FILE_NAME: &str = "ocr_results.csv";

const HEADER: [&str; 3] = ["Recognized Text", "Confidence Score", "OCR Model"];

/// Render tokens as CSV with a header row.
///
/// Fields containing commas, quotes or line breaks are quoted; embedded
/// quotes are doubled.
pub fn tokens_to_csv(tokens: &[OcrToken]) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER.iter().map(|h| h.to_string()));

    for token in tokens {
        push_row(
            &mut out,
            [
                token.text.clone(),
                token.confidence.to_string(),
                token.engine.label().to_string(),
            ]
            .into_iter(),
        );
    }

    out
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let row: Vec<String> = fields.map(|f| escape(&f)).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

fn escape(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::OcrEngineKind;

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(tokens_to_csv(&[]), "Recognized Text,Confidence Score,OCR Model\n");
    }

    #[test]
    fn test_rows_and_quoting() {
        let tokens = vec![
            OcrToken::new(OcrEngineKind::Tesseract, "4,200", 91.0),
            OcrToken::new(OcrEngineKind::EasyOcr, "say \"hi\"", 87.5),
            OcrToken::new(OcrEngineKind::Tesseract, "plain", 50.25),
        ];
        let csv = tokens_to_csv(&tokens);
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[1], "\"4,200\",91,Tesseract");
        assert_eq!(lines[2], "\"say \"\"hi\"\"\",87.5,EasyOCR");
        assert_eq!(lines[3], "plain,50.25,Tesseract");
    }
}
