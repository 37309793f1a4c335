//! Batch-upload parsing.
//!
//! An uploaded lead batch is a CSV file with a header row; the raw lead
//! text is taken from the first column of every data row, regardless of
//! what the column is called. Extraction lives here so the resolver core
//! never sees a wire format.

use std::io;

use crate::error::DataError;

/// Reads the first-column text of every data row in an uploaded CSV.
///
/// The header row is skipped. A row with no columns yields an empty string
/// (which the resolver then reports as a captured failure rather than
/// aborting the batch).
///
/// # Errors
/// `MalformedRow` if the CSV itself cannot be decoded.
pub fn read_lead_texts<R: io::Read>(reader: R) -> Result<Vec<String>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut texts = Vec::new();
    for (i, row) in csv_reader.records().enumerate() {
        let row = row.map_err(|e| DataError::MalformedRow {
            row: i + 1,
            message: e.to_string(),
        })?;
        texts.push(row.get(0).unwrap_or_default().to_string());
    }
    Ok(texts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_column_extracted() {
        let data = "raw_text,true_id\nalice smith at acme,1\nbob jones,2\n";
        let texts = read_lead_texts(data.as_bytes()).unwrap();
        assert_eq!(texts, vec!["alice smith at acme", "bob jones"]);
    }

    #[test]
    fn test_column_name_is_irrelevant() {
        let data = "anything_at_all,extra\nsome lead,x\n";
        let texts = read_lead_texts(data.as_bytes()).unwrap();
        assert_eq!(texts, vec!["some lead"]);
    }

    #[test]
    fn test_header_row_skipped() {
        let data = "raw_text\n";
        let texts = read_lead_texts(data.as_bytes()).unwrap();
        assert!(texts.is_empty());
    }

    #[test]
    fn test_malformed_csv_rejected() {
        let data = "raw_text\n\"unterminated\n";
        let err = read_lead_texts(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MalformedRow { .. }));
    }

    #[test]
    fn test_order_preserved() {
        let data = "t\nthird,\nsecond\nfirst\n";
        let texts = read_lead_texts(data.as_bytes()).unwrap();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }
}
