use crate::errors::{Result, SuiteError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One externally supplied test scenario: what to search for, the per-item
/// budget, and how many items to put in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    pub item_name: String,
    pub max_price: f64,
    pub limit: usize,
}

/// Load the scenario records driving a suite run from a JSON array.
pub fn load_test_data(path: &Path) -> Result<Vec<TestRecord>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| SuiteError::TestData(format!("cannot read {}: {}", path.display(), e)))?;
    let records: Vec<TestRecord> = serde_json::from_str(&raw)
        .map_err(|e| SuiteError::TestData(format!("invalid {}: {}", path.display(), e)))?;
    if records.is_empty() {
        return Err(SuiteError::TestData(format!(
            "{} contains no records",
            path.display()
        )));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_records_from_a_json_array() {
        let mut file = tempfile_json(
            r#"[{"item_name": "usb c cable", "max_price": 15.0, "limit": 3}]"#,
        );
        let records = load_test_data(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_name, "usb c cable");
        assert_eq!(records[0].limit, 3);
        file.close().unwrap();
    }

    #[test]
    fn empty_arrays_are_rejected() {
        let file = tempfile_json("[]");
        assert!(matches!(
            load_test_data(file.path()),
            Err(SuiteError::TestData(_))
        ));
    }

    fn tempfile_json(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }
}
