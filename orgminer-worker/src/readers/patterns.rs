//! Pattern file reader

use orgminer_core::catalog::PATTERNS;
use orgminer_core::domain::result::PatternResult;
use std::path::Path;
use tracing::debug;

/// Reads the tool's pattern flags from its delimited output file.
///
/// Only the first data row is consulted. One entry is emitted per known
/// pattern code present as a column; `detected` is true only for a
/// case-insensitive `"true"` value. Unknown columns are ignored. A missing,
/// unreadable, or empty file, or any parse error, yields an empty sequence,
/// never a partial one.
pub fn read_patterns(output_csv: &Path) -> Vec<PatternResult> {
    if !output_csv.exists() {
        return Vec::new();
    }

    match parse_patterns(output_csv) {
        Ok(patterns) => patterns,
        Err(e) => {
            debug!("Failed to read pattern file {}: {}", output_csv.display(), e);
            Vec::new()
        }
    }
}

fn parse_patterns(output_csv: &Path) -> Result<Vec<PatternResult>, csv::Error> {
    let mut reader = csv::Reader::from_path(output_csv)?;
    let headers = reader.headers()?.clone();

    let Some(first) = reader.records().next() else {
        return Ok(Vec::new());
    };
    let record = first?;

    let mut results = Vec::new();
    for spec in &PATTERNS {
        let Some(index) = headers.iter().position(|h| h == spec.code) else {
            continue;
        };
        let value = record.get(index).unwrap_or("");

        results.push(PatternResult {
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            detected: value.eq_ignore_ascii_case("true"),
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("output.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_reads_detected_flags() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "IC,CoP\ntrue,false\n");

        let patterns = read_patterns(&path);

        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].name, "Informal Community (IC)");
        assert!(patterns[0].detected);
        assert_eq!(patterns[1].name, "Community of Practice (CoP)");
        assert!(!patterns[1].detected);
        assert!(!patterns[1].description.is_empty());
    }

    #[test]
    fn test_true_check_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "SN,PT\nTRUE,maybe\n");

        let patterns = read_patterns(&path);

        assert!(patterns[0].detected);
        assert!(!patterns[1].detected);
    }

    #[test]
    fn test_unknown_columns_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "IC,UNKNOWN\ntrue,true\n");

        let patterns = read_patterns(&path);

        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].name, "Informal Community (IC)");
    }

    #[test]
    fn test_missing_file_yields_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");

        assert!(read_patterns(&path).is_empty());
    }

    #[test]
    fn test_header_only_file_yields_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "IC,CoP\n");

        assert!(read_patterns(&path).is_empty());
    }

    #[test]
    fn test_empty_file_yields_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "");

        assert!(read_patterns(&path).is_empty());
    }

    #[test]
    fn test_malformed_file_yields_empty() {
        let dir = TempDir::new().unwrap();
        // Row with fewer fields than the header is a csv error, which must
        // surface as an empty sequence, not a panic or partial result.
        let path = write_csv(&dir, "IC,CoP,FN\ntrue\n");

        assert!(read_patterns(&path).is_empty());
    }
}
