//! Result aggregation
//!
//! Combines the three readers' outputs into one result document. The
//! completeness rule lives on [`AnalysisResults`]; an incomplete aggregate
//! fails the job without telling the caller which reader fell short.

use orgminer_core::domain::result::AnalysisResults;
use std::path::Path;

use crate::readers::{graphs, metrics, patterns};

/// Runs the three readers and combines their outputs.
///
/// The readers touch disjoint files and run sequentially; only their
/// combination matters to the caller.
pub fn aggregate(
    output_csv: &Path,
    metrics_path: &Path,
    graph_dir: &Path,
    author: &str,
    repository: &str,
) -> AnalysisResults {
    AnalysisResults {
        patterns: patterns::read_patterns(output_csv),
        metrics: metrics::read_metrics(metrics_path),
        graph: graphs::read_merged_graph(graph_dir, author, repository),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_aggregate_combines_all_three_readers() {
        let root = TempDir::new().unwrap();

        let output_csv = root.path().join("output.csv");
        fs::write(&output_csv, "IC,PT\ntrue,false\n").unwrap();

        let metrics_path = root.path().join("metrics.json");
        fs::write(&metrics_path, "{\"longevity\": 42.0}").unwrap();

        let graph_dir = root.path().join("graphs");
        fs::create_dir_all(&graph_dir).unwrap();
        fs::write(
            graph_dir.join("alice-demo_graph0.gexf"),
            "<?xml version=\"1.0\"?><gexf xmlns=\"http://www.gexf.net/1.2draft\">\
             <graph><nodes><node id=\"n1\"/></nodes>\
             <edges><edge id=\"0\" source=\"n1\" target=\"n1\"/></edges></graph></gexf>",
        )
        .unwrap();

        let results = aggregate(&output_csv, &metrics_path, &graph_dir, "alice", "demo");

        assert_eq!(results.patterns.len(), 2);
        assert!(!results.metrics.has_error());
        assert!(!results.graph.has_error());
        assert!(results.is_complete());
    }

    #[test]
    fn test_aggregate_with_nothing_on_disk_is_incomplete() {
        let root = TempDir::new().unwrap();

        let results = aggregate(
            &root.path().join("output.csv"),
            &root.path().join("metrics.json"),
            &root.path().join("graphs"),
            "alice",
            "demo",
        );

        assert!(results.patterns.is_empty());
        assert!(results.metrics.has_error());
        assert!(results.graph.has_error());
        assert!(!results.is_complete());
    }
}
