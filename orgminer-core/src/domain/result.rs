//! Aggregated analysis result documents
//!
//! These types mirror the JSON documents the service returns and persists:
//! a pattern list, five metric sections, and a merged collaboration graph.
//! The metrics and graph parts are either fully populated or carry an
//! explicit `error` marker; partial silent success is not representable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One organizational pattern with its detection flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternResult {
    pub name: String,
    pub description: String,
    pub detected: bool,
}

/// One metric value wrapped with its static description.
///
/// `value` is `null` when the tool's metrics document omitted the metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub value: Value,
    pub description: String,
}

/// Metric key -> entry mapping for one section.
pub type MetricSection = BTreeMap<String, MetricEntry>;

/// Metrics read outcome: either an error marker or the five fixed sections.
///
/// Untagged so the serialized shape is `{"error": ...}` or the plain
/// section object, matching the on-disk and API document format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricsResult {
    Error { error: String },
    Report(MetricsReport),
}

impl MetricsResult {
    pub fn error(message: impl Into<String>) -> Self {
        MetricsResult::Error {
            error: message.into(),
        }
    }

    pub fn has_error(&self) -> bool {
        matches!(self, MetricsResult::Error { .. })
    }

    pub fn is_empty(&self) -> bool {
        match self {
            MetricsResult::Error { .. } => false,
            MetricsResult::Report(report) => report.is_empty(),
        }
    }
}

/// The five fixed metric sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub dispersion: MetricSection,
    pub engagement: MetricSection,
    pub formality: MetricSection,
    pub longevity: MetricSection,
    pub structure: MetricSection,
}

impl MetricsReport {
    pub fn is_empty(&self) -> bool {
        self.dispersion.is_empty()
            && self.engagement.is_empty()
            && self.formality.is_empty()
            && self.longevity.is_empty()
            && self.structure.is_empty()
    }
}

/// Graph read outcome: either an error marker or the merged graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphResult {
    Error { error: String },
    Graph(MergedGraph),
}

impl GraphResult {
    pub fn error(message: impl Into<String>) -> Self {
        GraphResult::Error {
            error: message.into(),
        }
    }

    pub fn has_error(&self) -> bool {
        matches!(self, GraphResult::Error { .. })
    }

    pub fn is_empty(&self) -> bool {
        match self {
            GraphResult::Error { .. } => false,
            GraphResult::Graph(graph) => graph.nodes.is_empty() && graph.edges.is_empty(),
        }
    }
}

/// Collaboration graph merged across all fragment files of one repository.
///
/// Node identifiers are deduplicated; edges keep their fragment order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<GraphEdge>,
}

/// One weighted edge of the collaboration graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// The unified result document combining all three readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub patterns: Vec<PatternResult>,
    pub metrics: MetricsResult,
    pub graph: GraphResult,
}

impl AnalysisResults {
    /// Completeness validation applied before a job may succeed.
    ///
    /// The aggregate is incomplete if the pattern list is empty, the metrics
    /// result carries an error or is empty, or the graph result carries an
    /// error or is empty. An incomplete aggregate fails the job with a
    /// generic message; callers never learn which reader fell short.
    pub fn is_complete(&self) -> bool {
        !self.patterns.is_empty()
            && !self.metrics.has_error()
            && !self.metrics.is_empty()
            && !self.graph.has_error()
            && !self.graph.is_empty()
    }
}
