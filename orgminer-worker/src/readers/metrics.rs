//! Metrics document reader

use orgminer_core::catalog;
use orgminer_core::domain::result::{MetricEntry, MetricSection, MetricsReport, MetricsResult};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Reads the tool's metrics document and wraps every value with its static
/// description.
///
/// A missing file and a parse failure both surface as explicit error
/// markers, not as empty sections. The longevity section is special: the
/// raw document stores a single scalar, wrapped here as a one-entry section
/// keyed `"longevity"` whose value is `null` when absent.
pub fn read_metrics(metrics_path: &Path) -> MetricsResult {
    if !metrics_path.exists() {
        return MetricsResult::error("metrics.json not found");
    }

    let text = match fs::read_to_string(metrics_path) {
        Ok(text) => text,
        Err(e) => return MetricsResult::error(format!("failed to read metrics.json: {e}")),
    };

    let raw: Value = match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(e) => return MetricsResult::error(format!("failed to read metrics.json: {e}")),
    };

    if !raw.is_object() {
        return MetricsResult::error("failed to read metrics.json: document is not an object");
    }

    MetricsResult::Report(MetricsReport {
        dispersion: wrap_section("dispersion", raw.get("dispersion")),
        engagement: wrap_section("engagement", raw.get("engagement")),
        formality: wrap_section("formality", raw.get("formality")),
        longevity: wrap_longevity(raw.get("longevity")),
        structure: wrap_section("structure", raw.get("structure")),
    })
}

fn wrap_section(section: &str, raw: Option<&Value>) -> MetricSection {
    let mut wrapped = MetricSection::new();

    if let Some(Value::Object(map)) = raw {
        for (key, value) in map {
            wrapped.insert(
                key.clone(),
                MetricEntry {
                    value: value.clone(),
                    description: catalog::metric_description(section, key).to_string(),
                },
            );
        }
    }

    wrapped
}

fn wrap_longevity(raw: Option<&Value>) -> MetricSection {
    let mut wrapped = MetricSection::new();
    wrapped.insert(
        "longevity".to_string(),
        MetricEntry {
            value: raw.cloned().unwrap_or(Value::Null),
            description: catalog::metric_description("longevity", "longevity").to_string(),
        },
    );
    wrapped
}
