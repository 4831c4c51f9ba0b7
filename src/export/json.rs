//! JSON report export
//!
//! Wraps the report rows in a producer/provenance envelope so downstream
//! consumers can tell which engine version produced the numbers and when.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::types::MetricValue;
use crate::{CRATE_VERSION, PRODUCER_NAME};

use super::{round1, ReportRow};

/// Producer metadata embedded in every report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    /// Unique id of this report instance
    pub instance_id: String,
}

/// One metric entry, order-preserving
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricEntry {
    pub name: String,
    pub value: MetricValue,
}

/// One dated row of the JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReportRow {
    pub date: String,
    pub metrics: Vec<MetricEntry>,
}

/// Complete JSON report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPayload {
    pub producer: ReportProducer,
    pub generated_at_utc: String,
    pub rows: Vec<JsonReportRow>,
}

/// Build the report payload for the given rows
pub fn report_payload(rows: &[ReportRow]) -> ReportPayload {
    let producer = ReportProducer {
        name: PRODUCER_NAME.to_string(),
        version: CRATE_VERSION.to_string(),
        instance_id: Uuid::new_v4().to_string(),
    };

    let rows = rows
        .iter()
        .map(|row| JsonReportRow {
            date: row.date_string(),
            metrics: row
                .values
                .iter()
                .map(|(name, value)| MetricEntry {
                    name: (*name).to_string(),
                    value: match value {
                        MetricValue::Number(v) => MetricValue::Number(round1(*v)),
                        other => other.clone(),
                    },
                })
                .collect(),
        })
        .collect();

    ReportPayload {
        producer,
        generated_at_utc: Utc::now().to_rfc3339(),
        rows,
    }
}

/// Serialize the report payload as pretty-printed JSON
pub fn write_json(rows: &[ReportRow]) -> Result<String, AnalysisError> {
    let payload = report_payload(rows);
    serde_json::to_string_pretty(&payload).map_err(AnalysisError::JsonError)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::sample_rows;
    use super::*;

    #[test]
    fn test_payload_envelope() {
        let payload = report_payload(&sample_rows());

        assert_eq!(payload.producer.name, PRODUCER_NAME);
        assert_eq!(payload.producer.version, CRATE_VERSION);
        assert!(!payload.producer.instance_id.is_empty());
        assert_eq!(payload.rows.len(), 2);
        assert_eq!(payload.rows[0].date, "2024-03-10");
        assert_eq!(payload.rows[0].metrics.len(), 25);
    }

    #[test]
    fn test_json_serialization() {
        let json = write_json(&sample_rows()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["producer"]["name"], "riodoraku");
        let metrics = value["rows"][0]["metrics"].as_array().unwrap();
        assert_eq!(metrics[0]["name"], "Yin_L");
        assert_eq!(metrics[0]["value"], 156.7);
        // Yin_R has no readings on day one
        assert_eq!(metrics[1]["value"], serde_json::Value::Null);
    }

    #[test]
    fn test_distinct_instance_ids() {
        let a = report_payload(&[]);
        let b = report_payload(&[]);
        assert_ne!(a.producer.instance_id, b.producer.instance_id);
    }
}
