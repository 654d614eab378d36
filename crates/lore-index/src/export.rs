//! CSV and JSON export of query results.
//!
//! Both formats carry the same fields in the same order ([`EXPORT_FIELDS`]).
//! CSV is UTF-8 with a byte-order mark; evidence and the status history
//! are embedded as JSON arrays. JSON echoes the filter under `filters_applied`.

use serde::Serialize;

use lore_core::errors::IndexError;
use lore_core::models::Evidence;

use crate::filter::EventFilter;
use crate::record::{ConflictRecord, StatusChange};

pub const EXPORT_FIELDS: [&str; 12] = [
    "id",
    "type",
    "tier",
    "status",
    "entity",
    "entity_name",
    "attribute",
    "chapter",
    "confidence",
    "description",
    "evidence",
    "history",
];

const BOM: &str = "\u{feff}";

/// One exported conflict. Field order must follow [`EXPORT_FIELDS`].
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    conflict_type: &'static str,
    tier: u8,
    status: &'static str,
    entity: u64,
    entity_name: &'a str,
    attribute: &'a str,
    chapter: String,
    confidence: f64,
    description: &'a str,
    evidence: &'a [Evidence],
    history: &'a [StatusChange],
}

impl<'a> ExportRow<'a> {
    fn from_record(record: &'a ConflictRecord) -> Self {
        let conflict = &record.conflict;
        Self {
            id: conflict.id.as_str(),
            conflict_type: conflict.conflict_type.as_str(),
            tier: conflict.tier.number(),
            status: record.status.as_str(),
            entity: conflict.entity.value(),
            entity_name: &conflict.entity_name,
            attribute: &conflict.attribute,
            chapter: conflict.chapter.to_string(),
            confidence: conflict.confidence.value(),
            description: &conflict.description,
            evidence: &conflict.evidence,
            history: &record.history,
        }
    }

    fn cells(&self) -> Result<Vec<String>, IndexError> {
        Ok(vec![
            self.id.to_string(),
            self.conflict_type.to_string(),
            self.tier.to_string(),
            self.status.to_string(),
            self.entity.to_string(),
            self.entity_name.to_string(),
            self.attribute.to_string(),
            self.chapter.clone(),
            self.confidence.to_string(),
            self.description.to_string(),
            serde_json::to_string(self.evidence).map_err(export_error)?,
            serde_json::to_string(self.history).map_err(export_error)?,
        ])
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    filters_applied: &'a EventFilter,
    count: usize,
    conflicts: Vec<ExportRow<'a>>,
}

pub(crate) fn to_csv(records: &[&ConflictRecord]) -> Result<String, IndexError> {
    let mut writer = csv::Writer::from_writer(BOM.as_bytes().to_vec());
    writer.write_record(EXPORT_FIELDS).map_err(export_error)?;
    for record in records {
        writer
            .write_record(ExportRow::from_record(record).cells()?)
            .map_err(export_error)?;
    }
    let bytes = writer.into_inner().map_err(|e| export_error(e.error()))?;
    String::from_utf8(bytes).map_err(export_error)
}

pub(crate) fn to_json(
    records: &[&ConflictRecord],
    filter: &EventFilter,
) -> Result<String, IndexError> {
    let document = ExportDocument {
        filters_applied: filter,
        count: records.len(),
        conflicts: records.iter().map(|r| ExportRow::from_record(r)).collect(),
    };
    serde_json::to_string_pretty(&document).map_err(export_error)
}

fn export_error(e: impl std::fmt::Display) -> IndexError {
    IndexError::Export {
        message: e.to_string(),
    }
}
