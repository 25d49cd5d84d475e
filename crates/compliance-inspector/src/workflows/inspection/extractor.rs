use super::domain::{ChecklistField, ChecklistValue, InspectionRecord};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Major,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minor => "Minor",
            Self::Major => "Major",
        }
    }
}

/// How a violation was classified from its checklist token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "token", rename_all = "snake_case")]
pub enum ViolationSource {
    Recognized,
    /// Token outside `accept`/`minor`/`major`/`na`; reported as Minor.
    UnrecognizedToken(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationEntry {
    pub field: ChecklistField,
    pub label: &'static str,
    pub severity: Severity,
    pub source: ViolationSource,
}

impl ViolationEntry {
    fn new(field: ChecklistField, severity: Severity, source: ViolationSource) -> Self {
        Self {
            field,
            label: field.label(),
            severity,
            source,
        }
    }
}

/// Classifies each checklist field of `record` in display order.
pub fn extract_violations(record: &InspectionRecord) -> Vec<ViolationEntry> {
    ChecklistField::ordered()
        .into_iter()
        .filter_map(|field| classify(field, record.checklist.get(field)?))
        .collect()
}

fn classify(field: ChecklistField, value: &ChecklistValue) -> Option<ViolationEntry> {
    match value {
        ChecklistValue::Accept | ChecklistValue::NotApplicable => None,
        ChecklistValue::Major => Some(ViolationEntry::new(
            field,
            Severity::Major,
            ViolationSource::Recognized,
        )),
        ChecklistValue::Minor => Some(ViolationEntry::new(
            field,
            Severity::Minor,
            ViolationSource::Recognized,
        )),
        // Fail open: an unexpected token may still describe a compliance issue.
        ChecklistValue::Unrecognized(token) => Some(ViolationEntry::new(
            field,
            Severity::Minor,
            ViolationSource::UnrecognizedToken(token.clone()),
        )),
    }
}
