use super::super::domain::{ComplianceStatus, FollowUp, InspectionRecord};
use super::super::extractor::{extract_violations, Severity, ViolationEntry};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

pub const MISSING_ADDRESS: &str = "Address not provided";
pub const UNKNOWN: &str = "Unknown";
pub const STATUS_NOT_SPECIFIED: &str = "Not specified";

/// Violations for one inspection, with display fallbacks already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyViolationGroup {
    pub address: String,
    pub review_team: String,
    pub review_date: Option<NaiveDate>,
    pub submitted_by: String,
    pub status: Option<ComplianceStatus>,
    pub status_label: String,
    pub violations: Vec<ViolationEntry>,
    pub photos: Vec<String>,
    pub photo_count: usize,
    pub comments: Option<String>,
    pub follow_up: FollowUp,
}

impl PropertyViolationGroup {
    fn from_record(record: &InspectionRecord, violations: Vec<ViolationEntry>) -> Self {
        let review_date = record
            .review_date
            .or_else(|| record.submitted_at.map(|submitted| submitted.date_naive()));
        let status = record.follow_up.compliance_status.clone();
        let status_label = status
            .as_ref()
            .map(|status| status.label().to_string())
            .unwrap_or_else(|| STATUS_NOT_SPECIFIED.to_string());

        Self {
            address: record
                .property_address
                .clone()
                .unwrap_or_else(|| MISSING_ADDRESS.to_string()),
            review_team: record
                .review_team
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            review_date,
            submitted_by: record
                .submitted_by
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            status,
            status_label,
            violations,
            photos: record.photos.clone(),
            photo_count: record.photos.len(),
            comments: record.comments.clone(),
            follow_up: record.follow_up.clone(),
        }
    }

    pub fn major_violations(&self) -> impl Iterator<Item = &ViolationEntry> {
        self.violations
            .iter()
            .filter(|entry| entry.severity == Severity::Major)
    }

    pub fn minor_violations(&self) -> impl Iterator<Item = &ViolationEntry> {
        self.violations
            .iter()
            .filter(|entry| entry.severity == Severity::Minor)
    }

    pub fn has_major(&self) -> bool {
        self.major_violations().next().is_some()
    }

    pub fn notice_sent(&self) -> bool {
        self.follow_up.violation_notice_sent
    }

    pub fn review_date_label(&self) -> String {
        match self.review_date {
            Some(date) => date.format("%B %d, %Y").to_string(),
            None => "Not recorded".to_string(),
        }
    }
}

/// Cooperative cancellation checked between properties.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("report generation cancelled")]
pub struct Cancelled;

/// Groups records with at least one violation, sorted by address.
pub fn aggregate(records: &[InspectionRecord]) -> Vec<PropertyViolationGroup> {
    let mut groups: Vec<PropertyViolationGroup> =
        records.iter().filter_map(group_for_record).collect();
    sort_by_address(&mut groups);
    groups
}

pub fn aggregate_cancellable(
    records: &[InspectionRecord],
    cancellation: &CancellationFlag,
) -> Result<Vec<PropertyViolationGroup>, Cancelled> {
    let mut groups = Vec::new();
    for record in records {
        if cancellation.is_cancelled() {
            return Err(Cancelled);
        }
        groups.extend(group_for_record(record));
    }
    sort_by_address(&mut groups);
    Ok(groups)
}

fn group_for_record(record: &InspectionRecord) -> Option<PropertyViolationGroup> {
    let violations = extract_violations(record);
    if violations.is_empty() {
        debug!(
            address = record.property_address.as_deref().unwrap_or(MISSING_ADDRESS),
            "excluding fully compliant inspection"
        );
        return None;
    }
    Some(PropertyViolationGroup::from_record(record, violations))
}

fn sort_by_address(groups: &mut [PropertyViolationGroup]) {
    // Stable: identical addresses keep their input order.
    groups.sort_by_cached_key(|group| group.address.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::inspection::domain::{Checklist, ChecklistField, ChecklistValue};
    use chrono::{TimeZone, Utc};

    fn record(address: Option<&str>, checklist: Checklist) -> InspectionRecord {
        InspectionRecord {
            property_address: address.map(str::to_string),
            checklist,
            ..InspectionRecord::default()
        }
    }

    fn one_minor() -> Checklist {
        Checklist::new().with(ChecklistField::Lawn, ChecklistValue::Minor)
    }

    #[test]
    fn missing_fields_fall_back_once_at_construction() {
        let mut source = record(None, one_minor());
        source.submitted_at = Some(Utc.with_ymd_and_hms(2026, 3, 4, 22, 15, 0).unwrap());

        let groups = aggregate(&[source]);
        let group = &groups[0];
        assert_eq!(group.address, MISSING_ADDRESS);
        assert_eq!(group.review_team, UNKNOWN);
        assert_eq!(group.submitted_by, UNKNOWN);
        assert_eq!(group.status_label, STATUS_NOT_SPECIFIED);
        assert_eq!(group.review_date, NaiveDate::from_ymd_opt(2026, 3, 4));
        assert_eq!(group.photo_count, 0);
    }

    #[test]
    fn review_date_wins_over_submission_timestamp() {
        let mut source = record(Some("1 Main St"), one_minor());
        source.review_date = NaiveDate::from_ymd_opt(2026, 2, 1);
        source.submitted_at = Some(Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap());

        let groups = aggregate(&[source]);
        assert_eq!(groups[0].review_date, NaiveDate::from_ymd_opt(2026, 2, 1));
        assert_eq!(groups[0].review_date_label(), "February 01, 2026");
    }

    #[test]
    fn sorts_case_insensitively_and_keeps_ties_stable() {
        let mut first_dup = record(Some("9 birch rd"), one_minor());
        first_dup.comments = Some("first".to_string());
        let mut second_dup = record(
            Some("9 Birch Rd"),
            one_minor().with(ChecklistField::Roof, ChecklistValue::Major),
        );
        second_dup.comments = Some("second".to_string());

        let records = vec![
            record(Some("Zephyr Ct"), one_minor()),
            first_dup,
            record(Some("apple Way"), one_minor()),
            second_dup,
        ];

        let groups = aggregate(&records);
        let addresses: Vec<&str> = groups.iter().map(|group| group.address.as_str()).collect();
        assert_eq!(
            addresses,
            vec!["9 birch rd", "9 Birch Rd", "apple Way", "Zephyr Ct"]
        );
        assert_eq!(groups[0].comments.as_deref(), Some("first"));
        assert_eq!(groups[1].comments.as_deref(), Some("second"));
        assert_eq!(groups[1].violations.len(), 2);
    }

    #[test]
    fn cancelled_flag_stops_aggregation() {
        let flag = CancellationFlag::new();
        let records = vec![record(Some("1 Main St"), one_minor())];
        assert_eq!(
            aggregate_cancellable(&records, &flag).map(|groups| groups.len()),
            Ok(1)
        );

        flag.cancel();
        assert_eq!(aggregate_cancellable(&records, &flag), Err(Cancelled));
    }
}
