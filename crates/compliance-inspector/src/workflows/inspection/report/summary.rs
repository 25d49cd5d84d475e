use super::aggregate::PropertyViolationGroup;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const REPORT_TITLE: &str = "Property Violations Report";
pub const NO_VIOLATIONS_MESSAGE: &str =
    "No violations found. All inspected properties are compliant.";

/// Inputs shared by every renderer that are not derived from the groups.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub organization: String,
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    pub fn new(organization: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            organization: organization.into(),
            generated_at,
        }
    }

    pub fn generated_date_label(&self) -> String {
        self.generated_at.format("%B %d, %Y").to_string()
    }

    pub fn generated_timestamp_label(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

/// Cross-property totals appended to every rendered format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total_properties: usize,
    pub total_violations: usize,
    pub properties_with_major: usize,
    pub properties_with_photos: usize,
    pub notices_sent: usize,
}

impl ReportSummary {
    pub fn from_groups(groups: &[PropertyViolationGroup]) -> Self {
        groups
            .iter()
            .fold(Self::default(), |mut summary, group| {
                summary.total_properties += 1;
                summary.total_violations += group.violations.len();
                if group.has_major() {
                    summary.properties_with_major += 1;
                }
                if group.photo_count > 0 {
                    summary.properties_with_photos += 1;
                }
                if group.notice_sent() {
                    summary.notices_sent += 1;
                }
                summary
            })
    }

    /// Label/value pairs in the order every renderer prints them.
    pub fn lines(&self) -> [(&'static str, usize); 5] {
        [
            ("Total properties with violations", self.total_properties),
            ("Total violations", self.total_violations),
            ("Properties with major issues", self.properties_with_major),
            ("Properties with photos", self.properties_with_photos),
            ("Violation notices sent", self.notices_sent),
        ]
    }
}

pub(crate) fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
