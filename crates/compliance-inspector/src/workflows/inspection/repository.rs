use serde::Serialize;

use super::domain::InspectionRecord;

/// Record store abstraction so report generation can run against any backend.
pub trait InspectionRepository: Send + Sync {
    fn insert(&self, record: InspectionRecord) -> Result<(), RepositoryError>;
    /// All records, newest submission first.
    fn all(&self) -> Result<Vec<InspectionRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Orders records the way the record store returns them. Records without a
/// submission timestamp sort last, otherwise input order is kept.
pub fn sort_newest_first(records: &mut [InspectionRecord]) {
    records.sort_by(|left, right| right.submitted_at.cmp(&left.submitted_at));
}

/// Outbound message handed to the email-dispatch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEmail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Email dispatch hook (SMTP relay, transactional mail API, ...).
pub trait ReportMailer: Send + Sync {
    fn send(&self, email: ReportEmail) -> Result<(), MailerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("mail rejected: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn submitted(address: &str, hour: Option<u32>) -> InspectionRecord {
        InspectionRecord {
            property_address: Some(address.to_string()),
            submitted_at: hour.map(|hour| Utc.with_ymd_and_hms(2026, 10, 1, hour, 0, 0).unwrap()),
            ..InspectionRecord::default()
        }
    }

    #[test]
    fn newest_submission_comes_first_and_missing_timestamps_last() {
        let mut records = vec![
            submitted("early", Some(8)),
            submitted("unknown", None),
            submitted("late", Some(17)),
        ];
        sort_newest_first(&mut records);
        let order: Vec<&str> = records
            .iter()
            .filter_map(|record| record.property_address.as_deref())
            .collect();
        assert_eq!(order, vec!["late", "early", "unknown"]);
    }
}
