use chrono::NaiveDate;
use compliance_inspector::workflows::inspection::{
    sort_newest_first, InspectionRecord, InspectionRepository, MailerError, ReportEmail,
    ReportMailer, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryInspectionRepository {
    records: Arc<Mutex<Vec<InspectionRecord>>>,
}

impl InMemoryInspectionRepository {
    pub(crate) fn seeded(records: Vec<InspectionRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

impl InspectionRepository for InMemoryInspectionRepository {
    fn insert(&self, record: InspectionRecord) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        guard.push(record);
        Ok(())
    }

    fn all(&self) -> Result<Vec<InspectionRecord>, RepositoryError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?
            .clone();
        sort_newest_first(&mut records);
        Ok(records)
    }
}

/// Mailer that records outgoing reports and logs them instead of relaying.
#[derive(Default, Clone)]
pub(crate) struct LoggingMailer {
    outbox: Arc<Mutex<Vec<ReportEmail>>>,
}

impl ReportMailer for LoggingMailer {
    fn send(&self, email: ReportEmail) -> Result<(), MailerError> {
        info!(
            subject = %email.subject,
            recipients = email.recipients.len(),
            html_bytes = email.html.len(),
            text_bytes = email.text.len(),
            "report email queued"
        );
        let mut guard = self
            .outbox
            .lock()
            .map_err(|_| MailerError::Transport("outbox mutex poisoned".to_string()))?;
        guard.push(email);
        Ok(())
    }
}

impl LoggingMailer {
    #[cfg(test)]
    pub(crate) fn outbox(&self) -> Vec<ReportEmail> {
        self.outbox.lock().expect("outbox mutex poisoned").clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
