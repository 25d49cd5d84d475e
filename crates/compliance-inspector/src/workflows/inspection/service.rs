use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::InspectionRecord;
use super::report::package::{PackageRunError, PackagingError};
use super::report::{
    aggregate_cancellable, package_document, render_document, render_html, render_text,
    CancellationFlag, Cancelled, DocumentPackager, JsonDocumentPackager, PhotoProbe,
    PropertyViolationGroup, ReportArtifact, ReportContext, ReportSummary, REPORT_TITLE,
};
use super::repository::{
    InspectionRepository, MailerError, ReportEmail, ReportMailer, RepositoryError,
};

/// Settings the service needs beyond its collaborators.
#[derive(Debug, Clone)]
pub struct ReportServiceConfig {
    pub organization: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Text,
}

impl ReportFormat {
    pub fn mime(self) -> mime::Mime {
        match self {
            Self::Html => mime::TEXT_HTML_UTF_8,
            Self::Text => mime::TEXT_PLAIN_UTF_8,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViolationsOverview {
    pub summary: ReportSummary,
    pub groups: Vec<PropertyViolationGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailReceipt {
    pub subject: String,
    pub recipients: usize,
    pub summary: ReportSummary,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Mailer(#[from] MailerError),
    #[error(transparent)]
    Packaging(#[from] PackagingError),
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    #[error("no report recipients configured")]
    NoRecipients,
}

impl From<PackageRunError> for ReportServiceError {
    fn from(value: PackageRunError) -> Self {
        match value {
            PackageRunError::Cancelled(err) => Self::Cancelled(err),
            PackageRunError::Packaging(err) => Self::Packaging(err),
        }
    }
}

pub fn email_subject(date: NaiveDate) -> String {
    format!("{REPORT_TITLE} - {}", date.format("%B %d, %Y"))
}

/// Service composing the record store, report pipeline, and output sinks.
pub struct ViolationReportService<R, M> {
    repository: Arc<R>,
    mailer: Arc<M>,
    config: ReportServiceConfig,
    probe: Option<Arc<dyn PhotoProbe>>,
    packager: Arc<dyn DocumentPackager>,
}

impl<R, M> ViolationReportService<R, M>
where
    R: InspectionRepository + 'static,
    M: ReportMailer + 'static,
{
    pub fn new(repository: Arc<R>, mailer: Arc<M>, config: ReportServiceConfig) -> Self {
        Self {
            repository,
            mailer,
            config,
            probe: None,
            packager: Arc::new(JsonDocumentPackager),
        }
    }

    pub fn with_photo_probe(mut self, probe: Arc<dyn PhotoProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_packager(mut self, packager: Arc<dyn DocumentPackager>) -> Self {
        self.packager = packager;
        self
    }

    pub fn config(&self) -> &ReportServiceConfig {
        &self.config
    }

    pub fn context(&self, generated_at: DateTime<Utc>) -> ReportContext {
        ReportContext::new(self.config.organization.clone(), generated_at)
    }

    /// Store a submitted inspection.
    pub fn submit(&self, record: InspectionRecord) -> Result<(), ReportServiceError> {
        self.repository.insert(record)?;
        Ok(())
    }

    pub fn violation_groups(&self) -> Result<Vec<PropertyViolationGroup>, ReportServiceError> {
        self.violation_groups_cancellable(&CancellationFlag::new())
    }

    pub fn violation_groups_cancellable(
        &self,
        cancellation: &CancellationFlag,
    ) -> Result<Vec<PropertyViolationGroup>, ReportServiceError> {
        let records = self.repository.all()?;
        let groups = aggregate_cancellable(&records, cancellation)?;
        info!(
            records = records.len(),
            properties = groups.len(),
            "aggregated inspection violations"
        );
        Ok(groups)
    }

    pub fn overview(&self) -> Result<ViolationsOverview, ReportServiceError> {
        let groups = self.violation_groups()?;
        Ok(ViolationsOverview {
            summary: ReportSummary::from_groups(&groups),
            groups,
        })
    }

    pub fn render(
        &self,
        format: ReportFormat,
        generated_at: DateTime<Utc>,
    ) -> Result<String, ReportServiceError> {
        let groups = self.violation_groups()?;
        let context = self.context(generated_at);
        Ok(match format {
            ReportFormat::Html => render_html(&groups, &context),
            ReportFormat::Text => render_text(&groups, &context),
        })
    }

    /// Render both email bodies and hand them to the mailer. Not retried.
    pub fn email_report(
        &self,
        generated_at: DateTime<Utc>,
    ) -> Result<EmailReceipt, ReportServiceError> {
        if self.config.recipients.is_empty() {
            return Err(ReportServiceError::NoRecipients);
        }

        let groups = self.violation_groups()?;
        let context = self.context(generated_at);
        let summary = ReportSummary::from_groups(&groups);
        let email = ReportEmail {
            recipients: self.config.recipients.clone(),
            subject: email_subject(generated_at.date_naive()),
            html: render_html(&groups, &context),
            text: render_text(&groups, &context),
        };
        let subject = email.subject.clone();
        let recipients = email.recipients.len();

        self.mailer.send(email)?;
        info!(%subject, recipients, properties = summary.total_properties, "violation report emailed");

        Ok(EmailReceipt {
            subject,
            recipients,
            summary,
        })
    }

    pub fn download_document(
        &self,
        generated_at: DateTime<Utc>,
        cancellation: &CancellationFlag,
    ) -> Result<ReportArtifact, ReportServiceError> {
        let groups = self.violation_groups_cancellable(cancellation)?;
        let document = render_document(&groups, &self.context(generated_at));
        let artifact = package_document(
            &document,
            self.probe.as_deref(),
            self.packager.as_ref(),
            cancellation,
        )?;
        info!(
            file_name = %artifact.file_name,
            pages = document.page_count(),
            bytes = artifact.bytes.len(),
            "violation report packaged"
        );
        Ok(artifact)
    }
}
