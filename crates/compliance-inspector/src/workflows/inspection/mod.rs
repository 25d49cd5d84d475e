pub mod domain;
pub mod extractor;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Checklist, ChecklistField, ChecklistValue, ComplianceStatus, FollowUp, InspectionRecord,
};
pub use extractor::{extract_violations, Severity, ViolationEntry, ViolationSource};
pub use report::{
    aggregate, aggregate_cancellable, render_document, render_html, render_text,
    CancellationFlag, PropertyViolationGroup, ReportContext, ReportSummary,
};
pub use repository::{
    sort_newest_first, InspectionRepository, MailerError, ReportEmail, ReportMailer,
    RepositoryError,
};
pub use router::inspection_router;
pub use service::{
    email_subject, EmailReceipt, ReportFormat, ReportServiceConfig, ReportServiceError,
    ViolationReportService, ViolationsOverview,
};

#[cfg(test)]
mod tests;
