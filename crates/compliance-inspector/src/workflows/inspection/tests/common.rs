use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::inspection::domain::{
    Checklist, ChecklistField, ChecklistValue, ComplianceStatus, FollowUp, InspectionRecord,
};
use crate::workflows::inspection::repository::{
    sort_newest_first, InspectionRepository, MailerError, ReportEmail, ReportMailer,
    RepositoryError,
};
use crate::workflows::inspection::{inspection_router, ReportServiceConfig, ViolationReportService};

pub(super) const ORGANIZATION: &str = "Riverside HOA";

pub(super) fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn oak_record() -> InspectionRecord {
    InspectionRecord {
        property_address: Some("12 Oak St".to_string()),
        review_date: NaiveDate::from_ymd_opt(2026, 10, 1),
        review_team: Some("North".to_string()),
        submitted_by: Some("Dana".to_string()),
        submitted_at: Utc.with_ymd_and_hms(2026, 10, 1, 15, 0, 0).single(),
        checklist: Checklist::all_accepted(),
        ..InspectionRecord::default()
    }
}

pub(super) fn pine_record() -> InspectionRecord {
    InspectionRecord {
        property_address: Some("55 Pine Ave".to_string()),
        review_date: NaiveDate::from_ymd_opt(2026, 10, 2),
        review_team: Some("South".to_string()),
        submitted_by: Some("Lee".to_string()),
        submitted_at: Utc.with_ymd_and_hms(2026, 10, 2, 16, 45, 0).single(),
        checklist: Checklist::new()
            .with(ChecklistField::Roof, ChecklistValue::Major)
            .with(ChecklistField::Gutters, ChecklistValue::Minor)
            .with(ChecklistField::Lawn, ChecklistValue::Accept),
        comments: Some("Gutter pulling away at the northeast corner.".to_string()),
        photos: vec!["https://cdn.example.com/pine-roof.jpg".to_string()],
        follow_up: FollowUp {
            violation_notice_sent: true,
            notice_date: NaiveDate::from_ymd_opt(2026, 10, 3),
            compliance_deadline: NaiveDate::from_ymd_opt(2026, 11, 1),
            reinspection_date: None,
            compliance_status: Some(ComplianceStatus::InProgress),
        },
    }
}

pub(super) fn recipients() -> Vec<String> {
    vec![
        "board@riverside.org".to_string(),
        "compliance@riverside.org".to_string(),
    ]
}

pub(super) fn build_service(
    recipients: Vec<String>,
) -> (
    ViolationReportService<MemoryRepository, MemoryMailer>,
    Arc<MemoryRepository>,
    Arc<MemoryMailer>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let mailer = Arc::new(MemoryMailer::default());
    let service = ViolationReportService::new(
        repository.clone(),
        mailer.clone(),
        ReportServiceConfig {
            organization: ORGANIZATION.to_string(),
            recipients,
        },
    );
    (service, repository, mailer)
}

pub(super) fn seeded_service() -> (
    ViolationReportService<MemoryRepository, MemoryMailer>,
    Arc<MemoryMailer>,
) {
    let (service, repository, mailer) = build_service(recipients());
    repository.insert(oak_record()).expect("seed oak");
    repository.insert(pine_record()).expect("seed pine");
    (service, mailer)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<Vec<InspectionRecord>>>,
}

impl InspectionRepository for MemoryRepository {
    fn insert(&self, record: InspectionRecord) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push(record);
        Ok(())
    }

    fn all(&self) -> Result<Vec<InspectionRecord>, RepositoryError> {
        let mut records = self
            .records
            .lock()
            .expect("repository mutex poisoned")
            .clone();
        sort_newest_first(&mut records);
        Ok(records)
    }
}

pub(super) struct UnavailableRepository;

impl InspectionRepository for UnavailableRepository {
    fn insert(&self, _record: InspectionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn all(&self) -> Result<Vec<InspectionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryMailer {
    pub(super) outbox: Arc<Mutex<Vec<ReportEmail>>>,
}

impl ReportMailer for MemoryMailer {
    fn send(&self, email: ReportEmail) -> Result<(), MailerError> {
        self.outbox
            .lock()
            .expect("mailer mutex poisoned")
            .push(email);
        Ok(())
    }
}

impl MemoryMailer {
    pub(super) fn sent(&self) -> Vec<ReportEmail> {
        self.outbox.lock().expect("mailer mutex poisoned").clone()
    }
}

pub(super) struct RejectingMailer;

impl ReportMailer for RejectingMailer {
    fn send(&self, _email: ReportEmail) -> Result<(), MailerError> {
        Err(MailerError::Rejected("550 mailbox unavailable".to_string()))
    }
}

pub(super) fn router_with_service(
    service: ViolationReportService<MemoryRepository, MemoryMailer>,
) -> axum::Router {
    inspection_router(Arc::new(service))
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
