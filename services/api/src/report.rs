use crate::infra::{InMemoryInspectionRepository, LoggingMailer};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, ValueEnum};
use compliance_inspector::config::AppConfig;
use compliance_inspector::error::AppError;
use compliance_inspector::telemetry::{self, TelemetryError};
use compliance_inspector::workflows::import::load_records;
use compliance_inspector::workflows::inspection::report::CancellationFlag;
use compliance_inspector::workflows::inspection::{
    InspectionRecord, ReportFormat, ReportServiceConfig, ViolationReportService,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// HTML email body
    #[default]
    Html,
    /// Plain-text email body
    Text,
    /// Paginated document artifact
    Document,
    /// Summary totals only
    Summary,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Record-store export (.csv or .json)
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub(crate) format: OutputFormat,
    /// Write to this path instead of stdout (documents default to their artifact name)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Report generation date (defaults to now)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    // Logs go to stderr so stdout carries only the report body.
    match telemetry::init_with_writer(&config.telemetry, std::io::stderr) {
        Ok(()) | Err(TelemetryError::Subscriber(_)) => {}
        Err(err) => return Err(err.into()),
    }
    let records = load_records(&args.records)?;
    let generated_at = generation_time(args.today);

    let service = report_service(records, config.report.organization, config.report.recipients);
    match render(&service, args.format, generated_at)? {
        RenderedReport::Body(body) => match args.output {
            Some(path) => std::fs::write(path, body)?,
            None => print!("{body}"),
        },
        RenderedReport::Artifact { file_name, bytes } => {
            let path = args.output.unwrap_or_else(|| PathBuf::from(file_name));
            std::fs::write(&path, bytes)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn generation_time(today: Option<NaiveDate>) -> DateTime<Utc> {
    today
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now)
}

fn report_service(
    records: Vec<InspectionRecord>,
    organization: String,
    recipients: Vec<String>,
) -> ViolationReportService<InMemoryInspectionRepository, LoggingMailer> {
    ViolationReportService::new(
        Arc::new(InMemoryInspectionRepository::seeded(records)),
        Arc::new(LoggingMailer::default()),
        ReportServiceConfig {
            organization,
            recipients,
        },
    )
}

#[derive(Debug, PartialEq, Eq)]
enum RenderedReport {
    Body(String),
    Artifact { file_name: String, bytes: Vec<u8> },
}

fn render(
    service: &ViolationReportService<InMemoryInspectionRepository, LoggingMailer>,
    format: OutputFormat,
    generated_at: DateTime<Utc>,
) -> Result<RenderedReport, AppError> {
    let rendered = match format {
        OutputFormat::Html => RenderedReport::Body(service.render(ReportFormat::Html, generated_at)?),
        OutputFormat::Text => RenderedReport::Body(service.render(ReportFormat::Text, generated_at)?),
        OutputFormat::Document => {
            let artifact = service.download_document(generated_at, &CancellationFlag::new())?;
            RenderedReport::Artifact {
                file_name: artifact.file_name,
                bytes: artifact.bytes,
            }
        }
        OutputFormat::Summary => {
            let overview = service.overview()?;
            let mut body = String::new();
            for (label, value) in overview.summary.lines() {
                body.push_str(&format!("{label}: {value}\n"));
            }
            RenderedReport::Body(body)
        }
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance_inspector::workflows::inspection::{Checklist, ChecklistField, ChecklistValue};

    fn pine() -> InspectionRecord {
        InspectionRecord {
            property_address: Some("55 Pine Ave".to_string()),
            checklist: Checklist::new()
                .with(ChecklistField::Roof, ChecklistValue::Major)
                .with(ChecklistField::Gutters, ChecklistValue::Minor),
            photos: vec!["https://cdn.example.com/pine-roof.jpg".to_string()],
            ..InspectionRecord::default()
        }
    }

    fn service() -> ViolationReportService<InMemoryInspectionRepository, LoggingMailer> {
        report_service(vec![pine()], "Riverside HOA".to_string(), Vec::new())
    }

    fn generated_at() -> DateTime<Utc> {
        generation_time(NaiveDate::from_ymd_opt(2026, 10, 18))
    }

    #[test]
    fn run_report_writes_rendered_export_to_output() {
        let dir = std::env::temp_dir().join(format!("report-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let records = dir.join("export.csv");
        std::fs::write(
            &records,
            "Property Address,Review Date,roof\n55 Pine Ave,not-a-date,major\n",
        )
        .expect("write export");
        let output = dir.join("report.txt");

        run_report(ReportArgs {
            records,
            format: OutputFormat::Text,
            output: Some(output.clone()),
            today: NaiveDate::from_ymd_opt(2026, 10, 18),
        })
        .expect("report runs");

        let body = std::fs::read_to_string(&output).expect("report written");
        assert!(body.contains("55 Pine Ave"));
        assert!(body.contains("Review Date:  Not recorded"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn summary_format_lists_totals() {
        let rendered =
            render(&service(), OutputFormat::Summary, generated_at()).expect("summary renders");
        let RenderedReport::Body(body) = rendered else {
            panic!("summary should be a text body");
        };
        assert!(body.contains("Total properties with violations: 1"));
        assert!(body.contains("Total violations: 2"));
        assert!(body.contains("Properties with photos: 1"));
    }

    #[test]
    fn document_format_yields_dated_artifact() {
        let rendered =
            render(&service(), OutputFormat::Document, generated_at()).expect("document renders");
        match rendered {
            RenderedReport::Artifact { file_name, bytes } => {
                assert_eq!(file_name, "Property_Violations_Report_2026-10-18.json");
                assert!(!bytes.is_empty());
            }
            RenderedReport::Body(_) => panic!("document should be an artifact"),
        }
    }

    #[test]
    fn text_format_uses_configured_organization() {
        let rendered =
            render(&service(), OutputFormat::Text, generated_at()).expect("text renders");
        let RenderedReport::Body(body) = rendered else {
            panic!("text should be a body");
        };
        assert!(body.contains("Riverside HOA"));
        assert!(body.contains("Generated: 2026-10-18 00:00 UTC"));
    }
}
