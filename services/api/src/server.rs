use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryInspectionRepository, LoggingMailer};
use crate::routes::with_inspection_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use compliance_inspector::config::AppConfig;
use compliance_inspector::error::AppError;
use compliance_inspector::telemetry;
use compliance_inspector::workflows::inspection::{ReportServiceConfig, ViolationReportService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if config.report.recipients.is_empty() {
        warn!("REPORT_RECIPIENTS is empty; email dispatch will be rejected");
    }

    let service = Arc::new(ViolationReportService::new(
        Arc::new(InMemoryInspectionRepository::default()),
        Arc::new(LoggingMailer::default()),
        ReportServiceConfig {
            organization: config.report.organization.clone(),
            recipients: config.report.recipients.clone(),
        },
    ));

    let app = with_inspection_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        organization = %config.report.organization,
        "compliance inspection service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
