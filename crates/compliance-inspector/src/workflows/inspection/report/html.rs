use super::aggregate::PropertyViolationGroup;
use super::summary::{plural, ReportContext, ReportSummary, NO_VIOLATIONS_MESSAGE, REPORT_TITLE};
use crate::workflows::inspection::domain::ComplianceStatus;
use crate::workflows::inspection::extractor::ViolationEntry;
use std::fmt::Write as _;

/// Thumbnails shown per property before the overflow counter.
pub const PHOTO_GRID_LIMIT: usize = 6;

const COLOR_RESOLVED: &str = "#28a745";
const COLOR_IN_PROGRESS: &str = "#fd7e14";
const COLOR_FURTHER_ACTION: &str = "#dc3545";
const COLOR_OTHER: &str = "#6c757d";

pub fn status_color(status: Option<&ComplianceStatus>) -> &'static str {
    match status {
        Some(ComplianceStatus::Resolved) => COLOR_RESOLVED,
        Some(ComplianceStatus::InProgress) => COLOR_IN_PROGRESS,
        Some(ComplianceStatus::FurtherAction) => COLOR_FURTHER_ACTION,
        Some(ComplianceStatus::Unrecognized(_)) | None => COLOR_OTHER,
    }
}

/// Self-contained HTML fragment used as the email body and preview.
pub fn render_html(groups: &[PropertyViolationGroup], context: &ReportContext) -> String {
    if groups.is_empty() {
        return render_empty(context);
    }

    let summary = ReportSummary::from_groups(groups);
    let mut html = String::new();
    html.push_str(
        "<div style=\"font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; color: #212529;\">\n",
    );
    writeln!(
        html,
        "<h1 style=\"color: #343a40;\">{}</h1>",
        escape_html(REPORT_TITLE)
    )
    .expect("write title");
    writeln!(
        html,
        "<p style=\"color: {COLOR_OTHER};\">{} &middot; Generated {}</p>",
        escape_html(&context.organization),
        escape_html(&context.generated_date_label())
    )
    .expect("write generated line");
    writeln!(
        html,
        "<p><strong>{}</strong> with violations</p>",
        plural(summary.total_properties, "property", "properties")
    )
    .expect("write total banner");

    for (index, group) in groups.iter().enumerate() {
        render_group(&mut html, index + 1, group);
    }

    render_summary(&mut html, &summary);
    html.push_str("</div>\n");
    html
}

fn render_empty(context: &ReportContext) -> String {
    let mut html = String::new();
    writeln!(
        html,
        "<div style=\"font-family: Arial, sans-serif; padding: 20px;\">\n<h2>{}</h2>\n<p>{}</p>\n<p style=\"color: {COLOR_OTHER};\">Generated {}</p>\n</div>",
        escape_html(REPORT_TITLE),
        escape_html(NO_VIOLATIONS_MESSAGE),
        escape_html(&context.generated_date_label())
    )
    .expect("write empty report");
    html
}

fn render_group(html: &mut String, index: usize, group: &PropertyViolationGroup) {
    html.push_str(
        "<div style=\"border: 1px solid #dee2e6; border-radius: 6px; padding: 16px; margin: 16px 0;\">\n",
    );
    writeln!(
        html,
        "<h3 style=\"margin-top: 0;\">{}. {}</h3>",
        index,
        escape_html(&group.address)
    )
    .expect("write group header");

    writeln!(
        html,
        "<p style=\"margin: 4px 0;\"><strong>Review Team:</strong> {}<br><strong>Review Date:</strong> {}<br><strong>Submitted By:</strong> {}<br><strong>Status:</strong> <span style=\"background: {}; color: #ffffff; padding: 2px 8px; border-radius: 10px;\">{}</span></p>",
        escape_html(&group.review_team),
        escape_html(&group.review_date_label()),
        escape_html(&group.submitted_by),
        status_color(group.status.as_ref()),
        escape_html(&group.status_label)
    )
    .expect("write metadata");

    let major: Vec<&ViolationEntry> = group.major_violations().collect();
    let minor: Vec<&ViolationEntry> = group.minor_violations().collect();
    render_violation_list(html, "Major Violations", COLOR_FURTHER_ACTION, &major);
    render_violation_list(html, "Minor Violations", COLOR_IN_PROGRESS, &minor);

    if let Some(comments) = &group.comments {
        writeln!(
            html,
            "<div style=\"background: #f8f9fa; padding: 8px; margin: 8px 0;\"><strong>Comments:</strong> {}</div>",
            escape_html(comments)
        )
        .expect("write comments");
    }

    if group.notice_sent() {
        render_follow_up(html, group);
    }

    if !group.photos.is_empty() {
        render_photo_grid(html, group);
    }

    html.push_str("</div>\n");
}

fn render_violation_list(html: &mut String, heading: &str, color: &str, entries: &[&ViolationEntry]) {
    if entries.is_empty() {
        return;
    }

    writeln!(
        html,
        "<h4 style=\"color: {color}; margin-bottom: 4px;\">{heading} ({})</h4>\n<ul>",
        entries.len()
    )
    .expect("write list heading");
    for entry in entries {
        writeln!(html, "<li>{}</li>", escape_html(entry.label)).expect("write violation");
    }
    html.push_str("</ul>\n");
}

fn render_follow_up(html: &mut String, group: &PropertyViolationGroup) {
    let follow_up = &group.follow_up;
    html.push_str("<div style=\"border-left: 3px solid #0d6efd; padding-left: 8px; margin: 8px 0;\"><strong>Follow-up:</strong> Violation notice sent");
    if let Some(date) = follow_up.notice_date {
        write!(html, " on {}", date.format("%B %d, %Y")).expect("write notice date");
    }
    if let Some(date) = follow_up.compliance_deadline {
        write!(html, "<br>Compliance deadline: {}", date.format("%B %d, %Y"))
            .expect("write deadline");
    }
    if let Some(date) = follow_up.reinspection_date {
        write!(html, "<br>Re-inspection: {}", date.format("%B %d, %Y"))
            .expect("write reinspection");
    }
    html.push_str("</div>\n");
}

fn render_photo_grid(html: &mut String, group: &PropertyViolationGroup) {
    writeln!(
        html,
        "<p style=\"margin-bottom: 4px;\"><strong>Photos ({}):</strong></p>\n<div>",
        group.photo_count
    )
    .expect("write photo heading");
    for url in group.photos.iter().take(PHOTO_GRID_LIMIT) {
        let url = escape_html(url);
        writeln!(
            html,
            "<a href=\"{url}\" target=\"_blank\"><img src=\"{url}\" alt=\"Inspection photo\" width=\"120\" height=\"90\" style=\"object-fit: cover; margin: 2px; border-radius: 4px;\"></a>"
        )
        .expect("write thumbnail");
    }
    let overflow = group.photo_count.saturating_sub(PHOTO_GRID_LIMIT);
    if overflow > 0 {
        writeln!(
            html,
            "<span style=\"color: {COLOR_OTHER};\">+{overflow} more {}</span>",
            if overflow == 1 { "photo" } else { "photos" }
        )
        .expect("write overflow");
    }
    html.push_str("</div>\n");
}

fn render_summary(html: &mut String, summary: &ReportSummary) {
    html.push_str(
        "<div style=\"background: #e9ecef; border-radius: 6px; padding: 16px; margin-top: 24px;\">\n<h3 style=\"margin-top: 0;\">Summary</h3>\n<ul>\n",
    );
    for (label, value) in summary.lines() {
        writeln!(html, "<li>{label}: <strong>{value}</strong></li>").expect("write summary");
    }
    html.push_str("</ul>\n</div>\n");
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
