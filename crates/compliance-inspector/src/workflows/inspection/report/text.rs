use super::aggregate::PropertyViolationGroup;
use super::summary::{ReportContext, ReportSummary, NO_VIOLATIONS_MESSAGE, REPORT_TITLE};
use std::fmt::Write as _;

const BANNER: &str = "============================================================";
const SECTION_RULE: &str = "------------------------------------------------------------";

/// Fixed-width plain-text report used as the email fallback body.
pub fn render_text(groups: &[PropertyViolationGroup], context: &ReportContext) -> String {
    if groups.is_empty() {
        return format!("{NO_VIOLATIONS_MESSAGE}\n");
    }

    let summary = ReportSummary::from_groups(groups);
    let mut out = String::new();
    writeln!(out, "{BANNER}").expect("write banner");
    writeln!(out, "{}", REPORT_TITLE.to_uppercase()).expect("write title");
    writeln!(out, "{}", context.organization).expect("write organization");
    writeln!(out, "{BANNER}").expect("write banner");
    writeln!(out, "Generated: {}", context.generated_timestamp_label()).expect("write generated");
    writeln!(
        out,
        "TOTAL PROPERTIES WITH VIOLATIONS: {}",
        summary.total_properties
    )
    .expect("write total");
    writeln!(out, "{BANNER}").expect("write banner");
    out.push('\n');

    for (index, group) in groups.iter().enumerate() {
        render_group(&mut out, index + 1, group);
        writeln!(out, "{SECTION_RULE}").expect("write section rule");
        out.push('\n');
    }

    writeln!(out, "{BANNER}").expect("write banner");
    writeln!(out, "SUMMARY").expect("write summary heading");
    writeln!(out, "{BANNER}").expect("write banner");
    for (label, value) in summary.lines() {
        writeln!(out, "{label:<34} {value:>6}").expect("write summary line");
    }
    writeln!(out, "{BANNER}").expect("write banner");

    out
}

fn render_group(out: &mut String, index: usize, group: &PropertyViolationGroup) {
    writeln!(out, "{}. {}", index, group.address).expect("write header");
    writeln!(out, "   Review Team:  {}", group.review_team).expect("write team");
    writeln!(out, "   Review Date:  {}", group.review_date_label()).expect("write date");
    writeln!(out, "   Submitted By: {}", group.submitted_by).expect("write submitter");
    writeln!(out, "   Status:       {}", group.status_label).expect("write status");
    writeln!(out, "   Photos:       {}", group.photo_count).expect("write photos");

    let major: Vec<_> = group.major_violations().collect();
    if !major.is_empty() {
        writeln!(out, "\n   MAJOR ISSUES ({}):", major.len()).expect("write major heading");
        for entry in major {
            writeln!(out, "     * {}", entry.label).expect("write major");
        }
    }

    let minor: Vec<_> = group.minor_violations().collect();
    if !minor.is_empty() {
        writeln!(out, "\n   MINOR ISSUES ({}):", minor.len()).expect("write minor heading");
        for entry in minor {
            writeln!(out, "     - {}", entry.label).expect("write minor");
        }
    }

    if let Some(comments) = &group.comments {
        writeln!(out, "\n   Comments: {}", single_line(comments)).expect("write comments");
    }

    if group.notice_sent() {
        let follow_up = &group.follow_up;
        writeln!(out, "\n   Follow-up:").expect("write follow-up heading");
        let sent_on = follow_up
            .notice_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "yes".to_string());
        writeln!(out, "     Violation notice sent: {sent_on}").expect("write notice");
        if let Some(date) = follow_up.compliance_deadline {
            writeln!(out, "     Compliance deadline:   {date}").expect("write deadline");
        }
        if let Some(date) = follow_up.reinspection_date {
            writeln!(out, "     Re-inspection date:    {date}").expect("write reinspection");
        }
    }
    out.push('\n');
}

fn single_line(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
