use crate::workflows::inspection::domain::{
    parse_calendar_date, parse_timestamp, Checklist, ChecklistField, ChecklistValue,
    ComplianceStatus, FollowUp, InspectionRecord,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::io::Read;
use tracing::warn;

pub(crate) const PROPERTY_ADDRESS: &str = "Property Address";
pub(crate) const REVIEW_DATE: &str = "Review Date";
pub(crate) const REVIEW_TEAM: &str = "Review Team";
pub(crate) const SUBMITTED_BY: &str = "Submitted By";
pub(crate) const SUBMITTED_AT: &str = "Submitted At";
pub(crate) const COMMENTS: &str = "Comments";
pub(crate) const PHOTOS: &str = "Photos";
pub(crate) const NOTICE_SENT: &str = "Violation Notice Sent";
pub(crate) const NOTICE_DATE: &str = "Notice Date";
pub(crate) const COMPLIANCE_DEADLINE: &str = "Compliance Deadline";
pub(crate) const REINSPECTION_DATE: &str = "Reinspection Date";
pub(crate) const COMPLIANCE_STATUS: &str = "Compliance Status";

type Row = HashMap<String, String>;

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<InspectionRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<Row>().enumerate() {
        let row = row?;
        records.push(record_from_row(&row, index + 1));
    }

    Ok(records)
}

fn record_from_row(row: &Row, line: usize) -> InspectionRecord {
    let mut checklist = Checklist::new();
    for field in ChecklistField::ordered() {
        if let Some(value) = cell(row, field.key()).and_then(ChecklistValue::parse) {
            checklist.set(field, value);
        }
    }

    InspectionRecord {
        property_address: owned(row, PROPERTY_ADDRESS),
        review_date: date_cell(row, REVIEW_DATE, line),
        review_team: owned(row, REVIEW_TEAM),
        submitted_by: owned(row, SUBMITTED_BY),
        submitted_at: timestamp_cell(row, SUBMITTED_AT, line),
        checklist,
        comments: owned(row, COMMENTS),
        photos: cell(row, PHOTOS).map(split_photos).unwrap_or_default(),
        follow_up: FollowUp {
            violation_notice_sent: cell(row, NOTICE_SENT).map(parse_flag).unwrap_or(false),
            notice_date: date_cell(row, NOTICE_DATE, line),
            compliance_deadline: date_cell(row, COMPLIANCE_DEADLINE, line),
            reinspection_date: date_cell(row, REINSPECTION_DATE, line),
            compliance_status: cell(row, COMPLIANCE_STATUS).and_then(ComplianceStatus::parse),
        },
    }
}

fn cell<'a>(row: &'a Row, header: &str) -> Option<&'a str> {
    row.get(header)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn owned(row: &Row, header: &str) -> Option<String> {
    cell(row, header).map(str::to_string)
}

fn split_photos(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1"
    )
}

fn date_cell(row: &Row, header: &str, line: usize) -> Option<NaiveDate> {
    let raw = cell(row, header)?;
    let parsed = parse_calendar_date(raw);
    if parsed.is_none() {
        warn!(line, column = header, value = raw, "ignoring unparseable date");
    }
    parsed
}

fn timestamp_cell(row: &Row, header: &str, line: usize) -> Option<DateTime<Utc>> {
    let raw = cell(row, header)?;
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        warn!(line, column = header, value = raw, "ignoring unparseable timestamp");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(cells: &[(&str, &str)]) -> Row {
        cells
            .iter()
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn date_columns_keep_the_written_day() {
        let record = record_from_row(
            &row(&[
                (REVIEW_DATE, "2026-10-02T21:00:00-04:00"),
                (SUBMITTED_AT, "2026-10-02T21:00:00-04:00"),
                (NOTICE_DATE, "2026-10-05"),
            ]),
            1,
        );

        assert_eq!(record.review_date, NaiveDate::from_ymd_opt(2026, 10, 2));
        assert_eq!(
            record.submitted_at,
            Some(Utc.with_ymd_and_hms(2026, 10, 3, 1, 0, 0).unwrap())
        );
        assert_eq!(record.follow_up.notice_date, NaiveDate::from_ymd_opt(2026, 10, 5));
    }

    #[test]
    fn unparseable_dates_are_dropped() {
        let record = record_from_row(&row(&[(REVIEW_DATE, "10/02/2026")]), 1);
        assert_eq!(record.review_date, None);
    }

    #[test]
    fn flags_accept_common_truthy_spellings() {
        assert!(parse_flag("Yes"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("no"));
        assert!(!parse_flag("sent"));
    }

    #[test]
    fn photo_cell_splits_on_semicolons() {
        assert_eq!(
            split_photos("https://a.example/1.jpg; ;https://a.example/2.jpg"),
            vec!["https://a.example/1.jpg", "https://a.example/2.jpg"]
        );
    }
}
