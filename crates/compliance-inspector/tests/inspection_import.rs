use compliance_inspector::workflows::import::{load_records, InspectionCsvImporter};
use compliance_inspector::workflows::inspection::{
    aggregate, ReportSummary, Severity, ViolationSource,
};
use std::io::Write;

const EXPORT: &str = "\
Property Address,Review Date,Review Team,Submitted By,Submitted At,roof,gutters,fencing,Comments,Photos,Violation Notice Sent,Notice Date,Compliance Deadline,Reinspection Date,Compliance Status
12 Oak St,2026-10-01,North,Dana,2026-10-01T15:00:00Z,accept,accept,accept,,,,,,,
55 Pine Ave,2026-10-02,South,Lee,2026-10-02T16:45:00Z,major,minor,,Loose shingles,https://cdn.example.com/pine-1.jpg;https://cdn.example.com/pine-2.jpg,yes,2026-10-03,2026-11-01,2026-11-02,further-action
,,,,,,,MINOR,,,,,,,
";

#[test]
fn imported_export_feeds_the_report_pipeline() {
    let records = InspectionCsvImporter::from_reader(EXPORT.as_bytes()).expect("import succeeds");
    assert_eq!(records.len(), 3);

    let groups = aggregate(&records);
    let addresses: Vec<&str> = groups.iter().map(|group| group.address.as_str()).collect();
    assert_eq!(addresses, vec!["55 Pine Ave", "Address not provided"]);

    let anonymous = &groups[1];
    assert_eq!(anonymous.review_team, "Unknown");
    assert_eq!(anonymous.submitted_by, "Unknown");
    assert_eq!(anonymous.status_label, "Not specified");
    assert_eq!(anonymous.violations[0].severity, Severity::Minor);
    assert_eq!(
        anonymous.violations[0].source,
        ViolationSource::UnrecognizedToken("MINOR".to_string())
    );

    assert_eq!(
        ReportSummary::from_groups(&groups),
        ReportSummary {
            total_properties: 2,
            total_violations: 3,
            properties_with_major: 1,
            properties_with_photos: 1,
            notices_sent: 1,
        }
    );
}

#[test]
fn load_records_dispatches_on_extension() {
    let dir = std::env::temp_dir().join(format!("inspection-import-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");

    let json_path = dir.join("records.json");
    let mut json_file = std::fs::File::create(&json_path).expect("create json");
    json_file
        .write_all(br#"[{"propertyAddress": "7 Elm Ct", "checklist": {"signage": "major"}}]"#)
        .expect("write json");
    let from_json = load_records(&json_path).expect("json loads");
    assert_eq!(from_json.len(), 1);

    let csv_path = dir.join("records.csv");
    std::fs::write(&csv_path, EXPORT).expect("write csv");
    let from_csv = load_records(&csv_path).expect("csv loads");
    assert_eq!(from_csv.len(), 3);

    std::fs::remove_dir_all(&dir).ok();
}
