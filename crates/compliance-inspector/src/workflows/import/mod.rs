mod parser;

use crate::workflows::inspection::domain::InspectionRecord;
use crate::workflows::inspection::repository::sort_newest_first;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum InspectionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for InspectionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InspectionImportError::Io(err) => {
                write!(f, "failed to read inspection export: {}", err)
            }
            InspectionImportError::Csv(err) => write!(f, "invalid inspection CSV data: {}", err),
            InspectionImportError::Json(err) => {
                write!(f, "invalid inspection JSON data: {}", err)
            }
        }
    }
}

impl std::error::Error for InspectionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InspectionImportError::Io(err) => Some(err),
            InspectionImportError::Csv(err) => Some(err),
            InspectionImportError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for InspectionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for InspectionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for InspectionImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Loads inspection records from record-store exports. Results are ordered
/// newest submission first, matching what the live store returns.
pub struct InspectionCsvImporter;

impl InspectionCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<InspectionRecord>, InspectionImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<InspectionRecord>, InspectionImportError> {
        let mut records = parser::parse_records(reader)?;
        sort_newest_first(&mut records);
        info!(records = records.len(), "imported inspection CSV export");
        Ok(records)
    }

    /// Reads a JSON array of record-store documents.
    pub fn from_json_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<InspectionRecord>, InspectionImportError> {
        let mut records: Vec<InspectionRecord> = serde_json::from_reader(reader)?;
        sort_newest_first(&mut records);
        info!(records = records.len(), "imported inspection JSON export");
        Ok(records)
    }
}

/// Picks the JSON or CSV reader from the file extension.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<InspectionRecord>, InspectionImportError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let file = std::fs::File::open(path)?;
        InspectionCsvImporter::from_json_reader(file)
    } else {
        InspectionCsvImporter::from_path(path)
    }
}
