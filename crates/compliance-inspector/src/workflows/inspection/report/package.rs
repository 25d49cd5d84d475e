use super::aggregate::{CancellationFlag, Cancelled};
use super::document::ReportDocument;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;
use tracing::warn;

/// Dimensions used when a photo cannot be probed.
pub const PLACEHOLDER_DIMENSIONS: PhotoDimensions = PhotoDimensions {
    width: 800,
    height: 600,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhotoDimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoProbeError {
    #[error("photo fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },
}

/// Looks up photo dimensions from the object store ahead of packaging.
pub trait PhotoProbe: Debug + Send + Sync {
    fn probe(&self, url: &str) -> Result<PhotoDimensions, PhotoProbeError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoPreview {
    pub url: String,
    pub dimensions: PhotoDimensions,
    /// False when the probe failed; the link is still kept.
    pub embedded: bool,
}

/// Probes every linked photo in document order. Failures fall back to
/// placeholder dimensions and never abort the report.
pub fn prepare_previews(
    document: &ReportDocument,
    probe: Option<&dyn PhotoProbe>,
    cancellation: &CancellationFlag,
) -> Result<Vec<PhotoPreview>, Cancelled> {
    let mut previews = Vec::new();
    for link in document.photo_links() {
        if cancellation.is_cancelled() {
            return Err(Cancelled);
        }

        let preview = match probe.map(|probe| probe.probe(&link.url)) {
            Some(Ok(dimensions)) => PhotoPreview {
                url: link.url.clone(),
                dimensions,
                embedded: true,
            },
            Some(Err(err)) => {
                warn!(url = %link.url, error = %err, "photo probe failed; keeping link only");
                link_only(&link.url)
            }
            None => link_only(&link.url),
        };
        previews.push(preview);
    }
    Ok(previews)
}

fn link_only(url: &str) -> PhotoPreview {
    PhotoPreview {
        url: url.to_string(),
        dimensions: PLACEHOLDER_DIMENSIONS,
        embedded: false,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PackagingError {
    #[error("unable to serialize report document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("document packager unavailable: {0}")]
    Unavailable(String),
}

/// Serializes a report document into a downloadable binary artifact.
pub trait DocumentPackager: Debug + Send + Sync {
    fn extension(&self) -> &'static str;
    fn content_type(&self) -> &'static str;
    fn package(
        &self,
        document: &ReportDocument,
        previews: &[PhotoPreview],
    ) -> Result<Vec<u8>, PackagingError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentPackager;

#[derive(Serialize)]
struct PackagedDocument<'a> {
    document: &'a ReportDocument,
    previews: &'a [PhotoPreview],
}

impl DocumentPackager for JsonDocumentPackager {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn package(
        &self,
        document: &ReportDocument,
        previews: &[PhotoPreview],
    ) -> Result<Vec<u8>, PackagingError> {
        let bytes = serde_json::to_vec_pretty(&PackagedDocument { document, previews })?;
        Ok(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn report_file_name(stem: &str, date: NaiveDate, extension: &str) -> String {
    format!("{stem}_Report_{}.{extension}", date.format("%Y-%m-%d"))
}

pub fn package_document(
    document: &ReportDocument,
    probe: Option<&dyn PhotoProbe>,
    packager: &dyn DocumentPackager,
    cancellation: &CancellationFlag,
) -> Result<ReportArtifact, PackageRunError> {
    let previews = prepare_previews(document, probe, cancellation)?;
    let bytes = packager.package(document, &previews)?;
    Ok(ReportArtifact {
        file_name: report_file_name(document.file_stem, document.generated_on, packager.extension()),
        content_type: packager.content_type(),
        bytes,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum PackageRunError {
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    #[error(transparent)]
    Packaging(#[from] PackagingError),
}
