mod aggregate;
pub mod document;
mod html;
pub mod package;
mod summary;
mod text;

pub use aggregate::{
    aggregate, aggregate_cancellable, CancellationFlag, Cancelled, PropertyViolationGroup,
    MISSING_ADDRESS, STATUS_NOT_SPECIFIED, UNKNOWN,
};
pub use document::{render_document, ReportDocument};
pub use html::{render_html, status_color, PHOTO_GRID_LIMIT};
pub use package::{
    package_document, DocumentPackager, JsonDocumentPackager, PhotoProbe, ReportArtifact,
};
pub use summary::{ReportContext, ReportSummary, NO_VIOLATIONS_MESSAGE, REPORT_TITLE};
pub use text::render_text;
