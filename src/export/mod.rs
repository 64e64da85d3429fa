//! Debounced download requests.
//!
//! The host bumps `requestCount` to ask for an export. The
//! [`ExportService`] remembers the last count it acted on, so replaying a
//! request (the same count arriving again with unrelated updates) never
//! produces a second file.

mod sink;

use serde::{Deserialize, Serialize};

pub use self::sink::{Artifact, DirectorySink, ExportSink, MemorySink};
use crate::error::SceneError;
use crate::render::RenderSurface;
use crate::store::SceneStore;

/// Artifact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Raster screenshot.
    Png,
    /// Structured scene file.
    Json,
}

impl ExportFormat {
    /// Parse a host `fileType` string (case-insensitive).
    #[must_use]
    pub fn from_file_type(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// File extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Json => "json",
        }
    }
}

/// A download request as sent by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DownloadRequest {
    /// Monotonic trigger; only an increase starts an export.
    #[serde(alias = "n_requests")]
    pub request_count: u64,
    /// Artifact name without extension.
    pub filename: String,
    /// `png` or `json`.
    #[serde(alias = "filetype")]
    pub file_type: String,
}

/// Turns download requests into captured artifacts, once per count.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportService {
    last_count: u64,
}

impl ExportService {
    /// Service that has not exported anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last request count acted on.
    #[must_use]
    pub fn last_count(&self) -> u64 {
        self.last_count
    }

    /// Handle `request` against `store`, delivering at most one artifact to
    /// `sink`. Returns the delivered file name.
    ///
    /// Requests whose count does not exceed the last one seen are ignored.
    /// A newer request with an empty filename or an unknown file type
    /// consumes its count without exporting.
    pub fn handle<S: RenderSurface>(
        &mut self,
        request: &DownloadRequest,
        store: &mut SceneStore<S>,
        sink: &mut dyn ExportSink,
    ) -> Result<Option<String>, SceneError> {
        if request.request_count <= self.last_count {
            log::debug!(
                "download request {} already handled (last {})",
                request.request_count,
                self.last_count
            );
            return Ok(None);
        }
        self.last_count = request.request_count;
        if request.filename.is_empty() {
            log::debug!(
                "download request {} has no filename",
                request.request_count
            );
            return Ok(None);
        }
        let Some(format) = ExportFormat::from_file_type(&request.file_type)
        else {
            log::warn!("unknown download file type `{}`", request.file_type);
            return Ok(None);
        };

        let bytes = store.capture(format)?;
        let filename = format!("{}.{}", request.filename, format.extension());
        log::info!("exporting {filename} ({} bytes)", bytes.len());
        sink.deliver(Artifact {
            filename: filename.clone(),
            format,
            bytes,
        })?;
        Ok(Some(filename))
    }
}
