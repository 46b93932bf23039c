//! Document load state shared by the viewer and the comment store.
//!
//! # Responsibility
//! - Load a document once through a [`DocumentSource`] and remember the outcome.
//! - Expose a coarse `error` flag for the presentation layer's fallback view.
//! - Compute fit-to-width layouts for loaded pages.
//!
//! # Invariants
//! - Only the first `load` call reaches the source; later calls replay the
//!   recorded outcome.
//! - `page_count` is `0` until a load succeeds.

use super::viewport::{PageLayout, PageSize};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure reported by a document backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    NotFound(String),
    Unreadable(String),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(url) => write!(f, "document not found: {url}"),
            Self::Unreadable(details) => write!(f, "document unreadable: {details}"),
        }
    }
}

impl Error for DocumentError {}

/// Rendering backend seam. Rasterization itself stays with the host.
pub trait DocumentSource {
    /// Opens `url` and returns its page count.
    fn open(&mut self, url: &str) -> Result<u32, DocumentError>;
    /// Unscaled size of a 1-based page, if it exists.
    fn page_size(&self, page_number: u32) -> Option<PageSize>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadState {
    Pending,
    Loaded { page_count: u32 },
    Failed,
}

/// Memoized load outcome for one document.
#[derive(Debug)]
pub struct DocumentSession {
    url: String,
    state: LoadState,
}

impl DocumentSession {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: LoadState::Pending,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Loads the document on first call; returns the page count on success.
    ///
    /// Failures only flip the `error` flag; the error is returned for logging.
    pub fn load(&mut self, source: &mut impl DocumentSource) -> Result<u32, DocumentError> {
        match self.state {
            LoadState::Loaded { page_count } => return Ok(page_count),
            LoadState::Failed => {
                return Err(DocumentError::Unreadable(format!(
                    "earlier load of `{}` failed",
                    self.url
                )))
            }
            LoadState::Pending => {}
        }

        match source.open(&self.url) {
            Ok(page_count) => {
                info!("event=document_load module=document status=ok page_count={page_count}");
                self.state = LoadState::Loaded { page_count };
                Ok(page_count)
            }
            Err(err) => {
                warn!("event=document_load module=document status=error error={err}");
                self.state = LoadState::Failed;
                Err(err)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Pending
    }

    pub fn has_error(&self) -> bool {
        self.state == LoadState::Failed
    }

    pub fn page_count(&self) -> u32 {
        match self.state {
            LoadState::Loaded { page_count } => page_count,
            LoadState::Pending | LoadState::Failed => 0,
        }
    }

    /// Layout for rendering `page_number` at `width` CSS pixels.
    ///
    /// Returns `None` before a successful load or for pages out of range.
    pub fn layout_page(
        &self,
        source: &impl DocumentSource,
        page_number: u32,
        width: f64,
        device_pixel_ratio: f64,
    ) -> Option<PageLayout> {
        if page_number == 0 || page_number > self.page_count() {
            return None;
        }
        let size = source.page_size(page_number)?;
        PageLayout::fit_width(size, width, device_pixel_ratio)
    }
}
