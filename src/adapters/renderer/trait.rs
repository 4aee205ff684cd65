//! Rendering capability trait definition
//!
//! The merger never touches PDF internals itself. It drives a rendering
//! engine through the two traits below: [`DocumentRenderer`] loads a
//! document, and the returned [`RenderedDocument`] handle accepts overlay
//! markup and serializes the result.

use crate::domain::MergeError;
use async_trait::async_trait;

/// Trait for document rendering engines
///
/// Implementations wrap a concrete engine (a remote rendering service, an
/// embedded library, or an in-memory fake in tests).
///
/// # Example
///
/// ```no_run
/// use geodoc::adapters::renderer::{DocumentRenderer, RemoteRenderer};
/// use geodoc::config::RendererConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let renderer = RemoteRenderer::new(&RendererConfig::default())?;
/// let mut document = renderer.open(b"%PDF-1.7".to_vec(), "a.pdf").await?;
/// document.wait_until_loaded().await?;
/// document.import_overlay("<xfdf/>").await?;
/// let state = document.export_overlay_state().await?;
/// let merged = document.serialize(&state).await?;
/// document.close().await;
/// # let _ = merged;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Load a document from raw bytes
    ///
    /// The returned handle may not be ready yet; callers must await
    /// [`RenderedDocument::wait_until_loaded`] before importing overlays.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::LoadFailed`] if the engine rejects the bytes,
    /// or [`MergeError::Renderer`] on transport failure.
    async fn open(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<Box<dyn RenderedDocument>, MergeError>;

    /// Engine name used in log fields
    fn name(&self) -> &str;
}

/// Handle to one loaded document
///
/// A handle is owned by exactly one export unit. [`close`](Self::close) must
/// be called on every exit path; it is infallible so it can run after an
/// earlier step already failed.
#[async_trait]
pub trait RenderedDocument: Send {
    /// Resolve once the document reports loaded readiness
    async fn wait_until_loaded(&mut self) -> Result<(), MergeError>;

    /// Import one overlay's markup into the document
    async fn import_overlay(&mut self, markup: &str) -> Result<(), MergeError>;

    /// Export the accumulated overlay state as markup
    async fn export_overlay_state(&mut self) -> Result<String, MergeError>;

    /// Serialize the document with the given overlay state baked in
    async fn serialize(&mut self, overlay_state: &str) -> Result<Vec<u8>, MergeError>;

    /// Release the handle
    async fn close(&mut self);
}
