//! Annotation merge
//!
//! Bakes an export unit's overlays into its source document using the
//! rendering capability.

use crate::adapters::renderer::{DocumentRenderer, RenderedDocument};
use crate::domain::{Annotation, DocumentContent, MergeError};
use std::sync::Arc;

/// Merges overlay markup into documents
#[derive(Clone)]
pub struct AnnotationMerger {
    renderer: Arc<dyn DocumentRenderer>,
}

impl AnnotationMerger {
    pub fn new(renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self { renderer }
    }

    /// Produce the merged document bytes for one unit
    ///
    /// Loads the document, waits for loaded readiness, imports every overlay
    /// in order, exports the accumulated overlay state and serializes the
    /// document with that state baked in. A unit without overlays still goes
    /// through the engine, so the output is always the engine's rendition.
    ///
    /// The document handle is closed before returning, whether or not the
    /// merge succeeded.
    ///
    /// # Errors
    ///
    /// Any [`MergeError`]; the caller aborts the batch.
    pub async fn merge(
        &self,
        document: &DocumentContent,
        overlays: &[Annotation],
        display_name: &str,
    ) -> Result<Vec<u8>, MergeError> {
        let bytes = document.decode()?;

        let mut handle = self.renderer.open(bytes, display_name).await?;
        let result = apply_overlays(handle.as_mut(), overlays).await;
        handle.close().await;

        if let Err(e) = &result {
            tracing::debug!(
                renderer = self.renderer.name(),
                file_name = %display_name,
                error = %e,
                "Overlay merge failed"
            );
        }
        result
    }
}

async fn apply_overlays(
    handle: &mut dyn RenderedDocument,
    overlays: &[Annotation],
) -> Result<Vec<u8>, MergeError> {
    handle.wait_until_loaded().await?;

    for overlay in overlays {
        handle.import_overlay(&overlay.overlay_markup).await?;
    }

    let state = handle.export_overlay_state().await?;
    handle.serialize(&state).await
}
