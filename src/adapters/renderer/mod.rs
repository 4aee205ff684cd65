//! Document rendering adapters
//!
//! The [`DocumentRenderer`] trait is the seam between the overlay merger and
//! whatever engine actually opens PDFs. [`RemoteRenderer`] talks to an HTTP
//! rendering service.

pub mod remote;
mod r#trait;

pub use r#trait::{DocumentRenderer, RenderedDocument};
pub use remote::{RemoteDocument, RemoteRenderer};
