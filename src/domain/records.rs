//! Flat record sets returned by the backend's bulk fetch
//!
//! `POST /fetch-all-data` answers with four flat arrays. The types here
//! mirror that payload; the hierarchy is rebuilt later by the record joiner.

use super::errors::MergeError;
use super::ids::{EstimateId, FileId, ProjectId};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Project record, the root grouping key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,

    /// Owning company as reported by the backend (string or number on the wire)
    #[serde(default, deserialize_with = "string_or_number")]
    pub company_id: Option<String>,
}

/// Estimate record, belongs to exactly one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub id: EstimateId,
    pub geo_project_id: ProjectId,
}

/// File record, belongs to exactly one project
///
/// Records without document content are valid and expected; they are
/// dropped before the join rather than treated as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: FileId,
    pub geo_project_id: ProjectId,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "base64File", default)]
    pub document: Option<DocumentContent>,
}

impl FileRecord {
    /// Whether the record carries exportable document content
    pub fn has_document(&self) -> bool {
        self.document.as_ref().is_some_and(|doc| !doc.is_empty())
    }
}

/// Annotation overlay for one (estimate, file) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub geo_estimate_id: EstimateId,
    pub file_id: FileId,

    /// XFDF markup describing the overlay
    #[serde(rename = "xfdf", default)]
    pub overlay_markup: String,
}

/// Base64-encoded document content
///
/// Shared behind an `Arc` because the cross-product join attaches the same
/// file to every estimate of its project.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentContent(Arc<str>);

impl DocumentContent {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(Arc::from(encoded.into()))
    }

    /// Encodes raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(general_purpose::STANDARD.encode(bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The encoded form as received
    pub fn as_encoded(&self) -> &str {
        &self.0
    }

    /// Decodes the document, accepting an optional `data:...;base64,` prefix
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::InvalidDocument`] when the content is not valid
    /// base64 or decodes to zero bytes.
    pub fn decode(&self) -> Result<Vec<u8>, MergeError> {
        let encoded = match self.0.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => &self.0,
        };
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

        let bytes = general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| MergeError::InvalidDocument(format!("base64 decode failed: {e}")))?;

        if bytes.is_empty() {
            return Err(MergeError::InvalidDocument(
                "document decodes to zero bytes".to_string(),
            ));
        }
        Ok(bytes)
    }
}

impl fmt::Debug for DocumentContent {
    // Documents are large; only the length is useful in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentContent({} base64 chars)", self.0.len())
    }
}

impl Serialize for DocumentContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DocumentContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(DocumentContent::new)
    }
}

/// Response body of `POST /fetch-all-data`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportPayload {
    pub geo_projects: Vec<Project>,

    /// `null` entries in the wire array are dropped on decode
    #[serde(deserialize_with = "skip_null_entries")]
    pub geo_files: Vec<FileRecord>,

    pub geo_estimates: Vec<Estimate>,
    pub geo_annotations: Vec<Annotation>,
}

impl ExportPayload {
    /// Number of file records that will be dropped for lack of content
    pub fn files_without_content(&self) -> usize {
        self.geo_files.iter().filter(|f| !f.has_document()).count()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn skip_null_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let entries = Vec::<Option<T>>::deserialize(deserializer)?;
    Ok(entries.into_iter().flatten().collect())
}
