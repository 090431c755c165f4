//! Image attachments and the raw file handles they are ingested from.
//!
//! A [`RawFile`] only carries metadata and a way to reach the bytes. The
//! content is read once, during ingestion, and stored in an [`Attachment`]
//! as a data URI that is never decoded again.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::error::{InquiryError, Result};

/// Identity of a selected file: the same name and size means the same file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupeKey {
    name: String,
    byte_size: u64,
}

impl DedupeKey {
    pub fn new(name: &str, byte_size: u64) -> Self {
        Self {
            name: name.to_string(),
            byte_size,
        }
    }
}

impl fmt::Display for DedupeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.byte_size)
    }
}

/// Where the bytes of a [`RawFile`] live.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file on disk, read when the attachment is decoded.
    Path(PathBuf),
    /// Bytes already in memory.
    Memory(Vec<u8>),
}

/// A file as handed over by the picker or a drop target, before validation.
#[derive(Debug, Clone)]
pub struct RawFile {
    /// Display filename.
    pub name: String,
    /// Size in bytes as reported by the source.
    pub byte_size: u64,
    /// MIME type (e.g. `"image/png"`).
    pub mime_type: String,
    /// Location of the content.
    pub source: FileSource,
}

impl RawFile {
    /// Build a handle for a file on disk. The MIME type is guessed from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| InquiryError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            name,
            byte_size: metadata.len(),
            mime_type,
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Build a handle for in-memory content.
    pub fn from_bytes(name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            byte_size: bytes.len() as u64,
            mime_type: mime_type.to_string(),
            source: FileSource::Memory(bytes),
        }
    }

    pub fn dedupe_key(&self) -> DedupeKey {
        DedupeKey::new(&self.name, self.byte_size)
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Read the content and encode it as a data URI.
    pub async fn encode(&self) -> Result<String> {
        let bytes = match &self.source {
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| InquiryError::decode(&self.name, e))?,
            FileSource::Memory(bytes) => bytes.clone(),
        };
        if bytes.len() as u64 != self.byte_size {
            return Err(InquiryError::decode(
                &self.name,
                format!(
                    "file changed while reading ({} bytes expected, {} read)",
                    self.byte_size,
                    bytes.len()
                ),
            ));
        }
        Ok(data_uri(&self.mime_type, &bytes))
    }
}

/// Encode bytes as `data:<mime>;base64,<payload>`.
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", B64.encode(bytes))
}

/// One validated, encoded image held by the intake.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Attachment {
    /// Display filename. Untrusted: sanitize before embedding in markup.
    pub name: String,
    /// Original size in bytes.
    pub byte_size: u64,
    /// MIME type, always `image/*`.
    pub mime_type: String,
    /// Content as a data URI.
    #[serde(skip)]
    pub encoded_data: String,
}

impl Attachment {
    pub fn dedupe_key(&self) -> DedupeKey {
        DedupeKey::new(&self.name, self.byte_size)
    }

    /// Size in MB with two decimals, as shown to users and in the email.
    pub fn size_mb(&self) -> String {
        format_mb(self.byte_size)
    }
}

/// Format a byte count as MB (1024 * 1024) with two decimals.
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}
