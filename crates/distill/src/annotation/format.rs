//! Annotation formats and the tag registry.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DistillError, Result};

/// File name suffixes accepted for compressible formats.
const COMPRESSION_SUFFIXES: &[&str] = &["gz", "bz2", "xz"];

/// The closed set of annotation variants the library can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// Raw UTF-8 text.
    Text,
}

static TEXT_FORMAT: Lazy<Format> = Lazy::new(|| Format {
    tag: "TXT".to_string(),
    media_types: vec!["text/plain".to_string()],
    charset: Some("UTF-8".to_string()),
    extensions: vec!["txt".to_string()],
    kind: AnnotationKind::Text,
    compressible: true,
});

static BUILTIN: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::builtin);

impl AnnotationKind {
    pub const ALL: &'static [AnnotationKind] = &[AnnotationKind::Text];

    /// The built-in format descriptor for this kind.
    pub fn format(&self) -> &'static Format {
        match self {
            AnnotationKind::Text => &TEXT_FORMAT,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.format().tag()
    }
}

/// Metadata needed to read and write one annotation variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    tag: String,
    media_types: Vec<String>,
    charset: Option<String>,
    extensions: Vec<String>,
    kind: AnnotationKind,
    compressible: bool,
}

impl Format {
    /// Describe a format. Media types and extensions must be non-empty.
    pub fn new(
        tag: impl Into<String>,
        media_types: &[&str],
        charset: Option<&str>,
        extensions: &[&str],
        kind: AnnotationKind,
    ) -> Result<Self> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(DistillError::Config("format tag must not be empty".to_string()));
        }
        if media_types.is_empty() {
            return Err(DistillError::Config(format!(
                "format '{}' needs at least one media type",
                tag
            )));
        }
        if extensions.is_empty() {
            return Err(DistillError::Config(format!(
                "format '{}' needs at least one file extension",
                tag
            )));
        }

        Ok(Self {
            tag,
            media_types: media_types.iter().map(|m| m.to_ascii_lowercase()).collect(),
            charset: charset.map(str::to_string),
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            kind,
            compressible: false,
        })
    }

    /// Allow `name.ext.gz` style file names.
    pub fn with_compressible(mut self, compressible: bool) -> Self {
        self.compressible = compressible;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Equal attributes, with tags compared ignoring case.
    pub fn describes_same(&self, other: &Format) -> bool {
        self.tag.eq_ignore_ascii_case(&other.tag)
            && self.media_types == other.media_types
            && self.charset == other.charset
            && self.extensions == other.extensions
            && self.kind == other.kind
            && self.compressible == other.compressible
    }

    pub fn media_types(&self) -> &[String] {
        &self.media_types
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn is_compressible(&self) -> bool {
        self.compressible
    }

    /// Whether a media type (parameters ignored) belongs to this format.
    pub fn matches_media_type(&self, media_type: &str) -> bool {
        let essence = media_type.split(';').next().unwrap_or("").trim();
        self.media_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(essence))
    }

    /// Whether a file name carries one of this format's extensions.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        let mut name = lower.as_str();
        if self.compressible {
            if let Some((stem, suffix)) = name.rsplit_once('.') {
                if COMPRESSION_SUFFIXES.contains(&suffix) {
                    name = stem;
                }
            }
        }
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self.extensions.iter().any(|e| e == ext),
            _ => false,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.tag, self.media_types.join(", "))
    }
}

/// Table of formats keyed by case-insensitive tag.
///
/// Re-registering a tag with identical attributes returns the existing entry;
/// registering it with different attributes fails with
/// [`DistillError::DuplicateFormat`], so a tag means the same thing for the
/// lifetime of the registry.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: IndexMap<String, Format>,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the format of every [`AnnotationKind`].
    pub fn builtin() -> Self {
        let formats = AnnotationKind::ALL
            .iter()
            .map(|kind| {
                let format = kind.format().clone();
                (format.tag.to_ascii_uppercase(), format)
            })
            .collect();
        Self { formats }
    }

    pub fn register(&mut self, format: Format) -> Result<&Format> {
        let key = format.tag.to_ascii_uppercase();

        if let Some(existing) = self.formats.get(&key) {
            if !existing.describes_same(&format) {
                return Err(DistillError::DuplicateFormat(format.tag));
            }
        } else {
            debug!(format = %format, "registered annotation format");
            self.formats.insert(key.clone(), format);
        }

        self.formats
            .get(&key)
            .ok_or_else(|| DistillError::FormatNotFound(key))
    }

    /// Find a format by tag, ignoring case.
    pub fn lookup(&self, tag: &str) -> Result<&Format> {
        self.formats
            .get(&tag.to_ascii_uppercase())
            .ok_or_else(|| DistillError::FormatNotFound(tag.to_string()))
    }

    pub fn for_media_type(&self, media_type: &str) -> Option<&Format> {
        self.formats.values().find(|f| f.matches_media_type(media_type))
    }

    pub fn for_file_name(&self, file_name: &str) -> Option<&Format> {
        self.formats.values().find(|f| f.matches_file_name(file_name))
    }

    /// Formats in registration order.
    pub fn formats(&self) -> impl Iterator<Item = &Format> {
        self.formats.values()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

/// The process-wide, read-only registry of built-in formats.
pub fn formats() -> &'static FormatRegistry {
    &BUILTIN
}
