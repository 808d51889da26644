//! Annotations: source artifacts that materialize into graphs.

mod format;
mod text;

use std::io::{Read, Write};

pub use format::{AnnotationKind, Format, FormatRegistry, formats};
pub use text::TextAnnotation;

use crate::error::{DistillError, Result};
use crate::model::Graph;

/// An annotation of one of the supported kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Text(TextAnnotation),
}

impl Annotation {
    /// Read an annotation of the given format from `reader`.
    ///
    /// Only UTF-8 content is decoded; any other declared charset is an
    /// [`DistillError::Encoding`] error.
    pub fn read(reader: impl Read, format: &Format) -> Result<Self> {
        if let Some(charset) = format.charset() {
            if !charset.eq_ignore_ascii_case("UTF-8") && !charset.eq_ignore_ascii_case("UTF8") {
                return Err(DistillError::Encoding {
                    format: format.tag().to_string(),
                    message: format!("unsupported charset '{}'", charset),
                });
            }
        }

        match format.kind() {
            AnnotationKind::Text => TextAnnotation::from_reader(reader)
                .map(Annotation::Text)
                .map_err(|e| match e {
                    DistillError::Encoding { message, .. } => DistillError::Encoding {
                        format: format.tag().to_string(),
                        message,
                    },
                    other => other,
                }),
        }
    }

    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Text(_) => AnnotationKind::Text,
        }
    }

    pub fn format(&self) -> &'static Format {
        self.kind().format()
    }

    pub fn materialize(&self) -> Graph {
        match self {
            Annotation::Text(text) => text.materialize(),
        }
    }

    pub fn serialize(&self, sink: &mut impl Write) -> Result<()> {
        match self {
            Annotation::Text(text) => text.serialize(sink),
        }
    }

    /// The serialized form as a string.
    pub fn to_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.serialize(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| DistillError::Encoding {
            format: self.format().tag().to_string(),
            message: e.to_string(),
        })
    }
}

impl From<TextAnnotation> for Annotation {
    fn from(text: TextAnnotation) -> Self {
        Annotation::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_dispatches_on_kind() {
        let format = formats().lookup("txt").unwrap();
        let annotation = Annotation::read("some text".as_bytes(), format).unwrap();

        assert_eq!(annotation.kind(), AnnotationKind::Text);
        assert_eq!(annotation.format().tag(), "TXT");
        assert_eq!(annotation.to_text().unwrap(), "some text");
        assert_eq!(
            annotation.materialize(),
            TextAnnotation::new("some text").materialize()
        );
    }

    #[test]
    fn test_read_rejects_other_charsets() {
        let latin1 = Format::new(
            "LATIN",
            &["text/plain"],
            Some("ISO-8859-1"),
            &["lat"],
            AnnotationKind::Text,
        )
        .unwrap();

        let err = Annotation::read("abc".as_bytes(), &latin1).unwrap_err();
        assert!(matches!(err, DistillError::Encoding { format, .. } if format == "LATIN"));
    }
}
