//! Content-addressed plain-text annotations.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{DistillError, Result};
use crate::model::vocab;
use crate::model::{Graph, Literal, Statement, Term};

/// Number of digest bytes kept in the blank node identifier.
const ID_BYTES: usize = 16;

/// Raw text whose graph identifiers are derived from the text itself.
///
/// Two annotations built from equal text materialize to identical graphs,
/// blank node labels included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextAnnotation {
    text: String,
}

impl TextAnnotation {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read UTF-8 text from `reader`.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes).map_err(|e| DistillError::Encoding {
            format: "TXT".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lowercase hex of the leading bytes of SHA-256 over the text.
    pub fn content_id(&self) -> String {
        let digest = Sha256::digest(self.text.as_bytes());
        digest[..ID_BYTES]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    pub fn materialize(&self) -> Graph {
        let id = self.content_id();
        let doc = Term::blank(id.as_str());
        let ctx = Term::blank(format!("{}-ctx", id));

        [
            Statement::typed(doc.clone(), Term::iri(vocab::KEMT_TEXT_RESOURCE)),
            Statement::typed(ctx.clone(), Term::iri(vocab::NIF_CONTEXT)),
            Statement::new(ctx.clone(), Term::iri(vocab::NIF_SOURCE_URL), doc),
            Statement::new(
                ctx,
                Term::iri(vocab::NIF_IS_STRING),
                Term::Literal(Literal::string(self.text.as_str())),
            ),
        ]
        .into_iter()
        .collect()
    }

    /// Write the text verbatim.
    pub fn serialize(&self, sink: &mut impl Write) -> Result<()> {
        sink.write_all(self.text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}

impl From<&str> for TextAnnotation {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextAnnotation {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
