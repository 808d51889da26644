//! Bundled resources and the graph loader.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{DistillError, Result};
use crate::model::Graph;
use crate::syntax;

pub(crate) const DEFAULT_RULES_NAME: &str = "default.rules";
pub(crate) const DEFAULT_RULES: &str = include_str!("../resources/default.rules");

pub(crate) const DEFAULT_MAPPINGS_NAME: &str = "default.mapping";
pub(crate) const DEFAULT_MAPPINGS: &str = include_str!("../resources/default.mapping");

static MAPPINGS: OnceCell<Arc<Graph>> = OnceCell::new();

/// Load a graph resource from a file.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| DistillError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    syntax::parse_graph(&path.display().to_string(), &source)
}

/// The mapping graph bundled with the library, parsed once per process.
pub fn default_mappings() -> Result<Arc<Graph>> {
    MAPPINGS
        .get_or_try_init(|| {
            syntax::parse_graph(DEFAULT_MAPPINGS_NAME, DEFAULT_MAPPINGS).map(Arc::new)
        })
        .cloned()
}

/// Load the mapping graph at `path`, or the bundled one when no path is given.
pub fn resolve_mappings(path: Option<&Path>) -> Result<Arc<Graph>> {
    match path {
        Some(path) => load_graph(path).map(Arc::new),
        None => default_mappings(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mappings_parse_once() {
        let mappings = default_mappings().unwrap();
        assert!(!mappings.is_empty());
        assert!(Arc::ptr_eq(&mappings, &default_mappings().unwrap()));
    }

    #[test]
    fn test_load_graph_missing_file() {
        let err = load_graph("/nonexistent/mapping.ttl").unwrap_err();
        assert!(matches!(err, DistillError::Io { .. }));
    }
}
