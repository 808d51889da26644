//! Statement and graph data model.

mod graph;
mod statement;
mod term;
pub mod vocab;

pub use graph::Graph;
pub use statement::Statement;
pub use term::{Literal, Term};
