//! Tabular input: the in-memory table model and the delimited-file reader.

mod reader;
mod source;

pub use reader::{Reader, ReaderConfig};
pub use source::{SourceInfo, Table};
