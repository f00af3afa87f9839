// Infrastructure implementations for Callatlas.

pub mod concurrency;
pub mod corpus_loader;
pub mod oracle;
pub mod python_parser;

pub use corpus_loader::{CorpusLoader, SourceFile};
pub use oracle::PycgOracle;
pub use python_parser::PyUnitExtractor;
