pub mod cell;
pub mod filename;
pub mod ingestor;
pub mod normalizer;
pub mod schema;

pub use cell::CellValue;
pub use ingestor::{IngestOutcome, SnapshotIngestor};
