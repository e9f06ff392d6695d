//! Grid geometry, file name metadata, decoding and parameter resolution

pub mod geometry;
pub mod filename;
pub mod decoder;
pub mod resolve;
pub mod statistics;

// Re-export main types
pub use geometry::{GridExtentKm, GridGeometryTable, HemisphereGrid};
pub use filename::{FilenameMetadata, FilenameMetadataExtractor, FREQUENCY_RESOLUTIONS};
pub use decoder::{BinaryGridDecoder, LeSample};
pub use resolve::{GridRequest, ParameterResolver, ResolvedGrid, ValueSource};
pub use statistics::BandStatistics;
