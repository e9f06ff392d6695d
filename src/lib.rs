//! polarbin: NSIDC polar-stereographic flat binary grid decoder
//!
//! Decodes the flat binary (.bin) files distributed by the NSIDC for its
//! passive-microwave polar-stereographic products into 2D grids, working out
//! the grid (hemisphere and resolution) from explicit arguments, the file
//! name, or defaults, and writes them out as georeferenced rasters or text.

pub mod types;
pub mod core;
pub mod io;
pub mod convert;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use types::{
    DecodeParameters, DecodedGrid, ElementWidth, FloatPrecision, GeoTransform, GridError,
    GridResult, GridShape, Hemisphere, Multiplier, OutputKind, Resolution,
};

pub use crate::core::{
    BandStatistics, BinaryGridDecoder, FilenameMetadata, FilenameMetadataExtractor,
    GridGeometryTable, GridRequest, ParameterResolver, ResolvedGrid,
};
pub use io::{BinReader, MemoryRasterSink, RasterSink};
pub use convert::Converter;
