//! I/O modules for reading flat binary grids and writing rasters and text

pub mod bin_reader;
pub mod raster;
pub mod text;

pub use bin_reader::BinReader;
pub use raster::{
    band_type_for, default_raster_path, parse_nodata, GeoReference, MemoryRasterSink,
    RasterBandType, RasterSink, WrittenBand,
};
#[cfg(feature = "raster")]
pub use raster::GeoTiffWriter;
pub use text::write_grid_text;
