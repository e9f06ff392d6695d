//! End-to-end pipelines: resolve grid parameters, read, decode, emit

use crate::core::resolve::{GridRequest, ParameterResolver, ResolvedGrid};
use crate::core::statistics::BandStatistics;
use crate::io::bin_reader::BinReader;
use crate::io::raster::{GeoReference, RasterSink};
use crate::io::text::write_grid_text;
use crate::types::{DecodeParameters, DecodedGrid, GridResult};
use std::io::Write;
use std::path::Path;

/// Converts NSIDC flat binary files with one set of decode parameters
#[derive(Debug, Clone)]
pub struct Converter {
    resolver: ParameterResolver,
    params: DecodeParameters,
}

impl Converter {
    pub fn new(resolver: ParameterResolver, params: DecodeParameters) -> Self {
        Self { resolver, params }
    }

    /// Resolve the grid for `path` (no I/O), then read and decode it
    pub fn decode_file<P: AsRef<Path>>(
        &self,
        path: P,
        request: &GridRequest,
    ) -> GridResult<(ResolvedGrid, DecodedGrid)> {
        let path = path.as_ref();
        let resolved = self.resolver.resolve(path, request);
        log::info!(
            "Decoding {} as {} hemisphere, {} grid {}",
            path.display(),
            resolved.hemisphere,
            resolved.resolution,
            resolved.shape
        );

        let grid = BinReader::read_grid(path, resolved.shape, &self.params)?;
        Ok((resolved, grid))
    }

    /// Decode `path` and hand the georeferenced grid to `sink`
    pub fn convert_to_raster<P: AsRef<Path>, S: RasterSink>(
        &self,
        path: P,
        request: &GridRequest,
        sink: &mut S,
        nodata: Option<f64>,
    ) -> GridResult<ResolvedGrid> {
        let (resolved, grid) = self.decode_file(path, request)?;

        let georef = GeoReference {
            geotransform: resolved.geotransform,
            epsg: resolved.epsg,
        };
        let statistics = BandStatistics::compute(&grid, nodata);
        if statistics.is_empty() {
            log::warn!("Every pixel equals the no-data value; statistics are NaN");
        }

        sink.write_band(&grid, &georef, nodata, &statistics)?;
        Ok(resolved)
    }

    /// Decode `path` and print it as whitespace-separated rows
    pub fn convert_to_text<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        request: &GridRequest,
        writer: &mut W,
    ) -> GridResult<ResolvedGrid> {
        let (resolved, grid) = self.decode_file(path, request)?;
        write_grid_text(&grid, writer)?;
        Ok(resolved)
    }
}
