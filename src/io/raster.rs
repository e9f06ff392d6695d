use crate::core::statistics::BandStatistics;
use crate::types::{DecodedGrid, GeoTransform, GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pixel type of the output raster band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RasterBandType {
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

/// Band type for a decoded grid
///
/// 8-bit samples widen to 16 bits; 64-bit integers narrow to 32 bits
/// (values clamped when written).
pub fn band_type_for(grid: &DecodedGrid) -> RasterBandType {
    match grid {
        DecodedGrid::I8(_) | DecodedGrid::I16(_) => RasterBandType::Int16,
        DecodedGrid::U8(_) | DecodedGrid::U16(_) => RasterBandType::UInt16,
        DecodedGrid::I32(_) | DecodedGrid::I64(_) => RasterBandType::Int32,
        DecodedGrid::U32(_) | DecodedGrid::U64(_) => RasterBandType::UInt32,
        DecodedGrid::F32(_) => RasterBandType::Float32,
        DecodedGrid::F64(_) => RasterBandType::Float64,
    }
}

/// Georeferencing of an output raster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoReference {
    pub geotransform: GeoTransform,
    pub epsg: u32,
}

/// Destination for a single-band georeferenced raster
pub trait RasterSink {
    fn write_band(
        &mut self,
        grid: &DecodedGrid,
        georef: &GeoReference,
        nodata: Option<f64>,
        statistics: &BandStatistics,
    ) -> GridResult<()>;
}

/// Source path with its extension swapped for `.tif`, unless `dest` is given
pub fn default_raster_path(src: &Path, dest: Option<&Path>) -> PathBuf {
    match dest {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => src.with_extension("tif"),
    }
}

/// No-data value from user input: a number, or `None` / empty for no value
pub fn parse_nodata(value: &str) -> GridResult<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    trimmed.parse::<f64>().map(Some).map_err(|_| {
        GridError::Configuration(format!(
            "Invalid no-data value: '{}' (expected a number or None)",
            value
        ))
    })
}

/// A band captured by `MemoryRasterSink`
#[derive(Debug, Clone)]
pub struct WrittenBand {
    pub grid: DecodedGrid,
    pub band_type: RasterBandType,
    pub georef: GeoReference,
    pub nodata: Option<f64>,
    pub statistics: BandStatistics,
}

/// Keeps written bands in memory
#[derive(Debug, Default)]
pub struct MemoryRasterSink {
    pub bands: Vec<WrittenBand>,
}

impl RasterSink for MemoryRasterSink {
    fn write_band(
        &mut self,
        grid: &DecodedGrid,
        georef: &GeoReference,
        nodata: Option<f64>,
        statistics: &BandStatistics,
    ) -> GridResult<()> {
        self.bands.push(WrittenBand {
            grid: grid.clone(),
            band_type: band_type_for(grid),
            georef: *georef,
            nodata,
            statistics: *statistics,
        });
        Ok(())
    }
}

#[cfg(feature = "raster")]
pub use geotiff::GeoTiffWriter;

#[cfg(feature = "raster")]
mod geotiff {
    use super::*;
    use crate::types::GridShape;
    use gdal::raster::{Buffer, GdalType};
    use gdal::spatial_ref::SpatialRef;
    use gdal::{DriverManager, Metadata};

    /// GDAL GeoTIFF writer
    pub struct GeoTiffWriter {
        path: PathBuf,
    }

    impl GeoTiffWriter {
        pub fn new<P: AsRef<Path>>(path: P) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        fn write_typed<T: GdalType + Copy>(
            &self,
            data: Vec<T>,
            shape: GridShape,
            georef: &GeoReference,
            nodata: Option<f64>,
            statistics: &BandStatistics,
        ) -> GridResult<()> {
            let (height, width) = shape.dim();
            let driver = DriverManager::get_driver_by_name("GTiff")?;
            let mut dataset = driver.create_with_band_type::<T, _>(
                &self.path,
                width as isize,
                height as isize,
                1,
            )?;

            dataset.set_geo_transform(&georef.geotransform.to_array())?;
            dataset.set_spatial_ref(&SpatialRef::from_epsg(georef.epsg)?)?;

            let mut rasterband = dataset.rasterband(1)?;
            let buffer = Buffer::new((width, height), data);
            rasterband.write((0, 0), (width, height), &buffer)?;

            if let Some(value) = nodata {
                rasterband.set_no_data_value(Some(value))?;
            }

            // Same keys GDALSetRasterStatistics writes
            for (key, value) in [
                ("STATISTICS_MINIMUM", statistics.min),
                ("STATISTICS_MAXIMUM", statistics.max),
                ("STATISTICS_MEAN", statistics.mean),
                ("STATISTICS_STDDEV", statistics.std_dev),
            ] {
                rasterband.set_metadata_item(key, &value.to_string(), "")?;
            }

            Ok(())
        }
    }

    impl RasterSink for GeoTiffWriter {
        fn write_band(
            &mut self,
            grid: &DecodedGrid,
            georef: &GeoReference,
            nodata: Option<f64>,
            statistics: &BandStatistics,
        ) -> GridResult<()> {
            let shape = grid.shape();
            log::debug!(
                "Writing {} grid {} as {:?} band to {}",
                grid.element_type_name(),
                shape,
                band_type_for(grid),
                self.path.display()
            );

            let written = match grid {
                DecodedGrid::I8(a) => self.write_typed(a.iter().map(|&v| i16::from(v)).collect(), shape, georef, nodata, statistics),
                DecodedGrid::I16(a) => self.write_typed(a.iter().copied().collect(), shape, georef, nodata, statistics),
                DecodedGrid::U8(a) => self.write_typed(a.iter().map(|&v| u16::from(v)).collect(), shape, georef, nodata, statistics),
                DecodedGrid::U16(a) => self.write_typed(a.iter().copied().collect(), shape, georef, nodata, statistics),
                DecodedGrid::I32(a) => self.write_typed(a.iter().copied().collect(), shape, georef, nodata, statistics),
                DecodedGrid::I64(a) => self.write_typed(
                    a.iter().map(|&v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32).collect(),
                    shape, georef, nodata, statistics,
                ),
                DecodedGrid::U32(a) => self.write_typed(a.iter().copied().collect(), shape, georef, nodata, statistics),
                DecodedGrid::U64(a) => self.write_typed(
                    a.iter().map(|&v| v.min(u32::MAX as u64) as u32).collect(),
                    shape, georef, nodata, statistics,
                ),
                DecodedGrid::F32(a) => self.write_typed(a.iter().copied().collect(), shape, georef, nodata, statistics),
                DecodedGrid::F64(a) => self.write_typed(a.iter().copied().collect(), shape, georef, nodata, statistics),
            };

            written.map_err(|e| match e {
                GridError::Gdal(inner) => GridError::Raster(format!(
                    "Failed to write {}: {}",
                    self.path.display(),
                    inner
                )),
                other => other,
            })?;

            log::info!("{} written.", self.path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_band_type_selection() {
        let cases = [
            (DecodedGrid::I8(Array2::zeros((1, 1))), RasterBandType::Int16),
            (DecodedGrid::I16(Array2::zeros((1, 1))), RasterBandType::Int16),
            (DecodedGrid::U8(Array2::zeros((1, 1))), RasterBandType::UInt16),
            (DecodedGrid::U16(Array2::zeros((1, 1))), RasterBandType::UInt16),
            (DecodedGrid::I32(Array2::zeros((1, 1))), RasterBandType::Int32),
            (DecodedGrid::I64(Array2::zeros((1, 1))), RasterBandType::Int32),
            (DecodedGrid::U32(Array2::zeros((1, 1))), RasterBandType::UInt32),
            (DecodedGrid::U64(Array2::zeros((1, 1))), RasterBandType::UInt32),
            (DecodedGrid::F32(Array2::zeros((1, 1))), RasterBandType::Float32),
            (DecodedGrid::F64(Array2::zeros((1, 1))), RasterBandType::Float64),
        ];
        for (grid, expected) in cases {
            assert_eq!(band_type_for(&grid), expected, "{}", grid.element_type_name());
        }
    }

    #[test]
    fn test_default_raster_path() {
        let src = Path::new("/data/tb_f08_19870709_v5_s19h.bin");
        assert_eq!(
            default_raster_path(src, None),
            PathBuf::from("/data/tb_f08_19870709_v5_s19h.tif")
        );
        assert_eq!(
            default_raster_path(src, Some(Path::new(""))),
            PathBuf::from("/data/tb_f08_19870709_v5_s19h.tif")
        );
        assert_eq!(
            default_raster_path(src, Some(Path::new("/out/a.tif"))),
            PathBuf::from("/out/a.tif")
        );
    }

    #[test]
    fn test_parse_nodata() {
        assert_eq!(parse_nodata("None").unwrap(), None);
        assert_eq!(parse_nodata("none").unwrap(), None);
        assert_eq!(parse_nodata("").unwrap(), None);
        assert_eq!(parse_nodata("0").unwrap(), Some(0.0));
        assert_eq!(parse_nodata(" -9999.5 ").unwrap(), Some(-9999.5));
        assert!(matches!(parse_nodata("abc"), Err(GridError::Configuration(_))));
    }
}
