use crate::core::filename::{FilenameMetadata, FilenameMetadataExtractor};
use crate::core::geometry::GridGeometryTable;
use crate::types::{GeoTransform, GridResult, GridShape, Hemisphere, Resolution};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Caller-supplied grid selection; `None` means "work it out"
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridRequest {
    pub hemisphere: Option<Hemisphere>,
    pub resolution: Option<Resolution>,
}

impl GridRequest {
    pub fn new(hemisphere: Option<Hemisphere>, resolution: Option<Resolution>) -> Self {
        Self { hemisphere, resolution }
    }

    /// Validate raw user input before any file is touched
    pub fn from_raw(hemisphere: Option<&str>, resolution_km: Option<f64>) -> GridResult<Self> {
        let hemisphere = hemisphere.map(str::parse::<Hemisphere>).transpose()?;
        let resolution = resolution_km.map(Resolution::try_from).transpose()?;
        Ok(Self { hemisphere, resolution })
    }
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSource {
    Explicit,
    Filename,
    Default,
}

/// Concrete grid selection for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGrid {
    pub hemisphere: Hemisphere,
    pub resolution: Resolution,
    pub shape: GridShape,
    pub geotransform: GeoTransform,
    pub epsg: u32,
    pub hemisphere_source: ValueSource,
    pub resolution_source: ValueSource,
    /// Everything the file name told us, when it was consulted and matched
    pub filename_metadata: Option<FilenameMetadata>,
}

/// Explicit value -> file name -> hard default
#[derive(Debug, Clone)]
pub struct ParameterResolver {
    geometry: GridGeometryTable,
    extractor: FilenameMetadataExtractor,
    default_hemisphere: Hemisphere,
    default_resolution: Resolution,
}

impl ParameterResolver {
    pub const DEFAULT_HEMISPHERE: Hemisphere = Hemisphere::South;
    pub const DEFAULT_RESOLUTION: Resolution = Resolution::Km25;

    pub fn new(geometry: GridGeometryTable, extractor: FilenameMetadataExtractor) -> Self {
        Self {
            geometry,
            extractor,
            default_hemisphere: Self::DEFAULT_HEMISPHERE,
            default_resolution: Self::DEFAULT_RESOLUTION,
        }
    }

    /// Resolver over the NSIDC polar stereographic grids
    pub fn nsidc() -> GridResult<Self> {
        Ok(Self::new(
            GridGeometryTable::nsidc_polar_stereo()?,
            FilenameMetadataExtractor::new()?,
        ))
    }

    pub fn with_default_hemisphere(mut self, hemisphere: Hemisphere) -> Self {
        self.default_hemisphere = hemisphere;
        self
    }

    pub fn with_default_resolution(mut self, resolution: Resolution) -> Self {
        self.default_resolution = resolution;
        self
    }

    pub fn geometry(&self) -> &GridGeometryTable {
        &self.geometry
    }

    pub fn extractor(&self) -> &FilenameMetadataExtractor {
        &self.extractor
    }

    /// Fill in whatever `request` leaves open
    pub fn resolve<P: AsRef<Path>>(&self, filename: P, request: &GridRequest) -> ResolvedGrid {
        let filename = filename.as_ref();
        let metadata = if request.hemisphere.is_none() || request.resolution.is_none() {
            self.extractor.extract(filename)
        } else {
            None
        };

        let (hemisphere, hemisphere_source) = pick(
            request.hemisphere,
            metadata.as_ref().map(|m| m.hemisphere),
            self.default_hemisphere,
        );
        let (resolution, resolution_source) = pick(
            request.resolution,
            metadata.as_ref().map(|m| m.resolution),
            self.default_resolution,
        );

        if let Some(m) = &metadata {
            if hemisphere_source == ValueSource::Filename || resolution_source == ValueSource::Filename {
                log::debug!(
                    "{}: platform {}, acquired {}, {} GHz {}-pol, version {}",
                    filename.display(),
                    m.platform,
                    m.acquisition_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                    m.frequency_ghz,
                    m.polarization,
                    m.version
                );
            }
        }

        log::debug!(
            "Resolved {}: hemisphere {} ({:?}), resolution {} ({:?})",
            filename.display(),
            hemisphere,
            hemisphere_source,
            resolution,
            resolution_source
        );

        ResolvedGrid {
            hemisphere,
            resolution,
            shape: self.geometry.shape_for(hemisphere, resolution),
            geotransform: self.geometry.geotransform_for(hemisphere, resolution),
            epsg: self.geometry.epsg_for(hemisphere),
            hemisphere_source,
            resolution_source,
            filename_metadata: metadata,
        }
    }
}

fn pick<T>(explicit: Option<T>, from_name: Option<T>, default: T) -> (T, ValueSource) {
    match (explicit, from_name) {
        (Some(value), _) => (value, ValueSource::Explicit),
        (None, Some(value)) => (value, ValueSource::Filename),
        (None, None) => (default, ValueSource::Default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridError;
    use chrono::NaiveDate;

    #[test]
    fn test_explicit_resolution_wins() {
        let resolver = ParameterResolver::nsidc().unwrap();
        let request = GridRequest::new(None, Some(Resolution::Km6_25));
        let resolved = resolver.resolve("tb_f08_19870709_v5_s19h.bin", &request);

        assert_eq!(resolved.resolution, Resolution::Km6_25);
        assert_eq!(resolved.resolution_source, ValueSource::Explicit);
        assert_eq!(resolved.hemisphere, Hemisphere::South);
        assert_eq!(resolved.hemisphere_source, ValueSource::Filename);
        assert_eq!(resolved.shape, GridShape::new(1328, 1264));
    }

    #[test]
    fn test_filename_fills_gaps() {
        let resolver = ParameterResolver::nsidc().unwrap();
        let resolved = resolver.resolve("/data/tb_f17_20201231_v5_n85v.bin", &GridRequest::default());

        assert_eq!(resolved.hemisphere, Hemisphere::North);
        assert_eq!(resolved.resolution, Resolution::Km12_5);
        assert_eq!(resolved.shape, GridShape::new(896, 608));
        assert_eq!(resolved.epsg, 3411);

        let metadata = resolved.filename_metadata.expect("file name should match");
        assert_eq!(metadata.platform, "F17");
        assert_eq!(metadata.acquisition_date, NaiveDate::from_ymd_opt(2020, 12, 31));
        assert_eq!(metadata.frequency_ghz, 85);
        assert_eq!(metadata.polarization, 'V');
        assert_eq!(metadata.version, 5);
    }

    #[test]
    fn test_filename_not_consulted_when_fully_explicit() {
        let resolver = ParameterResolver::nsidc().unwrap();
        let request = GridRequest::new(Some(Hemisphere::North), Some(Resolution::Km25));
        let resolved = resolver.resolve("tb_f08_19870709_v5_s19h.bin", &request);

        assert_eq!(resolved.hemisphere, Hemisphere::North);
        assert!(resolved.filename_metadata.is_none());
    }

    #[test]
    fn test_hard_defaults() {
        let resolver = ParameterResolver::nsidc().unwrap();
        let resolved = resolver.resolve("nt_20201231_f17_v1.1_s.bin", &GridRequest::default());

        assert_eq!(resolved.hemisphere, Hemisphere::South);
        assert_eq!(resolved.resolution, Resolution::Km25);
        assert_eq!(resolved.hemisphere_source, ValueSource::Default);
        assert_eq!(resolved.resolution_source, ValueSource::Default);
        assert_eq!(resolved.shape, GridShape::new(332, 316));
        assert_eq!(resolved.epsg, 3412);
        assert!(resolved.filename_metadata.is_none());
    }

    #[test]
    fn test_custom_default_hemisphere() {
        let resolver = ParameterResolver::nsidc()
            .unwrap()
            .with_default_hemisphere(Hemisphere::North);
        let resolved = resolver.resolve("unknown.bin", &GridRequest::default());
        assert_eq!(resolved.hemisphere, Hemisphere::North);
        assert_eq!(resolved.shape, GridShape::new(448, 304));
    }

    #[test]
    fn test_raw_request_validation() {
        let request = GridRequest::from_raw(Some(" n "), Some(12.5)).unwrap();
        assert_eq!(request.hemisphere, Some(Hemisphere::North));
        assert_eq!(request.resolution, Some(Resolution::Km12_5));

        assert!(matches!(
            GridRequest::from_raw(Some("X"), None),
            Err(GridError::Configuration(_))
        ));
        assert!(matches!(
            GridRequest::from_raw(None, Some(30.0)),
            Err(GridError::Configuration(_))
        ));
        assert_eq!(GridRequest::from_raw(None, None).unwrap(), GridRequest::default());
    }
}
