use crate::types::{GeoTransform, GridError, GridResult, GridShape, Hemisphere, Resolution};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Extent of a polar-stereographic grid, in km from the pole
///
/// See https://nsidc.org/data/polar-stereo/ps_grids.html
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridExtentKm {
    pub left: i64,
    pub right: i64,
    pub top: i64,
    pub bottom: i64,
}

/// Fixed geometry of one hemisphere's grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HemisphereGrid {
    pub extent_km: GridExtentKm,
    /// Shape of the 25 km grid, derived from the extent
    pub base_shape: GridShape,
    pub epsg: u32,
}

impl HemisphereGrid {
    /// Build from the extent, deriving the 25 km shape by exact division
    pub fn from_extent(extent_km: GridExtentKm, epsg: u32) -> GridResult<Self> {
        let base_km = Resolution::Km25.km() as i64;
        let height = extent_km.top - extent_km.bottom;
        let width = extent_km.right - extent_km.left;

        if height <= 0 || width <= 0 || height % base_km != 0 || width % base_km != 0 {
            return Err(GridError::Configuration(format!(
                "Grid extent {:?} is not a positive multiple of {} km",
                extent_km, base_km
            )));
        }

        Ok(Self {
            extent_km,
            base_shape: GridShape::new((height / base_km) as usize, (width / base_km) as usize),
            epsg,
        })
    }

    /// Upper-left corner (x, y) in km
    pub fn upper_left_km(&self) -> (f64, f64) {
        (self.extent_km.left as f64, self.extent_km.top as f64)
    }
}

/// Immutable (hemisphere, resolution) -> geometry table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGeometryTable {
    north: HemisphereGrid,
    south: HemisphereGrid,
}

impl GridGeometryTable {
    pub fn new(north: HemisphereGrid, south: HemisphereGrid) -> Self {
        Self { north, south }
    }

    /// The NSIDC polar stereographic grids (EPSG 3411 / 3412)
    pub fn nsidc_polar_stereo() -> GridResult<Self> {
        let north = HemisphereGrid::from_extent(
            GridExtentKm { left: -3850, right: 3750, top: 5850, bottom: -5350 },
            3411,
        )?;
        let south = HemisphereGrid::from_extent(
            GridExtentKm { left: -3950, right: 3950, top: 4350, bottom: -3950 },
            3412,
        )?;
        Ok(Self::new(north, south))
    }

    pub fn hemisphere(&self, hemisphere: Hemisphere) -> &HemisphereGrid {
        match hemisphere {
            Hemisphere::North => &self.north,
            Hemisphere::South => &self.south,
        }
    }

    /// Pixel grid shape, the 25 km shape scaled by the resolution factor
    pub fn shape_for(&self, hemisphere: Hemisphere, resolution: Resolution) -> GridShape {
        self.hemisphere(hemisphere)
            .base_shape
            .scaled(resolution.scale_factor())
    }

    /// Shape lookup from a raw km value, rejecting non-canonical resolutions
    pub fn shape_for_km(&self, hemisphere: Hemisphere, resolution_km: f64) -> GridResult<GridShape> {
        let resolution = Resolution::try_from(resolution_km)?;
        Ok(self.shape_for(hemisphere, resolution))
    }

    /// Upper-left corner in km; identical for every resolution
    pub fn origin_for(&self, hemisphere: Hemisphere) -> (f64, f64) {
        self.hemisphere(hemisphere).upper_left_km()
    }

    pub fn epsg_for(&self, hemisphere: Hemisphere) -> u32 {
        self.hemisphere(hemisphere).epsg
    }

    /// GDAL geotransform in meters
    pub fn geotransform_for(&self, hemisphere: Hemisphere, resolution: Resolution) -> GeoTransform {
        let (ul_x_km, ul_y_km) = self.origin_for(hemisphere);
        GeoTransform {
            top_left_x: ul_x_km * 1000.0,
            pixel_width: resolution.meters(),
            rotation_x: 0.0,
            top_left_y: ul_y_km * 1000.0,
            rotation_y: 0.0,
            pixel_height: -resolution.meters(),
        }
    }

    /// Upper-left corner coordinates (km) of every column and every row
    pub fn coordinates_for(
        &self,
        hemisphere: Hemisphere,
        resolution: Resolution,
    ) -> (Array1<f64>, Array1<f64>) {
        let (ul_x, ul_y) = self.origin_for(hemisphere);
        let shape = self.shape_for(hemisphere, resolution);
        let step = resolution.km();

        let x = Array1::from_iter((0..shape.cols).map(|col| ul_x + step * col as f64));
        let y = Array1::from_iter((0..shape.rows).map(|row| ul_y - step * row as f64));
        (x, y)
    }
}
