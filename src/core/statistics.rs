use crate::types::DecodedGrid;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Raster band statistics over valid (non no-data) pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub valid_count: usize,
}

impl BandStatistics {
    /// Statistics of a grid with no valid pixels
    pub fn empty() -> Self {
        Self {
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            std_dev: f64::NAN,
            valid_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.valid_count == 0
    }

    /// Compute over all pixels not equal to `nodata`
    pub fn compute(grid: &DecodedGrid, nodata: Option<f64>) -> Self {
        let values = grid.to_f64();
        Self::from_values(values.iter().copied(), nodata)
    }

    pub fn from_values<I: Iterator<Item = f64>>(values: I, nodata: Option<f64>) -> Self {
        let is_nodata = |v: f64| match nodata {
            Some(nd) if nd.is_nan() => v.is_nan(),
            Some(nd) => v == nd,
            None => false,
        };

        let valid: Array1<f64> = values.filter(|v| !is_nodata(*v)).collect();
        let mean = match valid.mean() {
            Some(mean) => mean,
            None => return Self::empty(),
        };

        let (min, max) = valid
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        // Second pass over deviations from the mean
        let variance = valid.mapv(|v| (v - mean).powi(2)).sum() / valid.len() as f64;

        Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
            valid_count: valid.len(),
        }
    }
}
