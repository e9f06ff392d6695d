//! Python bindings

use crate::core::{GridRequest, ParameterResolver};
use crate::io::BinReader;
use crate::types::{with_grid, DecodeParameters, ElementWidth, GridError, Hemisphere, Resolution};
use numpy::IntoPyArray;
use pyo3::prelude::*;

fn to_py_err(e: GridError) -> PyErr {
    match e {
        GridError::Io(_) => PyErr::new::<pyo3::exceptions::PyIOError, _>(format!("{}", e)),
        _ => PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("{}", e)),
    }
}

/// Read an NSIDC flat binary file into a numpy array
#[pyfunction]
#[pyo3(signature = (
    path,
    hemisphere = None,
    resolution = None,
    header_size = 0,
    element_size = 2,
    signed = false,
    output_type = "float",
    multiplier = "auto"
))]
#[allow(clippy::too_many_arguments)]
fn read_nsidc_bin(
    py: Python<'_>,
    path: &str,
    hemisphere: Option<&str>,
    resolution: Option<f64>,
    header_size: usize,
    element_size: usize,
    signed: bool,
    output_type: &str,
    multiplier: &str,
) -> PyResult<PyObject> {
    let request = GridRequest::from_raw(hemisphere, resolution).map_err(to_py_err)?;
    let params = DecodeParameters {
        header_size,
        element_width: ElementWidth::try_from(element_size).map_err(to_py_err)?,
        signed,
        output_kind: output_type.parse().map_err(to_py_err)?,
        multiplier: multiplier.parse().map_err(to_py_err)?,
    };

    let resolver = ParameterResolver::nsidc().map_err(to_py_err)?;
    let resolved = resolver.resolve(path, &request);
    let grid = BinReader::read_grid(path, resolved.shape, &params).map_err(to_py_err)?;

    Ok(with_grid!(grid, arr => {
        let array: &PyAny = arr.into_pyarray(py);
        array.into_py(py)
    }))
}

/// (hemisphere, resolution_km) from an NSIDC file name, `None`s if unrecognized
#[pyfunction]
fn hemisphere_and_resolution_from_filename(filename: &str) -> PyResult<(Option<String>, Option<f64>)> {
    let resolver = ParameterResolver::nsidc().map_err(to_py_err)?;
    let (hemisphere, resolution) = resolver.extractor().hemisphere_and_resolution(filename);
    Ok((
        hemisphere.map(|h| h.to_string()),
        resolution.map(|r| r.km()),
    ))
}

/// GDAL geotransform (meters) of an NSIDC polar stereographic grid
#[pyfunction]
fn nsidc_geotransform(hemisphere: &str, resolution: f64) -> PyResult<(f64, f64, f64, f64, f64, f64)> {
    let hemisphere: Hemisphere = hemisphere.parse().map_err(to_py_err)?;
    let resolution = Resolution::try_from(resolution).map_err(to_py_err)?;
    let resolver = ParameterResolver::nsidc().map_err(to_py_err)?;
    let gt = resolver.geometry().geotransform_for(hemisphere, resolution);
    Ok((
        gt.top_left_x,
        gt.pixel_width,
        gt.rotation_x,
        gt.top_left_y,
        gt.rotation_y,
        gt.pixel_height,
    ))
}

/// Python module definition
#[pymodule]
fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(read_nsidc_bin, m)?)?;
    m.add_function(wrap_pyfunction!(hemisphere_and_resolution_from_filename, m)?)?;
    m.add_function(wrap_pyfunction!(nsidc_geotransform, m)?)?;
    Ok(())
}
