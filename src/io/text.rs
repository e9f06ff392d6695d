use crate::types::{with_grid, DecodedGrid, GridResult};
use ndarray::Array2;
use std::fmt::Debug;
use std::io::Write;

/// Write a grid as whitespace-separated rows, one line per row
///
/// Integers print as-is; floats always carry a decimal point (`0.0`, `273.1`).
pub fn write_grid_text<W: Write>(grid: &DecodedGrid, writer: &mut W) -> GridResult<()> {
    match grid {
        DecodedGrid::F32(arr) => write_rows(arr, writer, |v| format!("{:?}", v)),
        DecodedGrid::F64(arr) => write_rows(arr, writer, |v| format!("{:?}", v)),
        other => with_grid!(other, arr => write_rows(arr, writer, |v| v.to_string())),
    }
}

fn write_rows<T, W, F>(arr: &Array2<T>, writer: &mut W, format: F) -> GridResult<()>
where
    T: Debug,
    W: Write,
    F: Fn(&T) -> String,
{
    for row in arr.rows() {
        let line: Vec<String> = row.iter().map(&format).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}
