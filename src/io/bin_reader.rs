use crate::core::decoder::BinaryGridDecoder;
use crate::types::{DecodeParameters, DecodedGrid, GridResult, GridShape};
use std::path::Path;

/// Reader for NSIDC flat binary (.bin) files
pub struct BinReader;

impl BinReader {
    /// Read the whole file; the handle is closed before this returns
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> GridResult<Vec<u8>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        log::info!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(bytes)
    }

    /// Read and decode a file into a grid of `shape`
    pub fn read_grid<P: AsRef<Path>>(
        path: P,
        shape: GridShape,
        params: &DecodeParameters,
    ) -> GridResult<DecodedGrid> {
        let path = path.as_ref();
        let bytes = Self::read_bytes(path)?;
        BinaryGridDecoder::new(*params).decode(&bytes, shape, &path.display().to_string())
    }
}
