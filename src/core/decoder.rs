use crate::types::{
    DecodeParameters, DecodedGrid, ElementWidth, FloatPrecision, GridError, GridResult, GridShape,
    Multiplier, OutputKind,
};
use ndarray::Array2;
use num_traits::AsPrimitive;

/// Fixed-width integer sample stored little-endian
pub trait LeSample: Copy + Send + Sync + AsPrimitive<f64> {
    const WIDTH: usize;

    /// `bytes.len()` must equal `WIDTH`
    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_le_sample {
    ($($t:ty),*) => {
        $(
            impl LeSample for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    buf.copy_from_slice(bytes);
                    <$t>::from_le_bytes(buf)
                }
            }
        )*
    };
}

impl_le_sample!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Decode every `T::WIDTH`-byte window of `payload` in order and map it
fn decode_map<T, F, M>(payload: &[u8], map: M) -> Vec<F>
where
    T: LeSample,
    F: Send,
    M: Fn(T) -> F + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        payload
            .par_chunks_exact(T::WIDTH)
            .map(|window| map(T::from_le_slice(window)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        payload
            .chunks_exact(T::WIDTH)
            .map(|window| map(T::from_le_slice(window)))
            .collect()
    }
}

fn into_grid<F>(shape: GridShape, values: Vec<F>) -> GridResult<Array2<F>> {
    Array2::from_shape_vec(shape.dim(), values)
        .map_err(|e| GridError::Configuration(format!("Failed to reshape decoded samples: {}", e)))
}

/// Decoder for headered flat binary grids of little-endian integers
#[derive(Debug, Clone, Copy)]
pub struct BinaryGridDecoder {
    params: DecodeParameters,
}

impl BinaryGridDecoder {
    pub fn new(params: DecodeParameters) -> Self {
        Self { params }
    }

    /// Number of bytes the payload must have for `shape`
    pub fn required_len(&self, shape: GridShape) -> usize {
        shape.len() * self.params.element_width.bytes()
    }

    /// Decode `buffer` (header included) into a grid of `shape`
    ///
    /// `source` names the buffer's origin in error messages. The payload
    /// after the header must hold exactly `rows * cols` samples; anything
    /// else is a `SizeMismatch` and no partial grid is produced.
    pub fn decode(&self, buffer: &[u8], shape: GridShape, source: &str) -> GridResult<DecodedGrid> {
        let start = std::time::Instant::now();
        let payload = buffer.get(self.params.header_size..).unwrap_or(&[]);
        let width = self.params.element_width.bytes();

        if payload.len() != self.required_len(shape) {
            return Err(GridError::SizeMismatch {
                file: source.to_string(),
                actual_bytes: payload.len(),
                actual_elements: payload.len() / width,
                element_width: width,
                shape,
            });
        }

        if let (OutputKind::Integer, Multiplier::Value(m)) =
            (self.params.output_kind, self.params.multiplier)
        {
            if m != 1.0 {
                log::warn!("Multiplier {} ignored for integer output of {}", m, source);
            }
        }

        let grid = match (self.params.element_width, self.params.signed) {
            (ElementWidth::One, false) => self.decode_as::<u8>(payload, shape, DecodedGrid::U8),
            (ElementWidth::One, true) => self.decode_as::<i8>(payload, shape, DecodedGrid::I8),
            (ElementWidth::Two, false) => self.decode_as::<u16>(payload, shape, DecodedGrid::U16),
            (ElementWidth::Two, true) => self.decode_as::<i16>(payload, shape, DecodedGrid::I16),
            (ElementWidth::Four, false) => self.decode_as::<u32>(payload, shape, DecodedGrid::U32),
            (ElementWidth::Four, true) => self.decode_as::<i32>(payload, shape, DecodedGrid::I32),
            (ElementWidth::Eight, false) => self.decode_as::<u64>(payload, shape, DecodedGrid::U64),
            (ElementWidth::Eight, true) => self.decode_as::<i64>(payload, shape, DecodedGrid::I64),
        }?;

        log::debug!(
            "Decoded {} {} grid {} from {} in {:?}",
            grid.element_type_name(),
            if self.params.signed { "signed" } else { "unsigned" },
            shape,
            source,
            start.elapsed()
        );

        Ok(grid)
    }

    /// Decode samples as `T`, then convert per the output kind
    fn decode_as<T: LeSample>(
        &self,
        payload: &[u8],
        shape: GridShape,
        wrap: fn(Array2<T>) -> DecodedGrid,
    ) -> GridResult<DecodedGrid> {
        let multiplier = self.params.effective_multiplier();

        match self.params.output_kind {
            OutputKind::Integer => {
                let values = decode_map(payload, |v: T| v);
                Ok(wrap(into_grid(shape, values)?))
            }
            OutputKind::Float(FloatPrecision::Double) => {
                let values = decode_map(payload, move |v: T| v.as_() * multiplier);
                Ok(DecodedGrid::F64(into_grid(shape, values)?))
            }
            OutputKind::Float(FloatPrecision::Single) => {
                let values = decode_map(payload, move |v: T| (v.as_() * multiplier) as f32);
                Ok(DecodedGrid::F32(into_grid(shape, values)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn encode_u16(values: &[u16], header: usize) -> Vec<u8> {
        let mut bytes = vec![0xAB; header];
        for v in values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_integer_roundtrip_with_header() {
        let values: Vec<u16> = (0..12).map(|v| v * 1000 + 7).collect();
        let buffer = encode_u16(&values, 300);

        let params = DecodeParameters::default()
            .with_header_size(300)
            .with_output_kind(OutputKind::Integer);
        let grid = BinaryGridDecoder::new(params)
            .decode(&buffer, GridShape::new(3, 4), "test.bin")
            .unwrap();

        let expected = Array2::from_shape_vec((3, 4), values).unwrap();
        assert_eq!(grid, DecodedGrid::U16(expected));
    }

    #[test]
    fn test_row_major_layout() {
        let values: Vec<u16> = (0..6).collect();
        let params = DecodeParameters::default().with_output_kind(OutputKind::Integer);
        let grid = BinaryGridDecoder::new(params)
            .decode(&encode_u16(&values, 0), GridShape::new(2, 3), "layout.bin")
            .unwrap();

        match grid {
            DecodedGrid::U16(arr) => {
                assert_eq!(arr[[0, 2]], 2);
                assert_eq!(arr[[1, 0]], 3);
                assert_eq!(arr[[1, 2]], 5);
            }
            other => panic!("unexpected grid type {}", other.element_type_name()),
        }
    }

    #[test]
    fn test_signed_twos_complement() {
        let values: Vec<i16> = vec![-1, -32768, 32767, 0];
        let buffer: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();

        let signed = DecodeParameters::default()
            .with_signed(true)
            .with_output_kind(OutputKind::Integer);
        let grid = BinaryGridDecoder::new(signed)
            .decode(&buffer, GridShape::new(2, 2), "signed.bin")
            .unwrap();
        assert_eq!(grid, DecodedGrid::I16(Array2::from_shape_vec((2, 2), values).unwrap()));

        let unsigned = DecodeParameters::default().with_output_kind(OutputKind::Integer);
        let grid = BinaryGridDecoder::new(unsigned)
            .decode(&buffer, GridShape::new(2, 2), "signed.bin")
            .unwrap();
        assert_eq!(
            grid,
            DecodedGrid::U16(Array2::from_shape_vec((2, 2), vec![65535, 32768, 32767, 0]).unwrap())
        );
    }

    #[test]
    fn test_all_widths_symmetric() {
        let shape = GridShape::new(1, 2);
        let cases: Vec<(usize, bool, Vec<u8>, DecodedGrid)> = vec![
            (1, false, vec![0xFF, 0x01], DecodedGrid::U8(Array2::from_shape_vec((1, 2), vec![255, 1]).unwrap())),
            (1, true, vec![0xFF, 0x01], DecodedGrid::I8(Array2::from_shape_vec((1, 2), vec![-1, 1]).unwrap())),
            (
                4,
                false,
                [u32::MAX.to_le_bytes(), 7u32.to_le_bytes()].concat(),
                DecodedGrid::U32(Array2::from_shape_vec((1, 2), vec![u32::MAX, 7]).unwrap()),
            ),
            (
                4,
                true,
                [(-5i32).to_le_bytes(), 7i32.to_le_bytes()].concat(),
                DecodedGrid::I32(Array2::from_shape_vec((1, 2), vec![-5, 7]).unwrap()),
            ),
            (
                8,
                false,
                [u64::MAX.to_le_bytes(), 9u64.to_le_bytes()].concat(),
                DecodedGrid::U64(Array2::from_shape_vec((1, 2), vec![u64::MAX, 9]).unwrap()),
            ),
            (
                8,
                true,
                [i64::MIN.to_le_bytes(), 9i64.to_le_bytes()].concat(),
                DecodedGrid::I64(Array2::from_shape_vec((1, 2), vec![i64::MIN, 9]).unwrap()),
            ),
        ];

        for (width, signed, buffer, expected) in cases {
            let params = DecodeParameters::default()
                .with_element_width(ElementWidth::try_from(width).unwrap())
                .with_signed(signed)
                .with_output_kind(OutputKind::Integer);
            let grid = BinaryGridDecoder::new(params).decode(&buffer, shape, "w.bin").unwrap();
            assert_eq!(grid, expected, "width {} signed {}", width, signed);
        }
    }

    #[test]
    fn test_float_auto_multiplier() {
        let buffer = encode_u16(&[2731, 0, 1, 65535], 0);
        let grid = BinaryGridDecoder::new(DecodeParameters::default())
            .decode(&buffer, GridShape::new(2, 2), "tb.bin")
            .unwrap();

        match grid {
            DecodedGrid::F64(arr) => {
                assert_relative_eq!(arr[[0, 0]], 273.1, epsilon = 1e-9);
                assert_relative_eq!(arr[[0, 1]], 0.0);
                assert_relative_eq!(arr[[1, 0]], 0.1, epsilon = 1e-12);
                assert_relative_eq!(arr[[1, 1]], 6553.5, epsilon = 1e-9);
            }
            other => panic!("unexpected grid type {}", other.element_type_name()),
        }
    }

    #[test]
    fn test_float32_explicit_multiplier() {
        let buffer: Vec<u8> = [(-40i16).to_le_bytes(), 250i16.to_le_bytes()].concat();
        let params = DecodeParameters::default()
            .with_signed(true)
            .with_output_kind(OutputKind::Float(FloatPrecision::Single))
            .with_multiplier(Multiplier::Value(0.5));
        let grid = BinaryGridDecoder::new(params)
            .decode(&buffer, GridShape::new(1, 2), "f32.bin")
            .unwrap();

        assert_eq!(
            grid,
            DecodedGrid::F32(Array2::from_shape_vec((1, 2), vec![-20.0f32, 125.0]).unwrap())
        );
    }

    #[test]
    fn test_integer_output_ignores_multiplier() {
        let buffer = encode_u16(&[10, 20], 0);
        let params = DecodeParameters::default()
            .with_output_kind(OutputKind::Integer)
            .with_multiplier(Multiplier::Value(0.1));
        let grid = BinaryGridDecoder::new(params)
            .decode(&buffer, GridShape::new(1, 2), "int.bin")
            .unwrap();
        assert_eq!(grid, DecodedGrid::U16(Array2::from_shape_vec((1, 2), vec![10, 20]).unwrap()));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let decoder = BinaryGridDecoder::new(DecodeParameters::default());
        let shape = GridShape::new(2, 2);

        for len in [0usize, 1, 6, 7, 9, 10] {
            let buffer = vec![0u8; len];
            match decoder.decode(&buffer, shape, "bad.bin") {
                Err(GridError::SizeMismatch { file, actual_bytes, shape: s, .. }) => {
                    assert_eq!(file, "bad.bin");
                    assert_eq!(actual_bytes, len);
                    assert_eq!(s, shape);
                }
                other => panic!("expected size mismatch for {} bytes, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_header_longer_than_buffer() {
        let params = DecodeParameters::default().with_header_size(300);
        let result = BinaryGridDecoder::new(params).decode(&[0u8; 8], GridShape::new(2, 2), "short.bin");
        assert!(matches!(
            result,
            Err(GridError::SizeMismatch { actual_bytes: 0, .. })
        ));
    }

    #[test]
    fn test_decode_is_idempotent() {
        let values: Vec<u16> = (0..64).map(|v| v * 997).collect();
        let buffer = encode_u16(&values, 0);
        let decoder = BinaryGridDecoder::new(DecodeParameters::default());

        let first = decoder.decode(&buffer, GridShape::new(8, 8), "x.bin").unwrap();
        let second = decoder.decode(&buffer, GridShape::new(8, 8), "x.bin").unwrap();
        match (first, second) {
            (DecodedGrid::F64(a), DecodedGrid::F64(b)) => {
                assert!(a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits()));
            }
            _ => panic!("expected f64 grids"),
        }
    }
}
