use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Polar hemisphere of an NSIDC polar-stereographic grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Single upper-case letter used by NSIDC file names and the CLI
    pub fn letter(&self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Hemisphere {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "N" => Ok(Hemisphere::North),
            "S" => Ok(Hemisphere::South),
            _ => Err(GridError::Configuration(format!(
                "Unknown hemisphere: '{}' (expected N or S)",
                s
            ))),
        }
    }
}

/// Grid cell size of an NSIDC polar-stereographic grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    Km25,
    Km12_5,
    Km6_25,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::Km25, Resolution::Km12_5, Resolution::Km6_25];

    /// Cell size in kilometers
    pub fn km(&self) -> f64 {
        match self {
            Resolution::Km25 => 25.0,
            Resolution::Km12_5 => 12.5,
            Resolution::Km6_25 => 6.25,
        }
    }

    /// Cell size in meters
    pub fn meters(&self) -> f64 {
        self.km() * 1000.0
    }

    /// Integer multiple of the 25 km grid shape
    pub fn scale_factor(&self) -> usize {
        match self {
            Resolution::Km25 => 1,
            Resolution::Km12_5 => 2,
            Resolution::Km6_25 => 4,
        }
    }
}

impl TryFrom<f64> for Resolution {
    type Error = GridError;

    fn try_from(km: f64) -> Result<Self, Self::Error> {
        Resolution::ALL
            .iter()
            .copied()
            .find(|r| r.km() == km)
            .ok_or_else(|| {
                GridError::Configuration(format!(
                    "Unknown resolution: {} km (expected 25, 12.5 or 6.25)",
                    km
                ))
            })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km", self.km())
    }
}

/// Pixel dimensions of a grid, in (rows, cols)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Both dimensions multiplied by an integer factor
    pub fn scaled(&self, factor: usize) -> Self {
        Self {
            rows: self.rows * factor,
            cols: self.cols * factor,
        }
    }

    /// (rows, cols) tuple, the ndarray dimension order
    pub fn dim(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

/// Geospatial transformation parameters (GDAL ordering)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub top_left_x: f64,
    pub pixel_width: f64,
    pub rotation_x: f64,
    pub top_left_y: f64,
    pub rotation_y: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.top_left_x,
            self.pixel_width,
            self.rotation_x,
            self.top_left_y,
            self.rotation_y,
            self.pixel_height,
        ]
    }
}

/// Number of bytes per stored sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementWidth {
    One,
    Two,
    Four,
    Eight,
}

impl ElementWidth {
    pub fn bytes(&self) -> usize {
        match self {
            ElementWidth::One => 1,
            ElementWidth::Two => 2,
            ElementWidth::Four => 4,
            ElementWidth::Eight => 8,
        }
    }
}

impl TryFrom<usize> for ElementWidth {
    type Error = GridError;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        match bytes {
            1 => Ok(ElementWidth::One),
            2 => Ok(ElementWidth::Two),
            4 => Ok(ElementWidth::Four),
            8 => Ok(ElementWidth::Eight),
            other => Err(GridError::UnsupportedElementWidth(other)),
        }
    }
}

/// Precision of floating-point output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatPrecision {
    Single,
    Double,
}

/// Numeric kind of the decoded grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Samples kept at their stored width and signedness
    Integer,
    /// Samples scaled by the multiplier
    Float(FloatPrecision),
}

impl Default for OutputKind {
    fn default() -> Self {
        OutputKind::Float(FloatPrecision::Double)
    }
}

impl FromStr for OutputKind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int" | "i" | "d" => Ok(OutputKind::Integer),
            "float" | "f" | "float64" | "f64" => Ok(OutputKind::Float(FloatPrecision::Double)),
            "float32" | "f32" => Ok(OutputKind::Float(FloatPrecision::Single)),
            _ => Err(GridError::UnsupportedOutputKind(s.to_string())),
        }
    }
}

/// Scale factor applied to floating-point output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Multiplier {
    /// 1 for integer output, 0.1 for floating-point output
    Auto,
    Value(f64),
}

impl Default for Multiplier {
    fn default() -> Self {
        Multiplier::Auto
    }
}

impl Multiplier {
    /// Multiplier stored NSIDC brightness temperatures are scaled by (2731 -> 273.1)
    pub const AUTO_FLOAT: f64 = 0.1;

    pub fn resolve(&self, kind: OutputKind) -> f64 {
        match (self, kind) {
            (Multiplier::Value(m), _) => *m,
            (Multiplier::Auto, OutputKind::Integer) => 1.0,
            (Multiplier::Auto, OutputKind::Float(_)) => Self::AUTO_FLOAT,
        }
    }
}

impl FromStr for Multiplier {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Multiplier::Auto);
        }
        trimmed
            .parse::<f64>()
            .map(Multiplier::Value)
            .map_err(|_| {
                GridError::Configuration(format!(
                    "Invalid multiplier: '{}' (expected a number or 'auto')",
                    s
                ))
            })
    }
}

/// Parameters of a single decode call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodeParameters {
    /// Bytes skipped at the start of the file
    pub header_size: usize,
    pub element_width: ElementWidth,
    /// Two's-complement interpretation of samples
    pub signed: bool,
    pub output_kind: OutputKind,
    pub multiplier: Multiplier,
}

impl Default for DecodeParameters {
    fn default() -> Self {
        Self {
            header_size: 0,
            element_width: ElementWidth::Two,
            signed: false,
            output_kind: OutputKind::default(),
            multiplier: Multiplier::Auto,
        }
    }
}

impl DecodeParameters {
    pub fn with_header_size(mut self, header_size: usize) -> Self {
        self.header_size = header_size;
        self
    }

    pub fn with_element_width(mut self, element_width: ElementWidth) -> Self {
        self.element_width = element_width;
        self
    }

    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    pub fn with_output_kind(mut self, output_kind: OutputKind) -> Self {
        self.output_kind = output_kind;
        self
    }

    pub fn with_multiplier(mut self, multiplier: Multiplier) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Multiplier after resolving `Auto` against the output kind
    pub fn effective_multiplier(&self) -> f64 {
        self.multiplier.resolve(self.output_kind)
    }
}

/// Decoded 2D grid, one variant per element type
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedGrid {
    U8(Array2<u8>),
    I8(Array2<i8>),
    U16(Array2<u16>),
    I16(Array2<i16>),
    U32(Array2<u32>),
    I32(Array2<i32>),
    U64(Array2<u64>),
    I64(Array2<i64>),
    F32(Array2<f32>),
    F64(Array2<f64>),
}

macro_rules! with_grid {
    ($grid:expr, $arr:ident => $body:expr) => {
        match $grid {
            DecodedGrid::U8($arr) => $body,
            DecodedGrid::I8($arr) => $body,
            DecodedGrid::U16($arr) => $body,
            DecodedGrid::I16($arr) => $body,
            DecodedGrid::U32($arr) => $body,
            DecodedGrid::I32($arr) => $body,
            DecodedGrid::U64($arr) => $body,
            DecodedGrid::I64($arr) => $body,
            DecodedGrid::F32($arr) => $body,
            DecodedGrid::F64($arr) => $body,
        }
    };
}

pub(crate) use with_grid;

impl DecodedGrid {
    pub fn shape(&self) -> GridShape {
        let (rows, cols) = with_grid!(self, arr => arr.dim());
        GridShape::new(rows, cols)
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, DecodedGrid::F32(_) | DecodedGrid::F64(_))
    }

    /// numpy-style element type name, for logging
    pub fn element_type_name(&self) -> &'static str {
        match self {
            DecodedGrid::U8(_) => "uint8",
            DecodedGrid::I8(_) => "int8",
            DecodedGrid::U16(_) => "uint16",
            DecodedGrid::I16(_) => "int16",
            DecodedGrid::U32(_) => "uint32",
            DecodedGrid::I32(_) => "int32",
            DecodedGrid::U64(_) => "uint64",
            DecodedGrid::I64(_) => "int64",
            DecodedGrid::F32(_) => "float32",
            DecodedGrid::F64(_) => "float64",
        }
    }

    /// Copy of the grid widened to f64
    pub fn to_f64(&self) -> Array2<f64> {
        with_grid!(self, arr => arr.mapv(|v| v as f64))
    }
}

/// Error types for grid decoding
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(
        "File {file} has {actual_elements} elements ({actual_bytes} bytes of {element_width}-byte samples), does not match grid size {shape}"
    )]
    SizeMismatch {
        file: String,
        actual_bytes: usize,
        actual_elements: usize,
        element_width: usize,
        shape: GridShape,
    },

    #[error("Unsupported element width: {0} bytes (expected 1, 2, 4 or 8)")]
    UnsupportedElementWidth(usize),

    #[error("Unsupported output kind: '{0}' (can be 'int', 'i', 'd', 'float', 'f', 'float32' or 'f32')")]
    UnsupportedOutputKind(String),

    #[error("Filename {filename} is not an NSIDC product name: {reason}")]
    FilenamePatternUnmatched { filename: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Raster output error: {0}")]
    Raster(String),

    #[cfg(feature = "raster")]
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),
}

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;
