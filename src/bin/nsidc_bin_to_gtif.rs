//! Write an NSIDC flat binary grid to a georeferenced GeoTIFF.

use anyhow::{Context, Result};
use clap::Parser;
use polarbin::io::{default_raster_path, parse_nodata, GeoTiffWriter};
use polarbin::{Converter, DecodeParameters, ElementWidth, GridRequest, ParameterResolver};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nsidc-bin-to-gtif")]
#[command(about = "Outputs a georeferenced GeoTIFF (.tif) from an NSIDC flat binary (.bin) file")]
struct Args {
    /// Source file (.bin)
    src: PathBuf,

    /// Destination file (default: the source path with a .tif extension)
    #[arg(long)]
    dest: Option<PathBuf>,

    /// Resolution in km: 6.25, 12.5 or 25 (default: from the file name, else 25)
    #[arg(short, long)]
    resolution: Option<f64>,

    /// Hemisphere, N or S (default: from the file name, else S)
    #[arg(long)]
    hemisphere: Option<String>,

    /// No-data value: a number, or 'None'
    #[arg(long, visible_alias = "nd", default_value = "None")]
    nodata: String,

    /// Size of the file header, in bytes
    #[arg(long, visible_alias = "hs", default_value_t = 0)]
    header_size: usize,

    /// Size of each data element, in bytes (1, 2, 4 or 8)
    #[arg(long, visible_alias = "es", default_value_t = 2)]
    element_size: usize,

    /// Output data type: 'int', 'float' or 'float32'
    #[arg(long, visible_alias = "ot", default_value = "float")]
    output_type: String,

    /// Multiplier, or 'auto' (1 for integers, 0.1 for floats)
    #[arg(short, long, default_value = "auto")]
    multiplier: String,

    /// Read samples as signed integers
    #[arg(short, long)]
    signed: bool,

    /// Increase output verbosity
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Everything is validated before the file is opened
    let request = GridRequest::from_raw(args.hemisphere.as_deref(), args.resolution)?;
    let nodata = parse_nodata(&args.nodata)?;
    let params = DecodeParameters {
        header_size: args.header_size,
        element_width: ElementWidth::try_from(args.element_size)?,
        signed: args.signed,
        output_kind: args.output_type.parse()?,
        multiplier: args.multiplier.parse()?,
    };

    let dest = default_raster_path(&args.src, args.dest.as_deref());
    let converter = Converter::new(ParameterResolver::nsidc()?, params);
    let mut writer = GeoTiffWriter::new(&dest);

    converter
        .convert_to_raster(&args.src, &request, &mut writer, nodata)
        .with_context(|| format!("Failed to convert {} to {}", args.src.display(), dest.display()))?;

    Ok(())
}
