//! Print an NSIDC flat binary grid as whitespace-separated rows.
//!
//! Redirect stdout to save the grid as a text file:
//!
//! ```text
//! nsidc-bin-to-text tb_f08_19870709_v5_s19h.bin > tb.txt
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use polarbin::{Converter, DecodeParameters, ElementWidth, GridRequest, ParameterResolver};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nsidc-bin-to-text")]
#[command(about = "Reads an NSIDC .bin file and prints its grid values to stdout")]
struct Args {
    /// Source file (.bin)
    src: PathBuf,

    /// Resolution in km: 6.25, 12.5 or 25 (default: from the file name, else 25)
    #[arg(short, long)]
    resolution: Option<f64>,

    /// Hemisphere, N or S (default: from the file name, else S)
    #[arg(long)]
    hemisphere: Option<String>,

    /// Size of the file header, in bytes
    #[arg(long, visible_alias = "hs", default_value_t = 0)]
    header_size: usize,

    /// Size of each data element, in bytes (1, 2, 4 or 8)
    #[arg(long, visible_alias = "es", default_value_t = 2)]
    element_size: usize,

    /// Output data type: 'int' or 'float'
    #[arg(long, visible_alias = "ot", default_value = "int")]
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
    let params = DecodeParameters {
        header_size: args.header_size,
        element_width: ElementWidth::try_from(args.element_size)?,
        signed: args.signed,
        output_kind: args.output_type.parse()?,
        multiplier: args.multiplier.parse()?,
    };

    let converter = Converter::new(ParameterResolver::nsidc()?, params);

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    converter
        .convert_to_text(&args.src, &request, &mut out)
        .with_context(|| format!("Failed to decode {}", args.src.display()))?;
    out.flush()?;

    Ok(())
}
