use crate::types::{GridError, GridResult, Hemisphere, Resolution};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// NSIDC-0001 brightness temperature file stem, e.g. `tb_f08_19870709_v5_s19h`
const NSIDC_0001_PATTERN: &str = r"^tb_f(\d{2})_(\d{8})_v(\d)_([ns])(\d{2})([vh])";

/// Channel frequency (GHz) -> grid resolution for NSIDC passive-microwave products
pub const FREQUENCY_RESOLUTIONS: [(u32, Resolution); 5] = [
    (19, Resolution::Km25),
    (22, Resolution::Km25),
    (37, Resolution::Km25),
    (85, Resolution::Km12_5),
    (91, Resolution::Km12_5),
];

/// Metadata recovered from an NSIDC file name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilenameMetadata {
    pub hemisphere: Hemisphere,
    pub resolution: Resolution,
    pub frequency_ghz: u32,
    /// 'H' or 'V'
    pub polarization: char,
    /// DMSP platform id, e.g. "F08"
    pub platform: String,
    pub acquisition_date: Option<NaiveDate>,
    pub version: u32,
}

/// Parses hemisphere and resolution hints out of NSIDC file names
#[derive(Debug, Clone)]
pub struct FilenameMetadataExtractor {
    pattern: Regex,
    frequencies: Vec<(u32, Resolution)>,
}

impl FilenameMetadataExtractor {
    pub fn new() -> GridResult<Self> {
        let pattern = Regex::new(NSIDC_0001_PATTERN)
            .map_err(|e| GridError::Configuration(format!("Regex error: {}", e)))?;
        Ok(Self {
            pattern,
            frequencies: FREQUENCY_RESOLUTIONS.to_vec(),
        })
    }

    /// Resolution for a channel frequency, if the frequency is known
    pub fn resolution_for_frequency(&self, frequency_ghz: u32) -> Option<Resolution> {
        self.frequencies
            .iter()
            .find(|(f, _)| *f == frequency_ghz)
            .map(|(_, r)| *r)
    }

    /// Match the file stem against the naming convention
    ///
    /// Directory and extension are stripped first. Fails with
    /// `FilenamePatternUnmatched` when the stem does not follow the
    /// convention or names an unknown frequency.
    pub fn try_extract<P: AsRef<Path>>(&self, filename: P) -> GridResult<FilenameMetadata> {
        let path = filename.as_ref();
        let unmatched = |reason: String| GridError::FilenamePatternUnmatched {
            filename: path.display().to_string(),
            reason,
        };

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| unmatched("no file name".to_string()))?;

        let captures = self
            .pattern
            .captures(stem)
            .ok_or_else(|| unmatched(format!("'{}' does not match {}", stem, self.pattern)))?;

        // All groups below are non-optional digit or letter classes
        let platform = format!("F{}", &captures[1]);
        let acquisition_date = NaiveDate::parse_from_str(&captures[2], "%Y%m%d").ok();
        let version = captures[3]
            .parse::<u32>()
            .map_err(|e| unmatched(format!("bad version: {}", e)))?;
        let hemisphere = match &captures[4] {
            "n" => Hemisphere::North,
            _ => Hemisphere::South,
        };
        let frequency_ghz = captures[5]
            .parse::<u32>()
            .map_err(|e| unmatched(format!("bad frequency: {}", e)))?;
        let polarization = if &captures[6] == "v" { 'V' } else { 'H' };

        let resolution = self
            .resolution_for_frequency(frequency_ghz)
            .ok_or_else(|| unmatched(format!("unknown frequency {} GHz", frequency_ghz)))?;

        Ok(FilenameMetadata {
            hemisphere,
            resolution,
            frequency_ghz,
            polarization,
            platform,
            acquisition_date,
            version,
        })
    }

    /// Advisory extraction: any mismatch yields `None`
    pub fn extract<P: AsRef<Path>>(&self, filename: P) -> Option<FilenameMetadata> {
        match self.try_extract(filename) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                log::debug!("{}", e);
                None
            }
        }
    }

    /// (hemisphere, resolution) pair, both `None` on mismatch
    pub fn hemisphere_and_resolution<P: AsRef<Path>>(
        &self,
        filename: P,
    ) -> (Option<Hemisphere>, Option<Resolution>) {
        match self.extract(filename) {
            Some(metadata) => (Some(metadata.hemisphere), Some(metadata.resolution)),
            None => (None, None),
        }
    }
}
