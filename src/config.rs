//! JSON configuration of the `cld` tool.
//!
//! ```json
//! {
//!   "input": "portrait.jpg",
//!   "output": {
//!     "mask": "out/portrait_lines.png",
//!     "anti_aliased": "out/portrait_soft.png",
//!     "flow_preview": "out/portrait_flow.png",
//!     "report_json": "out/portrait_report.json"
//!   },
//!   "options": { "tau": 0.97, "etf_iterations": 2, "anti_alias": true }
//! }
//! ```
//!
//! Missing option fields take their defaults.
use crate::error::CldError;
use crate::image::OutputFormat;
use crate::options::CldOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    pub input: PathBuf,
    pub output: OutputConfig,
    #[serde(default)]
    pub options: CldOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Binary mask destination.
    pub mask: PathBuf,
    /// Destination of the anti-aliased mask; used when `anti_alias` is set.
    #[serde(default)]
    pub anti_aliased: Option<PathBuf>,
    /// Destination of the LIC preview; used when `visualize_flow` is set.
    #[serde(default)]
    pub flow_preview: Option<PathBuf>,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
    /// Encoding for every image output, overriding the file extensions.
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl OutputConfig {
    /// Format to encode `path` with.
    pub fn format_for(&self, path: &Path) -> Result<OutputFormat, CldError> {
        match self.format {
            Some(format) => Ok(format),
            None => OutputFormat::from_path(path),
        }
    }
}

/// Parse a configuration from a JSON string; `path` is only used in errors.
pub fn parse_config(path: &Path, json: &str) -> Result<ToolConfig, CldError> {
    let config: ToolConfig = serde_json::from_str(json).map_err(|e| CldError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.options.validate()?;
    Ok(config)
}

/// Read and validate a configuration file.
pub fn load_config(path: &Path) -> Result<ToolConfig, CldError> {
    let data = fs::read_to_string(path).map_err(|e| CldError::io(path, e))?;
    parse_config(path, &data)
}
