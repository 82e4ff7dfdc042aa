pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, OutputFormat};
use crate::utils::error::{BillError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use self::toml_config::TomlConfig;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(feature = "cli", command(name = "split-bill"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Split an itemized bill into per-person amounts that add up to the total")
)]
pub struct CliConfig {
    /// Bill JSON file, or a directory of bill files
    pub input: String,

    /// Directory the results are written to [default: ./output]
    #[cfg_attr(feature = "cli", arg(long))]
    pub output_path: Option<String>,

    /// Output format [default: json]
    #[cfg_attr(feature = "cli", arg(long, value_enum))]
    pub format: Option<OutputFormat>,

    /// Path to a TOML configuration file
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub config: Option<String>,

    /// Maximum number of bills processed at once in directory mode [default: 4]
    #[cfg_attr(feature = "cli", arg(long))]
    pub concurrency: Option<usize>,

    /// Print results instead of writing files
    #[cfg_attr(feature = "cli", arg(long))]
    pub stdout: bool,

    /// Enable verbose output
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[cfg_attr(feature = "cli", arg(long))]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// 命令列有指定的值優先，其餘由設定檔補上
    pub fn merge_file(&mut self, file: &TomlConfig) {
        if self.output_path.is_none() {
            self.output_path = file.output_path_setting().map(str::to_string);
        }
        if self.format.is_none() {
            self.format = file.output_format_setting();
        }
        if self.concurrency.is_none() {
            self.concurrency = file.concurrency_setting();
        }
        if !self.stdout {
            self.stdout = file.stdout_setting().unwrap_or(false);
        }
        if !self.json_logs {
            self.json_logs = file.json_logs();
        }
    }

    pub fn load_config_file(&self) -> Result<Option<TomlConfig>> {
        let Some(path) = &self.config else {
            return Ok(None);
        };
        let file = TomlConfig::from_file(path)?;
        file.validate()?;
        Ok(Some(file))
    }
}

impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or(DEFAULT_CONCURRENCY)
    }

    fn print_to_stdout(&self) -> bool {
        self.stdout
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("input", &self.input)
            .map_err(BillError::into_config_error)?;
        validation::validate_path("output_path", self.output_path())
            .map_err(BillError::into_config_error)?;
        validation::validate_positive_number("concurrency", self.concurrency(), 1)
            .map_err(BillError::into_config_error)?;
        Ok(())
    }
}
