use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_PATH};
use crate::core::{ConfigProvider, OutputFormat};
use crate::utils::error::{BillError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub output: Option<OutputConfig>,
    pub batch: Option<BatchConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub format: Option<String>,
    pub stdout: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            BillError::ConfigValidationError {
                field: "config_file".to_string(),
                message: format!("Cannot read {}: {}", path.as_ref().display(), e),
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BillError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(output) = &self.output {
            if let Some(path) = &output.path {
                validation::validate_path("output.path", path)
                    .map_err(BillError::into_config_error)?;
            }
            if let Some(format) = &output.format {
                validation::validate_one_of("output.format", format, &OutputFormat::NAMES)
                    .map_err(BillError::into_config_error)?;
            }
        }

        if let Some(concurrency) = self.batch.as_ref().and_then(|b| b.concurrency) {
            validation::validate_positive_number("batch.concurrency", concurrency, 1)
                .map_err(BillError::into_config_error)?;
        }

        if let Some(level) = self.log_level() {
            validation::validate_one_of("logging.level", level, &LOG_LEVELS)
                .map_err(BillError::into_config_error)?;
        }

        Ok(())
    }

    pub fn output_path_setting(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.path.as_deref())
    }

    pub fn output_format_setting(&self) -> Option<OutputFormat> {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .and_then(OutputFormat::parse)
    }

    pub fn stdout_setting(&self) -> Option<bool> {
        self.output.as_ref().and_then(|o| o.stdout)
    }

    pub fn concurrency_setting(&self) -> Option<usize> {
        self.batch.as_ref().and_then(|b| b.concurrency)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        self.output_path_setting().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn output_format(&self) -> OutputFormat {
        self.output_format_setting().unwrap_or_default()
    }

    fn concurrency(&self) -> usize {
        self.concurrency_setting().unwrap_or(DEFAULT_CONCURRENCY)
    }

    fn print_to_stdout(&self) -> bool {
        self.stdout_setting().unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[output]
path = "./reports"
format = "text"
stdout = true

[batch]
concurrency = 8

[logging]
level = "debug"
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.output_path(), "./reports");
        assert_eq!(config.output_format(), OutputFormat::Text);
        assert!(config.print_to_stdout());
        assert_eq!(config.concurrency(), 8);
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.output_path(), DEFAULT_OUTPUT_PATH);
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.concurrency(), DEFAULT_CONCURRENCY);
        assert!(!config.print_to_stdout());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SPLIT_BILL_TEST_OUTPUT_DIR", "/tmp/bills-out");

        let toml_content = r#"
[output]
path = "${SPLIT_BILL_TEST_OUTPUT_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "/tmp/bills-out");

        std::env::remove_var("SPLIT_BILL_TEST_OUTPUT_DIR");
    }

    #[test]
    fn test_unknown_env_var_is_kept() {
        let config = TomlConfig::from_toml_str(
            r#"
[output]
path = "${SPLIT_BILL_SURELY_UNSET_VAR}"
"#,
        )
        .unwrap();
        assert_eq!(config.output_path(), "${SPLIT_BILL_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation() {
        let bad_format = TomlConfig::from_toml_str("[output]\nformat = \"xml\"\n").unwrap();
        let err = bad_format.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let bad_concurrency = TomlConfig::from_toml_str("[batch]\nconcurrency = 0\n").unwrap();
        assert!(bad_concurrency.validate().is_err());

        let bad_level = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[output\npath = 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\nformat = \"csv\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_format(), OutputFormat::Csv);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = TomlConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
