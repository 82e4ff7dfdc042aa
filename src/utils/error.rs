use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillError {
    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },

    #[error("Type mismatch for '{field}': expected {expected}, found {found}")]
    TypeMismatchError {
        field: String,
        expected: String,
        found: String,
    },

    #[error("Value out of range for '{field}': {value} ({reason})")]
    OutOfRangeError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid date for '{field}': {value} ({reason})")]
    InvalidDateError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Cannot read '{path}': {source}")]
    UnreadableSourceError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write '{path}': {source}")]
    UnwritableDestinationError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed bill data: {0}")]
    MalformedDataError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("No bill files found in '{path}'")]
    NoInputFilesError { path: String },
}

pub type Result<T> = std::result::Result<T, BillError>;

/// 對應輸入驗證的錯誤分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    MissingField,
    TypeMismatch,
    OutOfRange,
    InvalidDate,
    UnreadableSource,
    UnwritableDestination,
    MalformedData,
    Config,
    Io,
    NoInput,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingField => "missing-field",
            ErrorKind::TypeMismatch => "type-mismatch",
            ErrorKind::OutOfRange => "out-of-range",
            ErrorKind::InvalidDate => "invalid-date",
            ErrorKind::UnreadableSource => "unreadable-source",
            ErrorKind::UnwritableDestination => "unwritable-destination",
            ErrorKind::MalformedData => "malformed-data",
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
            ErrorKind::NoInput => "no-input",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
    System,
}

/// 嚴重程度，順序由低到高，可直接比較
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 可重試
            ErrorSeverity::High => 1,     // 處理錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl BillError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        BillError::MissingFieldError {
            field: field.into(),
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &str, found: &serde_json::Value) -> Self {
        BillError::TypeMismatchError {
            field: field.into(),
            expected: expected.to_string(),
            found: json_type_name(found).to_string(),
        }
    }

    pub fn out_of_range(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        BillError::OutOfRangeError {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_date(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        BillError::InvalidDateError {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn unreadable(path: impl Into<String>, source: std::io::Error) -> Self {
        BillError::UnreadableSourceError {
            path: path.into(),
            source,
        }
    }

    pub fn unwritable(path: impl Into<String>, source: std::io::Error) -> Self {
        BillError::UnwritableDestinationError {
            path: path.into(),
            source,
        }
    }

    /// 共用驗證函式回傳的是輸入錯誤；用在設定檔時轉成設定錯誤
    pub fn into_config_error(self) -> Self {
        match self {
            BillError::OutOfRangeError {
                field,
                value,
                reason,
            } => BillError::InvalidConfigValueError {
                field,
                value,
                reason,
            },
            BillError::MissingFieldError { field } => BillError::ConfigValidationError {
                field,
                message: "Required value is missing".to_string(),
            },
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BillError::MissingFieldError { .. } => ErrorKind::MissingField,
            BillError::TypeMismatchError { .. } => ErrorKind::TypeMismatch,
            BillError::OutOfRangeError { .. } => ErrorKind::OutOfRange,
            BillError::InvalidDateError { .. } => ErrorKind::InvalidDate,
            BillError::UnreadableSourceError { .. } => ErrorKind::UnreadableSource,
            BillError::UnwritableDestinationError { .. } | BillError::CsvError(_) => {
                ErrorKind::UnwritableDestination
            }
            BillError::MalformedDataError(_) => ErrorKind::MalformedData,
            BillError::IoError(_) => ErrorKind::Io,
            BillError::InvalidConfigValueError { .. } | BillError::ConfigValidationError { .. } => {
                ErrorKind::Config
            }
            BillError::NoInputFilesError { .. } => ErrorKind::NoInput,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind() {
            ErrorKind::MissingField
            | ErrorKind::TypeMismatch
            | ErrorKind::OutOfRange
            | ErrorKind::InvalidDate
            | ErrorKind::UnreadableSource
            | ErrorKind::MalformedData
            | ErrorKind::NoInput => ErrorCategory::Input,
            ErrorKind::UnwritableDestination => ErrorCategory::Output,
            ErrorKind::Config => ErrorCategory::Configuration,
            ErrorKind::Io => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::NoInput | ErrorKind::UnwritableDestination => ErrorSeverity::Medium,
            ErrorKind::Io => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BillError::MissingFieldError { field } => {
                format!("The bill is missing the '{}' field", field)
            }
            BillError::TypeMismatchError {
                field, expected, ..
            } => format!("'{}' should be {}", field, expected),
            BillError::OutOfRangeError { field, reason, .. } => {
                format!("'{}' has an invalid value: {}", field, reason)
            }
            BillError::InvalidDateError { value, .. } => {
                format!("'{}' is not a valid YYYY-MM-DD date", value)
            }
            BillError::UnreadableSourceError { path, .. } => {
                format!("Could not read the bill at '{}'", path)
            }
            BillError::UnwritableDestinationError { path, .. } => {
                format!("Could not write the result to '{}'", path)
            }
            BillError::MalformedDataError(_) => "The bill is not valid JSON".to_string(),
            BillError::CsvError(_) => "Could not produce the CSV report".to_string(),
            BillError::IoError(_) => "A file system operation failed".to_string(),
            BillError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration '{}' is invalid: {}", field, reason)
            }
            BillError::ConfigValidationError { field, message } => {
                format!("Configuration '{}' could not be used: {}", field, message)
            }
            BillError::NoInputFilesError { path } => {
                format!("There are no .json bills in '{}'", path)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::MissingField => "Add the missing field to the bill JSON",
            ErrorKind::TypeMismatch => "Check the field types: prices and tipPercentage are numbers, names are strings",
            ErrorKind::OutOfRange => "Use a tip between 0 and 100, non-negative prices and at least one item",
            ErrorKind::InvalidDate => "Write the date as YYYY-MM-DD, e.g. 2024-03-21",
            ErrorKind::UnreadableSource => "Check that the input path exists and is readable",
            ErrorKind::UnwritableDestination => "Check that the output directory is writable and retry",
            ErrorKind::MalformedData => "Validate the file with a JSON linter",
            ErrorKind::Config => "Fix the configuration file or the command line flags",
            ErrorKind::Io => "Check disk space and permissions",
            ErrorKind::NoInput => "Point the command at a .json file or a directory containing them",
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_category() {
        let err = BillError::missing_field("items[0].price");
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity().exit_code(), 1);
    }

    #[test]
    fn test_type_mismatch_reports_json_type() {
        let err = BillError::type_mismatch("tipPercentage", "a number", &serde_json::json!("10"));
        assert_eq!(
            err.to_string(),
            "Type mismatch for 'tipPercentage': expected a number, found string"
        );
    }

    #[test]
    fn test_severity_ordering_and_exit_codes() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::High);
        assert!(ErrorSeverity::High > ErrorSeverity::Medium);
        assert_eq!(ErrorSeverity::Low.exit_code(), 0);
        assert_eq!(ErrorSeverity::Medium.exit_code(), 2);
        assert_eq!(ErrorSeverity::Critical.exit_code(), 3);

        let io = BillError::IoError(std::io::Error::other("disk full"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_empty_directory_is_not_success() {
        let err = BillError::NoInputFilesError {
            path: "bills/".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_ne!(err.severity().exit_code(), 0);
    }

    #[test]
    fn test_into_config_error() {
        let err = BillError::out_of_range("batch.concurrency", 0, "Value must be at least 1")
            .into_config_error();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&ErrorKind::UnwritableDestination).unwrap();
        assert_eq!(json, "\"unwritable-destination\"");
        assert_eq!(ErrorKind::InvalidDate.to_string(), "invalid-date");
    }
}
