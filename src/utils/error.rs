use std::fmt;
use thiserror::Error;

/// 批次解析失敗的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Decode,
    Normalize,
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStage::Decode => write!(f, "decode"),
            ParseStage::Normalize => write!(f, "normalize"),
        }
    }
}

/// Batch-level failure. Row-level problems never produce one of these.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{stage} error: {message}")]
pub struct ParseError {
    pub stage: ParseStage,
    pub message: String,
    /// 1-based data row number, when the failure is tied to a row.
    pub row: Option<usize>,
}

impl ParseError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            stage: ParseStage::Decode,
            message: message.into(),
            row: None,
        }
    }

    pub fn normalize(row: usize, message: impl Into<String>) -> Self {
        Self {
            stage: ParseStage::Normalize,
            message: format!("row {}: {}", row, message.into()),
            row: Some(row),
        }
    }
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Batch parsing failed: {0}")]
    ParseError(#[from] ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unsupported platform: {name}")]
    UnsupportedPlatform { name: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Publish failed: {message}")]
    PublishError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    Output,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a run that ended with this severity.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::UnsupportedPlatform { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_) | EtlError::ParseError(_) => ErrorCategory::Input,
            EtlError::ProcessingError { .. } | EtlError::SerializationError(_) => {
                ErrorCategory::Processing
            }
            EtlError::ZipError(_) | EtlError::IoError(_) => ErrorCategory::Output,
            EtlError::ApiError(_) | EtlError::PublishError { .. } => ErrorCategory::Network,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 發佈只是盡力而為，輸出檔案已經寫好
            EtlError::PublishError { .. } | EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ParseError(e) if e.stage == ParseStage::Decode => {
                "Check that the file is UTF-8 CSV with a header row and balanced quotes"
            }
            EtlError::ParseError(_) => "Check the row reported in the message",
            EtlError::CsvError(_) => "Check that the file is valid CSV",
            EtlError::UnsupportedPlatform { .. } => {
                "Use one of: woocommerce, ebay, shopify, amazon"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the configuration values and try again"
            }
            EtlError::IoError(_) => "Check that the paths exist and are writable",
            EtlError::ZipError(_) => "Disable compression or check free disk space",
            EtlError::ApiError(_) | EtlError::PublishError { .. } => {
                "Check the publish endpoints; the output files were still written"
            }
            EtlError::SerializationError(_) | EtlError::ProcessingError { .. } => {
                "Re-run with --verbose and report the log"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Could not read the product file: {}", self),
            ErrorCategory::Processing => format!("Could not convert the products: {}", self),
            ErrorCategory::Output => format!("Could not write the output: {}", self),
            ErrorCategory::Network => format!("Could not publish the listings: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
