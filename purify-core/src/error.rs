use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PurifyError {
    // mean/sigma/zscore asked of an estimator that has seen no data.
    EmptyState,
    EmptyInput,
    NonFinite { index: usize, value: f64 },
    // Running sum or squared deviations left the f64 range.
    Overflow,
    InvalidConfig(String),
}

impl fmt::Display for PurifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PurifyError::EmptyState => write!(f, "Statistics requested from an empty estimator"),
            PurifyError::EmptyInput => write!(f, "Round input is empty"),
            PurifyError::NonFinite { index, value } => {
                write!(f, "Non-finite value {} at index {}", value, index)
            }
            PurifyError::Overflow => write!(f, "Running statistics overflowed"),
            PurifyError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl Error for PurifyError {}
