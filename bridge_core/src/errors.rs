//! # Error Types
//!
//! Structured error types for bridge_core. Every stage of the design pipeline
//! returns a [`CalcResult`], so callers can tell apart a bad input bundle, a
//! footing search that never converged, and a data error inside a stage.
//!
//! An unstable or overstressed design is *not* an error. Those outcomes are
//! recorded as flags on the stage results and collected into
//! [`DesignStatus::Failed`](crate::pipeline::DesignStatus).
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::errors::{CalcError, CalcResult};
//!
//! fn validate_span(span_m: f64) -> CalcResult<()> {
//!     if span_m <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "effective_span_m".to_string(),
//!             value: span_m.to_string(),
//!             reason: "Span must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bridge_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, inconsistent, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material grade or bar size not found in the tables
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// A stage produced a value that signals inconsistent data
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// Iterative sizing exhausted its iteration budget
    #[error(
        "No convergence in {component} after {iterations} iterations \
         (last trial {last_length_m:.2} m x {last_width_m:.2} m, utilization {last_utilization:.3})"
    )]
    ConvergenceFailed {
        component: String,
        iterations: u32,
        last_length_m: f64,
        last_width_m: f64,
        last_utilization: f64,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Map a serde_json error, surfacing missing fields as [`CalcError::MissingField`].
    ///
    /// ```rust
    /// use bridge_core::errors::CalcError;
    ///
    /// #[derive(serde::Deserialize, Debug)]
    /// struct Soil { safe_bearing_capacity_kn_m2: f64 }
    ///
    /// let err = serde_json::from_str::<Soil>("{}").unwrap_err();
    /// assert_eq!(
    ///     CalcError::from_json_error(&err),
    ///     CalcError::missing_field("safe_bearing_capacity_kn_m2")
    /// );
    /// ```
    pub fn from_json_error(err: &serde_json::Error) -> Self {
        let message = err.to_string();
        if let Some(rest) = message.strip_prefix("missing field `") {
            if let Some(end) = rest.find('`') {
                return CalcError::missing_field(&rest[..end]);
            }
        }
        CalcError::SerializationError { reason: message }
    }

    /// Whether the caller can fix the problem by editing the input bundle
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::MissingField { .. } | CalcError::MaterialNotFound { .. }
        )
    }

    /// Check if this is a recoverable error (e.g., retry with a larger sizing budget)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::ConvergenceFailed { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::ConvergenceFailed { .. } => "CONVERGENCE_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("effective_span_m", "-5.0", "Span must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::material_not_found("M95").error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_convergence_error_message_carries_last_trial() {
        let error = CalcError::ConvergenceFailed {
            component: "pier footing".to_string(),
            iterations: 20,
            last_length_m: 12.5,
            last_width_m: 18.0,
            last_utilization: 1.234,
        };
        let message = error.to_string();
        assert!(message.contains("12.50 m x 18.00 m"));
        assert!(error.is_recoverable());
        assert!(!error.is_validation());
    }

    #[test]
    fn test_non_missing_json_error_is_serialization_error() {
        let err = serde_json::from_str::<f64>("not json").unwrap_err();
        assert_eq!(CalcError::from_json_error(&err).error_code(), "SERIALIZATION_ERROR");
    }
}
