//! Fitting options

use crate::error::{PageFitError, Result};
use serde::{Deserialize, Serialize};

/// Default allowed deviation from the target size (1%)
pub const DEFAULT_TOLERANCE: f32 = 0.01;

/// Environment variable overriding the tolerance in [`FitOptions::from_env`]
pub const TOLERANCE_ENV_VAR: &str = "PAGEFIT_TOLERANCE";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Fractional deviation a page axis may have from the target axis, in
    /// either direction, and still count as fitting
    pub tolerance: f32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl FitOptions {
    pub fn with_tolerance(tolerance: f32) -> Result<Self> {
        let options = Self { tolerance };
        options.validate()?;
        Ok(options)
    }

    /// Load from environment variables, falling back to defaults for
    /// missing or invalid values
    pub fn from_env() -> Self {
        std::env::var(TOLERANCE_ENV_VAR)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .and_then(|tolerance| Self::with_tolerance(tolerance).ok())
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.tolerance.is_finite() && (0.0..1.0).contains(&self.tolerance) {
            Ok(())
        } else {
            Err(PageFitError::OperationError(format!(
                "Tolerance must be in [0, 1), got {}",
                self.tolerance
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = FitOptions::default();
        assert_eq!(options.tolerance, 0.01);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_with_tolerance_rejects_out_of_range() {
        assert!(FitOptions::with_tolerance(0.0).is_ok());
        assert!(FitOptions::with_tolerance(0.05).is_ok());
        assert!(FitOptions::with_tolerance(-0.01).is_err());
        assert!(FitOptions::with_tolerance(1.0).is_err());
        assert!(FitOptions::with_tolerance(f32::NAN).is_err());
    }

    // The variable is process-wide, so every case runs inside one test
    #[test]
    fn test_from_env_reads_and_validates_tolerance() {
        std::env::remove_var(TOLERANCE_ENV_VAR);
        assert_eq!(FitOptions::from_env(), FitOptions::default());

        std::env::set_var(TOLERANCE_ENV_VAR, " 0.05 ");
        assert_eq!(FitOptions::from_env().tolerance, 0.05);

        std::env::set_var(TOLERANCE_ENV_VAR, "abc");
        assert_eq!(FitOptions::from_env(), FitOptions::default());

        std::env::set_var(TOLERANCE_ENV_VAR, "2.0");
        assert_eq!(FitOptions::from_env(), FitOptions::default());

        std::env::set_var(TOLERANCE_ENV_VAR, "-0.01");
        assert_eq!(FitOptions::from_env(), FitOptions::default());

        std::env::remove_var(TOLERANCE_ENV_VAR);
    }

    #[test]
    fn test_deserialize_missing_fields_uses_defaults() {
        let options: FitOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, FitOptions::default());

        let options: FitOptions = serde_json::from_str(r#"{"tolerance":0.02}"#).unwrap();
        assert_eq!(options.tolerance, 0.02);
    }
}
