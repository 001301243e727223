use crate::error::Result;
use crate::fit::FitOutcome;
use crate::page_size::PageSize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum FitCommand {
    /// Fit the document to the target and return it if it changed
    Fit {
        file: Vec<u8>,
        target: TargetSpec,
        #[serde(default)]
        tolerance: Option<f32>,
    },
    /// Only report whether the document already fits
    Check {
        file: Vec<u8>,
        target: TargetSpec,
        #[serde(default)]
        tolerance: Option<f32>,
    },
}

/// A well-known size by name ("A4", "Letter") or explicit dimensions in points
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TargetSpec {
    Named(String),
    Custom(PageSize),
}

impl TargetSpec {
    pub fn resolve(&self) -> Result<PageSize> {
        let size = match self {
            TargetSpec::Named(name) => name.parse::<PageSize>()?,
            TargetSpec::Custom(size) => *size,
        };
        size.validate()?;
        Ok(size)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub success: bool,
    /// Base64-encoded PDF data, present only when the document changed
    pub data: Option<String>,
    pub error: Option<String>,
    pub outcome: Option<FitOutcome>,
    /// Set for `Check` commands
    pub within_tolerance: Option<bool>,
    pub metrics: Option<ProcessMetrics>,
}

impl ProcessResult {
    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            outcome: None,
            within_tolerance: None,
            metrics: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessMetrics {
    pub input_size_bytes: usize,
    pub output_size_bytes: usize,
    pub page_count: u32,
    pub processing_time_ms: u64,
}
