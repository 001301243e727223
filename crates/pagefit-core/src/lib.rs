//! PDF page size normalization
//!
//! This crate brings every page of a PDF to a target page size using lopdf.
//!
//! - [`PageFitter`]: works on a parsed `lopdf::Document` in place
//! - [`fit_pdf_bytes`] / [`process_command`]: load, fit and re-serialize raw PDF bytes
//!
//! Oversized documents are shrunk by one uniform factor (page boxes set to
//! the target, content wrapped in a scale transform). Documents with a page
//! smaller than the target get their page boxes grown while the content keeps
//! its original scale.

pub mod command;
pub mod config;
pub mod content;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod page_size;

#[cfg(test)]
mod testing;

pub use command::{FitCommand, ProcessMetrics, ProcessResult, TargetSpec};
pub use config::FitOptions;
pub use error::{PageFitError, Result};
pub use fit::{FitOutcome, PageFitter, ScaleFactor};
pub use page_size::PageSize;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lopdf::Document;
use std::time::Instant;
use tracing::instrument;

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32> {
    let doc = load(bytes)?;
    Ok(doc.get_pages().len() as u32)
}

/// Fit serialized PDF bytes to `target`
///
/// Returns `None` when the document already fits, so callers can skip
/// storing an identical copy.
pub fn fit_pdf_bytes(
    bytes: &[u8],
    target: PageSize,
    options: FitOptions,
) -> Result<Option<Vec<u8>>> {
    options.validate()?;
    let mut doc = load(bytes)?;

    let outcome = PageFitter::new(options).scale_to_size(&mut doc, target)?;
    if !outcome.is_changed() {
        return Ok(None);
    }

    save(&mut doc).map(Some)
}

/// Run a [`FitCommand`], reporting failures inside the result
#[instrument(skip_all)]
pub fn process_command(command: FitCommand) -> ProcessResult {
    let started = Instant::now();

    let result = match command {
        FitCommand::Fit {
            file,
            target,
            tolerance,
        } => run_fit(&file, &target, tolerance),
        FitCommand::Check {
            file,
            target,
            tolerance,
        } => run_check(&file, &target, tolerance),
    };

    match result {
        Ok(mut processed) => {
            if let Some(metrics) = processed.metrics.as_mut() {
                metrics.processing_time_ms = started.elapsed().as_millis() as u64;
            }
            processed
        }
        Err(e) => {
            tracing::warn!(error = %e, "Fit command failed");
            ProcessResult::failure(e)
        }
    }
}

fn run_fit(file: &[u8], target: &TargetSpec, tolerance: Option<f32>) -> Result<ProcessResult> {
    let fitter = fitter_for(tolerance)?;
    let target = target.resolve()?;
    let mut doc = load(file)?;

    let outcome = fitter.scale_to_size(&mut doc, target)?;
    let output = if outcome.is_changed() {
        Some(save(&mut doc)?)
    } else {
        None
    };

    Ok(ProcessResult {
        success: true,
        metrics: Some(ProcessMetrics {
            input_size_bytes: file.len(),
            output_size_bytes: output.as_ref().map_or(file.len(), Vec::len),
            page_count: doc.get_pages().len() as u32,
            processing_time_ms: 0,
        }),
        data: output.map(|bytes| STANDARD.encode(bytes)),
        error: None,
        outcome: Some(outcome),
        within_tolerance: None,
    })
}

fn run_check(file: &[u8], target: &TargetSpec, tolerance: Option<f32>) -> Result<ProcessResult> {
    let fitter = fitter_for(tolerance)?;
    let target = target.resolve()?;
    let doc = load(file)?;

    let within = fitter.is_within_tolerance(&doc, target)?;

    Ok(ProcessResult {
        success: true,
        data: None,
        error: None,
        outcome: None,
        within_tolerance: Some(within),
        metrics: Some(ProcessMetrics {
            input_size_bytes: file.len(),
            output_size_bytes: 0,
            page_count: doc.get_pages().len() as u32,
            processing_time_ms: 0,
        }),
    })
}

fn fitter_for(tolerance: Option<f32>) -> Result<PageFitter> {
    let options = match tolerance {
        Some(tolerance) => FitOptions::with_tolerance(tolerance)?,
        None => FitOptions::default(),
    };
    Ok(PageFitter::new(options))
}

fn load(bytes: &[u8]) -> Result<Document> {
    Document::load_mem(bytes).map_err(|e| PageFitError::ParseError(e.to_string()))
}

fn save(doc: &mut Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PageFitError::OperationError(format!("Save failed: {}", e)))?;
    Ok(buffer)
}
