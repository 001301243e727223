//! Page size normalization
//!
//! Brings every page of a document to a target page size. The decision is
//! made once for the whole document:
//!
//! 1. If every page is already within tolerance of the target, nothing changes.
//! 2. If any page is smaller than the target on any axis, every page box is
//!    grown to the target and the drawn content is left as it is.
//! 3. Otherwise one uniform factor, driven by the worst page, shrinks the
//!    content of every page and the page boxes are set to the target.
//!
//! Pages keep their orientation: a landscape page is fitted against the
//! target turned on its side.

use crate::config::FitOptions;
use crate::content::scale_page_content;
use crate::error::{PageFitError, Result};
use crate::geometry::{page_geometry, set_page_boxes};
use crate::page_size::PageSize;
use lopdf::Document;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Decimal places kept in a shrink factor
pub const SCALE_DECIMAL_PLACES: i32 = 4;

/// How the pages of a document have to change to match a target size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ScaleFactor {
    /// Multiply content by this factor, in (0, 1]
    Shrink(f64),
    /// At least one page is smaller than the target; grow the page boxes
    Upscale,
}

/// What [`PageFitter::scale_to_size`] did to the document
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome")]
pub enum FitOutcome {
    /// Every page was already within tolerance; the document is untouched
    Unchanged,
    /// Page boxes set to the target and content scaled by `factor`
    ScaledDown { factor: f64 },
    /// Page boxes grown to the target; content left at its original scale
    ScaledUp,
}

impl FitOutcome {
    /// Whether the document was modified and needs to be saved again
    pub fn is_changed(&self) -> bool {
        !matches!(self, FitOutcome::Unchanged)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PageFitter {
    options: FitOptions,
}

impl PageFitter {
    pub fn new(options: FitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Fit the document to ISO A4
    pub fn scale_to_a4(&self, doc: &mut Document) -> Result<FitOutcome> {
        self.scale_to_size(doc, PageSize::A4)
    }

    /// Fit every page of the document to `target`, mutating it in place
    #[instrument(skip(self, doc), fields(target_size = %target))]
    pub fn scale_to_size(&self, doc: &mut Document, target: PageSize) -> Result<FitOutcome> {
        if self.is_within_tolerance(doc, target)? {
            info!("Document already within target size");
            return Ok(FitOutcome::Unchanged);
        }

        match self.calculate_scaling_factor(doc, target)? {
            ScaleFactor::Upscale => {
                self.scale_up_document(doc, target)?;
                info!("Scaled page boxes up to target size");
                Ok(FitOutcome::ScaledUp)
            }
            ScaleFactor::Shrink(factor) => {
                self.scale_down_document(doc, factor, target)?;
                info!(factor, "Scaled document down to target size");
                Ok(FitOutcome::ScaledDown { factor })
            }
        }
    }

    /// True when both axes of every page are within tolerance of the target
    pub fn is_within_tolerance(&self, doc: &Document, target: PageSize) -> Result<bool> {
        target.validate()?;

        for page in page_geometry(doc)? {
            let limits = limits_for(page.size, target);
            let fits = self.axis_within(page.size.height, limits.height)
                && self.axis_within(page.size.width, limits.width);

            if !fits {
                debug!(
                    page = page.number,
                    size = %page.size,
                    limits = %limits,
                    "Page outside size tolerance"
                );
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Uniform factor that brings the worst page of the document within the target
    ///
    /// Returns [`ScaleFactor::Upscale`] as soon as any page is smaller than
    /// the target on either axis.
    pub fn calculate_scaling_factor(
        &self,
        doc: &Document,
        target: PageSize,
    ) -> Result<ScaleFactor> {
        target.validate()?;

        let mut max_height_scaling = 0.0_f32;
        let mut max_width_scaling = 0.0_f32;

        for page in page_geometry(doc)? {
            let limits = limits_for(page.size, target);
            let height_overage = page.size.height - limits.height;
            let width_overage = page.size.width - limits.width;

            debug!(
                page = page.number,
                limit_height = limits.height,
                limit_width = limits.width,
                page_height = page.size.height,
                page_width = page.size.width,
                height_overage,
                width_overage,
                "Page overage"
            );

            if height_overage < 0.0 || width_overage < 0.0 {
                debug!(page = page.number, "Page smaller than target, upscaling");
                return Ok(ScaleFactor::Upscale);
            }

            max_height_scaling = max_scale(height_overage, page.size.height, max_height_scaling);
            max_width_scaling = max_scale(width_overage, page.size.width, max_width_scaling);
            debug!(max_height_scaling, max_width_scaling, "Running maximum scaling");
        }

        let worst = max_height_scaling.max(max_width_scaling);
        let factor = round_half_even(1.0 - f64::from(worst), SCALE_DECIMAL_PLACES);

        if factor <= 0.0 {
            return Err(PageFitError::InvalidTarget(format!(
                "{} is too small to scale the document into",
                target
            )));
        }

        Ok(ScaleFactor::Shrink(factor))
    }

    /// Set every page box to the target and scale page content by `factor`
    pub fn scale_down_document(
        &self,
        doc: &mut Document,
        factor: f64,
        target: PageSize,
    ) -> Result<()> {
        target.validate()?;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(PageFitError::OperationError(format!(
                "Scale factor must be in (0, 1], got {}",
                factor
            )));
        }

        for page in page_geometry(doc)? {
            set_page_boxes(doc, page.id, limits_for(page.size, target))?;
            scale_page_content(doc, page.id, factor as f32)?;
        }

        Ok(())
    }

    /// Grow every page box to the target without touching page content
    pub fn scale_up_document(&self, doc: &mut Document, target: PageSize) -> Result<()> {
        target.validate()?;

        for page in page_geometry(doc)? {
            set_page_boxes(doc, page.id, limits_for(page.size, target))?;
        }

        Ok(())
    }

    fn axis_within(&self, page_axis: f32, target_axis: f32) -> bool {
        let tolerance = self.options.tolerance;
        let lower = target_axis * (1.0 - tolerance);
        let upper = target_axis * (1.0 + tolerance);
        page_axis >= lower && page_axis <= upper
    }
}

/// The target as seen by a page: unchanged for portrait pages, turned on
/// its side for landscape and square ones
fn limits_for(page: PageSize, target: PageSize) -> PageSize {
    if page.is_portrait() {
        target
    } else {
        target.swapped()
    }
}

fn max_scale(overage: f32, page_axis: f32, current_max: f32) -> f32 {
    if overage > 0.0 {
        current_max.max(overage / page_axis)
    } else {
        current_max
    }
}

/// Round to `places` decimal places, ties to the even neighbour
pub fn round_half_even(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).round_ties_even() / scale
}
