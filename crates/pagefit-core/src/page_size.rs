//! Page dimensions and well-known paper sizes
//!
//! Sizes are expressed in PDF points (1/72 inch). ISO sizes are derived from
//! their millimetre dimensions so they match what PDF producers write.

use crate::error::{PageFitError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Points per millimetre (72 points per inch, 25.4 mm per inch)
pub const POINTS_PER_MM: f32 = 1.0 / (10.0 * 2.54) * 72.0;

/// Width and height of a page, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A0: PageSize = PageSize {
        width: 841.0 * POINTS_PER_MM,
        height: 1189.0 * POINTS_PER_MM,
    };
    pub const A1: PageSize = PageSize {
        width: 594.0 * POINTS_PER_MM,
        height: 841.0 * POINTS_PER_MM,
    };
    pub const A2: PageSize = PageSize {
        width: 420.0 * POINTS_PER_MM,
        height: 594.0 * POINTS_PER_MM,
    };
    pub const A3: PageSize = PageSize {
        width: 297.0 * POINTS_PER_MM,
        height: 420.0 * POINTS_PER_MM,
    };
    pub const A4: PageSize = PageSize {
        width: 210.0 * POINTS_PER_MM,
        height: 297.0 * POINTS_PER_MM,
    };
    pub const A5: PageSize = PageSize {
        width: 148.0 * POINTS_PER_MM,
        height: 210.0 * POINTS_PER_MM,
    };
    pub const A6: PageSize = PageSize {
        width: 105.0 * POINTS_PER_MM,
        height: 148.0 * POINTS_PER_MM,
    };
    pub const LETTER: PageSize = PageSize::new(612.0, 792.0);
    pub const LEGAL: PageSize = PageSize::new(612.0, 1008.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when the page is taller than it is wide.
    ///
    /// Square pages count as landscape, which decides how they are mapped
    /// onto a target size.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Same size with width and height exchanged
    pub fn swapped(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Reject sizes that cannot be used as a fitting target
    pub fn validate(&self) -> Result<()> {
        let finite = self.width.is_finite() && self.height.is_finite();
        if finite && self.width > 0.0 && self.height > 0.0 {
            Ok(())
        } else {
            Err(PageFitError::InvalidTarget(format!(
                "{} x {}",
                self.width, self.height
            )))
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} x {:.2} pt", self.width, self.height)
    }
}

impl FromStr for PageSize {
    type Err = PageFitError;

    /// Look up a well-known size by name (case-insensitive), e.g. "A4" or "letter"
    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "A0" => Ok(PageSize::A0),
            "A1" => Ok(PageSize::A1),
            "A2" => Ok(PageSize::A2),
            "A3" => Ok(PageSize::A3),
            "A4" => Ok(PageSize::A4),
            "A5" => Ok(PageSize::A5),
            "A6" => Ok(PageSize::A6),
            "LETTER" => Ok(PageSize::LETTER),
            "LEGAL" => Ok(PageSize::LEGAL),
            other => Err(PageFitError::InvalidTarget(format!(
                "Unknown page size: {}",
                other
            ))),
        }
    }
}
