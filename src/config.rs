//! Search density and selection policy, loaded from TOML.
//!
//! ```toml
//! snap_to = "single"
//! single_select = "active"
//! segment_select = "closest"
//!
//! [search]
//! samples = 13
//! epsilon = 0.008
//! refinement = "bisection"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::NativeFloat;

/// Default number of coarse samples per segment.
pub const DEFAULT_SAMPLES: usize = 13;
/// Default refinement stop tolerance in screen distance units.
pub const DEFAULT_EPSILON: NativeFloat = 0.008;

/// How the coarse result is refined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Refinement {
    /// Distance equalization: the farther bracket end moves to the midpoint
    /// until both ends are equally far from the cursor.
    #[default]
    Bisection,
    /// Golden-section minimization of the screen distance inside the bracket.
    GoldenSection,
}

/// Parameters of the closest point search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    samples: usize,
    epsilon: NativeFloat,
    refinement: Refinement,
}

impl SearchConfig {
    /// Validated constructor, fails for `samples < 2` or a non-positive `epsilon`
    pub fn new(samples: usize, epsilon: NativeFloat) -> Result<Self> {
        let config = SearchConfig {
            samples,
            epsilon,
            refinement: Refinement::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_refinement(self, refinement: Refinement) -> Self {
        SearchConfig { refinement, ..self }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn epsilon(&self) -> NativeFloat {
        self.epsilon
    }

    pub fn refinement(&self) -> Refinement {
        self.refinement
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples < 2 {
            return Err(Error::InvalidConfiguration(format!(
                "samples must be at least 2, got {}",
                self.samples
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "epsilon must be a positive number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            samples: DEFAULT_SAMPLES,
            epsilon: DEFAULT_EPSILON,
            refinement: Refinement::default(),
        }
    }
}

/// Which segments the cursor may snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapTo {
    /// One segment of one spline
    Segment,
    /// Every segment of one spline
    #[default]
    Single,
    /// Every segment of every spline
    All,
}

/// How the spline is picked when snapping is restricted to one spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineSelect {
    /// The spline nearest to the viewer at session start
    Closest,
    /// The host's active spline
    #[default]
    Active,
}

/// How the segment is picked when snapping to a single segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSelect {
    /// The segment closest to the cursor on screen at session start
    #[default]
    Closest,
    /// The segment starting at the first selected anchor
    Selected,
}

/// Complete configuration of an insert session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertConfig {
    pub snap_to: SnapTo,
    pub single_select: SplineSelect,
    pub segment_select: SegmentSelect,
    pub search: SearchConfig,
}

impl InsertConfig {
    /// Parse and validate a TOML document. Missing keys fall back to their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: InsertConfig = toml::from_str(content)?;
        config.search.validate()?;
        log::info!(
            "loaded insert config: snap_to={:?}, samples={}, epsilon={}",
            config.snap_to,
            config.search.samples,
            config.search.epsilon
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
