//! Error type shared by the search, the spline adapter and the insert session.

use thiserror::Error;

use crate::NativeFloat;

#[derive(Debug, Error)]
pub enum Error {
    /// The candidate set is empty or every sample projects outside of the viewport.
    #[error("no candidate segment is visible in the viewport")]
    NoCandidateFound,

    /// The resolved parameter sits on (or numerically touches) a segment endpoint.
    #[error("split parameter {t} touches an existing anchor")]
    DegenerateSplit { t: NativeFloat },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("spline {spline} has no segment {segment}")]
    SegmentOutOfRange { spline: usize, segment: usize },

    #[error("curve has no spline {spline}")]
    SplineOutOfRange { spline: usize },

    /// Raised by a standalone spline that does not know its own index.
    #[error("segment {segment} is past the last of {count} segments")]
    SegmentPastEnd { segment: usize, count: usize },

    #[error("curve has no segments to insert into")]
    EmptyCurve,

    #[error("insert session already finished")]
    SessionClosed,
}

pub type Result<T> = core::result::Result<T, Error>;
