//! Configuration errors
//!
//! The solver itself never fails at runtime: commands clamp their inputs and
//! out-of-grid brush targets are dropped. The only fallible surface is
//! construction, where a bad grid or model configuration is rejected before
//! any field is allocated.

use std::fmt;

/// Grid axis named in a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Fastest-varying axis
    X,
    /// Row axis
    Y,
    /// Depth axis (rank 3 only)
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        f.write_str(name)
    }
}

/// Reasons a [`SolverConfig`](crate::SolverConfig) is rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A grid axis has zero cells
    ZeroExtent {
        /// Offending axis
        axis: Axis,
    },
    /// Cell spacing is zero, negative, or not finite
    InvalidSpacing {
        /// Offending axis
        axis: Axis,
        /// Rejected value
        value: f32,
    },
    /// The isotropic 9-point Laplacian needs `dx == dy`
    NonUniformPlanarSpacing {
        /// Spacing along x
        dx: f32,
        /// Spacing along y
        dy: f32,
    },
    /// Time step is zero, negative, or not finite
    InvalidTimeStep {
        /// Rejected value
        value: f32,
    },
    /// Relaxation time `tau` is zero, negative, or not finite
    InvalidRelaxationTime {
        /// Rejected value
        value: f32,
    },
    /// A model constant is NaN or infinite
    NonFiniteModelParameter {
        /// Field name in `ModelParams`
        name: &'static str,
        /// Rejected value
        value: f32,
    },
    /// Sphere nucleus radius is negative or not finite
    InvalidNucleusRadius {
        /// Rejected value
        value: f32,
    },
    /// A frame must run at least one sub-step
    ZeroSubsteps,
    /// Brush screen reference extent is zero, negative, or not finite
    InvalidScreenExtent {
        /// Rejected width
        width: f32,
        /// Rejected height
        height: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroExtent { axis } => {
                write!(f, "grid extent along {axis} must be at least one cell")
            }
            Self::InvalidSpacing { axis, value } => {
                write!(f, "spacing along {axis} must be finite and positive, got {value}")
            }
            Self::NonUniformPlanarSpacing { dx, dy } => write!(
                f,
                "isotropic Laplacian requires dx == dy, got dx={dx} dy={dy}"
            ),
            Self::InvalidTimeStep { value } => {
                write!(f, "time step must be finite and positive, got {value}")
            }
            Self::InvalidRelaxationTime { value } => {
                write!(f, "relaxation time tau must be finite and positive, got {value}")
            }
            Self::NonFiniteModelParameter { name, value } => {
                write!(f, "model parameter {name} must be finite, got {value}")
            }
            Self::InvalidNucleusRadius { value } => {
                write!(f, "nucleus radius must be finite and non-negative, got {value}")
            }
            Self::ZeroSubsteps => f.write_str("substeps per frame must be at least 1"),
            Self::InvalidScreenExtent { width, height } => write!(
                f,
                "screen reference extent must be finite and positive, got {width}x{height}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
