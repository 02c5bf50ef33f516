//! Physics error types
//!
//! Construction-time validation (geometry, mass, settings) returns
//! `Result<T, PhysicsError>`. Positional lookups that go out of range are
//! programmer errors and panic with the same diagnostic text.

use std::fmt;

/// Unified error type for kernel operations.
#[derive(Clone, Debug, PartialEq)]
pub enum PhysicsError {
    /// A polygon needs at least three vertices.
    TooFewPoints {
        /// Number of vertices supplied
        count: usize,
    },
    /// The polygon encloses no area, so its centroid is undefined.
    DegenerateArea,
    /// A vertex coordinate was NaN or infinite.
    NonFiniteGeometry,
    /// The vertex loop turns both ways or crosses itself, so separating-axis
    /// tests do not apply.
    NotConvex,
    /// Mass must be positive and finite, or the immovable sentinel.
    InvalidMass {
        /// The rejected mass
        mass: f64,
    },
    /// Positional body lookup past the end of the scene.
    InvalidBodyIndex {
        /// Requested position
        index: usize,
        /// Current number of bodies in the scene
        count: usize,
    },
    /// A settings value the stepper or force generators cannot use.
    InvalidConfiguration {
        /// Which setting failed and why
        reason: &'static str,
    },
    /// Settings file could not be read.
    SettingsIo {
        /// Underlying I/O error text
        message: String,
    },
    /// Settings file was not valid JSON for `PhysicsSettings`.
    SettingsParse {
        /// Underlying parser error text
        message: String,
    },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints { count } => {
                write!(f, "polygon needs at least 3 points, got {count}")
            }
            Self::DegenerateArea => write!(f, "polygon has zero area"),
            Self::NonFiniteGeometry => write!(f, "polygon has a non-finite vertex"),
            Self::NotConvex => write!(f, "polygon is not convex"),
            Self::InvalidMass { mass } => {
                write!(f, "invalid mass {mass}: must be positive and finite, or INFINITE_MASS")
            }
            Self::InvalidBodyIndex { index, count } => {
                write!(f, "body index {index} out of range (count={count})")
            }
            Self::InvalidConfiguration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
            Self::SettingsIo { message } => write!(f, "failed to read settings: {message}"),
            Self::SettingsParse { message } => write!(f, "failed to parse settings: {message}"),
        }
    }
}

impl std::error::Error for PhysicsError {}

impl From<std::io::Error> for PhysicsError {
    fn from(err: std::io::Error) -> Self {
        Self::SettingsIo {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PhysicsError {
    fn from(err: serde_json::Error) -> Self {
        Self::SettingsParse {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_messages() {
        assert_eq!(
            PhysicsError::TooFewPoints { count: 2 }.to_string(),
            "polygon needs at least 3 points, got 2"
        );
        assert_eq!(PhysicsError::NotConvex.to_string(), "polygon is not convex");
        assert_eq!(
            PhysicsError::InvalidBodyIndex { index: 7, count: 4 }.to_string(),
            "body index 7 out of range (count=4)"
        );
    }

    #[test]
    fn test_mass_display() {
        let s = PhysicsError::InvalidMass { mass: -2.0 }.to_string();
        assert!(s.contains("-2"));
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let e: PhysicsError = err.into();
        assert!(matches!(e, PhysicsError::SettingsParse { .. }));
    }
}
