//! Validation and transition rules for station mutations.
//!
//! Every mutation path (HTTP PUT or Slack interactive action) funnels
//! through this module before touching the store.

use thiserror::Error;

use crate::types::{EndIndicator, StationStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid status. Must be AQ, PS, or Inactive.")]
    InvalidStatus(String),
    #[error("Invalid end indicator. Must be Hi or Lo.")]
    InvalidIndicator(String),
    #[error("Invalid side parameter")]
    InvalidSide(String),
    #[error("Invalid priority. Must be normal or urgent.")]
    InvalidPriority(String),
    #[error("Invalid bin field: {0}")]
    InvalidBinField(String),
    #[error("No updates provided")]
    NoOpUpdate,
}

/// Field-level partial update for a station. Fields left as `None` are
/// never touched by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationPatch {
    pub status: Option<StationStatus>,
    pub end_indicator: Option<EndIndicator>,
}

impl StationPatch {
    pub fn status(status: StationStatus) -> Self {
        Self {
            status: Some(status),
            end_indicator: None,
        }
    }

    pub fn end_indicator(end_indicator: EndIndicator) -> Self {
        Self {
            status: None,
            end_indicator: Some(end_indicator),
        }
    }

    /// Builds a validated patch from raw wire strings, rejecting unknown
    /// enum values and the empty update.
    pub fn from_raw(
        status: Option<&str>,
        end_indicator: Option<&str>,
    ) -> Result<Self, ProtocolError> {
        let patch = Self {
            status: status.map(StationStatus::parse).transpose()?,
            end_indicator: end_indicator.map(EndIndicator::parse).transpose()?,
        };
        patch.validate()?;
        Ok(patch)
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.status.is_none() && self.end_indicator.is_none() {
            return Err(ProtocolError::NoOpUpdate);
        }
        Ok(())
    }
}

/// Normalizes a raw stored status into the canonical shape. The legacy
/// composite forms `AQ+PS` and `PS+AQ` become primary `AQ` with secondary
/// `PS`; canonical values pass through unchanged.
pub fn normalize_status(
    raw: &str,
) -> Result<(StationStatus, Option<StationStatus>), ProtocolError> {
    match raw {
        "AQ+PS" | "PS+AQ" => Ok((
            StationStatus::ActiveQueue,
            Some(StationStatus::ProblemSolver),
        )),
        other => Ok((StationStatus::parse(other)?, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cycle_is_fixed_three_cycle() {
        assert_eq!(StationStatus::ActiveQueue.next(), StationStatus::ProblemSolver);
        assert_eq!(StationStatus::ProblemSolver.next(), StationStatus::Inactive);
        assert_eq!(StationStatus::Inactive.next(), StationStatus::ActiveQueue);
    }

    #[test]
    fn test_status_cycle_returns_after_three_steps() {
        for status in [
            StationStatus::ActiveQueue,
            StationStatus::ProblemSolver,
            StationStatus::Inactive,
        ] {
            assert_eq!(status.next().next().next(), status);
        }
    }

    #[test]
    fn test_indicator_double_toggle_is_identity() {
        for indicator in [EndIndicator::Hi, EndIndicator::Lo] {
            assert_eq!(indicator.toggle().toggle(), indicator);
        }
    }

    #[test]
    fn test_normalize_composite_statuses() {
        for raw in ["AQ+PS", "PS+AQ"] {
            let (status, secondary) = normalize_status(raw).unwrap();
            assert_eq!(status, StationStatus::ActiveQueue);
            assert_eq!(secondary, Some(StationStatus::ProblemSolver));
        }
    }

    #[test]
    fn test_normalize_canonical_is_identity() {
        for raw in ["AQ", "PS", "Inactive"] {
            let (status, secondary) = normalize_status(raw).unwrap();
            assert_eq!(status.as_str(), raw);
            assert_eq!(secondary, None);
        }
    }

    #[test]
    fn test_normalize_rejects_unknown() {
        assert!(matches!(
            normalize_status("Broken"),
            Err(ProtocolError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_empty_patch_is_noop_error() {
        assert_eq!(
            StationPatch::from_raw(None, None),
            Err(ProtocolError::NoOpUpdate)
        );
    }

    #[test]
    fn test_patch_rejects_unknown_status() {
        assert!(matches!(
            StationPatch::from_raw(Some("Busy"), None),
            Err(ProtocolError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_patch_rejects_unknown_indicator() {
        assert!(matches!(
            StationPatch::from_raw(Some("AQ"), Some("Mid")),
            Err(ProtocolError::InvalidIndicator(_))
        ));
    }

    #[test]
    fn test_patch_accepts_single_field() {
        let patch = StationPatch::from_raw(Some("PS"), None).unwrap();
        assert_eq!(patch.status, Some(StationStatus::ProblemSolver));
        assert_eq!(patch.end_indicator, None);

        let patch = StationPatch::from_raw(None, Some("Lo")).unwrap();
        assert_eq!(patch.status, None);
        assert_eq!(patch.end_indicator, Some(EndIndicator::Lo));
    }
}
