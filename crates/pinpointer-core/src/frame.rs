//! Mapping from raw capture coordinates into the analysis frame.
//!
//! Captured points usually come from image pixels, where `v` grows downward
//! and the physical axes of the experiment may be rotated relative to the
//! image. A [`MeasurementFrame`] applies one of four signed axis
//! permutations and a real-world scale factor, so that errors computed from
//! framed points carry the experiment's sign convention and units.

use nalgebra::{distance, Point2};
use serde::{Deserialize, Serialize};

use crate::error::PinpointError;
use crate::trial::{ensure_finite, Point};

/// Orientation of the experiment axes in the captured image.
///
/// Each variant is a signed permutation of the pixel axes, so distances are
/// preserved and only the sign/assignment of the x/y errors changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrientation {
    /// x to the right, y up: `(u, v) -> (u, -v)`.
    #[default]
    RightUp,
    /// x down the image, y to the right: `(u, v) -> (v, u)`.
    DownRight,
    /// x to the left, y down: `(u, v) -> (-u, v)`.
    LeftDown,
    /// x up the image, y to the left: `(u, v) -> (-v, -u)`.
    UpLeft,
}

impl AxisOrientation {
    pub const ALL: [AxisOrientation; 4] = [
        AxisOrientation::RightUp,
        AxisOrientation::DownRight,
        AxisOrientation::LeftDown,
        AxisOrientation::UpLeft,
    ];

    /// Orientation by picker index (`0..=3`).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            AxisOrientation::RightUp => 0,
            AxisOrientation::DownRight => 1,
            AxisOrientation::LeftDown => 2,
            AxisOrientation::UpLeft => 3,
        }
    }

    /// Map a raw pixel point into oriented (unscaled) coordinates.
    pub fn apply(self, p: Point) -> Point {
        match self {
            AxisOrientation::RightUp => Point2::new(p.x, -p.y),
            AxisOrientation::DownRight => Point2::new(p.y, p.x),
            AxisOrientation::LeftDown => Point2::new(-p.x, p.y),
            AxisOrientation::UpLeft => Point2::new(-p.y, -p.x),
        }
    }
}

/// Ratio between real-world and pixel distances.
///
/// Always finite and `> 0`, including when deserialized.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScaleFactor")]
pub struct ScaleCalibration {
    factor: f64,
}

#[derive(Deserialize)]
struct ScaleFactor {
    factor: f64,
}

impl TryFrom<ScaleFactor> for ScaleCalibration {
    type Error = PinpointError;

    fn try_from(raw: ScaleFactor) -> Result<Self, Self::Error> {
        Self::from_factor(raw.factor)
    }
}

impl ScaleCalibration {
    pub fn identity() -> Self {
        Self { factor: 1.0 }
    }

    /// Use an already known factor (real-world units per pixel).
    pub fn from_factor(factor: f64) -> Result<Self, PinpointError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(PinpointError::InvalidReferenceDistance { distance: factor });
        }
        Ok(Self { factor })
    }

    /// Derive the factor from two reference points a known distance apart.
    pub fn from_reference(real_distance: f64, a: Point, b: Point) -> Result<Self, PinpointError> {
        ensure_finite(&a)?;
        ensure_finite(&b)?;
        if !real_distance.is_finite() || real_distance <= 0.0 {
            return Err(PinpointError::InvalidReferenceDistance {
                distance: real_distance,
            });
        }
        let pixel_distance = distance(&a, &b);
        if pixel_distance == 0.0 {
            return Err(PinpointError::CoincidentReference);
        }
        Ok(Self {
            factor: real_distance / pixel_distance,
        })
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Default for ScaleCalibration {
    fn default() -> Self {
        Self::identity()
    }
}

/// Orientation plus scale applied to every captured point of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementFrame {
    #[serde(default)]
    pub orientation: AxisOrientation,
    #[serde(default)]
    pub scale: ScaleCalibration,
}

impl MeasurementFrame {
    pub fn new(orientation: AxisOrientation, scale: ScaleCalibration) -> Self {
        Self { orientation, scale }
    }

    /// Map a raw capture point into the analysis frame.
    pub fn to_frame(&self, raw: Point) -> Result<Point, PinpointError> {
        ensure_finite(&raw)?;
        let oriented = self.orientation.apply(raw);
        Ok(Point2::from(oriented.coords * self.scale.factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn orientations_preserve_distance() {
        let a = Point2::new(12.0, -3.5);
        let b = Point2::new(-4.0, 7.25);
        for o in AxisOrientation::ALL {
            assert_abs_diff_eq!(
                distance(&o.apply(a), &o.apply(b)),
                distance(&a, &b),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn right_up_flips_image_rows() {
        // Target at pixel (100, 100); implement landed 10 px right, 5 px lower.
        let frame = MeasurementFrame::default();
        let target = frame.to_frame(Point2::new(100.0, 100.0)).unwrap();
        let measured = frame.to_frame(Point2::new(110.0, 105.0)).unwrap();
        let d = measured - target;
        assert_eq!(d.x, 10.0);
        assert_eq!(d.y, -5.0);
    }

    #[test]
    fn orientation_index_roundtrips() {
        for (i, o) in AxisOrientation::ALL.iter().enumerate() {
            assert_eq!(o.index(), i);
            assert_eq!(AxisOrientation::from_index(i), Some(*o));
        }
        assert_eq!(AxisOrientation::from_index(4), None);
    }

    #[test]
    fn reference_scale_from_two_points() {
        let scale =
            ScaleCalibration::from_reference(10.0, Point2::new(0.0, 0.0), Point2::new(30.0, 40.0))
                .unwrap();
        assert_abs_diff_eq!(scale.factor(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn coincident_reference_points_fail() {
        let p = Point2::new(5.0, 5.0);
        assert_eq!(
            ScaleCalibration::from_reference(10.0, p, p),
            Err(PinpointError::CoincidentReference)
        );
    }

    #[test]
    fn bad_reference_distance_fails() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert!(matches!(
            ScaleCalibration::from_reference(0.0, a, b),
            Err(PinpointError::InvalidReferenceDistance { .. })
        ));
        assert!(matches!(
            ScaleCalibration::from_reference(f64::NAN, a, b),
            Err(PinpointError::InvalidReferenceDistance { .. })
        ));
        assert!(ScaleCalibration::from_factor(-1.0).is_err());
    }

    #[test]
    fn deserialized_scale_is_validated() {
        let ok: ScaleCalibration = serde_json::from_str(r#"{ "factor": 0.25 }"#).unwrap();
        assert_eq!(ok.factor(), 0.25);
        for bad in [r#"{ "factor": -3.0 }"#, r#"{ "factor": 0.0 }"#] {
            assert!(serde_json::from_str::<ScaleCalibration>(bad).is_err());
        }
        let frame = r#"{ "orientation": "up_left", "scale": { "factor": -3.0 } }"#;
        assert!(serde_json::from_str::<MeasurementFrame>(frame).is_err());
    }

    #[test]
    fn frame_scales_after_orienting() {
        let frame = MeasurementFrame::new(
            AxisOrientation::UpLeft,
            ScaleCalibration::from_factor(0.5).unwrap(),
        );
        let p = frame.to_frame(Point2::new(2.0, 4.0)).unwrap();
        assert_eq!(p, Point2::new(-2.0, -1.0));
    }

    #[test]
    fn frame_rejects_non_finite_points() {
        let frame = MeasurementFrame::default();
        assert!(matches!(
            frame.to_frame(Point2::new(f64::INFINITY, 0.0)),
            Err(PinpointError::InvalidCoordinate { .. })
        ));
    }
}
