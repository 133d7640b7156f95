use serde::{Deserialize, Serialize};

pub mod environment;
pub mod mission;
pub mod segment;

pub use environment::{
    EnvironmentGraph, EnvironmentObject, ObjectKind, Relation, ThermalInspection, VisualInspection,
};
pub use mission::{
    ExitState, Mission, MissionTask, Outcome, Setting, SettingValue, TaskDescriptor, TaskKind,
    Target, Transition,
};
pub use segment::{DockingStationDescriptor, InspectionDescriptor, InspectionKind, SegmentDescriptor};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dist(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn eq_xyz(&self, other: &Position) -> bool {
        self.dist(other) < 1e-9
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Quaternion, identity by default.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Orientation {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Orientation {
    fn default() -> Self {
        Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Tolerance {
    pub translation: f64,
    pub rotation: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        // rotation is ~6 degrees
        Self { translation: 0.05, rotation: 0.104719758033752 }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self { width: 0.1, height: 0.8 }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self { min: -20.0, max: 900.0 }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Header {
    pub frame_id: String,
}

impl Default for Header {
    fn default() -> Self {
        Self { frame_id: "map".to_string() }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Pose {
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub orientation: Orientation,
}

/// Pose as nested in environment files: a map-frame header, the pose itself and an
/// optional goal tolerance.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct PoseStamped {
    #[serde(default)]
    pub header: Header,
    #[serde(default)]
    pub pose: Pose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<Tolerance>,
}

impl PoseStamped {
    pub fn at(position: Position) -> Self {
        Self { pose: Pose { position, ..Default::default() }, ..Default::default() }
    }

    pub fn with_orientation(mut self, orientation: Option<Orientation>) -> Self {
        if let Some(orientation) = orientation {
            self.pose.orientation = orientation;
        }
        self
    }

    pub fn set_translation_tolerance(&mut self, translation: f64) {
        self.tolerance.get_or_insert_with(Tolerance::default).translation = translation;
    }

    pub fn set_rotation_tolerance(&mut self, rotation: f64) {
        self.tolerance.get_or_insert_with(Tolerance::default).rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_tolerance_keeps_default_rotation() {
        let mut pose = PoseStamped::default();
        assert!(pose.tolerance.is_none());
        pose.set_translation_tolerance(0.2);
        let tol = pose.tolerance.unwrap();
        assert_eq!(tol.translation, 0.2);
        assert_eq!(tol.rotation, Tolerance::default().rotation);
    }

    #[test]
    fn pose_without_tolerance_omits_the_field() {
        let yaml = serde_yaml::to_string(&PoseStamped::at(Position::new(1.0, 2.0, 3.0))).unwrap();
        assert!(!yaml.contains("tolerance"));
        assert!(yaml.contains("frame_id: map"));
    }

    #[test]
    fn dist_is_euclidean() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 12.0);
        assert_eq!(a.dist(&b), 13.0);
        assert!(a.eq_xyz(&Position::from([0.0, 0.0, 0.0])));
    }
}
