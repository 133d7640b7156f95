use serde::{Deserialize, Serialize};

use crate::Orientation;

/// One entry of the segment configuration file. Geometry fields are optional
/// here so a missing one can be reported against the segment's name instead of
/// failing the whole file parse.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct SegmentDescriptor {
    pub name: String,
    #[serde(default)]
    pub start: Option<[f64; 3]>,
    #[serde(default)]
    pub end: Option<[f64; 3]>,
    #[serde(default)]
    pub spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inspections: Vec<InspectionDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_docking_station: Option<DockingStationDescriptor>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InspectionKind {
    ThermalInspection,
    VisualInspection,
    #[serde(other)]
    Unsupported,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct InspectionDescriptor {
    #[serde(rename = "type")]
    pub kind: InspectionKind,
    #[serde(default)]
    pub suffix: String,
    pub offset: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Docking station placed just before the end of a segment.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DockingStationDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
