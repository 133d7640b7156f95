use serde::{Deserialize, Serialize};

use crate::{PoseStamped, Size, TemperatureRange};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ThermalInspection {
    pub pose: PoseStamped,
    pub min_certainty: f64,
    pub temperature_type: String,
    pub unit: String,
    pub normal_operating_range: TemperatureRange,
}

impl Default for ThermalInspection {
    fn default() -> Self {
        Self {
            pose: PoseStamped::default(),
            min_certainty: 0.6,
            temperature_type: "Max".to_string(),
            unit: "degreesC".to_string(),
            normal_operating_range: TemperatureRange::default(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct VisualInspection {
    pub pose: PoseStamped,
    pub camera_type: String,
    pub size: Size,
}

impl Default for VisualInspection {
    fn default() -> Self {
        Self { pose: PoseStamped::default(), camera_type: "normal".to_string(), size: Size::default() }
    }
}

/// The kind of an environment object. The serialized `type` tag is what the
/// mission executor matches on.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    NavigationGoal {
        pose: PoseStamped,
    },
    NavigationZone,
    DockingStation {
        pose: PoseStamped,
    },
    #[serde(rename = "visual_inspection_thermal")]
    ThermalInspection(ThermalInspection),
    #[serde(rename = "visual_inspection_simple")]
    VisualInspection(VisualInspection),
}

impl ObjectKind {
    pub fn type_tag(&self) -> &'static str {
        match self {
            ObjectKind::NavigationGoal { .. } => "navigation_goal",
            ObjectKind::NavigationZone => "navigation_zone",
            ObjectKind::DockingStation { .. } => "docking_station",
            ObjectKind::ThermalInspection(_) => "visual_inspection_thermal",
            ObjectKind::VisualInspection(_) => "visual_inspection_simple",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EnvironmentObject {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl EnvironmentObject {
    /// New object labelled with its own name.
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        let name = name.into();
        Self { label: name.clone(), name, kind }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn type_tag(&self) -> &'static str {
        self.kind.type_tag()
    }

    pub fn pose(&self) -> Option<&PoseStamped> {
        match &self.kind {
            ObjectKind::NavigationGoal { pose } | ObjectKind::DockingStation { pose } => Some(pose),
            ObjectKind::ThermalInspection(t) => Some(&t.pose),
            ObjectKind::VisualInspection(v) => Some(&v.pose),
            ObjectKind::NavigationZone => None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Relation {
    pub child: String,
    pub parent: String,
}

/// Objects and the relations between them, in insertion order. The graph only
/// grows: there is no removal, and name uniqueness is left to the caller.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct EnvironmentGraph {
    #[serde(default)]
    objects: Vec<EnvironmentObject>,
    #[serde(default)]
    object_relations: Vec<Relation>,
}

impl EnvironmentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: EnvironmentObject) {
        self.objects.push(object);
    }

    pub fn add_relation(&mut self, child: impl Into<String>, parent: impl Into<String>) {
        self.object_relations.push(Relation { child: child.into(), parent: parent.into() });
    }

    pub fn has_object(&self, name: &str) -> bool {
        self.objects.iter().any(|o| o.name == name)
    }

    pub fn get_object(&self, name: &str) -> Option<&EnvironmentObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn objects(&self) -> &[EnvironmentObject] {
        &self.objects
    }

    pub fn relations(&self) -> &[Relation] {
        &self.object_relations
    }

    fn child_of(&self, parent: &str) -> Option<&str> {
        self.object_relations.iter().find(|r| r.parent == parent).map(|r| r.child.as_str())
    }

    /// Navigation zone an inspection point is performed from.
    pub fn zone_of_inspection(&self, inspection: &str) -> Option<&str> {
        self.child_of(inspection)
    }

    pub fn goal_of_zone(&self, zone: &str) -> Option<&str> {
        self.child_of(zone)
    }

    /// Walks inspection -> zone -> goal: where to stand to perform `inspection`.
    pub fn goal_of_inspection(&self, inspection: &str) -> Option<&str> {
        self.zone_of_inspection(inspection).and_then(|zone| self.goal_of_zone(zone))
    }
}
