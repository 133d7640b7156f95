use inspection_structs::{
    environment::{ThermalInspection, VisualInspection},
    EnvironmentGraph, EnvironmentObject, InspectionDescriptor, InspectionKind, ObjectKind, Orientation, Position,
    PoseStamped, SegmentDescriptor, TaskDescriptor,
};
use log::{debug, warn};
use tinyvec::TinyVec;

use crate::{
    error::PlanError,
    geometry::{distance, waypoint_position},
};

/// Tasks for one waypoint: its navigation task followed by its inspections.
/// Chunks are reordered as a whole, never split.
pub type Chunk = TinyVec<[TaskDescriptor; 4]>;

pub const NAVIGATION_TASK_TYPE: &str = "navigation_goal";
pub const INSPECT_FROM_HERE: &str = "InspectFromHere";
/// Upper bound on waypoints per segment; a longer segment is malformed.
pub const MAX_WAYPOINTS: usize = 100_000;

/// A segment whose geometry has been checked.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    pub descriptor: &'a SegmentDescriptor,
    pub start: Position,
    pub end: Position,
    pub spacing: f64,
    waypoints: usize,
}

impl<'a> Segment<'a> {
    pub fn name(&self) -> &'a str {
        &self.descriptor.name
    }

    pub fn length(&self) -> f64 {
        distance(&self.start, &self.end)
    }

    /// Number of waypoints, `floor(length / spacing) + 1`.
    pub fn waypoints(&self) -> usize {
        self.waypoints
    }

    /// Index of the last waypoint.
    pub fn last_index(&self) -> usize {
        self.waypoints - 1
    }
}

impl<'a> TryFrom<&'a SegmentDescriptor> for Segment<'a> {
    type Error = PlanError;

    fn try_from(descriptor: &'a SegmentDescriptor) -> Result<Self, Self::Error> {
        let malformed = |reason: &str| PlanError::MalformedSegment {
            segment: descriptor.name.clone(),
            reason: reason.to_string(),
        };
        let start = descriptor.start.ok_or_else(|| malformed("missing 'start'"))?;
        let end = descriptor.end.ok_or_else(|| malformed("missing 'end'"))?;
        let spacing = descriptor.spacing.ok_or_else(|| malformed("missing 'spacing'"))?;
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(malformed(&format!("spacing must be positive, got {}", spacing)));
        }
        if start.iter().chain(end.iter()).any(|c| !c.is_finite()) {
            return Err(malformed("non-finite coordinate"));
        }
        if descriptor.orientation.map_or(false, |o| !orientation_is_finite(&o)) {
            return Err(malformed("non-finite orientation"));
        }
        if descriptor.translation_tolerance.map_or(false, |t| !t.is_finite()) {
            return Err(malformed("non-finite translation_tolerance"));
        }
        for inspection in descriptor.inspections.iter() {
            let sizes = inspection.width.iter().chain(inspection.height.iter());
            if inspection.offset.iter().chain(sizes).any(|c| !c.is_finite())
                || inspection.orientation.map_or(false, |o| !orientation_is_finite(&o))
            {
                return Err(malformed(&format!("non-finite value in inspection '{}'", inspection.suffix)));
            }
        }

        let (start, end): (Position, Position) = (start.into(), end.into());
        let steps = (distance(&start, &end) / spacing).floor();
        if !(steps.is_finite() && steps < MAX_WAYPOINTS as f64) {
            return Err(malformed(&format!("more than {} waypoints at spacing {}", MAX_WAYPOINTS, spacing)));
        }

        Ok(Segment { descriptor, start, end, spacing, waypoints: steps as usize + 1 })
    }
}

fn orientation_is_finite(o: &Orientation) -> bool {
    [o.w, o.x, o.y, o.z].iter().all(|c| c.is_finite())
}

/// Task type of the inspection task emitted for an inspection point.
pub fn inspection_task_type(kind: InspectionKind) -> Option<&'static str> {
    match kind {
        InspectionKind::ThermalInspection => Some("visual_inspection_thermal"),
        InspectionKind::VisualInspection => Some("visual_inspection_simple"),
        InspectionKind::Unsupported => None,
    }
}

fn inspection_object(name: String, position: Position, inspection: &InspectionDescriptor) -> Option<EnvironmentObject> {
    let pose = PoseStamped::at(position).with_orientation(inspection.orientation);
    let kind = match inspection.kind {
        InspectionKind::ThermalInspection => ObjectKind::ThermalInspection(ThermalInspection { pose, ..Default::default() }),
        InspectionKind::VisualInspection => {
            let mut visual = VisualInspection { pose, ..Default::default() };
            if let Some(width) = inspection.width {
                visual.size.width = width;
            }
            if let Some(height) = inspection.height {
                visual.size.height = height;
            }
            ObjectKind::VisualInspection(visual)
        }
        InspectionKind::Unsupported => return None,
    };
    Some(EnvironmentObject::new(name, kind))
}

fn object_suffix(kind: InspectionKind) -> &'static str {
    match kind {
        InspectionKind::ThermalInspection => "VIT",
        InspectionKind::VisualInspection => "VIS",
        InspectionKind::Unsupported => "",
    }
}

/// Generates the waypoints of one segment into `env` and returns one chunk per
/// waypoint, in order from `start` towards `end`.
pub fn build_segment(segment: &Segment, env: &mut EnvironmentGraph) -> Vec<Chunk> {
    let length = segment.length();
    if length == 0.0 {
        warn!("segment '{}' has zero length; all waypoints coincide with its start", segment.name());
    }

    let descriptor = segment.descriptor;
    let mut chunks = Vec::with_capacity(segment.waypoints());

    for index in 0..=segment.last_index() {
        let position = waypoint_position(&segment.start, &segment.end, segment.spacing, index, length);
        let waypoint = format!("{}{}", segment.name(), index);

        let mut goal_pose = PoseStamped::at(position).with_orientation(descriptor.orientation);
        if let Some(tolerance) = descriptor.translation_tolerance {
            goal_pose.set_translation_tolerance(tolerance);
        }
        let goal = EnvironmentObject::new(format!("{}_NavGoal", waypoint), ObjectKind::NavigationGoal { pose: goal_pose });
        let zone = EnvironmentObject::new(format!("{}_NavZone", waypoint), ObjectKind::NavigationZone);
        debug!("waypoint {} at ({:.3}, {:.3}, {:.3})", goal.name, position.x, position.y, position.z);

        let mut chunk = Chunk::default();
        chunk.push(TaskDescriptor::new(goal.name.clone()).of_type(NAVIGATION_TASK_TYPE));
        let zone_name = zone.name.clone();
        env.add_relation(goal.name.clone(), zone_name.clone());
        env.add_object(goal);
        env.add_object(zone);

        for inspection in descriptor.inspections.iter() {
            let Some(task_type) = inspection_task_type(inspection.kind) else {
                warn!("segment '{}': skipping inspection with unsupported type", segment.name());
                continue;
            };
            let name = format!("{}{}{}", waypoint, inspection.suffix, object_suffix(inspection.kind));
            let at = Position::new(
                position.x + inspection.offset[0],
                position.y + inspection.offset[1],
                position.z + inspection.offset[2],
            );
            let Some(object) = inspection_object(name.clone(), at, inspection) else {
                continue;
            };
            debug!("inspection point {} ({})", name, object.type_tag());
            env.add_object(object);
            env.add_relation(zone_name.clone(), name.clone());
            chunk.push(TaskDescriptor::new(name).of_type(task_type).with_action(INSPECT_FROM_HERE));
        }

        chunks.push(chunk);
    }

    chunks
}

/// Start to end: chunks in order.
pub fn forward_tasks(chunks: &[Chunk]) -> Vec<TaskDescriptor> {
    chunks.iter().flat_map(|c| c.iter().cloned()).collect()
}

/// End to start: chunks reversed, each chunk's own order kept so the agent still
/// navigates to a waypoint before inspecting from it.
pub fn reverse_tasks(chunks: &[Chunk]) -> Vec<TaskDescriptor> {
    chunks.iter().rev().flat_map(|c| c.iter().cloned()).collect()
}
