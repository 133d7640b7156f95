use inspection_structs::{EnvironmentGraph, Mission, SegmentDescriptor, TaskDescriptor};
use log::info;

use crate::{
    docking::add_end_docking_station,
    error::PlanError,
    linker::assemble_mission,
    waypoints::{build_segment, forward_tasks, reverse_tasks, Segment},
};

/// Missions generated for one segment, with the task lists they came from.
#[derive(Debug, Clone)]
pub struct SegmentMissions {
    pub segment: String,
    pub forward_tasks: Vec<TaskDescriptor>,
    pub reverse_tasks: Vec<TaskDescriptor>,
    pub forward: Mission,
    pub reverse: Mission,
}

impl SegmentMissions {
    pub fn missions(&self) -> [&Mission; 2] {
        [&self.forward, &self.reverse]
    }
}

#[derive(Debug, Clone)]
pub struct Generation {
    pub environment: EnvironmentGraph,
    pub segments: Vec<SegmentMissions>,
}

pub fn forward_mission_name(segment: &str) -> String {
    format!("{}_Forward_Mission", segment)
}

pub fn reverse_mission_name(segment: &str) -> String {
    format!("{}_Reverse_Mission", segment)
}

/// Runs every segment in order on top of `environment`. All segments are
/// checked before anything is generated, so a malformed one leaves no partial
/// output behind.
pub fn generate(segments: &[SegmentDescriptor], mut environment: EnvironmentGraph) -> Result<Generation, PlanError> {
    let checked = segments.iter().map(Segment::try_from).collect::<Result<Vec<_>, _>>()?;

    let mut output = Vec::with_capacity(checked.len());
    for segment in checked.iter() {
        info!("processing segment {}", segment.name());
        let chunks = build_segment(segment, &mut environment);
        if let Some(dock) = segment.descriptor.end_docking_station.as_ref() {
            add_end_docking_station(segment, dock, &mut environment);
        }

        let fwd = forward_tasks(&chunks);
        let rev = reverse_tasks(&chunks);
        let forward = assemble_mission(forward_mission_name(segment.name()), &fwd, &environment);
        let reverse = assemble_mission(reverse_mission_name(segment.name()), &rev, &environment);
        info!("  -> {} ({} states)", forward.name, forward.states.len());
        info!("  -> {} ({} states)", reverse.name, reverse.states.len());

        output.push(SegmentMissions {
            segment: segment.name().to_string(),
            forward_tasks: fwd,
            reverse_tasks: rev,
            forward,
            reverse,
        });
    }

    Ok(Generation { environment, segments: output })
}
