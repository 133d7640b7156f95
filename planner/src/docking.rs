use inspection_structs::{
    segment::DockingStationDescriptor, EnvironmentGraph, EnvironmentObject, ObjectKind, PoseStamped, Position,
};
use log::info;

use crate::{
    geometry::{normalized_direction, offset},
    waypoints::Segment,
};

/// How far back from the segment end the docking station sits.
pub const DOCK_SETBACK: f64 = 2.0;
/// How far back from the docking station its approach goal sits.
pub const APPROACH_SETBACK: f64 = 1.0;

fn docking_pose(segment: &Segment, position: Position) -> PoseStamped {
    let mut pose = PoseStamped::at(position).with_orientation(segment.descriptor.orientation);
    pose.set_translation_tolerance(0.05);
    pose.set_rotation_tolerance(0.1);
    pose
}

/// Places a docking station just before the end of `segment`, plus the
/// navigation goal used to approach it.
pub fn add_end_docking_station(segment: &Segment, dock: &DockingStationDescriptor, env: &mut EnvironmentGraph) {
    let direction = normalized_direction(&segment.start, &segment.end);
    let dock_position = offset(&segment.end, direction, -DOCK_SETBACK);
    let approach_position = offset(&dock_position, direction, -APPROACH_SETBACK);

    let label = dock.label.clone().unwrap_or_else(|| dock.name.clone());
    env.add_object(
        EnvironmentObject::new(dock.name.clone(), ObjectKind::DockingStation { pose: docking_pose(segment, dock_position) })
            .with_label(label.clone()),
    );
    env.add_object(
        EnvironmentObject::new(
            format!("{}NavigationGoal", dock.name),
            ObjectKind::NavigationGoal { pose: docking_pose(segment, approach_position) },
        )
        .with_label(format!("{} Navigation Goal", label)),
    );

    info!(
        "added {} at ({:.2}, {:.2}, {:.2})",
        dock.name, dock_position.x, dock_position.y, dock_position.z
    );
}

#[cfg(test)]
mod tests {
    use inspection_structs::SegmentDescriptor;

    use super::*;

    #[test]
    fn dock_sits_two_metres_before_the_end() {
        let desc = SegmentDescriptor {
            name: "S4_".into(),
            start: Some([0.0, 0.0, 0.0]),
            end: Some([0.0, 20.0, 0.0]),
            spacing: Some(5.0),
            ..Default::default()
        };
        let segment = Segment::try_from(&desc).unwrap();
        let dock = DockingStationDescriptor { name: "DockingStation2".into(), label: Some("Docking Station 2".into()) };
        let mut env = EnvironmentGraph::new();
        add_end_docking_station(&segment, &dock, &mut env);

        let station = env.get_object("DockingStation2").unwrap();
        assert_eq!(station.type_tag(), "docking_station");
        assert_eq!(station.label, "Docking Station 2");
        let pose = station.pose().unwrap();
        assert!(pose.pose.position.eq_xyz(&Position::new(0.0, 18.0, 0.0)));
        assert_eq!(pose.tolerance.unwrap().rotation, 0.1);

        let approach = env.get_object("DockingStation2NavigationGoal").unwrap();
        assert_eq!(approach.label, "Docking Station 2 Navigation Goal");
        assert!(approach.pose().unwrap().pose.position.eq_xyz(&Position::new(0.0, 17.0, 0.0)));
    }

    #[test]
    fn zero_length_segment_docks_on_its_end() {
        let _ = env_logger::try_init();
        let desc = SegmentDescriptor {
            name: "Z".into(),
            start: Some([3.0, -1.0, 0.5]),
            end: Some([3.0, -1.0, 0.5]),
            spacing: Some(1.0),
            ..Default::default()
        };
        let segment = Segment::try_from(&desc).unwrap();
        let dock = DockingStationDescriptor { name: "Dock".into(), label: None };
        let mut env = EnvironmentGraph::new();
        add_end_docking_station(&segment, &dock, &mut env);

        let end = Position::new(3.0, -1.0, 0.5);
        for name in ["Dock", "DockNavigationGoal"] {
            let p = env.get_object(name).unwrap().pose().unwrap().pose.position;
            assert!([p.x, p.y, p.z].iter().all(|c| !c.is_nan()), "{} has NaN position", name);
            assert_eq!(p, end);
        }
        assert_eq!(env.get_object("Dock").unwrap().label, "Dock");
    }
}
