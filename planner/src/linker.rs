use std::collections::HashSet;

use inspection_structs::{EnvironmentGraph, ExitState, Mission, MissionTask, TaskDescriptor, Target};
use log::{debug, warn};

use crate::resolver::resolve_task;

fn link_to(task: &mut MissionTask, next: &str) {
    for transition in task.transitions.iter_mut().filter(|t| t.target == Target::Next) {
        transition.target = Target::State(next.to_string());
    }
}

/// Terminates every open transition of the last task: success-like outcomes
/// exit with `success`, the rest with `failure`.
fn set_as_final(task: &mut MissionTask) {
    for transition in task.transitions.iter_mut().filter(|t| t.target == Target::Next) {
        transition.continues = false;
        transition.target =
            Target::Exit(if transition.outcome.is_success() { ExitState::Success } else { ExitState::Failure });
    }
}

/// Chains `tasks` in order into a closed state machine.
pub fn link(name: impl Into<String>, mut tasks: Vec<MissionTask>) -> Mission {
    let successors: Vec<String> = tasks.iter().skip(1).map(|t| t.name.clone()).collect();
    for (task, next) in tasks.iter_mut().zip(successors.iter()) {
        link_to(task, next);
    }
    if let Some(last) = tasks.last_mut() {
        set_as_final(last);
    }

    let initial_state = tasks.first().map(|t| t.name.clone()).unwrap_or_default();
    Mission { name: name.into(), initial_state, states: tasks }
}

/// Resolves every descriptor against `env` and links the survivors. Descriptors
/// that fail to resolve, or whose task name is already taken, are dropped with a
/// warning, so the mission may have fewer states than `descriptors`.
pub fn assemble_mission(name: impl Into<String>, descriptors: &[TaskDescriptor], env: &EnvironmentGraph) -> Mission {
    let name = name.into();
    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        match resolve_task(descriptor, env) {
            Ok(task) if !seen.insert(task.name.clone()) => {
                warn!("{}: dropping duplicate state '{}'", name, task.name);
            }
            Ok(task) => tasks.push(task),
            Err(e) => warn!("{}: dropping task '{}': {}", name, descriptor.name, e),
        }
    }

    let mission = link(name, tasks);
    debug!("{}: {} states, initial '{}'", mission.name, mission.states.len(), mission.initial_state);
    mission
}

#[cfg(test)]
mod tests {
    use inspection_structs::{EnvironmentObject, ObjectKind, Outcome, PoseStamped};

    use super::*;

    fn goals(names: &[&str]) -> EnvironmentGraph {
        let mut env = EnvironmentGraph::new();
        for n in names {
            env.add_object(EnvironmentObject::new(*n, ObjectKind::NavigationGoal { pose: PoseStamped::default() }));
        }
        env
    }

    fn target<'a>(task: &'a MissionTask, outcome: Outcome) -> (&'a Target, bool) {
        let t = task.transitions.iter().find(|t| t.outcome == outcome).unwrap();
        (&t.target, t.continues)
    }

    #[test]
    fn chains_tasks_and_terminates_last() {
        let tasks = vec![
            MissionTask::undock("Undock"),
            MissionTask::navigation("Navigate to A", "A"),
            MissionTask::inspection("Inspect P", "P", "visual_inspection_thermal_behavior_plugins", "Inspect"),
        ];
        let mission = link("M", tasks);
        assert_eq!(mission.initial_state, "Undock");
        assert!(mission.is_closed());

        let s = &mission.states;
        assert_eq!(target(&s[0], Outcome::Success), (&Target::State("Navigate to A".into()), true));
        assert_eq!(target(&s[1], Outcome::Failure), (&Target::State("Inspect P".into()), true));
        assert_eq!(target(&s[1], Outcome::Preemption), (&Target::Exit(ExitState::Preemption), false));
        assert_eq!(target(&s[2], Outcome::Normal), (&Target::Exit(ExitState::Success), false));
        assert_eq!(target(&s[2], Outcome::Anomaly), (&Target::Exit(ExitState::Failure), false));
        assert_eq!(target(&s[2], Outcome::Failure), (&Target::Exit(ExitState::Failure), false));
    }

    #[test]
    fn dock_in_the_middle_stays_terminal() {
        let mission = link("M", vec![MissionTask::dock("Dock", "Suggested"), MissionTask::undock("Undock")]);
        assert!(mission.states[0].transitions.iter().all(|t| matches!(t.target, Target::Exit(_))));
        assert_eq!(target(&mission.states[0], Outcome::Success), (&Target::Exit(ExitState::Success), false));
    }

    #[test]
    fn empty_mission_has_no_initial_state() {
        let mission = link("Empty", vec![]);
        assert_eq!(mission.initial_state, "");
        assert!(mission.states.is_empty());
        assert!(mission.is_closed());
    }

    #[test]
    fn single_task_exits_directly() {
        let mission = link("One", vec![MissionTask::navigation("Navigate to A", "A")]);
        assert_eq!(mission.initial_state, "Navigate to A");
        assert_eq!(target(&mission.states[0], Outcome::Success), (&Target::Exit(ExitState::Success), false));
        assert_eq!(target(&mission.states[0], Outcome::Failure), (&Target::Exit(ExitState::Failure), false));
    }

    #[test]
    fn unresolvable_descriptors_never_become_states() {
        let _ = env_logger::try_init();
        let env = goals(&["A", "B"]);
        let descriptors = vec![
            TaskDescriptor::new("Undock").of_type("undock"),
            TaskDescriptor::new("A").of_type("navigation_goal"),
            TaskDescriptor::new("ghost").of_type("navigation_goal"),
            TaskDescriptor::new("B").of_type("levitate"),
            TaskDescriptor::new("A").of_type("navigation_goal"),
            TaskDescriptor::new("B"),
        ];
        let mission = assemble_mission("M", &descriptors, &env);
        let names: Vec<_> = mission.states.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Undock", "Navigate to A", "Navigate to B"]);
        assert!(mission.is_closed());
    }

    #[test]
    fn assembling_twice_gives_identical_missions() {
        let env = goals(&["A", "B", "C"]);
        let descriptors: Vec<_> = ["A", "B", "C"].iter().map(|n| TaskDescriptor::new(*n)).collect();
        let before = descriptors.clone();
        let first = assemble_mission("M", &descriptors, &env);
        let second = assemble_mission("M", &descriptors, &env);
        assert_eq!(first, second);
        assert_eq!(serde_yaml::to_string(&first).unwrap(), serde_yaml::to_string(&second).unwrap());
        assert_eq!(descriptors, before);
    }
}
