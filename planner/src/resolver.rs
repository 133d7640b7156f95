use inspection_structs::{EnvironmentGraph, MissionTask, TaskDescriptor};
use log::debug;

use crate::error::ResolveError;

pub const DEFAULT_ACTION: &str = "Inspect";
pub const DEFAULT_DOCKING_STATION: &str = "Suggested";
pub const DEFAULT_SLEEP_DURATION: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemTask {
    Navigation,
    /// Reports `anomaly`/`normal`.
    Inspection,
    /// Reports `success`.
    SimpleInspection,
}

/// How to build a task that acts on an environment object.
#[derive(Clone, Copy, Debug)]
pub struct TaskTypeConfig {
    pub task_type: &'static str,
    pub prefix: &'static str,
    /// Fallback object name is `<name>-<suffix>`.
    pub suffix: &'static str,
    pub plugin: &'static str,
    pub kind: ItemTask,
}

pub const TASK_TABLE: [TaskTypeConfig; 7] = [
    TaskTypeConfig {
        task_type: "visual_inspection_thermal",
        prefix: "Inspect",
        suffix: "VIT",
        plugin: "visual_inspection_thermal_behavior_plugins",
        kind: ItemTask::Inspection,
    },
    TaskTypeConfig {
        task_type: "inspection_intelligence",
        prefix: "Inspect",
        suffix: "II",
        plugin: "inspection_intelligence_behavior_plugins",
        kind: ItemTask::Inspection,
    },
    TaskTypeConfig {
        task_type: "auditive_inspection_frequency",
        prefix: "Inspect",
        suffix: "AudioFreq",
        plugin: "auditive_inspection_frequency_behavior_plugins",
        kind: ItemTask::Inspection,
    },
    TaskTypeConfig {
        task_type: "visual_inspection_simple",
        prefix: "Inspect",
        suffix: "VIS",
        plugin: "visual_inspection_simple_behavior_plugins",
        kind: ItemTask::SimpleInspection,
    },
    TaskTypeConfig {
        task_type: "auditive_inspection_simple",
        prefix: "Inspect",
        suffix: "AudioS",
        plugin: "auditive_inspection_simple_behavior_plugins",
        kind: ItemTask::SimpleInspection,
    },
    TaskTypeConfig {
        task_type: "visual_inspection_video_recording",
        prefix: "Record",
        suffix: "VSVR",
        plugin: "visual_inspection_video_recording_behavior_plugins",
        kind: ItemTask::SimpleInspection,
    },
    TaskTypeConfig {
        task_type: "navigation_goal",
        prefix: "Navigate to",
        suffix: "NavGoal",
        plugin: "navigation_behavior_plugins",
        kind: ItemTask::Navigation,
    },
];

pub fn task_config(task_type: &str) -> Option<&'static TaskTypeConfig> {
    TASK_TABLE.iter().find(|c| c.task_type == task_type)
}

/// Exact name first, then `<name>-<suffix>`.
fn resolve_object(name: &str, suffix: &str, env: &EnvironmentGraph) -> Result<String, ResolveError> {
    if env.has_object(name) {
        return Ok(name.to_string());
    }
    let with_suffix = format!("{}-{}", name, suffix);
    if env.has_object(&with_suffix) {
        Ok(with_suffix)
    } else {
        Err(ResolveError::MissingObjectReference { name: name.to_string() })
    }
}

/// Turns one descriptor into a fresh, unlinked mission task. The descriptor
/// is not modified.
pub fn resolve_task(descriptor: &TaskDescriptor, env: &EnvironmentGraph) -> Result<MissionTask, ResolveError> {
    let label = descriptor.label.as_deref().unwrap_or(&descriptor.name);

    let task_type = match descriptor.task_type.as_deref() {
        Some(t) if !t.is_empty() => t,
        _ => env
            .get_object(&descriptor.name)
            .map(|o| o.type_tag())
            .ok_or_else(|| ResolveError::MissingObjectReference { name: descriptor.name.clone() })?,
    };

    match task_type {
        "undock" => return Ok(MissionTask::undock(label)),
        "dock" => {
            let station = descriptor.docking_station.as_deref().unwrap_or(DEFAULT_DOCKING_STATION);
            return Ok(MissionTask::dock(label, station));
        }
        "sleep" => return Ok(MissionTask::sleep(label, descriptor.duration.unwrap_or(DEFAULT_SLEEP_DURATION))),
        _ => {}
    }

    let config =
        task_config(task_type).ok_or_else(|| ResolveError::UnknownTaskType { task_type: task_type.to_string() })?;
    let object = resolve_object(&descriptor.name, config.suffix, env)?;

    let name = if config.prefix.is_empty() {
        label.to_string()
    } else {
        format!("{} {}", config.prefix, label)
    };
    let action = descriptor.action.as_deref().unwrap_or(DEFAULT_ACTION);
    debug!("resolved '{}' as {} on {}", name, config.task_type, object);

    Ok(match config.kind {
        ItemTask::Navigation => MissionTask::navigation(name, object),
        ItemTask::Inspection => MissionTask::inspection(name, object, config.plugin, action),
        ItemTask::SimpleInspection => MissionTask::simple_inspection(name, object, config.plugin, action),
    })
}
