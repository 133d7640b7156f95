use serde::{ser::Error as _, Deserialize, Serialize, Serializer};

/// Unresolved task as produced by the waypoint builder or written by hand in a
/// task list. `name` refers to an environment object unless `type` is a system
/// task (`undock`, `dock`, `sleep`).
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct TaskDescriptor {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docking_station: Option<String>,
}

impl TaskDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn of_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Anomaly,
    Failure,
    Normal,
    Preemption,
    Success,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success | Outcome::Normal)
    }
}

/// Reserved exit states of a mission state machine.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExitState {
    Failure,
    Preemption,
    Success,
}

impl ExitState {
    pub const ALL: [ExitState; 3] = [ExitState::Failure, ExitState::Preemption, ExitState::Success];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExitState::Failure => "failure",
            ExitState::Preemption => "preemption",
            ExitState::Success => "success",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Whatever task comes next. Replaced by the linker.
    Next,
    State(String),
    Exit(ExitState),
}

impl Target {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Target::Next => None,
            Target::State(name) => Some(name),
            Target::Exit(exit) => Some(exit.as_str()),
        }
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_str() {
            Some(name) => serializer.serialize_str(name),
            None => Err(S::Error::custom("transition target was never linked")),
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Transition {
    pub outcome: Outcome,
    #[serde(rename = "transition")]
    pub target: Target,
    #[serde(rename = "transition_to_state")]
    pub continues: bool,
}

impl Transition {
    fn proceed(outcome: Outcome) -> Self {
        Self { outcome, target: Target::Next, continues: true }
    }

    fn exit(outcome: Outcome, exit: ExitState) -> Self {
        Self { outcome, target: Target::Exit(exit), continues: false }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum SettingValue {
    Number(f64),
    Text(String),
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Setting {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub value_type: &'static str,
    pub value: SettingValue,
}

impl Setting {
    fn text(name: &'static str, value_type: &'static str, value: impl Into<String>) -> Self {
        Self { name, value_type, value: SettingValue::Text(value.into()) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Undock,
    Dock,
    Sleep,
    Navigation,
    Inspection,
    SimpleInspection,
}

impl TaskKind {
    /// Fresh transition set for a task of this kind. Continuing outcomes target
    /// [`Target::Next`]; preemption always exits immediately.
    pub fn default_transitions(&self) -> Vec<Transition> {
        use Outcome::*;
        match self {
            TaskKind::Navigation => vec![
                Transition::proceed(Failure),
                Transition::exit(Preemption, ExitState::Preemption),
                Transition::proceed(Success),
            ],
            TaskKind::Inspection => vec![
                Transition::proceed(Anomaly),
                Transition::proceed(Failure),
                Transition::proceed(Normal),
                Transition::exit(Preemption, ExitState::Preemption),
            ],
            TaskKind::SimpleInspection | TaskKind::Sleep | TaskKind::Undock => vec![
                Transition::proceed(Failure),
                Transition::proceed(Success),
                Transition::exit(Preemption, ExitState::Preemption),
            ],
            TaskKind::Dock => vec![
                Transition::exit(Failure, ExitState::Failure),
                Transition::exit(Preemption, ExitState::Preemption),
                Transition::exit(Success, ExitState::Success),
            ],
        }
    }
}

/// One state of the mission state machine.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct MissionTask {
    pub name: String,
    #[serde(skip)]
    pub kind: TaskKind,
    #[serde(rename = "type")]
    pub plugin: String,
    pub settings: Vec<Setting>,
    pub transitions: Vec<Transition>,
}

impl MissionTask {
    fn new(kind: TaskKind, name: String, plugin: String, settings: Vec<Setting>) -> Self {
        Self { name, kind, plugin, settings, transitions: kind.default_transitions() }
    }

    pub fn undock(name: impl Into<String>) -> Self {
        Self::new(TaskKind::Undock, name.into(), "system_behavior_plugins::Walk".into(), vec![])
    }

    pub fn dock(name: impl Into<String>, docking_station: impl Into<String>) -> Self {
        Self::new(
            TaskKind::Dock,
            name.into(),
            "docking_behavior_plugins::Dock".into(),
            vec![Setting::text("docking_station", "DockingStation", docking_station)],
        )
    }

    pub fn sleep(name: impl Into<String>, duration: f64) -> Self {
        Self::new(
            TaskKind::Sleep,
            name.into(),
            "basic_behavior_plugins::Sleep".into(),
            vec![Setting { name: "duration", value_type: "double", value: SettingValue::Number(duration) }],
        )
    }

    pub fn navigation(name: impl Into<String>, navigation_goal: impl Into<String>) -> Self {
        Self::new(
            TaskKind::Navigation,
            name.into(),
            "navigation_behavior_plugins::ReactiveNavigation".into(),
            vec![
                Setting::text("navigation_goal", "NavigationGoal", navigation_goal),
                Setting::text("route_option", "RouteOption", "Along Waypoints"),
            ],
        )
    }

    /// Inspection with anomaly detection (`anomaly`/`normal` outcomes).
    pub fn inspection(name: impl Into<String>, item: impl Into<String>, plugin: &str, action: &str) -> Self {
        Self::new(
            TaskKind::Inspection,
            name.into(),
            format!("{}::{}", plugin, action),
            vec![Setting::text("inspectable_item", "InspectableItem", item)],
        )
    }

    pub fn simple_inspection(name: impl Into<String>, item: impl Into<String>, plugin: &str, action: &str) -> Self {
        Self::new(
            TaskKind::SimpleInspection,
            name.into(),
            format!("{}::{}", plugin, action),
            vec![Setting::text("inspectable_item", "InspectableItem", item)],
        )
    }

    pub fn setting(&self, name: &str) -> Option<&SettingValue> {
        self.settings.iter().find(|s| s.name == name).map(|s| &s.value)
    }
}

/// A linked state machine ready to hand to the mission executor.
#[derive(Clone, Debug, PartialEq)]
pub struct Mission {
    pub name: String,
    pub initial_state: String,
    pub states: Vec<MissionTask>,
}

impl Mission {
    pub const TYPE: &'static str = "state_machine::DynamicStateMachine";

    pub fn state(&self, name: &str) -> Option<&MissionTask> {
        self.states.iter().find(|s| s.name == name)
    }

    /// Targets that are neither a state of this mission nor a reserved exit.
    pub fn dangling_targets(&self) -> Vec<(&str, &Target)> {
        self.states
            .iter()
            .flat_map(|s| s.transitions.iter().map(move |t| (s.name.as_str(), &t.target)))
            .filter(|(_, target)| match target {
                Target::Next => true,
                Target::Exit(_) => false,
                Target::State(name) => self.state(name).is_none(),
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        let initial_ok = match self.states.first() {
            Some(first) => first.name == self.initial_state,
            None => self.initial_state.is_empty(),
        };
        initial_ok && self.dangling_targets().is_empty()
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum MissionSettingValue<'a> {
    Text(&'a str),
    Outcomes(&'a [ExitState]),
    Flag(bool),
    States(&'a [MissionTask]),
}

#[derive(Serialize)]
struct MissionSetting<'a> {
    name: &'static str,
    #[serde(rename = "type")]
    value_type: &'static str,
    value: MissionSettingValue<'a>,
}

#[derive(Serialize)]
struct MissionDocument<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    machine_type: &'static str,
    settings: [MissionSetting<'a>; 4],
}

impl Serialize for Mission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MissionDocument {
            name: &self.name,
            machine_type: Mission::TYPE,
            settings: [
                MissionSetting {
                    name: "default_initial_state",
                    value_type: "DefaultInitialState",
                    value: MissionSettingValue::Text(&self.initial_state),
                },
                MissionSetting {
                    name: "outcomes",
                    value_type: "Outcomes",
                    value: MissionSettingValue::Outcomes(&ExitState::ALL),
                },
                MissionSetting {
                    name: "restart_on_execution",
                    value_type: "bool",
                    value: MissionSettingValue::Flag(false),
                },
                MissionSetting { name: "states", value_type: "States", value: MissionSettingValue::States(&self.states) },
            ],
        }
        .serialize(serializer)
    }
}
