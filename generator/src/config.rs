use std::{fs, io, path::Path};

use anyhow::Context;
use inspection_structs::{EnvironmentGraph, EnvironmentObject, Relation, SegmentDescriptor};
use log::{info, warn};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("base environment '{path}' not found")]
    MissingBaseEnvironment { path: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |e| e.eq_ignore_ascii_case("json"))
}

fn parse<T: DeserializeOwned>(path: &Path, text: &str) -> anyhow::Result<T> {
    if is_json(path) {
        serde_json::from_str(text).with_context(|| format!("parsing {}", path.display()))
    } else {
        serde_yaml::from_str(text).with_context(|| format!("parsing {}", path.display()))
    }
}

pub fn load_segments(path: &Path) -> anyhow::Result<Vec<SegmentDescriptor>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading segment config {}", path.display()))?;
    let segments: Vec<SegmentDescriptor> = parse(path, &text)?;
    info!("loaded {} segments from {}", segments.len(), path.display());
    Ok(segments)
}

/// Objects are kept as raw values so one bad entry does not sink the file.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawEnvironment {
    objects: Vec<serde_yaml::Value>,
    object_relations: Vec<Relation>,
}

fn object_from_value(value: serde_yaml::Value) -> Result<EnvironmentObject, (String, serde_yaml::Error)> {
    let name = value.get("name").and_then(|n| n.as_str()).unwrap_or("<unnamed>").to_string();
    let mut object: EnvironmentObject = serde_yaml::from_value(value).map_err(|e| (name, e))?;
    if object.label.is_empty() {
        object.label = object.name.clone();
    }
    Ok(object)
}

pub fn parse_base_environment(path: &Path, text: &str) -> anyhow::Result<EnvironmentGraph> {
    let raw: RawEnvironment = parse(path, text)?;
    let mut env = EnvironmentGraph::new();
    for value in raw.objects {
        match object_from_value(value) {
            Ok(object) => env.add_object(object),
            Err((name, e)) => warn!("skipping base object '{}': {}", name, e),
        }
    }
    for relation in raw.object_relations {
        env.add_relation(relation.child, relation.parent);
    }
    Ok(env)
}

pub fn load_base_environment(path: &Path) -> Result<EnvironmentGraph, LoadError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::MissingBaseEnvironment { path: path.display().to_string() })
        }
        Err(e) => return Err(anyhow::Error::new(e).context(format!("reading {}", path.display())).into()),
    };
    let env = parse_base_environment(path, &text)?;
    info!("loaded {} base objects from {}", env.objects().len(), path.display());
    Ok(env)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use inspection_structs::ObjectKind;

    use super::*;

    const BASE: &str = include_str!("../../fixtures/base_environment.yaml");
    const SEGMENTS: &str = include_str!("../../fixtures/tunnel_segments.yaml");

    #[test]
    fn unknown_kinds_are_skipped_and_labels_default() {
        let _ = env_logger::try_init();
        let env = parse_base_environment(Path::new("base.yaml"), BASE).unwrap();
        let names: Vec<_> = env.objects().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["DockingStation", "DockingStationNavigationGoal"]);
        assert_eq!(env.objects()[0].label, "Docking Station");
        assert_eq!(env.objects()[1].label, "DockingStationNavigationGoal");
        assert!(matches!(env.objects()[0].kind, ObjectKind::DockingStation { .. }));
        assert_eq!(env.objects()[0].pose().unwrap().tolerance.unwrap().rotation, 0.1);
    }

    #[test]
    fn json_base_environment() {
        let text = r#"{
            "objects": [
                {"name": "Z", "type": "navigation_zone"},
                {"name": "G", "label": "Goal", "type": "navigation_goal", "pose": {}},
                {"type": "navigation_goal"}
            ],
            "object_relations": [{"child": "G", "parent": "Z"}]
        }"#;
        let env = parse_base_environment(Path::new("base.json"), text).unwrap();
        assert_eq!(env.objects().len(), 2);
        assert_eq!(env.goal_of_zone("Z"), Some("G"));
    }

    #[test]
    fn missing_base_environment_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        match load_base_environment(&dir.path().join("environment.yaml")) {
            Err(LoadError::MissingBaseEnvironment { path }) => assert!(path.ends_with("environment.yaml")),
            other => panic!("unexpected {:?}", other.map(|e| e.objects().len())),
        }
    }

    #[test]
    fn segments_load_from_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("config_env.yaml");
        fs::write(&yaml, SEGMENTS).unwrap();
        let segments = load_segments(&yaml).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].end_docking_station.as_ref().unwrap().name, "DockingStation2");

        let json: PathBuf = dir.path().join("config_env.json");
        fs::write(&json, serde_json::to_string(&segments).unwrap()).unwrap();
        assert_eq!(load_segments(&json).unwrap(), segments);
    }

    #[test]
    fn bad_segment_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "- name: [unterminated").unwrap();
        let err = load_segments(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.yaml"));
    }
}
