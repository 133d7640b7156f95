use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::ValueEnum;
use inspection_planner::Generation;
use log::{error, info};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
        }
    }

    pub fn render<T: Serialize>(&self, value: &T) -> anyhow::Result<String> {
        Ok(match self {
            Format::Yaml => serde_yaml::to_string(value)?,
            Format::Json => serde_json::to_string_pretty(value)? + "\n",
        })
    }
}

/// Appends the format's extension unless the path already ends in `.yaml`,
/// `.yml` or `.json`.
pub fn with_extension(path: &Path, format: Format) -> PathBuf {
    let known = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| matches!(e.to_ascii_lowercase().as_str(), "yaml" | "yml" | "json"));
    if known {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(format.extension());
        PathBuf::from(name)
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub environment: PathBuf,
    pub task_dir: PathBuf,
    pub format: Format,
    pub task_lists: bool,
}

/// Writes the augmented environment and every mission. Every document is
/// rendered before the first file is touched, so a serialization failure
/// leaves the output untouched. Returns the paths written, environment first.
pub fn write_generation(generation: &Generation, options: &OutputOptions) -> anyhow::Result<Vec<PathBuf>> {
    for mission in generation.segments.iter().flat_map(|s| s.missions()) {
        if !mission.is_closed() {
            error!("{} has unresolved transitions: {:?}", mission.name, mission.dangling_targets());
        }
    }

    let format = options.format;
    let ext = format.extension();
    let render = |path: PathBuf, text: anyhow::Result<String>| {
        text.with_context(|| format!("serializing {}", path.display())).map(|text| (path, text))
    };

    let environment = with_extension(&options.environment, format);
    let mut documents = vec![render(environment.clone(), format.render(&generation.environment))?];
    for segment in generation.segments.iter() {
        if options.task_lists {
            for (direction, tasks) in [("Forward", &segment.forward_tasks), ("Reverse", &segment.reverse_tasks)] {
                let path = options.task_dir.join(format!("{}_{}_tasks.{}", segment.segment, direction, ext));
                documents.push(render(path, format.render(tasks))?);
            }
        }
        for (direction, mission) in [("Forward", &segment.forward), ("Reverse", &segment.reverse)] {
            let path = options.task_dir.join(format!("{}_{}_mission.{}", segment.segment, direction, ext));
            documents.push(render(path, format.render(mission))?);
        }
    }

    if let Some(parent) = environment.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::create_dir_all(&options.task_dir)
        .with_context(|| format!("creating task directory {}", options.task_dir.display()))?;

    let mut written = Vec::with_capacity(documents.len());
    for (path, text) in documents {
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

pub fn write_summary(generation: &Generation, out: impl Write) -> io::Result<()> {
    let mut tw = tabwriter::TabWriter::new(out);
    writeln!(&mut tw, "segment\tmission\tstates\tinitial state")?;
    writeln!(&mut tw, "---\t---\t---\t---")?;
    for segment in generation.segments.iter() {
        for mission in segment.missions() {
            writeln!(
                &mut tw,
                "{}\t{}\t{}\t{}",
                segment.segment,
                mission.name,
                mission.states.len(),
                mission.initial_state
            )?;
        }
    }
    tw.flush()
}

#[cfg(test)]
mod tests {
    use inspection_planner::generate;
    use inspection_structs::{EnvironmentGraph, MissionTask, SegmentDescriptor};

    use super::*;

    fn generation() -> Generation {
        let segments: Vec<SegmentDescriptor> =
            serde_yaml::from_str(include_str!("../../fixtures/tunnel_segments.yaml")).unwrap();
        generate(&segments, EnvironmentGraph::new()).unwrap()
    }

    #[test]
    fn extension_is_appended_only_when_missing() {
        assert_eq!(with_extension(Path::new("out"), Format::Yaml), PathBuf::from("out.yaml"));
        assert_eq!(with_extension(Path::new("dir/out"), Format::Json), PathBuf::from("dir/out.json"));
        assert_eq!(with_extension(Path::new("out.yml"), Format::Json), PathBuf::from("out.yml"));
        assert_eq!(with_extension(Path::new("out.JSON"), Format::Yaml), PathBuf::from("out.JSON"));
        assert_eq!(with_extension(Path::new("out.v2"), Format::Yaml), PathBuf::from("out.v2.yaml"));
    }

    #[test]
    fn writes_environment_missions_and_task_lists() {
        let _ = env_logger::try_init();
        let dir = tempfile::tempdir().unwrap();
        let options = OutputOptions {
            environment: dir.path().join("environment_out"),
            task_dir: dir.path().join("generated_tasks"),
            format: Format::Yaml,
            task_lists: true,
        };
        let written = write_generation(&generation(), &options).unwrap();
        assert_eq!(written.len(), 1 + 2 * 4);
        assert_eq!(written[0], dir.path().join("environment_out.yaml"));
        for name in ["S1__Forward_tasks.yaml", "S1__Reverse_mission.yaml", "S2__Forward_mission.yaml"] {
            assert!(options.task_dir.join(name).is_file(), "{} missing", name);
        }

        let env: serde_yaml::Value = serde_yaml::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(env["objects"][0]["name"].as_str(), Some("S1_0_NavGoal"));
        assert_eq!(env["objects"][0]["type"].as_str(), Some("navigation_goal"));
        assert_eq!(env["object_relations"][0]["child"].as_str(), Some("S1_0_NavGoal"));

        let text = fs::read_to_string(options.task_dir.join("S1__Forward_mission.yaml")).unwrap();
        let mission: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(mission["name"].as_str(), Some("S1__Forward_Mission"));
        assert_eq!(mission["type"].as_str(), Some("state_machine::DynamicStateMachine"));
    }

    #[test]
    fn json_without_task_lists() {
        let dir = tempfile::tempdir().unwrap();
        let options = OutputOptions {
            environment: dir.path().join("env.json"),
            task_dir: dir.path().join("tasks"),
            format: Format::Json,
            task_lists: false,
        };
        let written = write_generation(&generation(), &options).unwrap();
        assert_eq!(written.len(), 1 + 2 * 2);
        assert!(!options.task_dir.join("S1__Forward_tasks.json").exists());

        let text = fs::read_to_string(options.task_dir.join("S2__Reverse_mission.json")).unwrap();
        let mission: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(mission["settings"][3]["name"], "states");
        assert_eq!(mission["settings"][3]["value"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn unlinked_mission_writes_nothing() {
        let _ = env_logger::try_init();
        let mut generation = generation();
        generation.segments[1].reverse.states[0] = MissionTask::navigation("Navigate to S2_2_NavGoal", "S2_2_NavGoal");

        let dir = tempfile::tempdir().unwrap();
        let options = OutputOptions {
            environment: dir.path().join("environment_out.yaml"),
            task_dir: dir.path().join("generated_tasks"),
            format: Format::Yaml,
            task_lists: true,
        };
        let err = write_generation(&generation, &options).unwrap_err();
        assert!(format!("{:#}", err).contains("S2__Reverse_mission.yaml"), "{:#}", err);
        assert!(!options.environment.exists());
        assert!(!options.task_dir.exists());
    }

    #[test]
    fn summary_lists_every_mission() {
        let mut out = Vec::new();
        write_summary(&generation(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2 + 4);
        assert!(text.lines().any(|l| l.starts_with("S2_") && l.contains("S2__Reverse_Mission")));
    }
}
