pub mod docking;
pub mod error;
pub mod generate;
pub mod geometry;
pub mod linker;
pub mod resolver;
pub mod waypoints;


pub use error::{PlanError, ResolveError};
pub use generate::{generate, Generation, SegmentMissions};
pub use linker::{assemble_mission, link};
pub use resolver::resolve_task;
pub use waypoints::{build_segment, forward_tasks, reverse_tasks, Chunk, Segment};
