pub mod body;
pub mod builder;
pub mod finishing;
pub mod head;
pub mod offset;
pub mod params;
pub mod sketch;
pub mod thread;
pub mod types;

pub use body::{body_radius, execute_body, BodyStage};
pub use builder::{build_bolt, BoltBuilder};
pub use finishing::{execute_finishing, FinishingStage};
pub use head::{execute_head, head_polygon, stub_radius, HeadPolygon, HeadStage};
pub use offset::{execute_offset, OffsetStage, OFFSET_SHELL_DISTANCE};
pub use params::{BoltParameters, ParameterError};
pub use thread::{execute_thread, ThreadStage};
pub use types::*;
