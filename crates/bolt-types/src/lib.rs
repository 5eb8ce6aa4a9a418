pub mod feature;
pub mod sketch;
pub mod thread;
pub mod topo;

pub use feature::*;
pub use sketch::*;
pub use thread::*;
pub use topo::*;
