pub mod mock_host;
pub mod thread_table;
pub mod traits;
pub mod types;

pub use mock_host::MockHost;
pub use traits::*;
pub use types::*;
