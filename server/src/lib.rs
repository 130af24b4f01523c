pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod recovery;
pub mod registry;
pub mod storage;
pub mod task;

pub use config::{ConfigErr, ServerConfig};
pub use error::UpdateErr;
pub use orchestrator::Orchestrator;
pub use registry::TaskRegistry;
