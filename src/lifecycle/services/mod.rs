//! Application services for loop lifecycle orchestration.

mod config;
mod result;
mod transition;

pub use config::LoopServiceConfig;
pub use result::{TransitionError, TransitionResult};
pub use transition::{CreateLoopRequest, LoopService, LoopServiceError, LoopServiceResult};
