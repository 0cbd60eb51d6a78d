pub mod action;
pub mod config;
pub mod project;
pub mod state;
pub mod task;

pub use action::*;
pub use config::*;
pub use project::*;
pub use state::*;
pub use task::*;
