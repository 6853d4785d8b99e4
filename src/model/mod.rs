pub mod config;
pub mod dates;
pub mod session;
pub mod task;

pub use config::*;
pub use session::*;
pub use task::*;
