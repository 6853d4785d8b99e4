pub mod config_io;
pub mod session;
pub mod slot;
