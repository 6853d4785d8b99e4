pub mod alerts;
pub mod api;
pub mod cli;
pub mod context;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
pub mod store;
pub mod tui;
pub mod util;
pub mod view;
