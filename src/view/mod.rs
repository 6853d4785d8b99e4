//! Front-end neutral projection of the task list and per-row actions.

pub mod actions;
pub mod rows;
pub mod toast;
