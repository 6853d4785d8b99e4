pub mod filter;
pub mod stats;
pub mod task_ops;
