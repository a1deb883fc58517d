pub mod context;
pub mod lifecycle;

pub use lifecycle::{run_cycle_once, run_preview, run_standalone};
