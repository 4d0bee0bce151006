pub mod actions;

pub use actions::{verdict_outputs, write_step_outputs};
