pub mod buildspec;
pub mod core_stack;
pub mod deploy;
pub mod names;
pub mod priority;
pub mod settings;
pub mod synth;
