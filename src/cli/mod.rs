mod args;
mod commands;
mod render;
mod repl;

pub use args::CliArgs;
pub use repl::{AppState, run_repl};
