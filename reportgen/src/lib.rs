pub mod cli;
pub mod load_config;
pub mod textgen;

pub use cli::{run, Cli, Commands};
