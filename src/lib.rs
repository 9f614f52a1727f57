pub mod cli;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod server;
pub mod wire;
