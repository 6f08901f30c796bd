pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod locate;
pub mod logging;
pub mod output;
pub mod scenario;
pub mod session;
pub mod styles;
