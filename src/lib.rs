//! Atlas Exec - typed client for the Atlas schema migration CLI.

pub mod args;
pub mod client;
pub mod config;
pub mod exec;
pub mod models;
pub mod outcome;
pub mod workdir;

pub use client::Client;
pub use outcome::{ErrorKind, ExecError};
pub use workdir::WorkingDir;
