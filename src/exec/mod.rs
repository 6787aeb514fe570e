//! Process execution for the Atlas CLI.

mod env;
mod process;

pub use env::*;
pub use process::*;
