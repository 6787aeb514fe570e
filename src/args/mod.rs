//! Argument vectors for Atlas CLI commands.
//!
//! Every parameter struct maps to the argument vector of one command. The
//! builders are pure: no I/O, no process state.

mod account;
mod builder;
mod context;
mod migrate;
mod schema;
mod vars;

pub use account::*;
pub use builder::*;
pub use context::*;
pub use migrate::*;
pub use schema::*;
pub use vars::*;
