pub mod activity;
pub mod clean;
pub mod config;
pub mod error;
pub mod extract;
pub mod io;
pub mod model;
pub mod reconcile;
pub mod report;
pub mod run;
pub mod validate;

pub use error::{Result, ToolError};
