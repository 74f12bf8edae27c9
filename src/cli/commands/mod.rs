//! Command implementations

pub mod completions;
pub mod run;
pub mod schema;
pub mod steps;
pub mod submit;
pub mod validate;
