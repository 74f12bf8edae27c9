//! regwiz: a multi-step registration wizard
//!
//! A step controller that validates each step's fields against the
//! registration schema before moving on, and simulates the final submission.

pub mod cli;
pub mod core;
pub mod schema;
