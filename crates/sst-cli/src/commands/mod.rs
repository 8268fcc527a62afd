//! Command implementations.

pub mod list;
pub mod metadata;
pub mod run;

pub use list::{run_list_cases, run_list_suites};
pub use metadata::run_metadata;
pub use run::run_tests;
