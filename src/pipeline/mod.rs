//! Pipeline entry points for race result operations.
//!
//! - `run_query`: Fetch a race report and extract its results
//! - `run_file`: Extract results from a saved race report page
//! - `run_validate`: Check configuration before serving

pub mod query;
pub mod validate;

pub use query::{run_file, run_query};
pub use validate::run_validate;
