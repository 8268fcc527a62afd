//! Mock endpoint metadata.

use sst_harness::SuiteRegistry;

/// Prints the metadata the mock endpoint of `suite` publishes.
pub fn run_metadata(suite: &str) -> crate::CliResult<()> {
    let suite = SuiteRegistry::builtin().get(suite)?;
    println!("{}", suite.mock_metadata());
    Ok(())
}
