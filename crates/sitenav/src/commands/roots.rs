//! `sitenav roots` command implementation.

use clap::Args;

use super::{CommonArgs, print_report};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the roots command.
#[derive(Args, Debug)]
pub(crate) struct RootsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl RootsArgs {
    /// Execute the roots command.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the build aborts.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let session = self.common.open(output)?;
        let builder = session.builder()?;

        let report = builder.roots_for_site_with_report(&self.common.site, session.max_depth())?;
        if report.nodes.is_empty() && !self.common.json {
            output.warning(&format!(
                "Site '{}' has no navigation nodes",
                self.common.site
            ));
        }

        print_report(output, &report, self.common.json)
    }
}
