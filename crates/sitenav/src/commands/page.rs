//! `sitenav page` command implementation.

use clap::Args;

use super::{CommonArgs, print_report};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the page command.
#[derive(Args, Debug)]
pub(crate) struct PageArgs {
    /// Name of the page whose subtree is built.
    pagename: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl PageArgs {
    /// Execute the page command.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, the build aborts, or the page is
    /// not placed in the site.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let session = self.common.open(output)?;
        let builder = session.builder()?;

        let report = builder.node_by_name_with_report(
            &self.pagename,
            &self.common.site,
            session.max_depth(),
        )?;
        if report.nodes.is_empty() {
            output.skipped(&report.skipped);
            return Err(CliError::NotFound(format!(
                "Page '{}' not found in site '{}'",
                self.pagename, self.common.site
            )));
        }

        print_report(output, &report, self.common.json)
    }
}
