//! `pcf extract` command implementation.

use clap::Args;

use super::{CommonArgs, InputArgs, write_output};
use crate::error::CliError;

/// Arguments for the extract command.
#[derive(Args)]
pub(crate) struct ExtractArgs {
    #[command(flatten)]
    input: InputArgs,
}

impl ExtractArgs {
    /// Execute the extract command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or input cannot be read.
    pub(crate) fn execute(self, common: &CommonArgs) -> Result<(), CliError> {
        let preserver = common.preserver()?;
        let content = self.input.read()?;
        write_output(&preserver.extract(&content))
    }
}
