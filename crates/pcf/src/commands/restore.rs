//! `pcf restore` command implementation.

use clap::Args;
use pcf_core::RestoreMode;

use super::{CommonArgs, InputArgs, write_output};
use crate::error::CliError;

/// Arguments for the restore command.
#[derive(Args)]
pub(crate) struct RestoreArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Restore the original text without formatting (for saving).
    #[arg(long)]
    save: bool,
}

impl RestoreArgs {
    fn mode(&self) -> RestoreMode {
        if self.save {
            RestoreMode::Save
        } else {
            RestoreMode::Display
        }
    }

    /// Execute the restore command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or input cannot be read.
    pub(crate) fn execute(self, common: &CommonArgs) -> Result<(), CliError> {
        let preserver = common.preserver()?;
        let content = self.input.read()?;
        write_output(&preserver.restore(&content, self.mode()))
    }
}
