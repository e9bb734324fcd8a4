//! `pcf render` command implementation.

use std::io::Write;
use std::process::{Command, Stdio};

use clap::{Args, ValueEnum};
use pcf_core::{ContentKind, Identity, Preserver, RestoreMode};

use super::{CommonArgs, InputArgs, write_output};
use crate::error::CliError;

/// Content kind as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum Kind {
    /// Post body.
    #[default]
    Post,
    /// Post excerpt.
    Excerpt,
    /// Comment.
    Comment,
}

impl From<Kind> for ContentKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Post => Self::Post,
            Kind::Excerpt => Self::Excerpt,
            Kind::Comment => Self::Comment,
        }
    }
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Kind of content, selects the posts or comments setting.
    #[arg(long, value_enum, default_value_t = Kind::Post)]
    kind: Kind,

    /// Shell command used as the beautifier (reads stdin, writes stdout).
    #[arg(long, env = "PCF_FILTER")]
    filter: Option<String>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, input cannot be read, or the
    /// filter command fails.
    pub(crate) fn execute(self, common: &CommonArgs) -> Result<(), CliError> {
        let preserver = common.preserver()?;
        let content = self.input.read()?;
        let html = render(&preserver, self.kind.into(), &content, self.filter.as_deref())?;
        write_output(&html)
    }
}

/// Run the full pipeline, with `filter` as the beautifier when given.
fn render(
    preserver: &Preserver,
    kind: ContentKind,
    content: &str,
    filter: Option<&str>,
) -> Result<String, CliError> {
    let Some(filter) = filter else {
        return Ok(preserver.render(kind, content, &Identity));
    };

    let extracted = preserver.before_transform(kind, content);
    let beautified = run_filter(filter, &extracted)?;
    Ok(preserver.after_transform(kind, &beautified, RestoreMode::Display))
}

/// Pipe `input` through a shell command and collect its stdout.
fn run_filter(command: &str, input: &str) -> Result<String, CliError> {
    tracing::info!(command, "Running filter");

    let mut child = shell(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| CliError::Filter(format!("Failed to start filter `{command}`: {e}")))?;

    // Feed stdin from a separate thread so a filter that writes before it
    // finishes reading cannot deadlock on a full pipe.
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| CliError::Filter("Filter stdin is not available".to_owned()))?;
    let output = std::thread::scope(|scope| {
        let writer = scope.spawn(move || stdin.write_all(input.as_bytes()));
        let output = child.wait_with_output();
        // A filter may exit without reading all of its input.
        if let Ok(Err(e)) = writer.join() {
            tracing::debug!(error = %e, "Filter closed stdin early");
        }
        output
    })?;

    if !output.status.success() {
        return Err(CliError::Filter(format!(
            "Filter `{command}` failed with {}",
            output.status
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|_| CliError::Filter(format!("Filter `{command}` produced invalid UTF-8")))
}

#[cfg(target_os = "windows")]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(not(target_os = "windows"))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}
