//! CLI command implementations.

pub(crate) mod extract;
pub(crate) mod render;
pub(crate) mod restore;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use pcf_config::{CliSettings, Config};
use pcf_core::Preserver;

use crate::error::CliError;

pub(crate) use extract::ExtractArgs;
pub(crate) use render::RenderArgs;
pub(crate) use restore::RestoreArgs;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover pcf.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Comma-separated tag names to preserve (overrides config).
    #[arg(long, global = true, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    /// Keep runs of spaces instead of converting them to &nbsp;.
    #[arg(long, global = true)]
    pub no_nbsp: bool,

    /// Emit <br /> before every newline in restored text.
    #[arg(long, global = true)]
    nl2br: bool,

    /// Do not wrap multiline content in the block container.
    #[arg(long, global = true)]
    no_wrap: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Config overrides from the command line.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            tags: self.tags.clone(),
            use_nbsp_for_spaces: self.no_nbsp.then_some(false),
            nl2br: self.nl2br.then_some(true),
            wrap_multiline: self.no_wrap.then_some(false),
        }
    }

    /// Load configuration and build the preserver.
    pub(crate) fn preserver(&self) -> Result<Preserver, CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }
        Ok(Preserver::new(config.preserve))
    }
}

/// Input file argument shared by every command.
#[derive(Args)]
pub(crate) struct InputArgs {
    /// Input file (default: stdin; `-` also reads stdin).
    input: Option<PathBuf>,
}

impl InputArgs {
    /// Read the whole input as UTF-8.
    pub(crate) fn read(&self) -> Result<String, CliError> {
        read_input(self.input.as_deref())
    }
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

/// Write processed content to stdout.
pub(crate) fn write_output(content: &str) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn common(no_nbsp: bool, nl2br: bool, no_wrap: bool) -> CommonArgs {
        CommonArgs {
            config: None,
            tags: None,
            no_nbsp,
            nl2br,
            no_wrap,
            verbose: false,
        }
    }

    #[test]
    fn test_cli_settings_leave_config_alone_by_default() {
        let settings = common(false, false, false).cli_settings();
        assert!(settings.tags.is_none());
        assert!(settings.use_nbsp_for_spaces.is_none());
        assert!(settings.nl2br.is_none());
        assert!(settings.wrap_multiline.is_none());
    }

    #[test]
    fn test_cli_settings_flags() {
        let settings = common(true, true, true).cli_settings();
        assert_eq!(settings.use_nbsp_for_spaces, Some(false));
        assert_eq!(settings.nl2br, Some(true));
        assert_eq!(settings.wrap_multiline, Some(false));
    }

    #[test]
    fn test_preserver_from_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcf.toml");
        std::fs::write(&path, "[preserve]\ntags = [\"kbd\"]\nnl2br = true\n").unwrap();
        let args = CommonArgs {
            config: Some(path),
            no_nbsp: true,
            ..common(false, false, false)
        };

        let preserver = args.preserver().unwrap();

        assert_eq!(preserver.settings().preserve_tags, vec!["kbd"]);
        assert!(preserver.settings().nl2br);
        assert!(!preserver.settings().use_nbsp_for_spaces);
    }

    #[test]
    fn test_preserver_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = CommonArgs {
            config: Some(dir.path().join("missing.toml")),
            ..common(false, false, false)
        };

        assert!(matches!(args.preserver(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.html");
        std::fs::write(&path, "<code>x</code>\n").unwrap();

        assert_eq!(read_input(Some(path.as_path())).unwrap(), "<code>x</code>\n");
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.html");
        let result = read_input(Some(missing.as_path()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
