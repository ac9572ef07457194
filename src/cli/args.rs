use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "dwsim-agent")]
#[command(
    about = "Agentic console for a mocked DWSIM chemical process simulation",
    long_about = "Agentic console for a mocked DWSIM chemical process simulation\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default probe path when --config is not provided:\n    1. $XDG_CONFIG_HOME/dwsim-agent/config.toml\n    2. ~/.config/dwsim-agent/config.toml"
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run one simulation console command, print the result, and exit.
    #[arg(long, value_name = "COMMAND", conflicts_with_all = ["script", "smoke_sandbox"])]
    pub command: Option<String>,

    /// Run a Python file in the script sandbox, print the result, and exit.
    #[arg(long, value_name = "PATH", conflicts_with = "smoke_sandbox")]
    pub script: Option<PathBuf>,

    /// Initialize the script sandbox, run a probe script, and exit.
    #[arg(long)]
    pub smoke_sandbox: bool,
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;

    #[test]
    fn parse_defaults() {
        let args = CliArgs::try_parse_from(["dwsim-agent"]).expect("should parse");
        assert_eq!(args.config, None);
        assert_eq!(args.command, None);
        assert_eq!(args.script, None);
        assert!(!args.smoke_sandbox);
    }

    #[test]
    fn parse_config_flag() {
        let args = CliArgs::try_parse_from(["dwsim-agent", "--config", "/tmp/custom.toml"])
            .expect("parse");
        assert_eq!(
            args.config.as_deref(),
            Some(std::path::Path::new("/tmp/custom.toml"))
        );
    }

    #[test]
    fn parse_one_shot_flags() {
        let args = CliArgs::try_parse_from(["dwsim-agent", "--command", "list_objects"])
            .expect("parse");
        assert_eq!(args.command.as_deref(), Some("list_objects"));

        let args =
            CliArgs::try_parse_from(["dwsim-agent", "--script", "probe.py"]).expect("parse");
        assert_eq!(
            args.script.as_deref(),
            Some(std::path::Path::new("probe.py"))
        );

        let args = CliArgs::try_parse_from(["dwsim-agent", "--smoke-sandbox"]).expect("parse");
        assert!(args.smoke_sandbox);
    }

    #[test]
    fn one_shot_flags_conflict() {
        CliArgs::try_parse_from(["dwsim-agent", "--command", "list_objects", "--script", "x.py"])
            .expect_err("conflicting flags should fail");
        CliArgs::try_parse_from(["dwsim-agent", "--script", "x.py", "--smoke-sandbox"])
            .expect_err("conflicting flags should fail");
    }
}
