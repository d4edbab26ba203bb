//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use login_probe::LoginScenario;
use std::path::PathBuf;

/// login-probe: verify a web login page in a real browser
#[derive(Parser, Debug)]
#[command(name = "login-probe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the login scenarios
    Run(RunArgs),

    /// Show the effective configuration as YAML
    Config(ConfigArgs),

    /// List the scenarios in execution order
    Scenarios,
}

/// Where the login page lives and how to launch the browser
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// YAML configuration file
    #[arg(short, long, env = "LOGIN_PROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Login page URL (overrides the config file)
    #[arg(long, env = "LOGIN_PROBE_BASE_URL")]
    pub base_url: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Path to the chromium binary
    #[arg(long)]
    pub chromium_path: Option<String>,

    /// Disable the chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Target and browser options
    #[command(flatten)]
    pub target: TargetArgs,

    /// Run only these scenarios (repeatable; default: all)
    #[arg(short, long = "scenario", value_enum)]
    pub scenarios: Vec<ScenarioArg>,

    /// Skip remaining scenarios after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// Run against the built-in in-memory login form instead of a browser
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Target and browser options
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Scenario selector
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenarioArg {
    /// Presence of email, password and login controls
    Presence,
    /// Blank submission shows a validation error
    BlankSubmit,
    /// Invalid credentials show an error message
    InvalidCredentials,
    /// Eye icon toggles password masking
    MaskingToggle,
}

impl From<ScenarioArg> for LoginScenario {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::Presence => Self::PresenceOfElements,
            ScenarioArg::BlankSubmit => Self::BlankSubmit,
            ScenarioArg::InvalidCredentials => Self::InvalidCredentials,
            ScenarioArg::MaskingToggle => Self::PasswordMaskingToggle,
        }
    }
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable lines
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_run_defaults() {
            let cli = Cli::try_parse_from(["login-probe", "run"]).unwrap();
            assert_eq!(cli.verbose, 0);
            assert!(!cli.quiet);
            match cli.command {
                Commands::Run(args) => {
                    assert!(args.scenarios.is_empty());
                    assert!(!args.fail_fast);
                    assert!(!args.dry_run);
                    assert_eq!(args.format, FormatArg::Text);
                    assert!(args.target.base_url.is_none());
                }
                other => panic!("expected run, got {other:?}"),
            }
        }

        #[test]
        fn test_run_with_overrides() {
            let cli = Cli::try_parse_from([
                "login-probe",
                "-vv",
                "run",
                "--base-url",
                "http://localhost:3000/",
                "--headless",
                "--no-sandbox",
                "--fail-fast",
                "-s",
                "blank-submit",
                "-s",
                "presence",
                "--format",
                "json",
            ])
            .unwrap();
            assert_eq!(cli.verbose, 2);
            assert!(!cli.log_json);
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert!(args.target.headless);
            assert!(args.target.no_sandbox);
            assert!(args.fail_fast);
            assert_eq!(args.format, FormatArg::Json);
            assert_eq!(
                args.scenarios,
                vec![ScenarioArg::BlankSubmit, ScenarioArg::Presence]
            );
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["login-probe"]).is_err());
        }

        #[test]
        fn test_unknown_scenario_rejected() {
            assert!(Cli::try_parse_from(["login-probe", "run", "-s", "signup"]).is_err());
        }
    }

    #[test]
    fn test_scenario_arg_mapping() {
        assert_eq!(
            LoginScenario::from(ScenarioArg::MaskingToggle),
            LoginScenario::PasswordMaskingToggle
        );
        assert_eq!(
            LoginScenario::from(ScenarioArg::Presence),
            LoginScenario::PresenceOfElements
        );
    }
}
