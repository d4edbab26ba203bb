//! login-probe CLI: verify a web login page in a real browser
//!
//! ## Usage
//!
//! ```bash
//! login-probe run                                  # All scenarios, default URL
//! login-probe run --base-url http://localhost:3000 --headless
//! login-probe run -s blank-submit --format json   # One scenario, JSON output
//! login-probe config --config probe.yaml          # Show effective config
//! ```

use clap::Parser;
use login_probe::LoginScenario;
use login_probe_cli::{
    execute, harness_config, logging, CliConfig, CliError, CliResult, Cli, ColorChoice, Commands,
    ConfigArgs, FormatArg, Reporter, RunArgs, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    logging::init(config.verbosity, cli.log_json);

    match cli.command {
        Commands::Run(args) => run_suite(config, &args),
        Commands::Config(args) => run_config(&args),
        Commands::Scenarios => {
            run_scenarios();
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

fn run_suite(config: CliConfig, args: &RunArgs) -> CliResult<()> {
    let harness = harness_config(&args.target)?;
    let json = args.format == FormatArg::Json;
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet() || json);

    reporter.header("login-probe");
    reporter.info(&format!("Target: {}", harness.base_url));
    if config.verbosity.is_verbose() {
        reporter.info(&format!(
            "Browser: {} {}x{}",
            if harness.browser.headless { "headless" } else { "headed" },
            harness.browser.window_width,
            harness.browser.window_height
        ));
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::test_execution(format!("Failed to create runtime: {e}")))?;
    let results = rt.block_on(execute(args, &harness))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        reporter.suite(&results);
    }

    if results.all_passed() {
        Ok(())
    } else {
        Err(CliError::SuiteFailed {
            failed: results.failed_count(),
            total: results.total(),
        })
    }
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let harness = harness_config(&args.target)?;
    print!("{}", harness.to_yaml()?);
    Ok(())
}

fn run_scenarios() {
    for scenario in LoginScenario::ALL {
        println!("{scenario}");
    }
}
