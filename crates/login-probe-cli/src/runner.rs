//! Suite execution for the `run` and `config` commands

use crate::commands::{RunArgs, TargetArgs};
use crate::error::{CliError, CliResult};
use login_probe::{run_suite, FakePage, HarnessConfig, LoginScenario, SuiteResults, SuiteRunner};
use tracing::info;

/// Build the effective harness configuration: config file (or defaults)
/// with command-line overrides applied, then validated.
pub fn harness_config(target: &TargetArgs) -> CliResult<HarnessConfig> {
    let mut config = match target.config {
        Some(ref path) => HarnessConfig::load(path).map_err(|e| {
            CliError::config(format!("{}: {e}", path.display()))
        })?,
        None => HarnessConfig::default(),
    };

    if let Some(ref url) = target.base_url {
        config = config.with_base_url(url.clone());
    }
    if target.headless {
        config = config.with_headless(true);
    }
    if let Some(ref path) = target.chromium_path {
        config.browser = config.browser.with_chromium_path(path.clone());
    }
    if target.no_sandbox {
        config.browser = config.browser.with_no_sandbox();
    }

    config.validate()?;
    Ok(config)
}

/// Scenarios selected on the command line, or all of them
#[must_use]
pub fn selected_scenarios(args: &RunArgs) -> Vec<LoginScenario> {
    if args.scenarios.is_empty() {
        LoginScenario::ALL.to_vec()
    } else {
        args.scenarios.iter().copied().map(LoginScenario::from).collect()
    }
}

/// Run the suite on a fresh browser, or on the in-memory form for `--dry-run`
pub async fn execute(args: &RunArgs, config: &HarnessConfig) -> CliResult<SuiteResults> {
    let scenarios = selected_scenarios(args);
    let mut runner = SuiteRunner::new();
    if args.fail_fast {
        runner = runner.with_fail_fast();
    }

    if args.dry_run {
        info!("dry run against the in-memory login form");
        return Ok(run_suite(FakePage::login_form(), config, runner, &scenarios).await?);
    }

    launch_and_run(config, runner, &scenarios).await
}

#[cfg(feature = "browser")]
async fn launch_and_run(
    config: &HarnessConfig,
    runner: SuiteRunner,
    scenarios: &[LoginScenario],
) -> CliResult<SuiteResults> {
    let driver =
        login_probe::ChromiumDriver::launch(&config.browser, config.timeouts.navigation()).await?;
    Ok(run_suite(driver, config, runner, scenarios).await?)
}

#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
async fn launch_and_run(
    _config: &HarnessConfig,
    _runner: SuiteRunner,
    _scenarios: &[LoginScenario],
) -> CliResult<SuiteResults> {
    Err(CliError::config(
        "browser support not compiled in; rebuild with --features browser or use --dry-run",
    ))
}
