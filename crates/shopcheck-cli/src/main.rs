//! Shopcheck CLI: end-to-end checks for the Swag Labs storefront
//!
//! ## Usage
//!
//! ```bash
//! shopcheck list                         # Show every scenario
//! shopcheck run                          # Run all scenarios in headless Chromium
//! shopcheck run --filter checkout:: -v   # One suite, logs mirrored to stderr
//! shopcheck run --driver mock            # Against the in-memory storefront
//! shopcheck config -c suite.yaml         # Print the effective configuration
//! ```

use clap::Parser;
use shopcheck::logging::{self, LogConfig};
use shopcheck::{scenarios, ArtifactDirs, DriverProvider, MockProvider, SuiteConfig, TestFixture};
use shopcheck_cli::{
    Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, ConfigArgs, DriverArg, ListArgs,
    RunArgs, SuiteRunner, Verbosity,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<bool> {
    let cli = Cli::parse();
    let config = build_config(&cli);

    match cli.command {
        Commands::List(args) => {
            run_list(&args);
            Ok(true)
        }
        Commands::Config(args) => {
            run_config(&args)?;
            Ok(true)
        }
        Commands::Run(args) => run_suite(config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

fn run_list(args: &ListArgs) {
    for scenario in scenarios::select(args.filter.as_deref()) {
        println!("{:<45} {}", scenario.id(), scenario.summary);
    }
}

/// Config file (if any), then environment
fn load_suite_config(path: Option<&Path>) -> CliResult<SuiteConfig> {
    let config = match path {
        Some(path) => SuiteConfig::load(path)?,
        None => SuiteConfig::default(),
    };
    Ok(config.apply_env()?)
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let config = load_suite_config(args.config.as_deref())?;
    print!("{}", serde_yaml_ng::to_string(&config)?);
    Ok(())
}

/// Command-line flags win over file and environment
fn apply_flags(mut suite: SuiteConfig, args: &RunArgs) -> SuiteConfig {
    if let Some(ref url) = args.base_url {
        suite = suite.with_base_url(url.clone());
    }
    if args.headed {
        suite = suite.with_headless(false);
    }
    if let Some(ms) = args.timeout_ms {
        suite = suite.with_default_timeout_ms(ms);
    }
    if let Some(lookup) = args.lookup {
        suite = suite.with_product_lookup(lookup.into());
    }
    if let Some(ref root) = args.output {
        suite = suite.with_artifacts(ArtifactDirs::under(root));
    }
    suite
}

fn provider(driver: DriverArg, suite: &SuiteConfig) -> CliResult<Arc<dyn DriverProvider>> {
    match driver {
        DriverArg::Mock => Ok(Arc::new(MockProvider::new(suite.base_url.clone()))),
        #[cfg(feature = "browser")]
        DriverArg::Chromium => Ok(Arc::new(shopcheck::ChromiumProvider::new(
            suite.driver_config(),
        ))),
        #[cfg(not(feature = "browser"))]
        DriverArg::Chromium => Err(CliError::invalid_argument(
            "chromium driver not enabled. Rebuild with --features browser",
        )),
    }
}

fn run_suite(mut config: CliConfig, args: &RunArgs) -> CliResult<bool> {
    config = config.with_fail_fast(args.fail_fast);

    let suite = apply_flags(load_suite_config(args.config.as_deref())?, args);
    suite.validate()?;
    suite.artifacts.ensure()?;

    let log = logging::init(
        &LogConfig::in_dir(&suite.artifacts.logs)
            .with_level(config.verbosity.log_level())
            .with_stderr(config.verbosity.is_verbose()),
    )?;

    let selected = scenarios::select(args.filter.as_deref());
    if selected.is_empty() {
        return Err(CliError::invalid_argument(format!(
            "no scenario matches {:?}",
            args.filter.as_deref().unwrap_or_default()
        )));
    }

    let provider = provider(args.driver, &suite)?;
    let driver_name = provider.name();
    let reports_dir = suite.artifacts.reports.clone();
    let fixture = TestFixture::new(provider, Arc::new(suite));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let mut runner = SuiteRunner::new(config.clone());
    let report = runtime.block_on(runner.run(&fixture, &selected, driver_name))?;

    let path = report.write_json(&reports_dir)?;
    if !config.verbosity.is_quiet() {
        eprintln!("Report: {}", path.display());
        if let Some(log_path) = log.path() {
            eprintln!("Log: {}", log_path.display());
        }
    }
    if let Some(ref reason) = report.aborted {
        eprintln!("Run aborted: {reason}");
    }

    Ok(report.success())
}
