//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use shopcheck::ProductLookup;
use std::path::PathBuf;

/// Shopcheck: end-to-end checks for the Swag Labs storefront
#[derive(Parser, Debug)]
#[command(name = "shopcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered scenarios
    List(ListArgs),

    /// Run scenarios against the storefront
    Run(RunArgs),

    /// Show the effective suite configuration
    Config(ConfigArgs),
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only scenarios whose `suite::name` contains this pattern
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Only scenarios whose `suite::name` contains this pattern
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Browser backend
    #[arg(long, value_enum, default_value_t = DriverArg::default())]
    pub driver: DriverArg,

    /// Storefront URL (overrides config file and environment)
    #[arg(long)]
    pub base_url: Option<String>,

    /// YAML suite configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Explicit wait timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// How product buttons are located
    #[arg(long, value_enum)]
    pub lookup: Option<LookupArg>,

    /// Root directory for reports, screenshots and logs
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// YAML suite configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Browser backend
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverArg {
    /// Chromium over CDP
    Chromium,
    /// In-memory storefront model
    Mock,
}

impl Default for DriverArg {
    #[cfg(feature = "browser")]
    fn default() -> Self {
        Self::Chromium
    }

    #[cfg(not(feature = "browser"))]
    fn default() -> Self {
        Self::Mock
    }
}

/// Product button lookup strategy
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupArg {
    /// `data-test` identifiers
    DataTest,
    /// Name text and container XPath
    Structural,
}

impl From<LookupArg> for ProductLookup {
    fn from(arg: LookupArg) -> Self {
        match arg {
            LookupArg::DataTest => Self::DataTest,
            LookupArg::Structural => Self::Structural,
        }
    }
}

/// Color output argument
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

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("shopcheck").chain(args.iter().copied())).unwrap()
    }

    mod cli_tests {
        use super::*;

        #[test]
        fn test_verify_cli() {
            use clap::CommandFactory;
            Cli::command().debug_assert();
        }

        #[test]
        fn test_global_flags() {
            let cli = parse(&["-vv", "--color", "never", "list"]);
            assert_eq!(cli.verbose, 2);
            assert!(matches!(cli.color, ColorArg::Never));
            assert!(matches!(cli.command, Commands::List(_)));
        }

        #[test]
        fn test_missing_subcommand_fails() {
            assert!(Cli::try_parse_from(["shopcheck"]).is_err());
        }
    }

    mod run_args_tests {
        use super::*;

        #[test]
        fn test_run_defaults() {
            let Commands::Run(args) = parse(&["run"]).command else {
                panic!("expected run");
            };
            assert!(args.filter.is_none());
            assert!(!args.headed);
            assert!(!args.fail_fast);
            assert_eq!(args.driver, DriverArg::default());
            assert!(args.lookup.is_none());
        }

        #[test]
        fn test_run_all_flags() {
            let Commands::Run(args) = parse(&[
                "run",
                "--filter",
                "checkout::",
                "--headed",
                "--driver",
                "mock",
                "--base-url",
                "http://localhost:3000/",
                "--fail-fast",
                "--timeout-ms",
                "2500",
                "--lookup",
                "structural",
                "--output",
                "out",
            ])
            .command
            else {
                panic!("expected run");
            };
            assert_eq!(args.filter.as_deref(), Some("checkout::"));
            assert!(args.headed);
            assert_eq!(args.driver, DriverArg::Mock);
            assert_eq!(args.base_url.as_deref(), Some("http://localhost:3000/"));
            assert!(args.fail_fast);
            assert_eq!(args.timeout_ms, Some(2500));
            assert_eq!(args.lookup, Some(LookupArg::Structural));
            assert_eq!(args.output, Some(PathBuf::from("out")));
        }

        #[test]
        fn test_unknown_driver_rejected() {
            assert!(Cli::try_parse_from(["shopcheck", "run", "--driver", "firefox"]).is_err());
        }

        #[test]
        fn test_lookup_conversion() {
            assert_eq!(
                ProductLookup::from(LookupArg::DataTest),
                ProductLookup::DataTest
            );
            assert_eq!(
                ProductLookup::from(LookupArg::Structural),
                ProductLookup::Structural
            );
        }
    }
}
