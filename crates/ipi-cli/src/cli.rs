use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ipi-driver - Serves energies, forces and virials to an i-PI server over its socket protocol.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to an i-PI server and evaluate frames until it disconnects.
    Run(RunArgs),
    /// Load and validate the configuration, coordinate file and potential without connecting.
    Check(RunArgs),
}

/// Arguments shared by the `run` and `check` subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to the driver configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    // --- Connection Overrides ---
    /// Override the server host name, or the socket name when using a unix socket.
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Override the server TCP port.
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Connect through the unix domain socket /tmp/ipi_<HOST> instead of TCP.
    #[arg(long)]
    pub unix: bool,

    // --- System Overrides ---
    /// Override the XYZ file that defines atom names and their order.
    #[arg(long, value_name = "PATH")]
    pub coord_file: Option<PathBuf>,

    /// Override the potential parameter file.
    #[arg(long, value_name = "PATH")]
    pub potential_file: Option<PathBuf>,

    // --- Protocol Overrides ---
    /// Answer NEEDINIT and reject coordinates until the server sends INIT.
    #[arg(long)]
    pub require_init: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S connection.port=31416
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_parses_overrides() {
        let cli = Cli::parse_from([
            "ipi-driver",
            "-vv",
            "run",
            "--config",
            "driver.toml",
            "--host",
            "water",
            "--unix",
            "-S",
            "connection.port=4000",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("expected the run subcommand");
        };
        assert_eq!(args.config, PathBuf::from("driver.toml"));
        assert_eq!(args.host.as_deref(), Some("water"));
        assert!(args.unix);
        assert!(!args.require_init);
        assert_eq!(args.set_values, vec!["connection.port=4000".to_string()]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["ipi-driver", "-q", "-v", "check", "-c", "x.toml"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_is_required() {
        assert!(Cli::try_parse_from(["ipi-driver", "run"]).is_err());
    }
}
