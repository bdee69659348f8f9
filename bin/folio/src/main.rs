//! Folio CLI
//!
//! Static site generator for markdown blogs.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Folio.
#[derive(Parser)]
#[command(name = "folio", version, about = "A small static site generator")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "folio.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the static site
    Build {
        /// Output directory, overriding `paths.output`
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Enable debug logging and print the resolved configuration
        #[arg(long)]
        debug: bool,
        /// Ignore FOLIO__* environment overrides
        #[arg(long)]
        no_env: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            output,
            debug,
            no_env,
        } => {
            folio::init_tracing(cli.verbose, debug);
            folio::cmd::build::run(
                &cli.config,
                output.as_deref(),
                cli.verbose > 0,
                debug,
                no_env,
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["folio", "build", "--output", "dist"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("folio.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build {
                output,
                debug,
                no_env,
            } => {
                assert_eq!(output, Some(std::path::PathBuf::from("dist")));
                assert!(!debug);
                assert!(!no_env);
            }
        }
    }

    #[test]
    fn test_cli_build_defaults() {
        let cli = Cli::parse_from(["folio", "build"]);
        match cli.command {
            Commands::Build { output, debug, .. } => {
                assert!(output.is_none());
                assert!(!debug);
            }
        }
    }

    #[test]
    fn test_cli_config_and_debug() {
        let cli = Cli::parse_from(["folio", "--config", "site/folio.toml", "build", "--debug"]);
        assert_eq!(cli.config, std::path::PathBuf::from("site/folio.toml"));
        match cli.command {
            Commands::Build { debug, .. } => assert!(debug),
        }
    }

    #[test]
    fn test_cli_no_env() {
        let cli = Cli::parse_from(["folio", "build", "--no-env"]);
        match cli.command {
            Commands::Build { no_env, .. } => assert!(no_env),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let cli = Cli::parse_from(["folio", "-vvv", "build"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["folio"]).is_err());
        assert!(Cli::try_parse_from(["folio", "serve"]).is_err());
    }
}
