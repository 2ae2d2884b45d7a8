use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::config::ExportFormat;
use crate::core::Engine;

#[derive(Parser)]
#[command(name = "xamlnav")]
#[command(about = "Maps which XAML views open which, from their code-behind")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default Xamlnav.toml
    Init {
        /// Target directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Build the navigation graph and export it
    Build {
        /// Workspace root to scan
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (json, dot, markdown)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Resolve calls against every discovered view, not just earlier ones
        #[arg(long)]
        two_pass: bool,
    },

    /// Classify one markup file and list navigation calls in its code-behind
    Inspect {
        /// Markup file
        file: PathBuf,
    },

    /// Print build counters
    Stats {
        /// Workspace root to scan
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Resolve calls against every discovered view, not just earlier ones
        #[arg(long)]
        two_pass: bool,
    },
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Init { path } => {
                engine.init(path).await
            }
            Commands::Build { root, output, format, two_pass } => {
                engine.build(root, output, format, two_pass).await
            }
            Commands::Inspect { file } => {
                engine.inspect(file).await
            }
            Commands::Stats { root, two_pass } => {
                engine.stats(root, two_pass).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from([
            "xamlnav", "build", "--root", "app", "--format", "dot", "--two-pass",
        ])
        .unwrap();

        match cli.command {
            Commands::Build { root, output, format, two_pass } => {
                assert_eq!(root, Some(PathBuf::from("app")));
                assert!(output.is_none());
                assert_eq!(format, Some(ExportFormat::Dot));
                assert!(two_pass);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["xamlnav", "build", "--format", "svg"]).is_err());
    }

    #[test]
    fn test_parse_inspect_with_global_flags() {
        let cli = Cli::try_parse_from(["xamlnav", "-v", "-c", "x.toml", "inspect", "Main.xaml"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.command, Commands::Inspect { .. }));
    }
}
