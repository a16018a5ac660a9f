use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "appcat",
    about = "Linux application signature catalog",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Catalog data file [default: data.json, or the config file's data_file for serve]
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

impl Cli {
    /// Data file for the offline commands.
    pub fn data_file(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }
}

pub const DEFAULT_DATA_FILE: &str = "data.json";

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Show catalog statistics
    Stats,
    /// List category names
    Categories,
    /// Search application names and publishers
    Search(SearchArgs),
    /// Export the catalog or one category as JSON
    Export(ExportArgs),
    /// Merge a catalog JSON file into the data file
    Import(ImportArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Listen address, overrides the config file and PORT
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Directory with the dashboard's static files
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
    /// Start empty instead of writing the default catalog
    #[arg(long)]
    pub no_seed: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    pub query: String,
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(short, long)]
    pub category: Option<String>,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::try_parse_from([
            "appcat",
            "serve",
            "--bind",
            "127.0.0.1:9000",
            "--data-file",
            "/tmp/catalog.json",
            "--no-seed",
        ])
        .unwrap();
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/catalog.json")));
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.bind, Some("127.0.0.1:9000".parse().unwrap()));
                assert!(args.no_seed);
                assert!(args.config.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn parses_export_and_format() {
        let cli =
            Cli::try_parse_from(["appcat", "--format", "json", "export", "-c", "VPN"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.data_file(), PathBuf::from(DEFAULT_DATA_FILE));
        match cli.command {
            Command::Export(args) => assert_eq!(args.category.as_deref(), Some("VPN")),
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn search_requires_query() {
        assert!(Cli::try_parse_from(["appcat", "search"]).is_err());
    }
}
