use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tools::generate::{self, DEFAULT_TARGET_REGION, DEFAULT_TITLE, DEFAULT_ZOOM};
use tools::postprocess::{DEFAULT_BANNER, postprocess_file};
use tools::{BannerSource, GenerateConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lakemap", about = "Reciprocal fishing lakes map generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the map page from the lake, region and river datasets.
    Generate(GenerateArgs),
    /// Apply the banner edits to an existing page.
    Postprocess {
        page: PathBuf,
        #[arg(long)]
        banner: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[arg(long, env = "LAKEMAP_LAKES", default_value = "Lacs.json")]
    lakes: PathBuf,
    #[arg(long, env = "LAKEMAP_REGIONS", default_value = "Regions.csv")]
    regions: PathBuf,
    #[arg(long, env = "LAKEMAP_RIVERS", default_value = "CoursEau_02_Rhin-Meuse.json")]
    rivers: PathBuf,
    #[arg(long, env = "LAKEMAP_OUT", default_value = "map.html")]
    out: PathBuf,
    /// Region name as written in the regions table.
    #[arg(long, env = "LAKEMAP_REGION", default_value = DEFAULT_TARGET_REGION)]
    region: String,
    #[arg(long, env = "LAKEMAP_TITLE", default_value = DEFAULT_TITLE)]
    title: String,
    #[arg(long, env = "LAKEMAP_ZOOM", default_value_t = DEFAULT_ZOOM)]
    zoom: u8,
    /// HTML fragment used instead of the built-in banner.
    #[arg(long, env = "LAKEMAP_BANNER", conflicts_with = "no_banner")]
    banner: Option<PathBuf>,
    #[arg(long)]
    no_banner: bool,
}

impl From<GenerateArgs> for GenerateConfig {
    fn from(args: GenerateArgs) -> Self {
        let banner = match (args.no_banner, args.banner) {
            (true, _) => BannerSource::Disabled,
            (false, Some(path)) => BannerSource::File(path),
            (false, None) => BannerSource::Default,
        };
        GenerateConfig {
            lakes_path: args.lakes,
            regions_path: args.regions,
            rivers_path: args.rivers,
            output_path: args.out,
            target_region: args.region,
            title: args.title,
            zoom: args.zoom,
            banner,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    match Cli::parse().command {
        Command::Generate(args) => {
            let cfg = GenerateConfig::from(args);
            let summary = generate::run(&cfg).map_err(|e| e.to_string())?;
            eprintln!(
                "wrote {} ({} neighbouring regions, {} rivers, {} lakes)",
                cfg.output_path.display(),
                summary.neighbour_regions,
                summary.rivers,
                summary.lakes
            );
            Ok(())
        }
        Command::Postprocess { page, banner } => {
            let banner = match banner {
                Some(path) => {
                    fs::read_to_string(&path).map_err(|e| format!("read {path:?}: {e}"))?
                }
                None => DEFAULT_BANNER.to_string(),
            };
            if postprocess_file(&page, &banner).map_err(|e| e.to_string())? {
                eprintln!("updated {}", page.display());
            } else {
                eprintln!("unchanged {}", page.display());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use tools::{BannerSource, GenerateConfig};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_defaults_match_dataset_file_names() {
        let cli = Cli::try_parse_from(["lakemap", "generate"]).unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let cfg = GenerateConfig::from(args);
        assert_eq!(cfg.lakes_path.to_str(), Some("Lacs.json"));
        assert_eq!(cfg.output_path.to_str(), Some("map.html"));
        assert_eq!(cfg.target_region, "OISE");
        assert_eq!(cfg.zoom, 10);
        assert_eq!(cfg.banner, BannerSource::Default);
    }

    #[test]
    fn banner_flags_conflict() {
        let res = Cli::try_parse_from([
            "lakemap",
            "generate",
            "--banner",
            "b.html",
            "--no-banner",
        ]);
        assert!(res.is_err());
    }
}
