//! Country mask command line tool.
//!
//! Builds the country mask of a model domain from the configured boundary
//! layers, or summarises a previously saved mask file.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use commands::{CreateArgs, ShowArgs};

#[derive(Parser, Debug)]
#[command(name = "countrymask")]
#[command(about = "Rasterize national land and EEZ boundaries onto model domain grids")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Number of rasterization threads (default: one per core)
    #[arg(long, env = "COUNTRYMASK_THREADS", global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the country mask of a domain
    Create(CreateArgs),
    /// Print the contents of a saved country mask
    Show(ShowArgs),
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs);
    countrymask::silence_hdf5_errors();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
        info!(threads, "Configured rasterization thread pool");
    }

    match args.command {
        Command::Create(create) => commands::create(create),
        Command::Show(show) => commands::show(show),
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let args = Args::try_parse_from([
            "countrymask",
            "create",
            "EUROPE",
            "--output",
            "country_EUROPE",
            "--reset-index",
            "--no-ocean",
        ])
        .unwrap();

        match args.command {
            Command::Create(create) => {
                assert_eq!(create.domain, "EUROPE");
                assert!(create.reset_index);
                assert!(create.no_ocean);
                assert!(!create.no_land);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_with_global_flags() {
        let args = Args::try_parse_from([
            "countrymask",
            "show",
            "mask.nc",
            "--domain",
            "ARCTIC",
            "--json-logs",
            "--threads",
            "2",
        ])
        .unwrap();

        assert!(args.json_logs);
        assert_eq!(args.threads, Some(2));
        assert!(matches!(args.command, Command::Show(ref show) if show.domain == "ARCTIC"));
    }

    #[test]
    fn test_parse_raster_mode() {
        let args = Args::try_parse_from([
            "countrymask",
            "create",
            "EUROPE",
            "--raster-mode",
            "all-touched",
        ])
        .unwrap();
        assert!(matches!(
            args.command,
            Command::Create(ref create)
                if create.raster_mode == Some(countrymask::RasterMode::AllTouched)
        ));

        let unknown = Args::try_parse_from([
            "countrymask",
            "create",
            "EUROPE",
            "--raster-mode",
            "all-over",
        ]);
        assert!(unknown.is_err());
    }

    #[test]
    fn test_create_requires_domain() {
        assert!(Args::try_parse_from(["countrymask", "create"]).is_err());
    }
}
