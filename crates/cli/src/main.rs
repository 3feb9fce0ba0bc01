//! Photopack command-line front end

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use photopack_cli::LayoutRequest;
use photopack_core::ratio::{AspectRatio, PaperSize};
use photopack_core::session::parse_padding;
use photopack_core::solver::{GridPolicy, Strategy};
use photopack_engine::Engine;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "photopack")]
#[command(about = "Pack photos onto the smallest canvas of a given aspect ratio")]
#[command(version)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the minimal canvas for a request and write the layout report
    Pack {
        /// Path to the JSON request
        request: PathBuf,

        /// Target ratio: preset name, "W:H" or decimal height/width
        #[arg(short, long)]
        ratio: Option<String>,

        /// Number of pages
        #[arg(short, long)]
        pages: Option<usize>,

        /// Padding around every image in pixels
        #[arg(long)]
        padding: Option<String>,

        /// Output file for the report (JSON); stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Lay the request out in a uniform grid on a sheet of paper
    Grid {
        /// Path to the JSON request
        request: PathBuf,

        /// Paper size
        #[arg(long, default_value = "a4")]
        paper: PaperSize,

        /// Resolution used to turn the paper into pixels
        #[arg(long, default_value = "300")]
        dpi: u32,

        /// Column selection rule
        #[arg(long, value_enum, default_value = "coverage")]
        policy: PolicyArg,

        /// Output file for the grid (JSON); stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// List ratio and paper presets
    Presets {
        /// Resolution for paper pixel sizes
        #[arg(long, default_value = "300")]
        dpi: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Grid aspect closest to the paper aspect
    Aspect,
    /// Largest total image area
    Coverage,
}

impl From<PolicyArg> for GridPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Aspect => GridPolicy::MatchAspect,
            PolicyArg::Coverage => GridPolicy::MaximizeCoverage,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Saved to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn load_request(path: &Path) -> anyhow::Result<LayoutRequest> {
    LayoutRequest::from_file(path).with_context(|| format!("failed to load {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Pack {
            request,
            ratio,
            pages,
            padding,
            output,
            pretty,
        } => {
            let req = load_request(&request)?;
            let mut session = req.to_session();
            if let Some(ratio) = ratio {
                session.set_ratio(AspectRatio::parse_lenient(&ratio));
            }
            if let Some(pages) = pages {
                session.set_page_count(pages);
            }
            if let Some(padding) = padding {
                session.set_padding(Some(parse_padding(&padding)));
            }

            let engine = Engine::new(req.config());
            let report = match engine.generate(&session) {
                Ok(report) => report,
                Err(e) if e.is_packing_failure() => {
                    anyhow::bail!("no layout found for {}: {e}", request.display())
                }
                Err(e) => return Err(e.into()),
            };

            if output.is_some() {
                println!("{}", report.status_line());
            } else {
                log::info!("{}", report.status_line());
            }
            for page in report.layout.pages.iter().filter(|p| !p.is_complete()) {
                eprintln!(
                    "warning: page {} could not hold all of its images",
                    page.index
                );
            }
            write_json(&report, output.as_deref(), pretty)?;
        }

        Commands::Grid {
            request,
            paper,
            dpi,
            policy,
            output,
            pretty,
        } => {
            let req = load_request(&request)?;
            let session = req.to_session();
            let config = req
                .config()
                .with_strategy(Strategy::Grid)
                .with_paper(paper, dpi)
                .with_grid_policy(policy.into());
            config.validate()?;

            let engine = Engine::new(config);
            let grid = engine.arrange_grid(&session.items(), session.ratio())?;
            if output.is_some() {
                println!(
                    "Grid: {} columns x {} rows on {}x{} pixels",
                    grid.cols, grid.rows, grid.canvas.width, grid.canvas.height
                );
            }
            write_json(&grid, output.as_deref(), pretty)?;
        }

        Commands::Presets { dpi } => {
            println!("Aspect ratios (height / width):");
            println!("{:-<40}", "");
            for (name, ratio) in AspectRatio::presets() {
                println!("  {:<12} {}", name, ratio);
            }
            println!("\nPaper sizes at {} dpi:", dpi);
            println!("{:-<40}", "");
            for paper in PaperSize::all() {
                let px = paper.pixels(dpi);
                println!("  {:<12} {}x{} px", paper, px.width, px.height);
            }
        }
    }

    Ok(())
}
