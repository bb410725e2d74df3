//! Distarray command-line tool.
//!
//! ## Usage
//!
//! ```bash
//! # Summarise a per-rank file
//! distarray inspect out/grid_0.dnpy
//!
//! # Which ranks own element (10, 3)?
//! distarray owners --shape 31,53 --dist b,n --comm-size 4 --index 10,3
//!
//! # Grid, targets and local shapes of a layout
//! distarray layout --shape 16,12 --dist b,bc:2 --grid 2,2 --comm-size 4
//!
//! # Same, from a JSON layout file
//! distarray layout --config layout.json
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use distarray::{load_dnpy, DimData, DistSpec, Distribution, LayoutConfig};

#[derive(Parser, Debug)]
#[command(name = "distarray")]
#[command(author = "Daemoniorum LLC")]
#[command(version)]
#[command(about = "Inspect distributed array layouts and .dnpy files", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise a .dnpy file
    Inspect {
        /// Path to the file
        file: PathBuf,
    },
    /// Print the ranks owning a global index
    Owners {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Global index, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        index: Vec<usize>,
    },
    /// Print grid, targets and per-rank local shapes
    Layout {
        #[command(flatten)]
        layout: LayoutArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct LayoutArgs {
    /// Global shape, comma-separated
    #[arg(long, value_delimiter = ',')]
    shape: Vec<usize>,

    /// Distribution tokens per dimension (n, b, c, bc:<k>, bp:<h>[:periodic])
    #[arg(long)]
    dist: Option<String>,

    /// Grid shape, comma-separated
    #[arg(long, value_delimiter = ',')]
    grid: Option<Vec<usize>>,

    /// Number of processes
    #[arg(long, default_value = "1")]
    comm_size: usize,

    /// JSON layout file
    #[arg(short, long, conflicts_with_all = ["shape", "dist", "grid"])]
    config: Option<PathBuf>,
}

impl LayoutArgs {
    fn to_config(&self) -> Result<LayoutConfig, Box<dyn Error>> {
        if let Some(path) = &self.config {
            return Ok(LayoutConfig::load(path)?);
        }
        if self.shape.is_empty() {
            return Err("either --shape or --config is required".into());
        }

        let mut config = LayoutConfig::new(self.shape.clone(), self.comm_size);
        if let Some(dist) = &self.dist {
            config = config.with_dist(DistSpec::parse_seq(dist)?);
        }
        if let Some(grid) = &self.grid {
            config = config.with_grid_shape(grid.clone());
        }
        Ok(config)
    }

    fn distribution(&self) -> Result<Distribution, Box<dyn Error>> {
        let config = self.to_config()?;
        debug!(config = ?config, "resolved layout");
        Ok(config.distribution()?)
    }
}

fn run_inspect(file: &Path) -> Result<(), Box<dyn Error>> {
    let record = load_dnpy(file)?;
    info!(
        path = %file.display(),
        version = %record.version,
        dtype = %record.buffer.dtype(),
        "loaded local array"
    );

    println!("protocol version: {}", record.version);
    println!("dtype:            {}", record.buffer.dtype());
    println!("local shape:      {:?}", record.buffer.shape());
    println!("bytes:            {}", record.buffer.bytes().len());
    for (d, data) in record.dim_data.iter().enumerate() {
        println!("dim {d}: {}", data.to_value()?);
    }
    Ok(())
}

fn run_owners(layout: &LayoutArgs, index: &[usize]) -> Result<(), Box<dyn Error>> {
    let dist = layout.distribution()?;
    let ranks = dist.owning_ranks(index)?;
    info!(index = ?index, ranks = ?ranks, "owner lookup");
    println!("{ranks:?}");
    Ok(())
}

fn run_layout(layout: &LayoutArgs) -> Result<(), Box<dyn Error>> {
    let dist = layout.distribution()?;
    let dist_tokens: Vec<&str> = dist.dist().iter().map(|t| t.token()).collect();

    println!("shape:     {:?}", dist.shape());
    println!("dist:      {}", dist_tokens.join(","));
    println!("grid:      {:?}", dist.grid_shape());
    println!("comm size: {}", dist.comm_size());
    println!("targets:   {:?}", dist.targets());

    for rank in 0..dist.comm_size() {
        let Some(coord) = dist.grid_coord(rank) else {
            println!("rank {rank}: unplaced");
            continue;
        };
        let local = dist.local_shape(rank).unwrap_or_default();
        let dims = dist
            .maps()
            .iter()
            .zip(&coord)
            .map(|(m, &c)| {
                DimData::from_descriptor(m, c)
                    .and_then(|d| d.to_value())
                    .map(|v| v.to_string())
            })
            .collect::<distarray::Result<Vec<_>>>()?;
        println!("rank {rank}: coord {coord:?} local shape {local:?}");
        for (d, text) in dims.iter().enumerate() {
            println!("  dim {d}: {text}");
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &args.command {
        Command::Inspect { file } => run_inspect(file),
        Command::Owners { layout, index } => run_owners(layout, index),
        Command::Layout { layout } => run_layout(layout),
    }
}
