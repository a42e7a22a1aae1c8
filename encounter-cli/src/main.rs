mod reports;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use encounter_engine::{EncounterEngine, EncounterRequest, QueryError, RegionData, parse_version};
use reports::{
    ReportFormat, write_distribution_console, write_generate_console, write_json,
    write_locate_console,
};

const BUNDLED_REGION: &str = include_str!("../assets/region.json");

#[derive(Debug, Parser)]
#[command(name = "encounter-cli", version)]
#[command(about = "Wild encounter generator - draw encounters, inspect odds, find where a name appears")]
struct Args {
    /// Data pack to load (JSON); defaults to the bundled region
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Game version whose exclusives may appear
    #[arg(long, global = true, default_value = "scarlet")]
    version_tag: String,

    /// Seed for reproducible draws; random when omitted
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output report format
    #[arg(long, global = true, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Draw one or more encounters
    Generate {
        #[command(flatten)]
        query: QueryArgs,

        /// Number of independent draws
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Show the ranked encounter odds
    Distribution {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// List every location where a name appears
    Locate {
        /// Name to look up; version tags are ignored
        name: String,
    },
}

#[derive(Debug, Clone, ClapArgs)]
struct QueryArgs {
    /// Location name or 1-based position in alphabetical order
    #[arg(long)]
    location: String,

    /// Dawn, Day, Dusk, Night or 0-3
    #[arg(long)]
    slot: String,

    /// Category favoured by the encounter power
    #[arg(long)]
    category: Option<String>,

    /// Encounter power level 0-3
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    power: i64,

    /// Comma-separated names: the held box, or the allow-list with --specific
    #[arg(long, default_value = "")]
    shared: String,

    /// Restrict results to the names in --shared
    #[arg(long)]
    specific: bool,

    /// Exclude families of the names in --shared
    #[arg(long)]
    check_duplicates: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let format = ReportFormat::parse(&args.report);

    if format == ReportFormat::Console {
        announce_banner();
    }

    let engine = load_engine(args.data.as_deref())?;
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match run(&args, &engine, format, &mut output_target) {
        Ok(()) => {
            output_target.flush_inner()?;
            Ok(())
        }
        Err(err) => {
            output_target.flush_inner()?;
            if let Some(query_err) = err.downcast_ref::<QueryError>() {
                eprintln!("{} {query_err}", "❌ Rejected:".red().bold());
                std::process::exit(1);
            }
            Err(err)
        }
    }
}

fn announce_banner() {
    println!("{}", "🎲 Encounter Generator".bright_cyan().bold());
    println!("{}", "======================".cyan());
}

fn load_engine(path: Option<&Path>) -> Result<EncounterEngine> {
    let data = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            RegionData::from_json(&json)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => RegionData::from_json(BUNDLED_REGION).context("bundled region data is invalid")?,
    };
    let engine = EncounterEngine::load(&data).context("failed to build location registry")?;
    log::info!(
        "Loaded {} locations ({} known names)",
        engine.registry().len(),
        engine.names().len()
    );
    Ok(engine)
}

fn build_request(args: &Args, query: &QueryArgs) -> Result<EncounterRequest> {
    let version = parse_version(&args.version_tag)?;
    Ok(EncounterRequest {
        version,
        location: query.location.clone(),
        slot: query.slot.clone(),
        category: query.category.clone(),
        power: query.power,
        check_duplicates: query.check_duplicates,
        shared_text: query.shared.clone(),
        specific: query.specific,
    })
}

fn run(
    args: &Args,
    engine: &EncounterEngine,
    format: ReportFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match &args.command {
        Command::Generate { query, count } => {
            let request = build_request(args, query)?;
            let seed = args.seed.unwrap_or_else(rand::random);
            if args.verbose {
                eprintln!("Seed: {seed}");
            }
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let reports = (0..*count)
                .map(|_| engine.generate(&request, &mut rng))
                .collect::<Result<Vec<_>, _>>()?;
            match format {
                ReportFormat::Json => write_json(out, &reports),
                ReportFormat::Console => write_generate_console(out, &reports),
            }
        }
        Command::Distribution { query } => {
            let request = build_request(args, query)?;
            let report = engine.distribution(&request)?;
            match format {
                ReportFormat::Json => write_json(out, &report),
                ReportFormat::Console => write_distribution_console(out, &report),
            }
        }
        Command::Locate { name } => {
            let report = engine.locate(name);
            match format {
                ReportFormat::Json => write_json(out, &report),
                ReportFormat::Console => write_locate_console(out, &report),
            }
        }
    }
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
