// Chorale bigram generator: CLI entry point.
//
// Loads a chorale corpus, builds the bigram model, and either prints newly
// generated chorales, prints corpus statistics, or writes a heat map of the
// count matrix.
//
// Usage:
//   chorale [-v|-q] generate [CORPUS] [--count N] [--seed N] [--max-steps N]
//   chorale [-v|-q] stats [CORPUS] [--top N] [--descending] [--json]
//   chorale [-v|-q] heatmap [CORPUS] --output PATH
//
// CORPUS is one of:
//   --corpus PATH
//   --voicing {soprano-bass,chords} --encoding {per-change,per-beat,start-of-beat}
//     [--data-dir DIR]
//   --interactive
//   --config PATH (JSON ModelConfig with corpus_path)
// plus optional --terminator TOKEN and --standard-markers.
//
// Generated chorales and statistics go to stdout, one chorale per line;
// logs and prompts go to stderr.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chorale_bigram::config::prompt_selection;
use chorale_bigram::heatmap::write_heatmap;
use chorale_bigram::{BigramModel, CorpusSelection, Encoding, ModelConfig, SortOrder, Voicing};
use chorale_prng::ChoraleRng;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{LevelFilter, info};
use serde::Serialize;

/// Seed used when none is given, so plain runs are reproducible.
const DEFAULT_SEED: u64 = 2147483647;

/// Number of row sums `stats` reports by default.
const DEFAULT_TOP: usize = 20;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bigram chorale generator", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate new chorales from the corpus bigram model
    Generate(GenerateArgs),
    /// Print corpus and bigram statistics
    Stats(StatsArgs),
    /// Write a log-scaled heat map of the bigram counts (PGM)
    Heatmap(HeatmapArgs),
}

#[derive(Args, Debug)]
struct CorpusArgs {
    /// Corpus file, one chorale per line
    #[arg(long, value_name = "PATH", conflicts_with_all = ["voicing", "interactive"])]
    corpus: Option<PathBuf>,

    /// Voice representation of the corpus to select
    #[arg(long, value_enum, requires = "encoding", conflicts_with = "interactive")]
    voicing: Option<VoicingArg>,

    /// Temporal encoding of the corpus to select
    #[arg(long, value_enum, requires = "voicing")]
    encoding: Option<EncodingArg>,

    /// Directory holding the named corpus files
    #[arg(long, value_name = "DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Ask for voicing and encoding on the terminal
    #[arg(long)]
    interactive: bool,

    /// JSON model configuration
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start/end-of-chorale token
    #[arg(long, value_name = "TOKEN")]
    terminator: Option<String>,

    /// Rewrite [SOC]/[EOC] to the terminator and [EOM] to "/"
    #[arg(long)]
    standard_markers: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Number of chorales to generate
    #[arg(short = 'n', long, value_name = "N", default_value_t = 1)]
    count: usize,

    /// PRNG seed
    #[arg(long, value_name = "SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Fail if a chorale runs longer than this many tokens
    #[arg(long, value_name = "STEPS")]
    max_steps: Option<usize>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// How many of the largest token frequencies to report
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TOP)]
    top: usize,

    /// List the largest frequencies from largest to smallest
    #[arg(long)]
    descending: bool,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct HeatmapArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Output PGM path
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VoicingArg {
    SopranoBass,
    Chords,
}

impl From<VoicingArg> for Voicing {
    fn from(arg: VoicingArg) -> Self {
        match arg {
            VoicingArg::SopranoBass => Voicing::SopranoBass,
            VoicingArg::Chords => Voicing::FullChords,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EncodingArg {
    PerChange,
    PerBeat,
    StartOfBeat,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::PerChange => Encoding::PerChange,
            EncodingArg::PerBeat => Encoding::PerBeat,
            EncodingArg::StartOfBeat => Encoding::StartOfBeat,
        }
    }
}

/// Machine-readable `stats` output.
#[derive(Serialize)]
struct StatsReport {
    chorales: usize,
    total_tokens: usize,
    unique_tokens: usize,
    singular_tokens: usize,
    top_frequencies: Vec<u64>,
    nonzero_bigrams: usize,
    total_bigrams: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Stats(args) => run_stats(args),
        Commands::Heatmap(args) => run_heatmap(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    let level = match (quiet, verbose) {
        (0, 0) => LevelFilter::Info,
        (0, 1) => LevelFilter::Debug,
        (0, _) => LevelFilter::Trace,
        (1, _) => LevelFilter::Warn,
        _ => LevelFilter::Error,
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

/// Turn the corpus arguments into a validated `ModelConfig`.
fn resolve_config(args: &CorpusArgs) -> Result<ModelConfig> {
    let mut config = match &args.config {
        Some(path) => ModelConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ModelConfig::default(),
    };
    if let Some(terminator) = &args.terminator {
        config.terminator = terminator.clone();
    }
    if args.standard_markers {
        config = config.with_standard_markers();
    }

    if let Some(path) = &args.corpus {
        config.corpus_path = path.clone();
    } else if let (Some(voicing), Some(encoding)) = (args.voicing, args.encoding) {
        let selection = CorpusSelection {
            voicing: voicing.into(),
            encoding: encoding.into(),
        };
        config.corpus_path = selection.resolve(&args.data_dir);
    } else if args.interactive {
        let stdin = io::stdin();
        let selection = prompt_selection(&mut stdin.lock(), &mut io::stderr())?;
        config.corpus_path = selection.resolve(&args.data_dir);
    }

    if config.corpus_path.as_os_str().is_empty() {
        bail!(
            "no corpus selected: pass --corpus, --voicing with --encoding, --interactive, \
             or a --config with corpus_path"
        );
    }
    config.validate()?;
    Ok(config)
}

fn load_model(args: &CorpusArgs) -> Result<BigramModel> {
    let config = resolve_config(args)?;
    info!("Reading corpus {}", config.corpus_path.display());
    let model = BigramModel::load(&config)
        .with_context(|| format!("building model from {}", config.corpus_path.display()))?;
    Ok(model)
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let model = load_model(&args.corpus)?;
    let mut rng = ChoraleRng::new(args.seed);
    info!("Generating {} chorale(s) with seed {}", args.count, args.seed);

    for i in 0..args.count {
        let chorale = match args.max_steps {
            Some(limit) => model.generate_bounded(&mut rng, limit),
            None => model.generate(&mut rng),
        }
        .with_context(|| format!("generating chorale {}", i + 1))?;
        println!("{}", chorale.join(" "));
    }
    Ok(())
}

fn run_stats(args: StatsArgs) -> Result<()> {
    let model = load_model(&args.corpus)?;
    let order = if args.descending {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    let summary = model.corpus_summary();
    let stats = model.count_stats(args.top, order);

    if args.json {
        let report = StatsReport {
            chorales: summary.chorales,
            total_tokens: summary.total_tokens,
            unique_tokens: summary.unique_tokens,
            singular_tokens: stats.singleton_tokens,
            top_frequencies: stats.top_frequencies,
            nonzero_bigrams: stats.nonzero_bigrams,
            total_bigrams: stats.total_bigrams,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Number of chorales: {}", summary.chorales);
    println!("Total number of tokens in the corpus: {}", summary.total_tokens);
    println!(
        "Number of unique tokens in the corpus: {} ({:.2}%)",
        summary.unique_tokens,
        summary.unique_percent()
    );
    println!("Number of singular tokens: {}", stats.singleton_tokens);
    println!(
        "Count of {} most common tokens: {:?}",
        args.top, stats.top_frequencies
    );
    println!(
        "Distinct bigrams: {} of {} counted",
        stats.nonzero_bigrams, stats.total_bigrams
    );
    Ok(())
}

fn run_heatmap(args: HeatmapArgs) -> Result<()> {
    let model = load_model(&args.corpus)?;
    write_heatmap(model.counts(), &args.output)?;
    let dim = model.counts().dim();
    info!("Wrote {dim}x{dim} heat map to {}", args.output.display());
    Ok(())
}
