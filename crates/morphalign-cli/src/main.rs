//! morphalign CLI — population profile analysis over detected contours.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use morphalign::{Aligner, AnalysisConfig, DifferenceMetric, ShapeInput};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "morphalign")]
#[command(
    about = "Align and score populations of closed biological contours against their consensus profile"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: filter, consensus, landmark alignment, scoring.
    Analyze(CliAnalyzeArgs),

    /// Print per-shape scalar measurements without population work.
    Measure(CliMeasureArgs),

    /// Aggregate the population profiles and write the median curve only.
    Median(CliMedianArgs),
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Path to the input shapes (JSON array of {id, source?, points}).
    #[arg(long)]
    input: PathBuf,

    /// Path to write the analysis result (JSON).
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    tuning: CliTuningArgs,

    /// Difference metric for deviation scoring.
    #[arg(long, value_enum, default_value_t = CliMetricArg::SumSquares)]
    metric: CliMetricArg,

    /// Maximum consensus refinement passes (1 disables refinement).
    #[arg(long, default_value = "10")]
    max_passes: usize,

    /// Median bound factor for area, perimeter and contour length (two-sided)
    /// and for the feret lower bound.
    #[arg(long, default_value = "1.5")]
    filter_threshold: f64,

    /// Upper median bound factor for the wobbliness (path length) filter.
    #[arg(long, default_value = "1.2")]
    wobbliness_threshold: f64,

    /// Also reject members scoring far above the median deviation.
    #[arg(long)]
    deviation_gate: bool,
}

#[derive(Debug, Clone, Args)]
struct CliMeasureArgs {
    /// Path to the input shapes (JSON array of {id, source?, points}).
    #[arg(long)]
    input: PathBuf,

    /// Path to write the measurements (JSON). Prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    tuning: CliTuningArgs,
}

#[derive(Debug, Clone, Args)]
struct CliMedianArgs {
    /// Path to the input shapes (JSON array of {id, source?, points}).
    #[arg(long)]
    input: PathBuf,

    /// Path to write the median curve table (JSON).
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    tuning: CliTuningArgs,
}

#[derive(Debug, Clone, Args)]
struct CliTuningArgs {
    /// Half-window of the interior-angle profile, in border points.
    #[arg(long, default_value = "23")]
    angle_window: usize,

    /// Aggregation bin width in normalized position units.
    #[arg(long, default_value = "0.5")]
    increment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliMetricArg {
    SumAbs,
    SumSquares,
}

impl From<CliMetricArg> for DifferenceMetric {
    fn from(arg: CliMetricArg) -> Self {
        match arg {
            CliMetricArg::SumAbs => DifferenceMetric::SumAbs,
            CliMetricArg::SumSquares => DifferenceMetric::SumSquares,
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::Measure(args) => run_measure(&args),
        Commands::Median(args) => run_median(&args),
    }
}

fn read_shapes(path: &Path) -> CliResult<Vec<ShapeInput>> {
    let data = std::fs::read_to_string(path)?;
    let shapes: Vec<ShapeInput> = serde_json::from_str(&data)?;
    tracing::info!("Loaded {} shapes from {}", shapes.len(), path.display());
    Ok(shapes)
}

fn config_from(tuning: &CliTuningArgs) -> CliResult<AnalysisConfig> {
    if !(tuning.increment > 0.0 && tuning.increment < 100.0) {
        return Err(format!(
            "--increment must be in (0, 100), got {}",
            tuning.increment
        )
        .into());
    }
    let mut config = AnalysisConfig::default();
    config.angle_window = tuning.angle_window;
    config.profile_increment = tuning.increment;
    Ok(config)
}

// ── analyze ───────────────────────────────────────────────────────────

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    let shapes = read_shapes(&args.input)?;

    let mut config = config_from(&args.tuning)?;
    config.score.metric = args.metric.into();
    config.refine.max_passes = args.max_passes;
    config.filter.max_area_from_median = args.filter_threshold;
    config.filter.max_perimeter_from_median = args.filter_threshold;
    config.filter.max_length_from_median = args.filter_threshold;
    config.filter.min_feret_from_median = args.filter_threshold;
    config.filter.max_wobbliness_from_median = args.wobbliness_threshold;
    config.filter.deviation_gate = args.deviation_gate;

    let aligner = Aligner::with_config(config);
    let result = aligner.analyze(shapes)?;

    tracing::info!(
        "Analysis done: {} shapes, {} passes, representative {:?}",
        result.shapes.len(),
        result.passes,
        result.representative_id
    );

    std::fs::write(&args.out, serde_json::to_string_pretty(&result)?)?;
    tracing::info!("Wrote analysis result to {}", args.out.display());
    Ok(())
}

// ── measure ───────────────────────────────────────────────────────────

fn run_measure(args: &CliMeasureArgs) -> CliResult<()> {
    let shapes = read_shapes(&args.input)?;
    let members = morphalign::build_members(shapes, args.tuning.angle_window)?;

    let measured: Vec<serde_json::Value> = members
        .iter()
        .map(|m| {
            serde_json::json!({
                "id": m.id(),
                "source": m.source(),
                "measurements": m.measurements(),
            })
        })
        .collect();

    let json = serde_json::to_string_pretty(&measured)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!("Wrote measurements to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ── median ────────────────────────────────────────────────────────────

fn run_median(args: &CliMedianArgs) -> CliResult<()> {
    let shapes = read_shapes(&args.input)?;
    let config = config_from(&args.tuning)?;
    let members = morphalign::build_members(shapes, config.angle_window)?;
    let curve = morphalign::median_curve_of(&members, config.profile_increment)?;

    tracing::info!(
        "Median curve: {} bins, {} populated",
        curve.len(),
        curve.populated_bins()
    );

    std::fs::write(&args.out, serde_json::to_string_pretty(&curve)?)?;
    tracing::info!("Wrote median curve to {}", args.out.display());
    Ok(())
}
