mod error;
mod param_arg;

use clap::{Parser, Subcommand, ValueEnum};
use error::{CliError, CliResult};
use param_arg::{ParamArg, parse_param};
use serde::Serialize;
use sf_expr::{Expr, parse};
use sf_figure::{PlotOptions, PlotSurface, SurfaceOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(about = "slidefig CLI - sample parameterized expressions the way a figure would", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample an expression over the figure viewport and print the points
    Sample(SampleArgs),
    /// List the parameters an expression depends on
    Params {
        /// Expression, e.g. "a*sin(k*x)"
        expression: String,
        /// Independent variable
        #[arg(long, default_value = "x")]
        var: String,
    },
    /// Validate a surface options file and print the effective options
    CheckConfig {
        /// Path to the options YAML file
        path: PathBuf,
    },
}

#[derive(clap::Args)]
struct SampleArgs {
    /// Expressions to plot, one curve each
    #[arg(required = true)]
    expressions: Vec<String>,
    /// Independent variable
    #[arg(long, default_value = "x")]
    var: String,
    /// Parameter value: NAME=VALUE or NAME=VALUE:MIN:MAX[:STEP]
    #[arg(long = "param", short = 'p', value_parser = parse_param)]
    params: Vec<ParamArg>,
    /// Surface options YAML file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Default samples per curve
    #[arg(long)]
    points: Option<usize>,
    /// Visible x range
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    x_range: Option<Vec<f64>>,
    /// Domain override for every curve
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    domain: Option<Vec<f64>>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Log surface events at debug level
    #[arg(long)]
    debug: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Serialize)]
struct SampledCurve {
    id: String,
    expression: String,
    parameters: Vec<(String, f64)>,
    x: Vec<f64>,
    y: Vec<f64>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sample(args) => cmd_sample(args),
        Commands::Params { expression, var } => cmd_params(&expression, &var),
        Commands::CheckConfig { path } => cmd_check_config(&path),
    }
}

fn load_options(path: &Path) -> CliResult<SurfaceOptions> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn cmd_sample(args: SampleArgs) -> CliResult<()> {
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => SurfaceOptions::default(),
    };
    if let Some(n) = args.points {
        options = options.with_sampling_points(n);
    }
    if let Some(range) = &args.x_range {
        options = options.with_x_range(range[0], range[1])?;
    }
    let debug = args.debug || options.debug;
    options = options.with_debug(debug);

    let mut surface = PlotSurface::with_options(options)?;
    for param in &args.params {
        surface.add_param(param.name.as_str(), param.config)?;
    }

    let mut sampled = Vec::with_capacity(args.expressions.len());
    for text in &args.expressions {
        let expr = parse(text)?;
        let mut plot = PlotOptions::new();
        if let Some(domain) = &args.domain {
            plot = plot.x_domain((domain[0], domain[1]));
        }
        let curve = surface.plot_auto(args.var.as_str(), expr, plot)?;
        let (x, y) = curve.compute_data()?;
        sampled.push(SampledCurve {
            id: curve.id().to_string(),
            expression: curve.expression().to_string(),
            parameters: Vec::new(),
            x,
            y,
        });
    }
    for curve in &mut sampled {
        if let Some(c) = surface.curve(&curve.id) {
            curve.parameters = c
                .parameters()
                .iter()
                .filter_map(|p| surface.param(p.as_str()).map(|ctl| (p.to_string(), ctl.value())))
                .collect();
        }
    }
    info!(curves = sampled.len(), points = surface.sampling_points(), "sampled");

    let body = match args.format {
        Format::Csv => to_csv(&sampled),
        Format::Json => serde_json::to_string_pretty(&sampled)? + "\n",
    };
    match &args.output {
        Some(path) => {
            std::fs::write(path, body)?;
            println!("✓ Wrote {} curve(s) to {}", sampled.len(), path.display());
        }
        None => io::stdout().write_all(body.as_bytes())?,
    }
    Ok(())
}

/// Long format: one row per sample, curves one after another.
fn to_csv(curves: &[SampledCurve]) -> String {
    let mut csv = String::from("curve,x,y\n");
    for curve in curves {
        for (x, y) in curve.x.iter().zip(&curve.y) {
            csv.push_str(&format!("{},{},{}\n", curve.id, x, y));
        }
    }
    csv
}

fn cmd_params(expression: &str, var: &str) -> CliResult<()> {
    let expr: Expr = parse(expression)?;
    let params: Vec<_> = expr
        .free_symbols()?
        .into_iter()
        .filter(|s| s.as_str() != var)
        .collect();

    if params.is_empty() {
        println!("No parameters in {expr}");
    } else {
        println!("Parameters of {expr}:");
        for p in params {
            println!("  {p}");
        }
    }
    Ok(())
}

fn cmd_check_config(path: &Path) -> CliResult<()> {
    println!("Checking options: {}", path.display());
    let options = load_options(path)?;
    options.validate()?;
    print!("{}", serde_yaml::to_string(&options).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?);
    println!("✓ Options are valid");
    Ok(())
}
