//! seqlab - sequence playground and Markov sequence generator.
//!
//! # Usage
//!
//! ```bash
//! # Browse the static generators interactively
//! seqlab menu
//!
//! # One stochastic run: 100 values from seeds 2, 3 with 10 states
//! seqlab markov --seeds 2,3 --steps 100 --states 10 --seed 42
//!
//! # Force the operator for each state and emit JSON
//! seqlab markov --operators "x + y;x * 2" --steps 20 --json
//!
//! # Defaults from a file, debug logs on stderr
//! seqlab --config seqlab.toml --log-level debug markov
//! ```

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use seqlab::config::{Config, LoggingConfig};
use seqlab::core::Value;
use seqlab::engine::{self, GenerationResult, StepCount, StochasticEngine};
use seqlab::operators::OperatorPool;
use seqlab::repl::{self, Action};
use seqlab::sequences::{self, Seed, Session};
use seqlab::EngineBuilder;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const RULE_WIDTH: usize = 70;

#[derive(Parser, Debug)]
#[command(
    name = "seqlab",
    about = "Explore integer sequences and Markov-driven recurrences",
    version
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log filter (overridden by RUST_LOG).
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format: pretty, compact or json.
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<String>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive playground for the static generators (default).
    Menu,
    /// Generate a sequence with a random Markov chain of operators.
    Markov(MarkovArgs),
}

#[derive(Args, Debug)]
struct MarkovArgs {
    /// Comma-separated seed values (at least two).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_values_t = [2.0, 3.0])]
    seeds: Vec<Value>,

    /// Number of values to append.
    #[arg(long, default_value_t = 100)]
    steps: usize,

    /// Treat --steps as the final length, seeds included.
    #[arg(long)]
    total: bool,

    /// Number of Markov states.
    #[arg(long)]
    states: Option<usize>,

    #[arg(long)]
    initial_state: Option<usize>,

    /// Diagonal damping applied when drawing the matrix.
    #[arg(long)]
    damping: Option<f64>,

    /// RNG seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Semicolon-separated operator labels, one per state.
    #[arg(long, value_delimiter = ';')]
    operators: Vec<String>,

    /// Emit the result as JSON.
    #[arg(long)]
    json: bool,

    /// Keep the chain alive and append values on demand.
    #[arg(long)]
    interactive: bool,
}

fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Failed to parse log filter")?;

    match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
        "compact" => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(io::stderr))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_writer(io::stderr))
            .try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Print `text` and read one line. `None` on EOF.
fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    text: &str,
) -> Result<Option<String>> {
    print!("{text}");
    io::stdout().flush().context("Failed to flush stdout")?;
    lines
        .next()
        .transpose()
        .context("Failed to read from stdin")
}

fn seed_display(seed: &Seed) -> String {
    match seed {
        Seed::Scalar(v) => v.to_string(),
        Seed::History(values) => repl::format_values(values),
    }
}

fn run_menu(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<()> {
    loop {
        println!("\n{}", rule());
        println!("SEQUENCE PLAYGROUND");
        println!("{}", rule());
        println!("\nAvailable sequences:\n");
        for entry in sequences::catalogue() {
            println!(
                "  {}. {:25} (start: {}, step: {})",
                entry.key,
                entry.name(),
                seed_display(&entry.initial),
                entry.step
            );
        }
        println!("\n  x. Exit");
        println!("{}", rule());

        let Some(choice) = prompt(lines, "\nSelect a sequence (1-9) or 'x' to exit: ")? else {
            println!("\nGoodbye!");
            return Ok(());
        };
        let choice = choice.trim();
        if choice.eq_ignore_ascii_case("x") {
            println!("\nGoodbye!");
            return Ok(());
        }

        match sequences::find_entry(choice) {
            Some(entry) => {
                println!("\nStarting {}...\n", entry.name());
                let finished_on_eof = run_session(Session::from_entry(entry), lines)?;
                if finished_on_eof {
                    return Ok(());
                }
            }
            None => println!("\nInvalid choice '{choice}'. Please select 1-9 or x."),
        }
    }
}

fn print_session_summary(session: &Session) {
    let current = &session.state().current;
    match current {
        Seed::History(values) => {
            println!("Final value: {}", current.last().unwrap_or_default());
            println!("{}", repl::summarize_history(values));
        }
        Seed::Scalar(v) => println!("Final value: {v}"),
    }
    println!("Total iterations: {}", session.iterations());
    println!("{}", rule());
}

/// Drive one session. Returns `true` if input ended.
fn run_session(
    mut session: Session,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<bool> {
    println!("{}", rule());
    println!("{} Generator", session.name());
    println!("{}", rule());
    println!("Starting value: {}", seed_display(&session.state().current));
    println!("Step parameter: {}", session.state().step);
    println!("\nControls:");
    println!("  - Press Enter to generate 1 next value");
    println!("  - Enter a number N to generate N next values");
    println!("  - Press 'x' or 'X' to exit");
    println!("{}\n", rule());

    loop {
        let Some(line) = prompt(lines, &format!("[{}] Next? ", session.iterations() + 1))? else {
            println!("\n{}", rule());
            println!("EOF detected. Exiting sequence generator.");
            print_session_summary(&session);
            return Ok(true);
        };

        let count = match repl::parse_action(&line) {
            Ok(Action::Exit) => {
                println!("\n{}", rule());
                println!("Exiting sequence generator");
                print_session_summary(&session);
                return Ok(false);
            }
            Ok(Action::Generate(n)) => n,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match session.advance(count) {
            Ok(values) => {
                println!("\n  Generated {} value(s):", values.len());
                print!("{}", repl::render_values(&values));
                match &session.state().current {
                    Seed::History(history) => {
                        let position = history.last().copied().unwrap_or_default();
                        println!("\n  Current position: {position}");
                        println!("  Sequence length: {}", history.len());
                    }
                    Seed::Scalar(v) => println!("\n  Current value: {v}"),
                }
            }
            Err(e) => {
                println!("Error generating sequence: {e}");
                println!("   Continuing with previous value...");
            }
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => Config::default(),
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    Ok(config)
}

fn resolve_operators(labels: &[String], max_offset: i64) -> Result<Vec<seqlab::core::Operator>> {
    let pool = OperatorPool::new().with_max_offset(max_offset);
    labels
        .iter()
        .map(|label| match pool.find(label) {
            Some(op) => Ok(op),
            None => bail!("Unknown operator '{}'", label.trim()),
        })
        .collect()
}

fn print_report(result: &GenerationResult) {
    println!("{}", rule());
    println!("MARKOV SEQUENCE GENERATOR");
    println!("{}", rule());
    println!("Run: {}", result.run_id);
    println!("\nTransition matrix:");
    print!("{}", repl::format_matrix(&result.transition_matrix));
    println!("\nOperators:");
    print!("{}", repl::format_operators(&result.operator_labels));
    println!("\nTrace:");
    for record in result.steps() {
        println!("  {}", repl::format_step(record));
    }
    println!("\nSequence ({} values):", result.sequence.len());
    println!("{}", repl::format_values(&result.sequence));
    println!("{}", rule());
}

fn run_interactive(
    mut engine: StochasticEngine,
    rng: &mut StdRng,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    println!("\nEnter to append 1 value, N to append N, 'x' to exit.");
    loop {
        let text = format!("[state {}] Next? ", engine.current_state());
        let Some(line) = prompt(lines, &text)? else {
            break;
        };
        let count = match repl::parse_action(&line) {
            Ok(Action::Exit) => break,
            Ok(Action::Generate(n)) => n,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        let values = engine.extend(count, rng)?.to_vec();
        print!("{}", repl::render_values(&values));
        println!("  Sequence length: {}", engine.sequence().len());
    }

    println!("\n{}", rule());
    println!("Final value: {}", engine.sequence().last().copied().unwrap_or_default());
    println!("Total steps: {}", engine.trace().len());
    if let Some(rate) = engine.trace().self_transition_rate() {
        println!("Self-transition rate: {rate:.3}");
    }
    println!("{}", rule());
    Ok(())
}

fn run_markov(
    args: MarkovArgs,
    config: &Config,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let steps = if args.total {
        StepCount::TotalLength(args.steps)
    } else {
        StepCount::Append(args.steps)
    };

    let mut engine_config = config.engine.clone();
    if let Some(states) = args.states {
        engine_config.num_states = states;
    } else if !args.operators.is_empty() {
        engine_config.num_states = args.operators.len();
    }
    if let Some(state) = args.initial_state {
        engine_config.initial_state = state;
    }
    if let Some(damping) = args.damping {
        engine_config.damping = damping;
    }
    let request = engine_config.request(args.seeds, steps);
    debug!(?request, "Markov request");

    if args.operators.is_empty() && !args.interactive {
        let result = engine::generate(&request, &mut rng).context("Generation failed")?;
        return emit(&result, args.json);
    }

    let mut builder = EngineBuilder::from_request(&request);
    if !args.operators.is_empty() {
        builder = builder.operators(resolve_operators(&args.operators, engine_config.max_offset)?);
    }
    let mut engine = builder.build(&mut rng).context("Failed to build engine")?;
    engine.run(request.steps(), &mut rng).context("Generation failed")?;

    if args.interactive {
        print!("{}", repl::format_operators(&engine.operator_labels()));
        println!("Sequence: {}", repl::format_values(engine.sequence()));
        return run_interactive(engine, &mut rng, lines);
    }
    emit(&engine.into_result(), args.json)
}

fn emit(result: &GenerationResult, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(result).context("Failed to serialize result")?
        );
    } else {
        print_report(result);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    init_tracing(&config.logging)?;
    info!(version = env!("CARGO_PKG_VERSION"), "seqlab starting");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => run_menu(&mut lines),
        Command::Markov(args) => run_markov(args, &config, &mut lines),
    }
}
