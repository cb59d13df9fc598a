//! Aptitude CLI
//!
//! Usage:
//!   aptitude                          # Interactive questionnaire (resumes saved state)
//!   aptitude --summary                # Show the profile for the saved state
//!   aptitude --reset                  # Forget the saved state
//!   aptitude --serve                  # HTTP API server
//!   aptitude --json                   # JSON output

use clap::Parser;
use colored::Colorize;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use aptitude::config::Config;
use aptitude::core::{run_server, JsonFileStore, QuestionnaireEngine, StateStore, progress, summarize};
use aptitude::types::{ProfileSummary, Progress, Question, StepOutput};
use aptitude::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "aptitude",
    version = VERSION,
    about = "Adaptive personality and interest questionnaire",
    long_about = "Aptitude asks adaptive questions and accumulates MBTI and Holland\n\
                  (RIASEC) evidence until every dimension is decided, then prints\n\
                  a profile with recommended departments.\n\n\
                  Progress is saved after every answer and resumed on the next run.\n\n\
                  Environment:\n  \
                  APTITUDE_THRESHOLD      Convergence threshold (0, 1]\n  \
                  APTITUDE_MIN_WEIGHT     Weight observed before converging\n  \
                  APTITUDE_MAX_QUESTIONS  Question cap\n  \
                  APTITUDE_STATE_PATH     Saved state for this CLI\n  \
                  APTITUDE_STATE_DIR      Session directory for --serve\n  \
                  APTITUDE_QUESTION_BANK  JSON question bank file"
)]
struct Args {
    /// Print the profile for the saved questionnaire and exit
    #[arg(long)]
    summary: bool,

    /// Delete the saved questionnaire and exit
    #[arg(long)]
    reset: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (overrides APTITUDE_ADDR)
    #[arg(long)]
    addr: Option<String>,

    /// Saved state file (overrides APTITUDE_STATE_PATH)
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Convergence threshold (overrides APTITUDE_THRESHOLD)
    #[arg(long)]
    threshold: Option<f64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors; per-answer lines use the parseable format
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let result = if args.serve {
        run_server(config).await
    } else if args.reset {
        run_reset(&config)
    } else if args.summary {
        run_summary(&config, &args)
    } else {
        run_interactive(&config, &args)
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Environment first, then command-line overrides
fn load_config(args: &Args) -> Result<Config, aptitude::error::ConfigError> {
    let mut config = Config::load()?;
    if let Some(addr) = &args.addr {
        config.addr = addr.clone();
    }
    if let Some(path) = &args.state_file {
        config.state_path = path.clone();
    }
    if let Some(threshold) = args.threshold {
        config.convergence_threshold = threshold;
    }
    config.validate()?;
    Ok(config)
}

/// Run the questionnaire in the terminal
fn run_interactive(config: &Config, args: &Args) -> Result<(), Box<dyn Error>> {
    let generator = Arc::new(config.question_bank()?);
    let store = JsonFileStore::new(&config.state_path);
    let mut engine = QuestionnaireEngine::new(generator, Box::new(store), config.checker());

    print_header();
    if engine.restore() {
        let p = engine.progress();
        println!(
            "Resuming: {} answered, {}/{} dimensions decided ({:.0}%).",
            p.answered,
            p.converged,
            p.total_dimensions,
            p.percent()
        );
    }
    println!("Type the option number and press Enter. Type 'quit' to stop (progress is saved).");
    println!();

    loop {
        if engine.is_complete() {
            break;
        }

        let Some(question) = engine.pending().cloned() else {
            if let Err(e) = engine.advance() {
                println!("{} {}", "Could not load the next question:".yellow(), e);
                match read_line("Press Enter to retry, or type 'quit': ")? {
                    Some(line) if !is_quit(&line) => continue,
                    _ => return Ok(()),
                }
            }
            continue;
        };

        print_question(&question, engine.state().question_number + 1);
        let Some(line) = read_line("> ")? else {
            break;
        };
        if is_quit(&line) {
            let p = engine.progress();
            println!("\nSaved. Answered: {}", p.answered);
            return Ok(());
        }

        let index = match line.parse::<usize>() {
            Ok(n) if (1..=question.options.len()).contains(&n) => n - 1,
            _ => {
                println!(
                    "{}",
                    format!("Please enter a number from 1 to {}", question.options.len()).yellow()
                );
                continue;
            }
        };

        match engine.answer(index) {
            Ok(output) => print_step(&output, args)?,
            Err(e) if e.is_retryable() => {
                println!("{} {}", "Answer saved, but:".yellow(), e);
            }
            Err(e) => println!("{}", e.to_string().red()),
        }
    }

    if engine.is_complete() {
        println!();
        print_summary(&engine.summary(), &engine.progress(), args.json)?;
    }
    Ok(())
}

/// Print the profile for whatever is saved
fn run_summary(config: &Config, args: &Args) -> Result<(), Box<dyn Error>> {
    let store = JsonFileStore::new(&config.state_path);
    match store.load()? {
        Some(state) => print_summary(&summarize(&state.current_weights), &progress(&state), args.json),
        None => {
            println!("No saved questionnaire at {}", config.state_path.display());
            Ok(())
        }
    }
}

fn run_reset(config: &Config) -> Result<(), Box<dyn Error>> {
    JsonFileStore::new(&config.state_path).clear()?;
    println!("Questionnaire reset.");
    Ok(())
}

fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn is_quit(line: &str) -> bool {
    line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit")
}

fn print_header() {
    println!("{}", "========================================".bold());
    println!("{}", format!("  Aptitude v{} - Questionnaire", VERSION).bold());
    println!("{}", "========================================".bold());
    println!();
}

fn print_question(question: &Question, number: u32) {
    if question.category.is_empty() {
        println!("{}", format!("Question {}", number).blue().bold());
    } else {
        println!(
            "{} {}",
            format!("Question {}", number).blue().bold(),
            format!("[{}]", question.category).bright_black()
        );
    }
    println!("{}", question.prompt);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option.text);
    }
}

fn print_step(output: &StepOutput, args: &Args) -> Result<(), Box<dyn Error>> {
    if args.json {
        println!("{}", serde_json::to_string(output)?);
    } else if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
        println!();
    }
    Ok(())
}

fn print_summary(summary: &ProfileSummary, progress: &Progress, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        #[derive(serde::Serialize)]
        struct SummaryOutput<'a> {
            summary: &'a ProfileSummary,
            progress: &'a Progress,
        }
        println!("{}", serde_json::to_string_pretty(&SummaryOutput { summary, progress })?);
        return Ok(());
    }

    println!("{}", "Your profile".green().bold());
    println!("  {}", summary.headline().bold());
    for axis in &summary.axes {
        println!("  {:<4} {} {:>5.1}%", axis.axis.label(), axis.winner.as_char(), axis.percent);
    }
    println!(
        "  Decided {}/{} dimensions ({:.0}%) after {} answers",
        progress.converged,
        progress.total_dimensions,
        progress.percent(),
        progress.answered
    );
    println!();
    println!("{}", "Recommended departments".green().bold());
    for (rank, rec) in summary.recommendations.iter().enumerate() {
        println!("  {}. {} ({}% match)", rank + 1, rec.name, rec.match_percent);
    }
    Ok(())
}
