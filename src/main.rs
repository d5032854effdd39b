mod core;
mod input;
mod playback;
mod ui;

use crate::core::{Algorithm, AlgorithmFamily, AlgorithmInput, InputError};
use crate::input::{random_input, save_batch, FileStepSource, HttpStepSource, StepSource};
use crate::ui::{AppSettings, Outcome, Session, ShortcutAction};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Step through sorting, tree, recursion and graph algorithms in the terminal
#[derive(Parser, Debug)]
#[command(name = "algoviz")]
#[command(version)]
struct Args {
    /// bubble, selection, insertion, merge, quick, inorder, preorder,
    /// postorder, factorial, fibonacci, tower, reverse, bfs or dfs
    algorithm: Algorithm,

    /// Values to sort, e.g. 64,34,25,12
    #[arg(long)]
    data: Option<String>,

    /// Level-order tree values, e.g. 1,2,3,null,5
    #[arg(long)]
    tree: Option<String>,

    /// n for factorial, fibonacci and tower
    #[arg(long)]
    n: Option<u32>,

    /// String to reverse
    #[arg(long)]
    text: Option<String>,

    /// Graph edges, e.g. 0-1,0-2,1-3
    #[arg(long)]
    edges: Option<String>,

    /// Number of graph nodes
    #[arg(long, default_value_t = 4)]
    nodes: usize,

    /// Traversal start node
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Generate a random input instead
    #[arg(long)]
    random: bool,

    /// Step service base URL
    #[arg(long, env = "ALGOVIZ_URL")]
    url: Option<String>,

    /// Playback speed, 1 (slow) to 10 (fast)
    #[arg(long, env = "ALGOVIZ_SPEED", allow_negative_numbers = true)]
    speed: Option<i32>,

    /// Replay a saved step file instead of asking the service
    #[arg(long)]
    steps_file: Option<PathBuf>,

    /// Save the fetched steps to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Wait for Space instead of playing immediately
    #[arg(long)]
    no_autoplay: bool,

    /// Hide the pseudocode panel
    #[arg(long)]
    no_pseudocode: bool,
}

/// Input from the command line, falling back to the service defaults
fn build_input(args: &Args) -> Result<AlgorithmInput, InputError> {
    let algorithm = args.algorithm;
    if args.random {
        return Ok(random_input(algorithm, &mut rand::thread_rng()));
    }

    let input = match algorithm.family() {
        AlgorithmFamily::Sorting => args.data.as_deref().map(AlgorithmInput::parse_array).transpose()?,
        AlgorithmFamily::Tree => args.tree.as_deref().map(AlgorithmInput::parse_tree).transpose()?,
        AlgorithmFamily::Recursion if algorithm == Algorithm::Reverse => {
            args.text.clone().map(AlgorithmInput::Text)
        }
        AlgorithmFamily::Recursion => args.n.map(AlgorithmInput::Number),
        AlgorithmFamily::Graph => args
            .edges
            .as_deref()
            .map(|edges| AlgorithmInput::parse_graph(edges, args.nodes, args.start))
            .transpose()?,
    };

    let input = input.unwrap_or_else(|| AlgorithmInput::default_for(algorithm));
    input.validate(algorithm)?;
    Ok(input)
}

fn print_complexity(session: &Session, algorithm: Algorithm) {
    let reported = session.batch().map(|batch| &batch.complexity);
    let rows: Vec<(String, String)> = match reported.filter(|c| !c.is_empty()) {
        Some(complexity) => complexity.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        None => algorithm
            .complexity()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    };

    println!("{} complexity:", algorithm.display_name());
    for (key, value) in rows {
        println!("  {:<10} {}", key.replace('_', " "), value);
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = AppSettings::load();
    let algorithm = args.algorithm;
    let speed = args.speed.unwrap_or(settings.speed as i32);

    let input = build_input(&args).context("Invalid input")?;

    let source: Box<dyn StepSource> = match &args.steps_file {
        Some(path) => Box::new(FileStepSource::new(path)),
        None => {
            let url = args.url.as_deref().unwrap_or(&settings.service_url);
            Box::new(HttpStepSource::new(url).context("Failed to create step service client")?)
        }
    };

    let mut session = Session::new(Handle::current(), algorithm, speed);
    session.visualizer_mut().set_show_pseudocode(!args.no_pseudocode);

    let total = session
        .load(source.as_ref(), algorithm, &input)
        .await
        .with_context(|| format!("Failed to load steps from {}", source.name()))?;
    info!(%algorithm, steps = total, "Steps ready");

    if let (Some(path), Some(batch)) = (&args.save, session.batch()) {
        save_batch(path, batch)?;
    }

    print_complexity(&session, algorithm);
    println!("Type ? and Enter for keyboard shortcuts\n");

    if total > 0 && settings.autoplay && !args.no_autoplay {
        session.apply(ShortcutAction::PlayPause);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            frame = session.next_frame() => {
                let Some(frame) = frame else { break };
                print!("{}", session.render(frame.as_ref()));
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read from stdin")? {
                    Some(line) => match session.handle_line(&line) {
                        Outcome::Continue => {}
                        Outcome::Message(text) => println!("{text}"),
                        Outcome::Quit => break,
                    },
                    // no more commands; finish the current run, if any
                    None => stdin_open = false,
                }
            }
        }

        if !stdin_open && session.run_finished() {
            for frame in session.drain_frames() {
                print!("{}", session.render(frame.as_ref()));
            }
            break;
        }
    }

    info!("Session finished");
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging on stderr so it stays out of the display
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "algoviz=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Create tokio runtime for the engine timers and the step service client
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(run(args))
}
