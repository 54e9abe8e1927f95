use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use coscientist_cli::{render, session, wiring};
use coscientist_engine::{EvolutionPolicy, ResearchOverview};
use coscientist_model::{ResearchGoal, SessionArchive};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coscientist")]
#[command(about = "Evolves research hypotheses with LLM collaborators", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings and errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run hypothesis evolution cycles against a session archive
    Run(RunArgs),
    /// Print the overview of an existing session
    Overview(OverviewArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Session archive file; created on the first run
    #[arg(long, default_value = "session.json")]
    session: PathBuf,

    /// Research goal for a new session
    #[arg(long)]
    goal: Option<String>,

    /// Constraint generated hypotheses must respect, as name=value; repeatable
    #[arg(long = "constraint", value_name = "NAME=VALUE")]
    constraints: Vec<String>,

    /// Number of cycles to run
    #[arg(long, default_value_t = 1)]
    cycles: u32,

    /// Hypotheses produced per generation stage
    #[arg(long)]
    num_hypotheses: Option<usize>,

    /// Parents recombined by the evolution stage
    #[arg(long)]
    top_k: Option<usize>,

    /// Elo K-factor for tournament updates
    #[arg(long)]
    k_factor: Option<f64>,

    /// Sampling temperature for generation and evolution
    #[arg(long)]
    generation_temperature: Option<f64>,

    /// Sampling temperature for reviews and the meta-review
    #[arg(long)]
    reflection_temperature: Option<f64>,

    /// Model id used through OpenRouter
    #[arg(long)]
    model: Option<String>,

    /// Retire parent hypotheses once their offspring are committed
    #[arg(long)]
    retire_parents: bool,

    /// Replay the scripted demo providers instead of calling OpenRouter
    #[arg(long)]
    offline: bool,

    /// Hypotheses shown in the closing overview
    #[arg(long, default_value_t = 5)]
    top: usize,
}

#[derive(Args)]
struct OverviewArgs {
    /// Session archive file
    #[arg(long, default_value = "session.json")]
    session: PathBuf,

    /// Hypotheses shown
    #[arg(long, default_value_t = 5)]
    top: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Overview(args) => overview(args).await,
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let archive = SessionArchive::new(&args.session);
    let goal = args.goal.as_deref().map(ResearchGoal::new);
    let mut state = session::load_or_create(&archive, goal).await?;
    apply_tunables(&mut state.goal, &args)?;

    let engine = if args.offline {
        wiring::offline_engine(&state.goal, args.cycles)
    } else {
        wiring::openrouter_engine(&state.goal)
            .context("OpenRouter setup failed; set OPENROUTER_API_KEY or pass --offline")?
    }
    .with_evolution_policy(EvolutionPolicy {
        retire_parents: args.retire_parents,
    });

    for _ in 0..args.cycles {
        let report = engine.run_cycle(&state.goal, &mut state.store).await?;
        print!("{}", render::cycle_summary(&report));
        archive
            .save(&state)
            .await
            .with_context(|| format!("save session {}", archive.path().display()))?;
    }

    print!(
        "{}",
        render::overview_text(&ResearchOverview::of(&state.store, args.top))
    );
    Ok(())
}

/// Flags override the stored goal for this run and persist with the next save.
fn apply_tunables(goal: &mut ResearchGoal, args: &RunArgs) -> Result<()> {
    if !args.constraints.is_empty() {
        goal.constraints.clear();
        for raw in &args.constraints {
            let (name, value) = raw
                .split_once('=')
                .with_context(|| format!("constraint {raw:?} is not in name=value form"))?;
            goal.constraints
                .insert(name.trim().to_string(), value.trim().to_string());
        }
    }
    if let Some(count) = args.num_hypotheses {
        goal.num_hypotheses = count;
    }
    if let Some(count) = args.top_k {
        goal.top_k_hypotheses = count;
    }
    if let Some(k_factor) = args.k_factor {
        goal.elo_k_factor = k_factor;
    }
    if let Some(temperature) = args.generation_temperature {
        goal.generation_temperature = temperature;
    }
    if let Some(temperature) = args.reflection_temperature {
        goal.reflection_temperature = temperature;
    }
    if let Some(model) = &args.model {
        goal.llm_model = model.clone();
    }
    Ok(())
}

async fn overview(args: OverviewArgs) -> Result<()> {
    let archive = SessionArchive::new(&args.session);
    let state = archive
        .load()
        .await
        .with_context(|| format!("no session at {}", archive.path().display()))?;
    print!(
        "{}",
        render::overview_text(&ResearchOverview::of(&state.store, args.top))
    );
    Ok(())
}
