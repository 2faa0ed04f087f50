use anyhow::{Context, Result};
use clap::Parser;
use learn_game::agent::QLearningAgent;
use learn_game::config::AgentConfig;
use learn_game::frontend::TerminalFrontend;
use learn_game::{Game, Session};
use log::info;
use std::io;
use std::path::PathBuf;

/// Play tic-tac-toe as X against a Q-learning agent that learns as you play.
#[derive(Parser)]
#[command(name = "game", about = "Play tic-tac-toe against a learning agent")]
struct Cli {
    /// Path to a JSON file with agent settings
    #[arg(long, default_value = "agent.json")]
    config: PathBuf,

    /// Your name, used in prompts
    #[arg(long, default_value = "Player")]
    name: String,

    /// Override the learning rate
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Override the discount factor
    #[arg(long)]
    discount_factor: Option<f64>,

    /// Override the exploration rate
    #[arg(long)]
    epsilon: Option<f64>,

    /// Seed the agent's random source for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = AgentConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(learning_rate) = cli.learning_rate {
        config.learning_rate = learning_rate;
    }
    if let Some(discount_factor) = cli.discount_factor {
        config.discount_factor = discount_factor;
    }
    if let Some(epsilon) = cli.epsilon {
        config.epsilon = epsilon;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate().context("invalid agent settings")?;
    info!("agent settings: {:?}", config);

    let game = Game::new(QLearningAgent::from_config(&config));
    let frontend = TerminalFrontend::new(io::stdin().lock(), io::stdout(), cli.name);
    let mut session = Session::new(game, frontend);
    let score = session.run().context("session aborted")?;
    println!("{}", score);
    Ok(())
}
