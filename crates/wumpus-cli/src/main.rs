//! Wumpus CLI.
//!
//! - `wumpus play` - generate a cave from a seed and let the hybrid agent play it
//! - `wumpus infer` - load facts and rules from JSON and query a probability

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use wumpus_agent::{run_episode, AgentConfig, DecisionLog, EpisodeSummary, HybridAgent};
use wumpus_logic::{Assessment, Expr, InferenceConfig, InferenceEngine, KnowledgeBase};
use wumpus_sim::{Cave, CaveLayout, GenerationParams, Score, SplitMix64};

#[derive(Parser)]
#[command(name = "wumpus")]
#[command(about = "Hybrid knowledge-based wumpus agent", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a cave and run one episode
    Play {
        /// Seed for cave generation
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Side length of the cave
        #[arg(long, default_value_t = 4)]
        size: i32,

        /// Chance of a pit in each cell
        #[arg(long, default_value_t = 0.2)]
        pit_probability: f64,

        /// Number of wumpi
        #[arg(long, default_value_t = 1)]
        wumpus_count: usize,

        /// Turn budget for the episode
        #[arg(long, default_value_t = 500)]
        max_turns: u64,

        /// Agent config (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Query a probability from facts and rules
    Infer {
        /// JSON array of facts
        #[arg(long)]
        facts: PathBuf,

        /// JSON array of rules
        #[arg(long)]
        rules: PathBuf,

        /// Query expression as JSON
        #[arg(long)]
        query: String,

        /// Largest number of unknown atoms to enumerate
        #[arg(long, default_value_t = 20)]
        max_unknowns: usize,
    },
}

#[derive(Serialize)]
struct PlayReport {
    seed: u64,
    summary: EpisodeSummary,
    score: Score,
    inference_calls: u64,
    decisions: DecisionLog,
}

#[derive(Serialize)]
struct InferReport {
    query: String,
    probability: f64,
    assessment: Assessment,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Play {
            seed,
            size,
            pit_probability,
            wumpus_count,
            max_turns,
            config,
        } => {
            let params = GenerationParams {
                size,
                pit_probability,
                wumpus_count,
            };
            play(seed, &params, max_turns, config.as_deref(), cli.json)
        }
        Commands::Infer {
            facts,
            rules,
            query,
            max_unknowns,
        } => infer(&facts, &rules, &query, max_unknowns, cli.json),
    }
}

fn play(
    seed: u64,
    params: &GenerationParams,
    max_turns: u64,
    config: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = AgentConfig::load_or_default(config)?;
    let layout = CaveLayout::generate(params, &mut SplitMix64::new(seed))
        .with_context(|| format!("Failed to generate cave for seed {seed}"))?;

    let mut cave = Cave::new(layout);
    let mut agent = HybridAgent::new(&cave, config);
    let summary = run_episode(&mut agent, &mut cave, max_turns);

    let report = PlayReport {
        seed,
        summary,
        score: cave.score(),
        inference_calls: agent.inference_calls(),
        decisions: agent.decisions().clone(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Seed:            {}", report.seed);
    println!("Outcome:         {:?}", report.summary.outcome);
    println!("Turns:           {}", report.summary.turns);
    println!("Stalls:          {}", report.summary.stalls);
    println!("Score:           {}", report.score.points);
    println!("Inference calls: {}", report.inference_calls);
    println!();
    for decision in report.decisions.iter() {
        println!("  #{:<4} {} {:?}", decision.turn, decision.at, decision.kind);
    }
    Ok(())
}

fn load_json(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn infer(facts: &Path, rules: &Path, query: &str, max_unknowns: usize, json: bool) -> Result<()> {
    let mut kb = KnowledgeBase::new();
    let fact_report = kb
        .extend_facts_json(&load_json(facts)?)
        .with_context(|| format!("Failed to load facts from {}", facts.display()))?;
    let rule_report = kb
        .extend_rules_json(&load_json(rules)?)
        .with_context(|| format!("Failed to load rules from {}", rules.display()))?;
    tracing::info!(facts = ?fact_report, rules = ?rule_report, "knowledge base loaded");

    let query: Expr = serde_json::from_str(query).context("Failed to parse query expression")?;
    let engine = InferenceEngine::new(&kb).with_config(InferenceConfig {
        max_unknowns,
        ..InferenceConfig::default()
    });
    let assessment = engine.assess(&query);

    let report = InferReport {
        query: query.to_string(),
        probability: assessment.probability(),
        assessment,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("P({}) = {:.6}", report.query, report.probability);
        println!("{:?}", report.assessment);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_play_defaults() {
        let cli = Cli::try_parse_from(["wumpus", "play", "--seed", "7"]).unwrap();
        match cli.command {
            Commands::Play {
                seed,
                size,
                wumpus_count,
                config,
                ..
            } => {
                assert_eq!(seed, 7);
                assert_eq!(size, 4);
                assert_eq!(wumpus_count, 1);
                assert!(config.is_none());
            }
            Commands::Infer { .. } => panic!("expected play"),
        }
    }

    #[test]
    fn infer_requires_inputs() {
        assert!(Cli::try_parse_from(["wumpus", "infer", "--query", "{}"]).is_err());
    }
}
