//! # VedaRx CLI
//!
//! Thin shell over the VedaRx core: loads the knowledge base once at
//! startup, then exposes the two core interfaces — rank and generate —
//! as subcommands.
//!
//! Usage:
//!   vedarx stats
//!   vedarx search --constitution Pitta --diagnosis Hyperacidity --symptoms acidity,burning
//!   vedarx prescribe --name Asha --age 34 --gender female \
//!       --constitution Pitta --diagnosis Hyperacidity --symptoms acidity --mode full

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vedarx_core::VedarxConfig;
use vedarx_core::types::{GenerationMode, PatientProfile, Prescription};
use vedarx_gen::Orchestrator;
use vedarx_kb::CaseStore;
use vedarx_providers::GenerateParams;
use vedarx_rank::Ranker;

#[derive(Parser)]
#[command(
    name = "vedarx",
    version,
    about = "VedaRx — retrieval-augmented Ayurvedic prescription engine"
)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, default_value = "vedarx.toml")]
    config: PathBuf,

    /// Override the dataset path from config
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print knowledge base statistics
    Stats,

    /// Rank cases against a patient profile without generating
    Search {
        #[command(flatten)]
        patient: PatientArgs,

        /// Maximum matches to return (defaults to [ranking].top_k)
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Rank cases, then generate a structured prescription
    Prescribe {
        #[command(flatten)]
        patient: PatientArgs,

        /// Which sections to request: full, medication, or diet
        #[arg(long, default_value = "full", value_parser = parse_mode)]
        mode: GenerationMode,

        /// Print the structured result as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct PatientArgs {
    #[arg(long, default_value = "Anonymous")]
    name: String,

    #[arg(long, default_value_t = 0)]
    age: u32,

    #[arg(long, default_value = "unspecified")]
    gender: String,

    /// Constitution (dosha) tag, e.g. Pitta
    #[arg(long)]
    constitution: String,

    #[arg(long, default_value = "")]
    diagnosis: String,

    /// Comma-separated symptom phrases
    #[arg(long, value_delimiter = ',')]
    symptoms: Vec<String>,
}

impl From<PatientArgs> for PatientProfile {
    fn from(args: PatientArgs) -> Self {
        Self {
            name: args.name,
            age: args.age,
            gender: args.gender,
            constitution: args.constitution,
            diagnosis: args.diagnosis,
            symptoms: args.symptoms,
        }
    }
}

fn parse_mode(s: &str) -> Result<GenerationMode, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "vedarx=debug,vedarx_kb=debug,vedarx_rank=debug,vedarx_gen=debug,vedarx_providers=debug"
    } else {
        "vedarx=info,vedarx_kb=info,vedarx_gen=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = VedarxConfig::load(&cli.config)?;
    if let Some(dataset) = cli.dataset {
        config.knowledge.dataset = dataset.display().to_string();
    }

    // A DataLoadError here is fatal: the process must not serve requests
    // with a sub-minimum knowledge base. Skipped rows only warn.
    let store = Arc::new(
        CaseStore::load(Path::new(&config.knowledge.dataset))
            .context("failed to load knowledge base")?,
    );

    match cli.command {
        Command::Stats => {
            println!("{}", serde_json::to_string_pretty(&store.stats())?);
        }

        Command::Search { patient, top_k } => {
            let ranker = Ranker::new(config.ranking.clone());
            let top_k = top_k.unwrap_or(config.ranking.top_k);
            let profile: PatientProfile = patient.into();
            let matches = ranker.rank(store.records(), &profile, top_k);
            println!("{}", serde_json::to_string_pretty(&matches)?);
        }

        Command::Prescribe {
            patient,
            mode,
            json,
        } => {
            let ranker = Ranker::new(config.ranking.clone());
            let profile: PatientProfile = patient.into();
            let matches = ranker.rank(store.records(), &profile, config.ranking.top_k);
            if matches.iter().all(|m| m.score == 0) {
                tracing::warn!("no case scored above zero; worked examples will be weak");
            }

            let provider = vedarx_providers::create_provider(&config.llm)?;
            let orchestrator =
                Orchestrator::new(provider, GenerateParams::from(&config.llm), &config.prompt);
            let prescription = orchestrator
                .generate(&profile, &matches, mode)
                .await
                .context("generation failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&prescription)?);
            } else {
                print_display(&profile, &prescription);
            }
        }
    }

    Ok(())
}

fn print_display(profile: &PatientProfile, prescription: &Prescription) {
    let rule = "\u{2550}".repeat(72);
    println!("{rule}");
    println!("  AYURVEDIC PRESCRIPTION");
    println!("{rule}");
    println!(
        "Patient: {} | Age: {} | Gender: {}",
        profile.name, profile.age, profile.gender
    );
    println!("Constitution: {}", profile.constitution);
    println!("Diagnosis: {}", profile.diagnosis);
    println!("Symptoms: {}", profile.symptoms.join(", "));
    println!("{rule}");
    println!("{}", prescription.raw.trim());
    println!("{rule}");
    println!("Consult an Ayurvedic physician if symptoms persist.");
}
