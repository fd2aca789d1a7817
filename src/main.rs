use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use hansard_profile::{
    assemble_sessions_concurrent, compute_analytics, execute_render, parse_roster_file,
    parse_sessions_file, resolve, unify, AnalyticsConfig, AssemblerConfig, AssemblyResult,
    DatasetMetadata, DateRange, Identifier, Metric, RenderConfig, RenderInput, SpeechAssembler,
};

#[derive(Parser)]
#[command(name = "hansard-profile")]
#[command(author, version, about = "Hansard speech assembly and roster reconciliation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble speech records, resolve speakers against a roster and write the dataset
    Process {
        /// Sessions file (JSON array of dated component lists)
        #[arg(short, long)]
        components: PathBuf,

        /// Roster file (JSON array of people)
        #[arg(short, long)]
        roster: PathBuf,

        /// Output file for the machine-readable dataset (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for the human-readable report (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// First plenary date to include (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// First plenary date to exclude (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Procedure line pattern accepted as an interjection (repeatable)
        #[arg(long = "procedure-marker")]
        procedure_markers: Vec<String>,

        /// Roster attribute to group analytics by (repeatable)
        #[arg(long = "identifier", value_enum)]
        identifiers: Vec<Identifier>,

        /// Metric to compare across groups (repeatable)
        #[arg(long = "metric", value_enum)]
        metrics: Vec<Metric>,

        /// Assemble sessions on parallel tasks
        #[arg(long)]
        concurrent: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Assemble speech records and report statistics without resolving
    Analyze {
        /// Sessions file (JSON array of dated component lists)
        #[arg(short, long)]
        components: PathBuf,

        /// First plenary date to include (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// First plenary date to exclude (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

struct ProcessArgs {
    components: PathBuf,
    roster: PathBuf,
    output: PathBuf,
    human_readable: Option<PathBuf>,
    range: DateRange,
    assembler_config: AssemblerConfig,
    analytics_config: AnalyticsConfig,
    concurrent: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            components,
            roster,
            output,
            human_readable,
            start_date,
            end_date,
            procedure_markers,
            identifiers,
            metrics,
            concurrent,
            verbose,
        } => {
            setup_logging(verbose);

            let mut assembler_config = AssemblerConfig::default();
            if !procedure_markers.is_empty() {
                assembler_config.procedural_markers = procedure_markers;
            }
            let mut analytics_config = AnalyticsConfig::default();
            if !identifiers.is_empty() {
                analytics_config.identifiers = identifiers;
            }
            if !metrics.is_empty() {
                analytics_config.metrics = metrics;
            }

            process(ProcessArgs {
                components,
                roster,
                output,
                human_readable,
                range: DateRange::new(start_date, end_date),
                assembler_config,
                analytics_config,
                concurrent,
            })
            .await
        }
        Commands::Analyze {
            components,
            start_date,
            end_date,
            verbose,
        } => {
            setup_logging(verbose);
            analyze(components, DateRange::new(start_date, end_date))
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn process(args: ProcessArgs) -> Result<()> {
    info!("Loading sessions from {:?}", args.components);
    let sessions = parse_sessions_file(&args.components, &args.range)
        .context("Failed to parse sessions file")?;
    info!("Loading roster from {:?}", args.roster);
    let roster = parse_roster_file(&args.roster).context("Failed to parse roster file")?;
    info!("Loaded {} sessions, {} people", sessions.len(), roster.len());

    let session_count = sessions.len();
    let assembler = SpeechAssembler::new(&args.assembler_config)?;

    info!("Stage 0: Assembling speech records...");
    let assembly = if args.concurrent {
        assemble_sessions_concurrent(Arc::new(assembler), sessions).await?
    } else {
        assembler.assemble_sessions(&sessions)
    };

    info!("Stage 1: Resolving speakers...");
    let resolution = resolve(&assembly.records, &roster);

    info!("Stage 2: Unifying records...");
    let unified = unify(&resolution.resolved, &assembly.records, &roster)
        .context("Resolver and assembler disagree on component ids")?;

    let analytics = compute_analytics(&unified, &roster, &args.analytics_config, None);

    info!("Stage 3: Rendering output...");
    let mut metadata = DatasetMetadata::new(args.range);
    metadata.sessions = session_count;
    metadata.speech_records = assembly.records.len();
    metadata.resolved = resolution.resolved.len();
    metadata.unresolved = resolution.unresolved.len();
    metadata.anomalies = assembly.anomalies.len();
    metadata.excluded = assembly.excluded;
    metadata.uncommitted = assembly.uncommitted.len();

    let render = execute_render(
        RenderInput {
            unified: &unified,
            unresolved: &resolution.unresolved,
            analytics: &analytics,
            metadata,
        },
        Some(args.output.as_path()),
        args.human_readable.as_deref(),
        &RenderConfig::default(),
    )?;

    info!("Output written to {:?}", render.machine_path);
    if let Some(human_path) = render.human_path {
        info!("Human-readable output written to {:?}", human_path);
    }

    let resolved_pct = if !assembly.records.is_empty() {
        resolution.resolved.len() as f64 / assembly.records.len() as f64 * 100.0
    } else {
        0.0
    };
    info!(
        "Complete: {} of {} speech records resolved ({:.1}%)",
        resolution.resolved.len(),
        assembly.records.len(),
        resolved_pct
    );

    Ok(())
}

fn analyze(components: PathBuf, range: DateRange) -> Result<()> {
    info!("Analyzing sessions from {:?}", components);
    let sessions =
        parse_sessions_file(&components, &range).context("Failed to parse sessions file")?;
    let assembler = SpeechAssembler::new(&AssemblerConfig::default())?;
    let assembly = assembler.assemble_sessions(&sessions);

    println!("Session Analysis");
    println!("================");
    println!("Sessions: {}", sessions.len());
    println!(
        "Components: {}",
        sessions.iter().map(|s| s.components.len()).sum::<usize>()
    );
    println!("Speech records: {}", assembly.records.len());
    println!("Questions: {}", assembly.questions.len());
    println!("Excluded speakers: {}", assembly.excluded);
    println!();

    println!("Anomalies");
    println!("---------");
    println!("Discarded components: {}", assembly.anomalies.len());
    println!(
        "Uncommitted trailing speakers: {}",
        assembly.uncommitted.len()
    );
    for (header_id, record) in &assembly.uncommitted {
        println!("  {} {}", header_id, record.speaker_label);
    }
    println!();

    print_speaker_statistics(&assembly);
    Ok(())
}

fn print_speaker_statistics(assembly: &AssemblyResult) {
    println!("Speaker Statistics");
    println!("------------------");

    let mut speakers: std::collections::BTreeMap<&str, (usize, usize, usize)> =
        std::collections::BTreeMap::new();
    for record in assembly.records.values() {
        let entry = speakers.entry(record.speaker_label.as_str()).or_default();
        entry.0 += 1;
        entry.1 += record
            .text
            .as_deref()
            .map(|t| t.split_whitespace().count())
            .unwrap_or(0);
        if record.interjection.is_some() {
            entry.2 += 1;
        }
    }

    for (speaker, (speeches, words, interjections)) in speakers {
        println!(
            "{}: {} speeches, {} words, {} interjections",
            speaker, speeches, words, interjections
        );
    }
}
