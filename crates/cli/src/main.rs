//! Kaiwa CLI: offline evaluation of conversation catalogs and mora
//! recordings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use kaiwa_core::matching::catalog::{load_catalog, ResponseCache, ResponseSelection};
use kaiwa_core::matching::config::{FuzzyMatcherConfig, MatcherProfile};
use kaiwa_core::matching::similarity::{calculate_similarity, calculate_similarity_with_keywords};
use kaiwa_core::pronunciation::{
    analyze, detect, detect_monotone, detect_rushed_speech, generate_practice_exercises,
    get_suggestions,
};
use kaiwa_core::types::{load_morae, AudioFeatures};

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "kaiwa",
    about = "Conversation matching and Japanese pronunciation scoring",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show verbose output
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Match an utterance against a response catalog
    Match(MatchArgs),
    /// Score the similarity of two strings
    Similarity(SimilarityArgs),
    /// Flag problematic sounds in a mora recording
    Detect(DetectArgs),
    /// Evaluate speed and rhythm of a mora recording
    Rhythm(RhythmArgs),
}

#[derive(Parser, Debug)]
struct MatchArgs {
    /// Learner utterance
    input: String,

    /// JSON catalog of patterns, keywords and responses
    #[arg(long)]
    catalog: PathBuf,

    /// Matcher profile
    #[arg(long, default_value = "default", value_parser = ["default", "strict", "lenient"])]
    profile: String,

    /// Custom matcher config (JSON); overrides --profile
    #[arg(long)]
    config: Option<PathBuf>,

    /// Response variant selection
    #[arg(long, default_value = "random", value_parser = ["random", "least-used"])]
    selection: String,

    /// RNG seed for reproducible response selection
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct SimilarityArgs {
    a: String,
    b: String,

    /// Comma-separated keywords to boost
    #[arg(long, value_delimiter = ',')]
    keywords: Vec<String>,
}

#[derive(Parser, Debug)]
struct DetectArgs {
    /// JSON array of morae
    #[arg(long)]
    morae: PathBuf,

    /// Target sentence
    #[arg(long, default_value = "")]
    text: String,

    /// Recording length in ms (0 = unknown)
    #[arg(long, default_value_t = 0.0)]
    duration_ms: f64,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RhythmArgs {
    /// JSON array of the learner's morae
    #[arg(long)]
    morae: PathBuf,

    /// JSON array of a native speaker's morae for the same text
    #[arg(long)]
    native: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Match(args) => run_match(args),
        Command::Similarity(args) => run_similarity(args),
        Command::Detect(args) => run_detect(args),
        Command::Rhythm(args) => run_rhythm(args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Runners ─────────────────────────────────────────────────────

fn matcher_config(args: &MatchArgs) -> Result<FuzzyMatcherConfig> {
    if let Some(path) = &args.config {
        return FuzzyMatcherConfig::load(path);
    }
    let profile: MatcherProfile = args.profile.parse()?;
    Ok(profile.config())
}

fn run_match(args: MatchArgs) -> Result<()> {
    let config = matcher_config(&args)?;
    let selection: ResponseSelection = args.selection.parse()?;

    let entries = load_catalog(&args.catalog)?;
    let mut cache = ResponseCache::new(entries, config)
        .with_context(|| format!("Invalid catalog: {}", args.catalog.display()))?
        .with_selection(selection);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match cache.lookup(&args.input, &mut rng) {
        Some(hit) => {
            println!("Pattern: {} [{}]", hit.pattern, hit.category);
            println!("Score: {:.3} ({:?})", hit.score, hit.confidence);
            println!("Response: {}", hit.response);
        }
        None => println!("No match"),
    }
    Ok(())
}

fn run_similarity(args: SimilarityArgs) -> Result<()> {
    let score = if args.keywords.is_empty() {
        calculate_similarity(&args.a, &args.b)
    } else {
        calculate_similarity_with_keywords(&args.a, &args.b, &args.keywords)
    };
    println!("{:.4}", score);
    Ok(())
}

fn run_detect(args: DetectArgs) -> Result<()> {
    let morae = load_morae(&args.morae)?;
    let features = AudioFeatures {
        sample_rate: 0,
        duration_ms: args.duration_ms,
    };
    let findings = detect(&morae, &args.text, &features);
    let exercises = generate_practice_exercises(&findings);

    if args.json {
        let out = serde_json::json!({
            "findings": findings,
            "exercises": exercises,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if findings.is_empty() {
        println!("No problems found in {} morae", morae.len());
        return Ok(());
    }
    for f in &findings {
        println!(
            "[{}] #{} {} ({}): {}",
            f.severity, f.position, f.mora, f.sound_type, f.suggestion
        );
        println!("    e.g. {}", f.native_example);
    }
    println!();
    for ex in &exercises {
        println!("Exercise: {}: {}", ex.title, ex.description);
        println!("    words: {}", ex.example_words.join("、"));
    }
    Ok(())
}

fn run_rhythm(args: RhythmArgs) -> Result<()> {
    let morae = load_morae(&args.morae)?;
    let native = args.native.as_deref().map(load_morae).transpose()?;

    let analysis = analyze(&morae, native.as_deref());
    let suggestions = get_suggestions(&analysis);
    let monotone = detect_monotone(&morae);
    let rushed = detect_rushed_speech(&morae);

    if args.json {
        let out = serde_json::json!({
            "analysis": analysis,
            "monotone": monotone,
            "rushed": rushed,
            "suggestions": suggestions,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Morae: {} over {:.0}ms", analysis.mora_durations.len(), analysis.total_duration);
    println!("Average mora: {:.1}ms ({:?})", analysis.average_mora_duration, analysis.speed_rating);
    println!("Rhythm score: {:.1}", analysis.rhythm_score);
    println!("Pauses: {}", analysis.pause_locations.len());
    println!("Naturalness: {:.1}", analysis.naturalness);
    if let Some(c) = &analysis.comparison {
        println!(
            "Native: speed ratio {:.2}, rhythm {:.1}, pitch {:.1}",
            c.speed_ratio, c.rhythm_similarity, c.pitch_similarity
        );
    }
    if monotone {
        println!("Pitch is monotone");
    }
    if rushed {
        println!("Speech is rushed");
    }
    for s in &suggestions {
        println!("- {}", s);
    }
    Ok(())
}
