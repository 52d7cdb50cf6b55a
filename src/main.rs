//! claim-features command line
//!
//! Reads pre-annotated claims (one JSON object per line: words or tokens,
//! POS tags, optional bracketed parse) and writes one phrase map per line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use claim_features::pipeline::{
    AnnotatedClaim, AnnotationStore, ExtractorSpec, NoopObserver, Pipeline, ValidationEngine,
};
use claim_features::{ExtractorConfig, Strategy};

#[derive(Debug, Parser)]
#[command(
    name = "claim-features",
    version,
    about = "Extract marker-anchored technical features from Chinese patent claims"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract phrases from a JSONL file of annotated claims.
    Extract {
        /// Input JSONL (defaults to stdin)
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output JSONL (defaults to stdout)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// flat or tree (unknown names fall back to tree with a warning); overrides the config file
        #[arg(long)]
        strategy: Option<Strategy>,

        /// Extractor config (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Check an extractor config and print its diagnostics.
    Validate {
        #[arg(value_name = "FILE")]
        config: PathBuf,
    },

    /// Run both strategies on a built-in example claim.
    Demo,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            input,
            output,
            strategy,
            config,
        } => extract(input.as_deref(), output.as_deref(), strategy, config.as_deref()),
        Command::Validate { config } => validate(&config),
        Command::Demo => demo(),
    }
}

// ================================
// Config
// ================================

fn read_spec(path: &Path) -> Result<ExtractorSpec> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    ExtractorSpec::from_json(&json).with_context(|| format!("parsing config {}", path.display()))
}

fn load_spec(path: Option<&Path>) -> Result<ExtractorSpec> {
    let Some(path) = path else {
        return Ok(ExtractorSpec {
            v: 1,
            ..ExtractorSpec::default()
        });
    };

    let spec = read_spec(path)?;
    let report = ValidationEngine::with_defaults().validate(&spec);
    for w in report.warnings() {
        warn!("{w}");
    }
    report.into_result()?;
    Ok(spec)
}

fn validate(path: &Path) -> Result<()> {
    let spec = read_spec(path)?;
    let report = ValidationEngine::with_defaults().validate(&spec);
    println!("{}", serde_json::to_string_pretty(&report)?);
    if report.has_errors() {
        bail!("{} error(s) in {}", report.errors().count(), path.display());
    }
    info!(warnings = report.warnings().count(), "config is valid");
    Ok(())
}

// ================================
// Extract
// ================================

fn read_claims(input: Option<&Path>) -> Result<Vec<AnnotatedClaim>> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut claims = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let claim: AnnotatedClaim =
            serde_json::from_str(&line).with_context(|| format!("line {}", n + 1))?;
        claims.push(claim);
    }
    Ok(claims)
}

fn extract(
    input: Option<&Path>,
    output: Option<&Path>,
    strategy: Option<Strategy>,
    config: Option<&Path>,
) -> Result<()> {
    let spec = load_spec(config)?;
    let strategy = strategy.unwrap_or_else(|| spec.strategy());
    let cfg = spec.to_config();
    // Recorded tags are tied to the recorded tokens.
    if spec.combiner(&cfg).is_some() {
        warn!("supplementary dictionary is ignored for pre-annotated input");
    }

    let claims = read_claims(input)?;
    let store = AnnotationStore::from_claims(claims.iter().cloned())?;
    let texts: Vec<String> = claims.iter().map(AnnotatedClaim::claim_text).collect();
    info!(claims = texts.len(), strategy = strategy.as_str(), "extracting");

    let pipeline = Pipeline::new(&store, &store, &store);
    let results = pipeline.run_batch(&texts, strategy, &cfg)?;

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(writer);
    for (text, phrases) in texts.iter().zip(&results) {
        serde_json::to_writer(&mut out, &json!({ "text": text, "phrases": phrases }))?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    let total: usize = results.iter().map(|p| p.len()).sum();
    info!(phrases = total, "done");
    Ok(())
}

// ================================
// Demo
// ================================

const DEMO_WORDS: &[&str] = &[
    "一种", "薄膜晶体管", "，", "包括", "基底", "和", "位于", "所述", "基底", "上", "的", "栅极",
    "，", "所述", "栅极", "与", "所述", "基底", "绝缘", "。",
];

const DEMO_TAGS: &[&str] = &[
    "M", "NN", "PU", "VV", "NN", "CC", "VV", "DT", "NN", "LC", "DEG", "NN", "PU", "DT", "NN", "P",
    "DT", "NN", "VV", "PU",
];

const DEMO_TREE: &str = "(IP (NP (_ 一种) (_ 薄膜晶体管)) (_ ，) \
    (VP (_ 包括) (NP (NP (_ 基底)) (_ 和) \
    (NP (CP (IP (VP (_ 位于) (LCP (NP (_ 所述) (_ 基底)) (_ 上)))) (_ 的)) (NP (_ 栅极))))) \
    (_ ，) (IP (NP (_ 所述) (_ 栅极)) (VP (PP (_ 与) (NP (_ 所述) (_ 基底))) (VP (_ 绝缘)))) \
    (_ 。))";

fn demo() -> Result<()> {
    let claim = AnnotatedClaim::new(DEMO_WORDS, DEMO_TAGS).with_tree(DEMO_TREE);
    let text = claim.claim_text();
    let store = AnnotationStore::from_claims([claim])?;
    let pipeline = Pipeline::new(&store, &store, &store);
    let cfg = ExtractorConfig::default();

    println!("{text}");
    for strategy in [Strategy::Flat, Strategy::Tree] {
        let phrases = pipeline.run(&text, strategy, &cfg, &mut NoopObserver)?;
        println!("{:>4}: {}", strategy.as_str(), serde_json::to_string(&phrases)?);
    }
    Ok(())
}
