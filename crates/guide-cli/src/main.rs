//! guide: ask the local events guide one question from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDateTime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use guide_core::GuideConfig;
use guide_runtime::{load_records, seed_store, Guide};
use guide_store::RecordStore;

const USAGE: &str = "Usage: guide <dataset.json> \"<question>\" [--now YYYY-MM-DDTHH:MM:SS] [--limit N] [--config FILE] [--explain]";

#[derive(Debug, PartialEq)]
struct Args {
    dataset: PathBuf,
    utterance: String,
    now: Option<NaiveDateTime>,
    limit: Option<usize>,
    config: Option<PathBuf>,
    explain: bool,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut positional = Vec::new();
    let mut now = None;
    let mut limit = None;
    let mut config = None;
    let mut explain = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--now" => {
                let value = iter.next().ok_or_else(|| anyhow!("--now needs a value"))?;
                let parsed = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                    .with_context(|| format!("invalid --now '{value}'"))?;
                now = Some(parsed);
            }
            "--limit" => {
                let value = iter.next().ok_or_else(|| anyhow!("--limit needs a value"))?;
                let parsed: usize = value
                    .parse()
                    .with_context(|| format!("invalid --limit '{value}'"))?;
                limit = Some(parsed);
            }
            "--config" => {
                let value = iter.next().ok_or_else(|| anyhow!("--config needs a value"))?;
                config = Some(PathBuf::from(value));
            }
            "--explain" => explain = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {flag}"),
            _ => positional.push(arg.clone()),
        }
    }

    let [dataset, utterance] = <[String; 2]>::try_from(positional)
        .map_err(|_| anyhow!("expected a dataset path and a question"))?;
    Ok(Args {
        dataset: PathBuf::from(dataset),
        utterance,
        now,
        limit,
        config,
        explain,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.is_empty() || raw.iter().any(|a| a == "--help" || a == "-h") {
        println!("guide: answer questions about local events, concerts and deals");
        println!();
        println!("{USAGE}");
        return Ok(());
    }
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let config = match &args.config {
        Some(path) => GuideConfig::load(path)?,
        None => GuideConfig::default(),
    }
    .apply_env()?;

    let store = Arc::new(RecordStore::new());
    let records = load_records(&args.dataset)
        .with_context(|| format!("loading dataset {}", args.dataset.display()))?;
    let report = seed_store(&store, records);
    info!(
        "Store ready: {} records ({} rejected)",
        store.len(),
        report.rejected
    );

    let now = args
        .now
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    let guide = Guide::new(store, config);
    let limit = args.limit.unwrap_or(guide.config().default_limit);
    if args.explain {
        let explanation = guide.explain(&args.utterance, now, limit)?;
        println!("{}", serde_json::to_string_pretty(&explanation)?);
    } else {
        let answer = guide.answer_with_limit(&args.utterance, now, limit)?;
        println!("{}", serde_json::to_string_pretty(&answer)?);
    }
    Ok(())
}
