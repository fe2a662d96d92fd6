use std::env;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use kbrag_core::config::{Config, Settings};
use kbrag_store::{answer_with_citations, answer_with_tools, KbTools, RagStore};

const USAGE: &str = "Usage:\n  kbrag index\n  kbrag ask 'your question'\n  kbrag ask_llm 'your question'";

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn index(settings: &Settings) -> anyhow::Result<()> {
    let store = RagStore::open(settings, None)?;
    let kb_root = settings.kb_root_path();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Indexing {}", kb_root.display()));
    pb.enable_steady_tick(Duration::from_millis(120));
    let result = store.index_folder(&kb_root);
    pb.finish_and_clear();

    println!("Indexed chunks: {}", result?);
    debug!("collection '{}' now holds {} entries", store.collection(), store.count()?);
    Ok(())
}

fn ask(settings: &Settings, question: &str) -> anyhow::Result<()> {
    let store = RagStore::open(settings, None)?;
    let out = answer_with_citations(&store, question, settings.top_k)?;
    println!("{}", out.answer);
    Ok(())
}

fn ask_llm(settings: &Settings, question: &str) -> anyhow::Result<()> {
    let store = RagStore::open(settings, None)?;
    let tools = KbTools::new(store, settings.kb_root_path()).with_default_k(settings.top_k);
    let out = answer_with_tools(None, &tools, question, settings.top_k);
    println!("{}", out.answer());
    println!("\nCITATIONS:");
    for c in &out.citations {
        println!("- {} ({})", c.id, c.source.as_deref().unwrap_or("-"));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(cmd) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    init_logging();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    let question = args[1..].join(" ").trim().to_string();

    match cmd.as_str() {
        "index" => index(&settings),
        "ask" => ask(&settings, &question),
        "ask_llm" => ask_llm(&settings, &question),
        _ => {
            println!("Unknown command");
            Ok(())
        }
    }
}
