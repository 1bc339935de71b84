//! carousel-inspect - run the carousel engine over an HTML page
//!
//! Loads the page, initializes every carousel against the headless slider at
//! the requested viewport and prints the registry as JSON.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use carousel_dom::{DomTree, ElementTree, NodeId, SimpleSelector};
use carousel_engine::{
    logging, Engine, EngineConfig, EventReport, HeadlessEngine, InstanceEntry, Journal, PageEvent,
    Viewport,
};
use clap::Parser;
use serde_json::{json, Value};

/// Command-line interface for `carousel-inspect`
#[derive(Parser, Debug)]
#[command(
    name = "carousel-inspect",
    about = "Show the carousels an HTML page declares and how they compile",
    version
)]
struct Cli {
    /// HTML page to inspect
    #[arg(value_name = "PAGE")]
    page: PathBuf,

    /// Viewport width in CSS pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in CSS pixels
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Engine configuration (JSON)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Page URL; `?se-debug=true` turns on debug logging
    #[arg(long)]
    url: Option<String>,

    /// Log discovery and compilation decisions
    #[arg(long)]
    debug: bool,

    /// Click these element ids, in order, after initialization
    #[arg(long = "click", value_name = "ID")]
    clicks: Vec<String>,

    /// Print the slider call journal as well
    #[arg(long)]
    journal: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(url) = &cli.url {
        config = config.with_debug_from_url(url);
    }
    config.debug |= cli.debug;
    logging::init(config.debug);

    let html = std::fs::read_to_string(&cli.page)
        .with_context(|| format!("reading page {}", cli.page.display()))?;
    let document = Rc::new(RefCell::new(
        carousel_html::parse(&html).context("parsing HTML")?,
    ));

    let journal = Journal::new();
    let mut engine = Engine::builder(Rc::clone(&document))
        .slider_engine(HeadlessEngine::with_journal(journal.clone()))
        .config(config)
        .viewport(Viewport::new(cli.width, cli.height))
        .build()?;

    let mut errors = Vec::new();
    collect_errors(engine.handle(PageEvent::Ready), &mut errors);

    for id in &cli.clicks {
        let target = find_by_id(&document.borrow(), id)
            .with_context(|| format!("no element with id {id:?}"))?;
        let report = engine.handle(PageEvent::Click { target });
        if report.control.is_none() {
            tracing::warn!("Click on #{} did not reach a bound control", id);
        }
    }

    let doc = document.borrow();
    let mut output = json!({
        "viewport": { "width": cli.width, "height": cli.height },
        "instances": engine.instances().map(|entry| describe_entry(&doc, entry)).collect::<Vec<_>>(),
        "errors": errors,
    });
    if cli.journal {
        output["journal"] = journal
            .entries()
            .iter()
            .map(|e| json!({ "container": e.container.0, "call": format!("{:?}", e.call) }))
            .collect();
    }
    drop(doc);

    println!("{}", serde_json::to_string_pretty(&output)?);
    engine.shutdown();
    Ok(())
}

fn collect_errors(report: EventReport, errors: &mut Vec<String>) {
    errors.extend(report.errors.iter().map(ToString::to_string));
}

fn find_by_id(tree: &DomTree, id: &str) -> Option<NodeId> {
    tree.find_descendant(tree.root(), &SimpleSelector::Id(id.to_string()))
}

fn describe_entry(tree: &DomTree, entry: &InstanceEntry) -> Value {
    let sliders: Vec<Value> = entry
        .sliders()
        .iter()
        .map(|slider| {
            let state = slider.instance().state();
            json!({
                "container": tree.describe(slider.container()),
                "config": slider.config(),
                "state": {
                    "realIndex": state.real_index,
                    "isBeginning": state.is_beginning,
                    "isEnd": state.is_end,
                    "progress": state.progress,
                    "autoplayRunning": state.autoplay_running,
                },
            })
        })
        .collect();

    let controls: Vec<Value> = entry
        .controls()
        .iter()
        .map(|c| json!({ "element": tree.describe(c.element), "kind": c.kind.name() }))
        .collect();

    json!({
        "name": entry.name(),
        "breakpoint": entry.breakpoint(),
        "sliders": sliders,
        "controls": controls,
    })
}
