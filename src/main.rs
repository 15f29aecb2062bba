//! hashroute demo shell.
//!
//! Runs the demo site against an in-memory document whose render target
//! prints to stdout. Navigation is driven from stdin:
//!
//! ```text
//! #about                                  navigate to a fragment
//! submit #post yourname=Ann email=a@b.c   stash a form and follow its action
//! submit #contact put note=hi             same, with a form method
//! quit                                    exit
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use hashroute::config::{load_config, RouterConfig};
use hashroute::host::{
    FormSnapshot, Host, Location, MemoryDocument, MemoryLocation, MemorySessionStore,
    NavigationSource, RenderTarget,
};
use hashroute::lifecycle::{wait_for_signal, Shutdown};
use hashroute::observability::{logging, metrics};
use hashroute::request::decode_component;
use hashroute::{site, Dispatcher, RouteRegistry, ViewLoader};

#[derive(Parser)]
#[command(name = "hashroute")]
#[command(about = "Fragment router demo shell", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the templates folder; overrides `views.base_url`.
    #[arg(short, long)]
    views: Option<PathBuf>,

    /// Initial address, e.g. `index.html?lang=en#user/42`.
    #[arg(short, long, default_value = "")]
    entry: String,
}

/// Render target that writes each page to stdout.
struct StdoutTarget;

impl RenderTarget for StdoutTarget {
    fn render(&self, html: &str) {
        println!("{html}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(dir) = &cli.views {
        config.views.base_url = directory_url(dir)?;
    }

    logging::init_logging(&config.observability);
    tracing::info!("hashroute v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        element_id = %config.render.element_id,
        views = %config.views.base_url,
        post_marker = %config.navigation.post_marker,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let views = ViewLoader::from_config(&config.views)?;
    let mut registry = RouteRegistry::new();
    site::register(&mut registry, &views)?;

    let document = Arc::new(
        MemoryDocument::new().with_element(config.render.element_id.clone(), Arc::new(StdoutTarget)),
    );
    let (location, events) = MemoryLocation::new(Location::parse(&cli.entry));
    let host = Host {
        navigation: location.clone(),
        document: document.clone(),
        storage: Arc::new(MemorySessionStore::new()),
    };
    let dispatcher = Arc::new(Dispatcher::new(registry, host, views, &config));

    let shutdown = Shutdown::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let dispatch_loop = {
        let dispatcher = dispatcher.clone();
        let stop = shutdown.subscribe();
        tokio::spawn(async move { dispatcher.run(events, stop).await })
    };

    location.load();
    read_commands(&dispatcher, &location, &document, &shutdown).await?;

    shutdown.trigger();
    let _ = dispatch_loop.await;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn directory_url(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let absolute = std::fs::canonicalize(dir)?;
    let url = Url::from_directory_path(&absolute)
        .map_err(|()| format!("not an absolute directory: {}", absolute.display()))?;
    Ok(url.to_string())
}

/// Read stdin commands until `quit`, end of input or shutdown.
async fn read_commands(
    dispatcher: &Dispatcher,
    location: &MemoryLocation,
    document: &MemoryDocument,
    shutdown: &Shutdown,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stop = shutdown.subscribe();

    loop {
        let line = tokio::select! {
            _ = stop.recv() => break,
            line = lines.next_line() => match line? {
                Some(line) => line,
                None => break,
            },
        };

        match Command::parse(&line) {
            Some(Command::Quit) => break,
            Some(Command::Navigate(hash)) => {
                document.clear_forms();
                if !location.navigate(&hash) {
                    tracing::info!(hash = %hash, "Already at this location");
                }
            }
            Some(Command::Submit(form)) => {
                document.set_forms(vec![form.clone()]);
                if !dispatcher.submit(&form) {
                    tracing::info!("Form action is the current location; nothing to dispatch");
                }
            }
            None if line.trim().is_empty() => {}
            None => eprintln!("commands: #<fragment> | submit <action> [<method>] key=value... | quit"),
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Command {
    Navigate(String),
    Submit(FormSnapshot),
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.starts_with('#') {
            return Some(Command::Navigate(line.to_string()));
        }

        let mut words = line.split_whitespace().peekable();
        match words.next()? {
            "quit" | "exit" => Some(Command::Quit),
            "submit" => {
                let mut form = FormSnapshot::new(words.next()?);
                if let Some(method) = words.next_if(|w| !w.contains('=')) {
                    form = form.method(method);
                }
                for pair in words {
                    let (name, value) = pair.split_once('=')?;
                    form = form.field(decode_component(name), decode_component(value));
                }
                Some(Command::Submit(form))
            }
            _ => None,
        }
    }
}
