//! Kestrel command-line front end.
//!
//! Usage:
//!   kestrel render <file>          Render a local file and print the document
//!   kestrel render <file> --json   Print the document model as JSON
//!   kestrel open <url>             Browse interactively with the local handlers
//!
//! Examples:
//!   kestrel render notes.gmi --outline
//!   kestrel render page.html --root gemini://example.org/
//!   kestrel open about:help

mod terminal;

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use kestrel_browser::handlers::{AboutHandler, DataHandler, FileHandler, mime_for_path};
use kestrel_browser::{
    Collaborators, DispatchOptions, Favourites, ProtocolHandler, PushMode, RenderOutcome,
    Session, SessionOptions, TextDisplay, dispatch,
};
use kestrel_common::Location;
use kestrel_document::DocumentStyle;
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use terminal::{TerminalObserver, TerminalPrompter};

/// Kestrel: a small-web browser core in the terminal
#[derive(Parser, Debug)]
#[command(name = "kestrel")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Render a gemtext file
    kestrel render notes.gmi

    # Show only the heading outline
    kestrel render README.md --outline

    # Treat any text as plain text
    kestrel render page.html --plain

    # Browse, starting at the built-in help page
    kestrel open about:help

    # Browse a local directory
    kestrel open ./docs

Set RUST_LOG=kestrel_browser=debug to trace the session."#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one file through the response dispatcher
    Render(RenderArgs),
    /// Open a location in an interactive session
    Open(OpenArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// File to render
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Content type (default: guessed from the extension)
    #[arg(long, value_name = "TYPE")]
    mime: Option<String>,

    /// Location relative links resolve against (default: the file itself)
    #[arg(long, value_name = "URL")]
    root: Option<String>,

    /// Print the document model as JSON
    #[arg(long)]
    json: bool,

    /// Print only the heading outline
    #[arg(long)]
    outline: bool,

    /// Show every text type as plain text
    #[arg(long)]
    plain: bool,
}

#[derive(Args, Debug)]
struct OpenArgs {
    /// Location or local path to open
    #[arg(value_name = "URL|PATH", default_value = "about:help")]
    url: String,

    /// Session options as JSON
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Document style as JSON
    #[arg(long, value_name = "FILE")]
    style: Option<PathBuf>,

    /// Show every text type as plain text
    #[arg(long)]
    plain: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render(&args),
        Command::Open(args) => open(&args),
    }
}

fn render(args: &RenderArgs) -> Result<()> {
    let bytes =
        fs::read(&args.path).with_context(|| format!("reading {}", args.path.display()))?;
    let mime = args
        .mime
        .clone()
        .unwrap_or_else(|| mime_for_path(&args.path).to_string());
    let root = match &args.root {
        Some(url) => Location::parse(url)?,
        None => file_location(&args.path)?,
    };
    info!(path = %args.path.display(), %mime, %root, "rendering");

    let style = DocumentStyle::default().derive(root.host());
    let options = DispatchOptions {
        raw_fallback: true,
        plaintext_only: args.plain,
    };
    let outcome = dispatch(&bytes, &mime, &root, &style, options)?;

    match (&outcome, outcome.document()) {
        (_, Some(document)) if args.json => {
            println!("{}", serde_json::to_string_pretty(document)?);
        }
        (_, Some(document)) if args.outline => terminal::print_outline(&document.outline),
        (_, Some(document)) => terminal::print_document(document),
        (RenderOutcome::Media(media), None) => terminal::print_media(media),
        (_, None) => {}
    }
    Ok(())
}

fn open(args: &OpenArgs) -> Result<()> {
    let mut options: SessionOptions = match &args.options {
        Some(path) => read_json(path)?,
        None => SessionOptions::default(),
    };
    if args.plain {
        options.text_display = TextDisplay::PlainText;
    }
    let style: DocumentStyle = match &args.style {
        Some(path) => read_json(path)?,
        None => DocumentStyle::default(),
    };

    let favourites = Favourites::new().shared();
    let handlers: Vec<Box<dyn ProtocolHandler>> = vec![
        Box::new(AboutHandler::new().with_favourites(Rc::clone(&favourites))),
        Box::new(DataHandler::new()),
        Box::new(FileHandler::new()),
    ];
    let collaborators = Collaborators {
        prompter: Box::new(TerminalPrompter),
        observer: Box::new(TerminalObserver),
        favourites,
    };
    let mut session = Session::new(options, style, handlers, collaborators)?;

    let start = match Location::parse(&args.url) {
        Ok(location) => location,
        Err(_) => file_location(Path::new(&args.url))?,
    };
    session.navigate(start, PushMode::Immediate)?;
    let _ = session.pump_events();
    terminal::repl(&mut session)
}

fn file_location(path: &Path) -> Result<Location> {
    let absolute =
        fs::canonicalize(path).with_context(|| format!("resolving {}", path.display()))?;
    let url = if absolute.is_dir() {
        Url::from_directory_path(&absolute)
    } else {
        Url::from_file_path(&absolute)
    };
    url.map(Location::from)
        .map_err(|()| anyhow!("{} is not an absolute path", absolute.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
