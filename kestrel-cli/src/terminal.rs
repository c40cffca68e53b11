//! Terminal rendering, prompts and the interactive loop.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use kestrel_browser::{
    ClientIdentity, LinkAction, LoadStats, MediaPayload, NavigationError, Notice, PageView,
    Prompter, Question, RenderOutcome, Session, SessionObserver,
};
use kestrel_common::{Location, MimeType, size_human};
use kestrel_document::{Block, BlockRole, Document, ListMarker, Outline, OutlineNode, TextRole};
use owo_colors::OwoColorize;
use tracing::debug;

const HELP: &str = "\
<n>        follow link number n
<url>      follow a link or relative reference
b / f      back / forward
r          reload
s          stop
*          toggle favourite
o          show the outline
h          this help
q          quit";

// ---------- output ----------

fn paint(text: &str, role: TextRole) -> String {
    match role {
        TextRole::Standard => text.to_string(),
        TextRole::Heading1 => text.bold().underline().to_string(),
        TextRole::Heading2 => text.bold().to_string(),
        TextRole::Heading3 => text.bold().italic().to_string(),
        TextRole::Preformatted => text.dimmed().to_string(),
        TextRole::BlockQuote => text.italic().to_string(),
        TextRole::InternalLink => text.blue().to_string(),
        TextRole::ExternalLink => text.magenta().to_string(),
        TextRole::CrossProtocolLink => text.cyan().to_string(),
    }
}

fn prefix(block: &Block) -> String {
    let mut prefix = "  ".repeat(usize::try_from(block.style.indent).unwrap_or_default());
    for _ in 0..block.style.quote_depth {
        prefix.push_str("│ ");
    }
    match block.style.list {
        Some(ListMarker::Bullet) => prefix.push_str("• "),
        Some(ListMarker::Number(n)) => prefix.push_str(&format!("{n}. ")),
        None => {}
    }
    prefix
}

/// Print a document, numbering its links the way [`repl`] follows them.
pub fn print_document(document: &Document) {
    let links = document.links();
    for block in &document.blocks {
        let mut line = prefix(block);
        for run in &block.runs {
            if let Some(index) = run
                .style
                .anchor
                .as_deref()
                .and_then(|anchor| links.iter().position(|link| *link == anchor))
            {
                line.push_str(&format!("[{}]", index + 1).dimmed().to_string());
            }
            line.push_str(&paint(&run.text, run.style.role));
        }
        if matches!(block.style.role, BlockRole::Heading(_)) && !line.is_empty() {
            println!();
        }
        println!("{line}");
    }
}

fn print_node(node: &OutlineNode, depth: usize) {
    let role = TextRole::heading(node.entry.level);
    println!("{}{}", "  ".repeat(depth), paint(&node.entry.title, role));
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

/// Print the heading outline as an indented tree.
pub fn print_outline(outline: &Outline) {
    if outline.is_empty() {
        println!("{}", "(no headings)".dimmed());
    }
    for node in outline.tree() {
        print_node(&node, 0);
    }
}

/// Print a summary of a media payload.
pub fn print_media(media: &MediaPayload) {
    let size = u64::try_from(media.payload.len()).unwrap_or(u64::MAX);
    println!(
        "{} {} ({})",
        format!("[{}]", media.kind).yellow(),
        media.mime.essence(),
        size_human(size)
    );
}

fn print_page(page: &PageView) {
    println!("{}", format!("== {} ==", page.title()).bold());
    match &page.outcome {
        RenderOutcome::Media(media) => print_media(media),
        outcome => {
            if let Some(document) = outcome.document() {
                print_document(document);
            }
        }
    }
    let mime = page
        .stats
        .mime
        .as_ref()
        .map(MimeType::essence)
        .unwrap_or_default();
    println!(
        "{}",
        format!(
            "{} | {} | {} | {} ms",
            page.location,
            mime,
            size_human(page.stats.size),
            page.stats.elapsed.as_millis()
        )
        .dimmed()
    );
}

// ---------- collaborators ----------

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

/// Asks questions on stdin. End of input answers "no" or cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &Question) -> bool {
        println!("{}", question.to_string().yellow());
        read_line("[y/N] ").is_some_and(|answer| {
            matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
        })
    }

    fn input(&mut self, prompt: &str) -> Option<String> {
        println!("{}", prompt.cyan());
        read_line("> ")
    }

    fn select_identity(&mut self, reason: &str) -> Option<ClientIdentity> {
        if !reason.is_empty() {
            println!("{}", reason.cyan());
        }
        let certificate = read_line("certificate file (empty to cancel): ")?;
        if certificate.trim().is_empty() {
            return None;
        }
        let key = read_line("private key file: ")?;
        let certificate = Path::new(certificate.trim());
        match (fs::read(certificate), fs::read(key.trim())) {
            (Ok(cert), Ok(key)) => {
                let name = certificate
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Some(ClientIdentity::transient(name, cert, key))
            }
            (Err(err), _) | (_, Err(err)) => {
                eprintln!("{} {err}", "error:".red());
                None
            }
        }
    }

    fn notify(&mut self, notice: &Notice) {
        eprintln!("{}", notice.to_string().yellow());
    }
}

/// Prints every installed page.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalObserver;

impl SessionObserver for TerminalObserver {
    fn page_loaded(&mut self, page: &PageView) {
        print_page(page);
    }

    fn progress(&mut self, stats: &LoadStats) {
        debug!(size = stats.size, "progress");
    }

    fn location_changed(&mut self, location: &Location) {
        debug!(%location, "location changed");
    }
}

// ---------- interactive loop ----------

fn follow(session: &mut Session, input: &str) -> Result<(), NavigationError> {
    let href = match input.parse::<usize>() {
        Ok(number) => {
            let link = session
                .page()
                .and_then(|page| page.outcome.document())
                .and_then(|document| {
                    number
                        .checked_sub(1)
                        .and_then(|index| document.links().get(index).map(ToString::to_string))
                });
            let Some(link) = link else {
                eprintln!("{} no link {number}", "error:".red());
                return Ok(());
            };
            link
        }
        Err(_) => input.to_string(),
    };

    if let LinkAction::OpenExternally(location) = session.activate_link(&href)? {
        println!("{} {location}", "open externally:".yellow());
    }
    Ok(())
}

/// Read commands from stdin until `q` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub fn repl(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    loop {
        print!("{} ", "kestrel>".bold());
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let result = match line.trim() {
            "" => continue,
            "q" | "quit" => return Ok(()),
            "h" | "help" => {
                println!("{HELP}");
                Ok(())
            }
            "b" | "back" => session.go_back().map(|_| ()),
            "f" | "forward" => session.go_forward().map(|_| ()),
            "r" | "reload" => session.reload().map(|_| ()),
            "s" | "stop" => {
                let _ = session.stop();
                Ok(())
            }
            "*" => {
                let added = session.toggle_favourite();
                println!("{}", if added { "added to favourites" } else { "removed from favourites" });
                Ok(())
            }
            "o" | "outline" => {
                if let Some(document) = session.page().and_then(|page| page.outcome.document()) {
                    print_outline(&document.outline);
                }
                Ok(())
            }
            input => follow(session, input),
        };
        if let Err(err) = result {
            eprintln!("{} {err}", "error:".red());
        }
        let _ = session.pump_events();
    }
}
