//! Command-line host for the find-references engine.
//!
//! Opens a single file, places the caret at a byte offset, and dispatches
//! the find-references command through the same router/orchestrator an
//! editor host would use.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;

use findrefs::command::CommandArgs;
use findrefs::config::{Args, Config};
use findrefs::present::{
    ImmediatePresenter, Location, ReferencedSymbol, StreamingPresenter, StreamingSession,
};
use findrefs::search::provider::ProviderRegistry;
use findrefs::search::scope::RuntimeScope;
use findrefs::search::text_provider::TextSearchProvider;
use findrefs::text::{BufferId, TextBuffer, TextView};
use findrefs::workspace::{OpenDocuments, Workspace};
use findrefs::{CommandOutcome, CommandRouter, FindReferencesHandler, LanguageRegistry};
use findrefs::{DocumentResolver, FIND_REFERENCES};

#[derive(Debug, Parser)]
#[command(name = "findrefs")]
#[command(about = "Find references to the symbol at a byte offset in a file")]
#[command(version)]
struct Cli {
    /// File to search
    file: PathBuf,

    /// Byte offset of the caret within the file
    offset: usize,

    /// Print results as JSON instead of plain text
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    engine: Args,
}

/// Streams matches to stdout as they are found.
struct ConsolePresenter {
    content: Arc<str>,
}

struct ConsoleSession {
    content: Arc<str>,
    count: usize,
}

impl StreamingPresenter for ConsolePresenter {
    fn begin(&self, _workspace: &Workspace, title: &str) -> Box<dyn StreamingSession> {
        println!("References to `{}`:", title);
        Box::new(ConsoleSession {
            content: Arc::clone(&self.content),
            count: 0,
        })
    }
}

impl StreamingSession for ConsoleSession {
    fn on_reference(&mut self, _symbol: &str, location: Location) {
        self.count += 1;
        let (line, column) = line_col(&self.content, location.span.start);
        let line_text = self.content.lines().nth(line - 1).unwrap_or("");
        println!(
            "{}:{}:{}: {}",
            location.path.display(),
            line,
            column,
            line_text.trim_end()
        );
    }

    fn finish(&mut self) {
        println!("{} reference(s)", self.count);
    }
}

/// Collects matches for JSON output.
#[derive(Default)]
struct CollectingPresenter {
    results: Arc<Mutex<Vec<ReferencedSymbol>>>,
}

struct CollectingSession {
    results: Arc<Mutex<Vec<ReferencedSymbol>>>,
    current: ReferencedSymbol,
}

impl StreamingPresenter for CollectingPresenter {
    fn begin(&self, _workspace: &Workspace, title: &str) -> Box<dyn StreamingSession> {
        Box::new(CollectingSession {
            results: Arc::clone(&self.results),
            current: ReferencedSymbol::new(title),
        })
    }
}

impl StreamingSession for CollectingSession {
    fn on_reference(&mut self, _symbol: &str, location: Location) {
        self.current.locations.push(location);
    }

    fn finish(&mut self) {
        if let Ok(mut results) = self.results.lock() {
            results.push(self.current.clone());
        }
    }
}

/// Fallback for a declined search: report the empty result set.
struct ConsoleFallback {
    quiet: bool,
}

impl ImmediatePresenter for ConsoleFallback {
    fn display(&self, workspace: &Workspace, references: &[ReferencedSymbol]) {
        log::info!(
            "displaying {} result(s) for workspace '{}'",
            references.len(),
            workspace.name()
        );
        if !self.quiet && references.is_empty() {
            println!("No references found.");
        }
    }
}

/// 1-based line and byte column of a byte offset.
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, offset - line_start + 1)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_args(cli.engine)?;

    env_logger::Builder::from_default_env()
        .parse_filters(&config.log_level)
        .init();

    // Language definitions: embedded defaults plus user directories
    let mut languages = LanguageRegistry::new();
    languages.add_embedded_languages();
    languages.load_from_dirs(&config.language_dirs);

    let content: Arc<str> = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?
        .into();

    // One-file workspace rooted at the file's directory
    let root = cli
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let workspace_name = cli
        .file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("workspace")
        .to_string();
    let workspace = Arc::new(Workspace::new(workspace_name, root));

    let open_docs = Arc::new(OpenDocuments::new(Arc::clone(&workspace)));
    let buffer_id = BufferId(1);
    let language = config
        .effective_language()
        .or_else(|| languages.detect(&cli.file, &content));
    open_docs.open_with_language(buffer_id, &cli.file, language.clone());

    // Provider registration for the file's language
    let collector = Arc::new(CollectingPresenter::default());
    let collected = Arc::clone(&collector.results);
    let mut providers = ProviderRegistry::new();
    match &language {
        Some(language) => {
            let provider = match languages.get(language) {
                Some(def) => TextSearchProvider::for_language(def)
                    .with_context(|| format!("invalid identifier pattern for '{}'", language))?,
                None => TextSearchProvider::new(),
            };
            let provider = if cli.json {
                provider.with_presenter(collector)
            } else {
                provider.with_presenter(Arc::new(ConsolePresenter {
                    content: Arc::clone(&content),
                }))
            };
            providers.register(language.clone(), Arc::new(provider));
        }
        None => log::warn!(
            "no language detected for {}; no provider registered",
            cli.file.display()
        ),
    }

    let fallback: Arc<dyn ImmediatePresenter> = Arc::new(ConsoleFallback { quiet: cli.json });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    let scope = Arc::new(RuntimeScope::new(runtime.handle().clone()));

    let handler = Arc::new(FindReferencesHandler::new(
        Arc::clone(&open_docs) as Arc<dyn DocumentResolver>,
        Arc::new(providers),
        vec![fallback],
        scope,
    ));

    let mut router = CommandRouter::new();
    router.register(FIND_REFERENCES, Some("source"), handler);

    let buffer = TextBuffer::new(buffer_id, "source", Arc::clone(&content));
    let view = TextView::with_caret(buffer_id, cli.offset.min(content.len()));
    let args = CommandArgs {
        view: &view,
        buffer: &buffer,
    };

    match router.execute(FIND_REFERENCES, &args) {
        CommandOutcome::Handled => log::debug!("find references command handled"),
        CommandOutcome::NotHandled => log::warn!("find references command not handled"),
    }

    if cli.json {
        let results = collected.lock().unwrap_or_else(|e| e.into_inner());
        println!("{}", serde_json::to_string_pretty(&*results)?);
    }

    Ok(())
}
