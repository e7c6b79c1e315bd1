use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blockquill::config::Config;
use blockquill::document::block::{Attributes, BlockId, BlockType};
use blockquill::document::pattern::{builtin_patterns, find_pattern};
use blockquill::document::tree::Document;
use blockquill::editor::state::{ActionOutcome, EditAction, EditorState};
use blockquill::file::loader::{load_document_file, load_document_from_stdin};
use blockquill::file::saver::{save_document_file, to_json_string};
use blockquill::ui::outline::{outline_for, render_outline};

/// BlockQuill - a block-based content editor
#[derive(Parser)]
#[command(name = "blockquill")]
#[command(version)]
#[command(about = "Compose and edit block documents from the command line", long_about = None)]
struct Cli {
    /// Document file (use "-" to read from stdin and write to stdout)
    file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new document
    New {
        /// Start from the sample layout instead of an empty page
        #[arg(long)]
        sample: bool,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print an outline of the document
    Show {
        /// Print the exported JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Append a block with default attributes
    Add {
        /// heading, paragraph, image, code, spacer or columns
        block_type: String,
    },

    /// Append the blocks of a built-in pattern
    Pattern { id: String },

    /// List the built-in patterns
    Patterns,

    /// Set attributes on a block (values are JSON, or plain text)
    Set {
        id: String,
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },

    /// Remove a block and everything inside it
    Remove { id: String },

    /// Copy a block right after itself
    Duplicate { id: String },

    /// Move a root block to the position of another
    Move { source: String, target: String },

    /// Add a paragraph to a columns block
    AddInner { parent: String },

    /// Write the versioned document
    Export {
        /// Destination (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("BLOCKQUILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn load(path: &Path) -> Result<Document> {
    if is_stdio(path) {
        load_document_from_stdin()
    } else {
        load_document_file(path)
    }
}

fn save(path: &Path, state: &mut EditorState, config: &Config) -> Result<()> {
    let document = state.document();
    if is_stdio(path) {
        let json = to_json_string(&document, config.indent_size)?;
        writeln!(io::stdout(), "{}", json)?;
    } else {
        save_document_file(path, &document, config)?;
    }
    state.clear_dirty();
    Ok(())
}

/// Splits `key=value`; the value is read as JSON when it parses, else as text.
fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
    let Some((key, raw)) = assignment.split_once('=') else {
        bail!("Expected KEY=VALUE, got '{}'", assignment);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Missing attribute name in '{}'", assignment);
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn parse_block_type(name: &str) -> Result<BlockType> {
    BlockType::parse(name).with_context(|| {
        let known: Vec<&str> = BlockType::ALL.iter().map(BlockType::as_str).collect();
        format!("Unknown block type '{}' (expected one of: {})", name, known.join(", "))
    })
}

/// A no-op edit is not a failure; the file is simply left alone.
fn report(outcome: ActionOutcome, what: &str) {
    match outcome {
        ActionOutcome::Unchanged => tracing::info!("{}: nothing changed", what),
        ActionOutcome::Changed => {}
        ActionOutcome::Created(id) => println!("{}", id),
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Command::New { sample, force } => {
            if !is_stdio(&cli.file) && cli.file.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", cli.file.display());
            }
            let document = if sample {
                Document::sample()
            } else {
                Document::default()
            };
            let mut state = EditorState::new(document, &config);
            return save(&cli.file, &mut state, &config);
        }
        Command::Patterns => {
            for pattern in builtin_patterns() {
                println!("{:<18} {} - {}", pattern.id, pattern.label, pattern.description);
            }
            return Ok(());
        }
        _ => {}
    }

    let document = load(&cli.file)?;
    let mut state = EditorState::new(document, &config);
    state.set_filename(cli.file.display().to_string());

    let (action, what) = match cli.command {
        Command::Show { json } => {
            if json {
                println!("{}", to_json_string(&state.document(), config.indent_size)?);
            } else {
                print!("{}", render_outline(&outline_for(&state)));
            }
            return Ok(());
        }
        Command::Export { output } => {
            let target = output.unwrap_or_else(|| PathBuf::from("-"));
            return save(&target, &mut state, &config);
        }
        Command::Add { block_type } => {
            (EditAction::AddBlock(parse_block_type(&block_type)?), "add")
        }
        Command::Pattern { id } => {
            let pattern = find_pattern(&id)
                .with_context(|| format!("Unknown pattern '{}' (see 'patterns')", id))?;
            (EditAction::InsertPattern(pattern), "pattern")
        }
        Command::Set { id, assignments } => {
            let patch = assignments
                .iter()
                .map(|a| parse_assignment(a))
                .collect::<Result<Attributes>>()?;
            let patch_action = EditAction::UpdateAttributes {
                id: BlockId::from(id),
                patch,
            };
            (patch_action, "set")
        }
        Command::Remove { id } => (EditAction::Remove { id: id.into() }, "remove"),
        Command::Duplicate { id } => (EditAction::Duplicate { id: id.into() }, "duplicate"),
        Command::Move { source, target } => (
            EditAction::MoveRoot {
                source: source.into(),
                target: target.into(),
            },
            "move",
        ),
        Command::AddInner { parent } => (
            EditAction::AddInner {
                parent_id: parent.into(),
            },
            "add-inner",
        ),
        Command::New { .. } | Command::Patterns => return Ok(()),
    };

    report(state.apply(action), what);
    if state.is_dirty() {
        save(&cli.file, &mut state, &config)?;
    }
    Ok(())
}
