/*!
Main binary for jsontok.
*/

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::generate;
use clap_verbosity_flag::Verbosity;
use memmap2::Mmap;
use std::io::{self, IsTerminal, Read, stdout};
use std::ops::Deref;
use std::{fs::File, path::PathBuf};

use jsontok::tokenizer::{self, TokenKind};
use jsontok::tree;
use jsontok::{commands, utils};

/// List the tokens of a JSON document: the children of its top-level value,
/// or of the value at `--path`.
#[derive(Parser)]
#[command(name = "jt", version, about, long_about = None, disable_help_subcommand = true)]
struct Args {
    /// Optional subcommands
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(value_name = "FILE")]
    /// Optional path to JSON file. If omitted, reads from STDIN
    input: Option<PathBuf>,
    /// Dot-separated path to a nested value to tokenize instead (e.g.
    /// "items.0.tags"). Offsets are then relative to that value
    #[arg(short, long)]
    path: Option<String>,
    /// Only display the number of tokens
    #[arg(long, action = ArgAction::SetTrue)]
    count: bool,
    /// Display tokens as a JSON array
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
    /// Do not pretty-print the JSON output, instead use compact
    #[arg(long, action = ArgAction::SetTrue, requires = "json")]
    compact: bool,
    #[command(flatten)]
    verbose: Verbosity,
}

/// Available subcommands for `jt`
#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    /// Generate additional documentation and/or completions
    Generate(GenerateCommand),
}

/// Generate shell completions and man page
#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate shell completions for the given shell to stdout.
    Shell { shell: clap_complete::Shell },
    /// Generate a man page for jt to output directory if specified, else
    /// the current directory.
    Man {
        /// The output directory to write the man pages.
        #[clap(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Input bytes, memory-mapped for files and buffered for STDIN.
enum Input {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl Deref for Input {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(map) => map,
            Self::Buffered(bytes) => bytes,
        }
    }
}

/// Reads the document from `path`, or from STDIN when no path is given.
/// Returns `None` when STDIN is an interactive terminal.
fn read_input(path: Option<&PathBuf>) -> Result<Option<Input>> {
    let Some(path) = path else {
        if io::stdin().is_terminal() {
            return Ok(None);
        }
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read STDIN")?;
        return Ok(Some(Input::Buffered(buffer)));
    };

    let file = File::open(path)
        .with_context(|| format!("Failed to read file {}", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat file {}", path.display()))?
        .len();
    if len == 0 {
        return Ok(Some(Input::Buffered(Vec::new())));
    }
    // SAFETY: the map is read-only and dropped before `main` returns. A file
    // truncated by another process while mapped is outside what jt supports.
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map file {}", path.display()))?;
    log::debug!("mapped {len} bytes from {}", path.display());
    Ok(Some(Input::Mapped(map)))
}

/// Entry point for main binary.
///
/// This reads the document, optionally walks to `--path`, scans the selected
/// value and prints its tokens. If no file is given the document is read from
/// STDIN. The output format is determined by the command line arguments.
fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    match args.command {
        Some(Commands::Generate(cmd)) => match cmd {
            GenerateCommand::Shell { shell } => {
                let mut cmd = Args::command();
                generate(shell, &mut cmd, "jt", &mut stdout().lock());
            }
            GenerateCommand::Man { output_dir } => {
                let pages = commands::generate::generate_man_pages(
                    &Args::command(),
                    output_dir,
                )?;
                for page in pages {
                    println!("Generated: {}", page.display());
                }
            }
        },
        None => {
            let Some(input) = read_input(args.input.as_ref())? else {
                // No piped input and no file specified
                let mut cmd = Args::command();
                return Ok(cmd.print_help()?);
            };
            let tables = tokenizer::init();

            let target: &[u8] = match &args.path {
                Some(path) => {
                    let segments = path.split('.').filter(|s| !s.is_empty());
                    let (kind, source) = tree::select(tables, &input, segments)
                        .with_context(|| "Failed to parse JSON")?
                        .with_context(|| format!("Path {path:?} not found"))?;

                    // Scalars have no tokens; show the value itself
                    if !kind.is_container() && !(args.count || args.json) {
                        let text = String::from_utf8_lossy(source);
                        match kind {
                            TokenKind::String => println!("\"{text}\""),
                            _ => println!("{text}"),
                        }
                        return Ok(());
                    }
                    // and an empty token list for `--count` and `--json`
                    if kind.is_container() { source } else { &[] }
                }
                None => &input,
            };

            let tokens = tokenizer::tokenize(tables, target)
                .with_context(|| "Failed to parse JSON")?;
            log::debug!("{} tokens in {} bytes", tokens.len(), target.len());

            if args.count {
                println!("Tokens: {}", tokens.len());
            } else if args.json {
                if args.compact {
                    println!("{}", serde_json::to_string(&tokens)?);
                } else {
                    println!("{}", serde_json::to_string_pretty(&tokens)?);
                }
            } else {
                utils::write_token_listing(
                    &mut stdout().lock(),
                    target,
                    &tokens,
                )?;
            }
        }
    }

    Ok(())
}
