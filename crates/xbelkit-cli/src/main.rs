use std::fmt::{self, Write as _};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xbelkit::{from_xbel_str_with_config, to_xbel_writer, BookmarkTree, Config, NodeData};

/// Glyph run drawn for separators
const SEPARATOR_GLYPHS: usize = 30;

#[derive(Debug, Parser)]
#[command(name = "xbel", version, about = "Check, format and inspect XBEL bookmark files")]
struct Args {
    /// Log more (-v debug, -vv trace); RUST_LOG is used when absent
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Maximum element nesting depth (0 means unlimited)
    #[arg(long, value_name = "N", default_value_t = Config::default().max_depth, global = true)]
    max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    #[arg(long, value_name = "BYTES", default_value_t = Config::default().max_size, global = true)]
    max_size: usize,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a file and print what it contains
    Check {
        /// Input file ("-" for stdin)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    /// Rewrite a file in canonical form
    Fmt {
        /// Input file ("-" for stdin)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Print the bookmark outline
    Tree {
        /// Input file ("-" for stdin)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = Config::new(args.max_depth, args.max_size);
    debug!(?config, "parser limits");

    match &args.command {
        Command::Check { input } => {
            let tree = load(input, config)?;
            write_output(None, summary(&tree).as_bytes())
        }
        Command::Fmt { input, output } => {
            let tree = load(input, config)?;
            let mut buffer = Vec::new();
            to_xbel_writer(&tree, &mut buffer).context("failed to serialize bookmarks")?;
            write_output(output.as_deref(), &buffer)
        }
        Command::Tree { input } => {
            let tree = load(input, config)?;
            let rendered = outline(&tree).context("failed to render outline")?;
            write_output(None, rendered.as_bytes())
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load(path: &Path, config: Config) -> Result<BookmarkTree> {
    let content = read_input(path)?;
    let tree = from_xbel_str_with_config(&content, config)
        .with_context(|| format!("failed to read bookmarks from {}", path.display()))?;
    info!(path = %path.display(), nodes = tree.len(), "bookmarks loaded");
    Ok(tree)
}

fn read_input(path: &Path) -> Result<String> {
    if path != Path::new("-") {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()));
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    if buffer.trim().is_empty() {
        bail!("no input provided on stdin");
    }
    Ok(buffer)
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}

fn summary(tree: &BookmarkTree) -> String {
    let (mut folders, mut bookmarks, mut separators) = (0, 0, 0);
    for (_, _, node) in tree.iter() {
        match node.data {
            NodeData::Folder { .. } => folders += 1,
            NodeData::Bookmark { .. } => bookmarks += 1,
            NodeData::Separator => separators += 1,
        }
    }
    format!("ok: {folders} folders, {bookmarks} bookmarks, {separators} separators\n")
}

fn outline(tree: &BookmarkTree) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for (depth, _, node) in tree.iter() {
        let indent = "  ".repeat(depth);
        match &node.data {
            NodeData::Folder { expanded, .. } => {
                let marker = if *expanded { '-' } else { '+' };
                writeln!(out, "{indent}{marker} {}", node.title)?;
            }
            NodeData::Bookmark { url } => writeln!(out, "{indent}{} <{url}>", node.title)?,
            NodeData::Separator => {
                writeln!(out, "{indent}{}", "\u{b7}".repeat(SEPARATOR_GLYPHS))?;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_rendering() -> Result<()> {
        let mut tree = BookmarkTree::new();
        let folder = tree.add_folder(None, "Dev", false);
        tree.add_bookmark(Some(folder), "Rust", "https://www.rust-lang.org");
        tree.add_separator(Some(folder));

        let expected = format!(
            "+ Dev\n  Rust <https://www.rust-lang.org>\n  {}\n",
            "\u{b7}".repeat(30)
        );
        assert_eq!(outline(&tree)?, expected);
        assert_eq!(summary(&tree), "ok: 1 folders, 1 bookmarks, 1 separators\n");
        Ok(())
    }
}
