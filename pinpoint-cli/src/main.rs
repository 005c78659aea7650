//! Pinpoint CLI
//!
//! Synthesizes unique CSS selectors for elements of a JSON document tree,
//! and exposes the identifier escaper and friendly-URI extractor.

mod tree;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use pinpoint_common::uri::{DEFAULT_MAX_LENGTH, FriendlyUriOptions, friendly_uri_suffix};
use pinpoint_common::warning::clear_warnings;
use pinpoint_css::{DocumentQuery, SynthesisOptions, Synthesizer, TreeQuery, escape_identifier};
use pinpoint_dom::{DocumentMode, DomTree, NodeId};

/// Pinpoint: unique CSS selectors for document elements
#[derive(Parser, Debug)]
#[command(name = "pinpoint")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Selector for the second child of the body element
    pinpoint select page.json --path 1/1

    # Selectors for every element, walking all the way to the root
    pinpoint select page.json --all --to-root

    # Escape a value for use as an identifier
    pinpoint escape '1st-item'

    # Short description of a link target
    pinpoint uri https://example.com/docs/guide.html
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize selectors for elements of a JSON document tree
    Select {
        /// Path to the JSON document tree
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Element-child index path from the document element, e.g. 1/0/2
        #[arg(long, default_value = "", conflicts_with = "all")]
        path: String,

        /// Print a selector for every element in tree order
        #[arg(long)]
        all: bool,

        /// Number of features to combine at the starting element
        #[arg(long, default_value_t = 2)]
        feature_count: usize,

        /// Minimum number of ancestor levels to include
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        min_depth: isize,

        /// Keep walking up to the document element
        #[arg(long)]
        to_root: bool,

        /// Treat the document as XHTML (case-sensitive tag names)
        #[arg(long)]
        xhtml: bool,
    },

    /// Escape a value for use as a CSS identifier
    Escape {
        /// The value to escape
        value: String,
    },

    /// Print a short, human-readable suffix of a URI
    Uri {
        /// The URI to describe
        uri: String,

        /// Domain of the page the URI appears on
        #[arg(long, value_name = "DOMAIN")]
        current_domain: Option<String>,

        /// Longest suffix to accept, in UTF-16 code units
        #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
        max_length: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Select {
            file,
            path,
            all,
            feature_count,
            min_depth,
            to_root,
            xhtml,
        } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let mode = if xhtml {
                DocumentMode::Xhtml
            } else {
                DocumentMode::Html
            };
            let tree = tree::load_tree(&json, mode)
                .with_context(|| format!("failed to load {}", file.display()))?;
            let options = SynthesisOptions::default()
                .with_feature_count(feature_count)
                .with_min_depth(min_depth)
                .with_to_root(to_root);

            clear_warnings();
            let targets = if all {
                tree.elements().collect()
            } else {
                vec![tree::resolve_path(&tree, &path)?]
            };
            for node in targets {
                print_selector(&tree, node, &options)?;
            }
        }
        Command::Escape { value } => {
            let escaped = escape_identifier(value.as_str())
                .with_context(|| format!("cannot escape {value:?}"))?;
            println!("{escaped}");
        }
        Command::Uri {
            uri,
            current_domain,
            max_length,
        } => {
            let mut options = FriendlyUriOptions::default().with_max_length(max_length);
            if let Some(domain) = current_domain {
                options = options.with_current_domain(domain);
            }
            match friendly_uri_suffix(&uri, &options) {
                Some(suffix) => println!("{suffix}"),
                None => println!("{}", "no friendly suffix".dimmed()),
            }
        }
    }

    Ok(())
}

/// Synthesize a selector for `node`, then check it against the tree.
fn print_selector(tree: &DomTree, node: NodeId, options: &SynthesisOptions) -> Result<()> {
    let query = TreeQuery::new(tree);
    let selector = Synthesizer::new(tree, &query)
        .synthesize(Some(node), options)
        .with_context(|| format!("failed to synthesize a selector for node {}", node.0))?;

    let matches = query.query_all(&selector);
    let label = tree
        .as_element(node)
        .map_or_else(String::new, |e| format!("<{}>", e.tag_name));

    if matches == [node] {
        println!("{} {} {}", "✓".green(), label.dimmed(), selector.bold());
    } else if matches.contains(&node) {
        println!(
            "{} {} {} {}",
            "~".yellow(),
            label.dimmed(),
            selector.bold(),
            format!("({} matches)", matches.len()).yellow()
        );
    } else {
        println!("{} {} {}", "✗".red(), label.dimmed(), selector.bold());
    }
    Ok(())
}
