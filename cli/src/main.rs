//! tacdoc CLI - SGML corpus and annotation query extraction tool

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use tacdoc::render::{to_json, write_json_lines, JsonFormat};
use tacdoc::{
    CorpusReader, DocBuilder, Document, FileDocuments, QueryOptions, QueryReader, ReaderOptions,
};

#[derive(Parser)]
#[command(name = "tacdoc")]
#[command(version)]
#[command(about = "Offset-preserving text extraction for SGML corpora", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every document under a corpus root as JSON Lines
    Docs {
        /// Corpus root directory
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Marker ending the document header
        #[arg(long, default_value = tacdoc::parser::DEFAULT_BODY_MARKER)]
        body_marker: String,
    },

    /// Print the blanked text of the documents in one corpus file
    Text {
        /// Corpus file (.gz is decompressed)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only print the document with this id
        #[arg(long, value_name = "ID")]
        doc: Option<String>,

        /// Marker ending the document header
        #[arg(long, default_value = tacdoc::parser::DEFAULT_BODY_MARKER)]
        body_marker: String,

        /// Print each document as pretty JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Write the queries of a query file as JSON Lines
    Queries {
        /// Query XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Amount added to end offsets (0 for 2011 and earlier, 1 after)
        #[arg(long, env = "TACDOC_OFFSET", default_value_t = 1, allow_hyphen_values = true)]
        offset: i64,
    },

    /// Resolve each query against the corpus and print its span
    Align {
        /// Corpus root directory
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Query XML file
        #[arg(value_name = "QUERIES")]
        queries: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Amount added to end offsets (0 for 2011 and earlier, 1 after)
        #[arg(long, env = "TACDOC_OFFSET", default_value_t = 1, allow_hyphen_values = true)]
        offset: i64,
    },

    /// Show corpus statistics
    Info {
        /// Corpus root directory
        #[arg(value_name = "ROOT")]
        root: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Docs {
            root,
            output,
            body_marker,
        } => cmd_docs(&root, output.as_deref(), &body_marker),
        Commands::Text {
            input,
            doc,
            body_marker,
            json,
        } => cmd_text(&input, doc.as_deref(), &body_marker, json),
        Commands::Queries {
            input,
            output,
            offset,
        } => cmd_queries(&input, output.as_deref(), offset),
        Commands::Align {
            root,
            queries,
            output,
            offset,
        } => cmd_align(&root, &queries, output.as_deref(), offset),
        Commands::Info { root } => cmd_info(&root),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Open `path` for writing, or stdout.
fn output_writer(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn spinner(message: &str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} {pos}")?);
    pb.set_message(message.to_string());
    Ok(pb)
}

fn cmd_docs(
    root: &Path,
    output: Option<&Path>,
    body_marker: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ReaderOptions::new().with_body_marker(body_marker);
    let corpus = CorpusReader::with_options(root, options);

    let count = match output {
        Some(path) => {
            let pb = spinner("Reading documents")?;
            let docs = corpus.documents().inspect(|_| pb.inc(1));
            let count = write_json_lines(output_writer(Some(path))?, docs)?;
            pb.finish_and_clear();
            println!("{} {} documents to {}", "Saved".green(), count, path.display());
            count
        }
        None => write_json_lines(output_writer(None)?, corpus.documents())?,
    };

    log::info!("Wrote {} documents from {}", count, root.display());
    Ok(())
}

fn cmd_text(
    input: &Path,
    doc_id: Option<&str>,
    body_marker: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ReaderOptions::new().with_body_marker(body_marker);
    let docs = FileDocuments::open(input, DocBuilder::with_options(options))?;

    let mut found = false;
    for doc in docs {
        let doc = doc?;
        if doc_id.is_some_and(|id| id != doc.id()) {
            continue;
        }
        found = true;
        if json {
            println!("{}", to_json(&doc, JsonFormat::Pretty)?);
            continue;
        }
        println!("{} {}", "#".dimmed(), doc.id().cyan().bold());
        println!("{}", doc.text());
    }

    if let (Some(id), false) = (doc_id, found) {
        return Err(format!("document {} not found in {}", id, input.display()).into());
    }
    Ok(())
}

fn cmd_queries(
    input: &Path,
    output: Option<&Path>,
    offset: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = QueryOptions::new().with_end_adjustment(offset);
    let queries = QueryReader::open_with_options(input, options)?;
    let count = write_json_lines(output_writer(output)?, queries)?;

    if let Some(path) = output {
        println!("{} {} queries to {}", "Saved".green(), count, path.display());
    }
    Ok(())
}

fn cmd_align(
    root: &Path,
    queries: &Path,
    output: Option<&Path>,
    offset: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = spinner("Loading corpus")?;
    let mut docs: HashMap<String, Document> = HashMap::new();
    for doc in CorpusReader::new(root).documents() {
        let doc = doc?;
        pb.inc(1);
        docs.insert(doc.id().to_string(), doc);
    }
    pb.finish_and_clear();

    let options = QueryOptions::new().with_end_adjustment(offset);
    let mut out = output_writer(output)?;
    let mut unresolved = 0usize;

    for query in QueryReader::open_with_options(queries, options)? {
        let query = query?;
        let span = docs.get(&query.doc_id).and_then(|doc| query.span_in(doc));
        if span.is_none() {
            unresolved += 1;
            log::warn!("{} does not resolve in {}", query, query.doc_id);
        }
        let record = serde_json::json!({
            "id": query.id,
            "doc_id": query.doc_id,
            "start": query.start,
            "end": query.end,
            "name": query.name,
            "span": span,
        });
        writeln!(out, "{}", record)?;
    }
    out.flush()?;

    if unresolved > 0 {
        eprintln!(
            "{} {} queries did not resolve",
            "Warning:".yellow().bold(),
            unresolved
        );
    }
    Ok(())
}

fn cmd_info(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let corpus = CorpusReader::new(root);

    let mut files = 0usize;
    let mut documents = 0usize;
    let mut characters = 0usize;
    let mut failures = 0usize;
    let mut doctypes: HashMap<String, usize> = HashMap::new();

    for path in corpus.files() {
        let path = path?;
        files += 1;
        for doc in corpus.docs(&path)? {
            match doc {
                Ok(doc) => {
                    documents += 1;
                    characters += doc.char_len();
                    if let Some(doctype) = doc.attr("doctype") {
                        *doctypes.entry(doctype.trim().to_string()).or_default() += 1;
                    }
                }
                Err(e) => {
                    failures += 1;
                    log::warn!("{}: {}", path.display(), e);
                }
            }
        }
    }

    println!("{}", "Corpus Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Root".bold(), root.display());
    println!("{}: {}", "Files".bold(), files);
    println!("{}: {}", "Documents".bold(), documents);
    println!("{}: {}", "Characters".bold(), characters);
    if failures > 0 {
        println!("{}: {}", "Failed".bold().red(), failures);
    }

    if !doctypes.is_empty() {
        println!();
        println!("{}", "Document Types".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        let mut doctypes: Vec<_> = doctypes.into_iter().collect();
        doctypes.sort();
        for (doctype, count) in doctypes {
            println!("{}: {}", doctype.bold(), count);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "tacdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Offset-preserving SGML corpus extraction tool");
    println!();
    println!("License: MIT");
}
