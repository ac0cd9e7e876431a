mod display;
mod extract;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use contrascope_core::normalize::tokenize;
use contrascope_core::{
    DiffSummary, ExportDocument, RuleSet, SignatureLog, SignatureRequest, diff,
};
use contrascope_remote::{RemoteClient, ReviewService};
use tracing_subscriber::EnvFilter;

use crate::extract::{DEFAULT_MAX_BYTES, Document, read_document};

/// Upper bound on LCS table cells (tokens in A + 1 times tokens in B + 1) for `compare`.
const MAX_DIFF_CELLS: usize = 50_000_000;

#[derive(Parser)]
#[command(name = "contrascope", version)]
#[command(about = "Contract clause risk review, version comparison, and clause search")]
struct Cli {
    /// Base URL of an optional remote analysis service (local rules when unset)
    #[arg(long, env = "CONTRASCOPE_API_BASE", global = true)]
    api_base: Option<String>,

    /// Remote request timeout in milliseconds
    #[arg(long, env = "CONTRASCOPE_TIMEOUT_MS", default_value_t = 12_000, global = true)]
    timeout_ms: u64,

    /// JSON rule table replacing the built-in clause rules
    #[arg(long, env = "CONTRASCOPE_RULES", global = true)]
    rules: Option<PathBuf>,

    /// Largest contract accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES, global = true)]
    max_bytes: u64,

    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Score a contract against the clause rules
    Analyze {
        /// Contract file, or `-` for standard input
        #[arg(required_unless_present = "text")]
        input: Option<PathBuf>,

        /// Analyze this text instead of a file
        #[arg(long, conflicts_with = "input")]
        text: Option<String>,

        /// Also write the JSON export document here
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Word-level diff between two versions of a contract
    Compare {
        original: PathBuf,
        revised: PathBuf,

        /// Emit an HTML fragment instead of inline markers
        #[arg(long)]
        html: bool,
    },

    /// Find the passages that mention the words of a question
    Search {
        /// Contract file, or `-` for standard input
        input: PathBuf,
        query: String,
    },

    /// Record a simulated signature, optionally bound to an analyzed contract
    Sign {
        input: Option<PathBuf>,

        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Results go to stdout; logs stay on stderr. Set RUST_LOG=debug for detail.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = review_service(&cli)?;
    tracing::debug!(
        rules = service.rules().len(),
        remote = service.has_remote(),
        "contrascope v{}",
        env!("CARGO_PKG_VERSION")
    );

    let output = match &cli.command {
        Command::Analyze {
            input,
            text,
            export,
        } => {
            let doc = match (input, text) {
                (_, Some(text)) => Document::pasted(text.clone()),
                (Some(path), None) => load(path, cli.max_bytes)?,
                (None, None) => anyhow::bail!("nothing to analyze: pass a file, `-`, or --text"),
            };
            cmd_analyze(&service, doc, export.as_deref(), cli.format).await?
        }
        Command::Compare {
            original,
            revised,
            html,
        } => {
            let a = load(original, cli.max_bytes)?;
            let b = load(revised, cli.max_bytes)?;
            cmd_compare(&a.text, &b.text, *html, cli.format)?
        }
        Command::Search { input, query } => {
            let doc = load(input, cli.max_bytes)?;
            cmd_search(&service, &doc, query, cli.format).await?
        }
        Command::Sign { input, name, email } => {
            let doc = match input {
                Some(path) => Some(load(path, cli.max_bytes)?),
                None => None,
            };
            let request = SignatureRequest::new(name.as_str(), email.as_str());
            cmd_sign(&service, doc, request, cli.format).await?
        }
    };

    print!("{output}");
    Ok(())
}

fn review_service(cli: &Cli) -> anyhow::Result<ReviewService> {
    let rules = match &cli.rules {
        Some(path) => RuleSet::load(path)
            .with_context(|| format!("loading rule table {}", path.display()))?,
        None => RuleSet::default(),
    };
    let service = ReviewService::local(rules);

    let Some(base) = &cli.api_base else {
        return Ok(service);
    };
    let client = RemoteClient::with_timeout(base.clone(), Duration::from_millis(cli.timeout_ms))
        .context("building remote client")?;
    tracing::info!(base = client.base_url(), "remote analysis enabled");
    Ok(service.with_remote(client))
}

fn load(path: &Path, max_bytes: u64) -> anyhow::Result<Document> {
    read_document(path, max_bytes).context("reading contract")
}

async fn cmd_analyze(
    service: &ReviewService,
    doc: Document,
    export: Option<&Path>,
    format: Format,
) -> anyhow::Result<String> {
    let analysis = service.analyze(&doc.text).await;
    let result = analysis.stamp(doc.identifier, doc.size_bytes, Utc::now());
    let document = ExportDocument::from(&result);

    if let Some(path) = export {
        let json = document.to_json_pretty()?;
        std::fs::write(path, json)
            .with_context(|| format!("writing export to {}", path.display()))?;
        tracing::info!(path = %path.display(), "export written");
    }

    Ok(match format {
        Format::Text => display::analysis_card(&result),
        Format::Json => format!("{}\n", document.to_json_pretty()?),
    })
}

fn cmd_compare(a: &str, b: &str, html: bool, format: Format) -> anyhow::Result<String> {
    check_diff_size(a, b, MAX_DIFF_CELLS)?;
    let tokens = diff(a, b);
    Ok(match format {
        Format::Text => display::diff_view(&tokens, html),
        Format::Json => {
            let value = serde_json::json!({
                "tokens": tokens,
                "summary": DiffSummary::of(&tokens),
            });
            format!("{}\n", serde_json::to_string_pretty(&value)?)
        }
    })
}

fn check_diff_size(a: &str, b: &str, max_cells: usize) -> anyhow::Result<()> {
    let (m, n) = (tokenize(a).len(), tokenize(b).len());
    let cells = (m + 1).saturating_mul(n + 1);
    if cells > max_cells {
        anyhow::bail!(
            "documents too large to compare ({m} x {n} words, limit {max_cells} table cells)"
        );
    }
    Ok(())
}

/// Search runs over the normalized text an analysis would produce.
async fn cmd_search(
    service: &ReviewService,
    doc: &Document,
    query: &str,
    format: Format,
) -> anyhow::Result<String> {
    let text = contrascope_core::normalize_text(&doc.text);
    let hits = service.search(&text, query).await;
    let matches = hits.iter().filter(|h| !h.is_placeholder()).count();
    tracing::info!(matches, "search complete");
    Ok(match format {
        Format::Text => display::hits_view(&hits),
        Format::Json => format!("{}\n", serde_json::to_string_pretty(&hits)?),
    })
}

async fn cmd_sign(
    service: &ReviewService,
    doc: Option<Document>,
    mut request: SignatureRequest,
    format: Format,
) -> anyhow::Result<String> {
    if let Some(doc) = doc {
        let analysis = service.analyze(&doc.text).await;
        let result = analysis.stamp(doc.identifier, doc.size_bytes, Utc::now());
        request = request.for_result(&result);
    }

    let mut log = SignatureLog::new();
    let record = service.sign(&mut log, &request).await;
    Ok(match format {
        Format::Text => display::signature_card(&record),
        Format::Json => format!("{}\n", serde_json::to_string_pretty(&record)?),
    })
}
