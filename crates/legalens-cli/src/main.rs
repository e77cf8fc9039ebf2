//! `LegaLens` CLI — command-line client for the `LegaLens` server.
//!
//! A standalone HTTP client that communicates with the `LegaLens` server.
//! No internal crate dependencies — talks exclusively via the REST API.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BANNER_SMALL: &str = "§ LegaLens";

// ── CLI structure ────────────────────────────────────────────────────

/// LegaLens — legal documents in plain language.
#[derive(Parser)]
#[command(
    name = "legalens",
    version,
    about = "LegaLens CLI — analyze legal documents, ask legal questions, search precedents",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         LEGALENS_ADDR    Server address (default: http://127.0.0.1:8300)\n  \
         LEGALENS_TOKEN   Session token (required for `ask`)\n\n\
         {DIM}Examples:{RESET}\n  \
         legalens status\n  \
         legalens analyze contract.txt --type Contract --output summary.txt\n  \
         legalens ask \"Can my landlord keep my deposit?\"\n  \
         legalens precedents contract damages"
    ),
)]
struct Cli {
    /// LegaLens server address.
    #[arg(long, env = "LEGALENS_ADDR", default_value = "http://127.0.0.1:8300")]
    addr: String,

    /// Session token.
    #[arg(long, env = "LEGALENS_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show server health and configuration.
    Status,
    /// Analyze a plain-text legal document.
    Analyze {
        /// Path to a UTF-8 text file with the document's contents.
        file: String,
        /// Document type hint (e.g. Contract, Lease, NDA).
        #[arg(long = "type", default_value = "")]
        document_type: String,
        /// Print the raw JSON response.
        #[arg(long, default_value = "false")]
        json: bool,
        /// Also write the plain-text summary to this path.
        #[arg(long)]
        output: Option<String>,
    },
    /// Ask the legal assistant a question (requires a session token).
    Ask {
        /// The question.
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Search case-law precedents by keyword.
    Precedents {
        /// Search terms.
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Render a saved analysis JSON as a plain-text summary.
    Export {
        /// Path to a JSON file produced by `analyze --json`.
        file: String,
        /// Write to this path instead of stdout.
        #[arg(long)]
        output: Option<String>,
    },
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<20}{RESET} {WHITE}{value}{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

fn severity_color(severity: &str) -> &'static str {
    match severity {
        "high" => RED,
        "medium" => YELLOW,
        _ => GREEN,
    }
}

fn print_health(resp: &Value) {
    header("◈", "Server Status");
    kv_line("Status", resp["status"].as_str().unwrap_or("unknown"));
    kv_line("Version", resp["version"].as_str().unwrap_or("unknown"));
    let yes_no = |v: &Value| if v.as_bool().unwrap_or(false) { "yes" } else { "no" };
    kv_line("AI analysis", yes_no(&resp["upstream_configured"]));
    kv_line("AI assistant", yes_no(&resp["advice_upstream_enabled"]));
    println!();
}

fn print_analysis(resp: &Value) {
    let analysis = &resp["analysis"];

    if resp["source"] == "fallback" {
        warning("Analysis service unavailable. Showing a synthetic analysis.");
        println!();
    }

    header("§", "Plain Language");
    println!("  {}", analysis["plainLanguage"].as_str().unwrap_or_default());
    println!();

    header("◆", "Key Terms");
    for term in analysis["keyTerms"].as_array().into_iter().flatten() {
        println!(
            "  {BOLD}{}{RESET}: {}",
            term["term"].as_str().unwrap_or_default(),
            term["explanation"].as_str().unwrap_or_default()
        );
    }
    println!();

    header("▲", "Risks");
    for risk in analysis["risks"].as_array().into_iter().flatten() {
        let severity = risk["severity"].as_str().unwrap_or("low");
        let color = severity_color(severity);
        println!(
            "  {color}{BOLD}[{}]{RESET} {BOLD}{}{RESET}",
            severity.to_uppercase(),
            risk["title"].as_str().unwrap_or_default()
        );
        println!("      {}", risk["description"].as_str().unwrap_or_default());
    }
    println!();

    header("≡", "Summary");
    println!("  {}", analysis["summary"].as_str().unwrap_or_default());
    if let Some(level) = resp["overall_risk"].as_str() {
        println!();
        kv_line("Overall risk", &level.to_uppercase());
    }
    println!();
}

// ── HTTP client ──────────────────────────────────────────────────────

struct Client {
    http: reqwest::Client,
    addr: String,
    token: Option<String>,
}

impl Client {
    fn new(addr: String, token: Option<String>) -> Self {
        let http = reqwest::Client::new();
        Self { http, addr, token }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.addr.trim_end_matches('/'))
    }

    fn session_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no session token provided — set LEGALENS_TOKEN or use --token"))
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .context("request failed")?;
        handle_response(resp).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .context("request failed")?;
        handle_response(resp).await
    }

    async fn post_with_session(&self, path: &str, body: &Value) -> Result<Value> {
        let token = self.session_token()?;
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .context("request failed")?;
        handle_response(resp).await
    }

    async fn post_for_text(&self, path: &str, body: &Value) -> Result<String> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .context("request failed")?;
        let status = resp.status();
        let text = resp.text().await.context("failed to read response body")?;
        if !status.is_success() {
            bail!("{}", describe_error(status, &text));
        }
        Ok(text)
    }
}

/// Turn an error response into a readable message.
fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v["message"].as_str())
        .unwrap_or(body);

    match parsed.as_ref().and_then(|v| v["error"].as_str()) {
        Some("authentication_required") => {
            format!("{message} (set LEGALENS_TOKEN to a valid session token)")
        }
        Some("upstream_unavailable") => format!("{message} (server returned {status})"),
        _ => format!("server returned {status}: {message}"),
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await.context("failed to read response body")?;
    if !status.is_success() {
        bail!("{}", describe_error(status, &body));
    }
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).context("failed to parse response JSON")
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let client = Client::new(cli.addr, cli.token);

    match run(client, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(client: Client, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Status => cmd_status(&client).await,
        Commands::Analyze {
            file,
            document_type,
            json,
            output,
        } => cmd_analyze(&client, &file, &document_type, json, output.as_deref()).await,
        Commands::Ask { question } => cmd_ask(&client, &question.join(" ")).await,
        Commands::Precedents { query } => cmd_precedents(&client, &query.join(" ")).await,
        Commands::Export { file, output } => cmd_export(&client, &file, output.as_deref()).await,
    }
}

// ── Commands ─────────────────────────────────────────────────────────

async fn cmd_status(client: &Client) -> Result<()> {
    println!();
    println!("  {BANNER_SMALL} {DIM}checking health...{RESET}");
    println!();
    let resp = client.get("/v1/sys/health").await?;
    print_health(&resp);
    Ok(())
}

/// Read a document as text. Binary formats must be converted beforehand.
fn read_document(file: &str) -> Result<String> {
    let bytes = fs::read(file).with_context(|| format!("failed to read {file}"))?;
    String::from_utf8(bytes).map_err(|_| {
        anyhow::anyhow!(
            "{file} is not UTF-8 text — extract the text from PDF/DOC files before analyzing"
        )
    })
}

async fn cmd_analyze(
    client: &Client,
    file: &str,
    document_type: &str,
    json: bool,
    output: Option<&str>,
) -> Result<()> {
    let text = read_document(file)?;
    let body = serde_json::json!({ "document_text": text, "document_type": document_type });
    let resp = client.post("/v1/analysis", &body).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&resp).context("failed to format response")?
        );
    } else {
        print_analysis(&resp);
    }

    if let Some(path) = output {
        let summary = client.post_for_text("/v1/analysis/export", &resp["analysis"]).await?;
        fs::write(path, summary).with_context(|| format!("failed to write {path}"))?;
        if !json {
            success(&format!("Summary written to {path}"));
        }
    }
    Ok(())
}

async fn cmd_ask(client: &Client, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        bail!("question is empty");
    }
    let resp = client
        .post_with_session("/v1/advice", &serde_json::json!({ "query": question }))
        .await?;

    println!();
    header("⚖", "Legal Assistant");
    for paragraph in resp["advice"].as_str().unwrap_or_default().split("\n\n") {
        println!("  {paragraph}");
        println!();
    }
    println!("  {DIM}General information only, not legal advice.{RESET}");
    println!();
    Ok(())
}

async fn cmd_precedents(client: &Client, query: &str) -> Result<()> {
    if query.trim().is_empty() {
        bail!("search query is empty");
    }
    let resp = client
        .post("/v1/precedents/search", &serde_json::json!({ "query": query }))
        .await?;

    let results = resp["results"].as_array().map(Vec::as_slice).unwrap_or_default();
    println!();
    header("§", "Precedent Search");
    if results.is_empty() {
        warning("No matching precedents found. Try different or broader keywords.");
        println!();
        return Ok(());
    }

    for result in results {
        println!(
            "  {BOLD}{}{RESET}  {CYAN}{}% match{RESET}",
            result["title"].as_str().unwrap_or_default(),
            result["relevance"].as_u64().unwrap_or_default(),
        );
        println!(
            "  {DIM}{} • {}{RESET}",
            result["court"].as_str().unwrap_or_default(),
            result["date"].as_str().unwrap_or_default(),
        );
        println!("  {}", result["summary"].as_str().unwrap_or_default());
        println!();
    }
    success(&format!("Found {} relevant precedents", results.len()));
    Ok(())
}

/// Load a saved analysis: either a full `analyze --json` response or a bare
/// analysis object.
fn load_analysis(file: &str) -> Result<Value> {
    let raw = fs::read_to_string(Path::new(file)).with_context(|| format!("failed to read {file}"))?;
    let value: Value =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {file} as JSON"))?;
    Ok(match value.get("analysis") {
        Some(inner) => inner.clone(),
        None => value,
    })
}

async fn cmd_export(client: &Client, file: &str, output: Option<&str>) -> Result<()> {
    let analysis = load_analysis(file)?;
    let summary = client.post_for_text("/v1/analysis/export", &analysis).await?;

    match output {
        Some(path) => {
            fs::write(path, summary).with_context(|| format!("failed to write {path}"))?;
            success(&format!("Summary written to {path}"));
        }
        None => println!("{summary}"),
    }
    Ok(())
}
