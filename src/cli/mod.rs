//! Loan Approval CLI Module
//!
//! Command-line interface for serving, inspecting artifacts and running a
//! single offline prediction.

use clap::{Parser, Subcommand};
use colored::*;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::artifacts::{ArtifactPaths, ArtifactStore};
use crate::error::LoanError;
use crate::inference::{InferenceService, PredictionResult};
use crate::models::Classifier;

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn bad(s: &str) -> ColoredString    { s.truecolor(230, 110, 110) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn status_mark(loaded: bool) -> ColoredString {
    if loaded { ok("loaded") } else { bad("missing") }
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "loan-approval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Loan approval prediction service")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP prediction service
    Serve {
        /// Host to bind (defaults to API_HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to API_PORT or 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory holding the model artifacts (defaults to MODEL_DIR or ./model)
        #[arg(short, long)]
        model_dir: Option<PathBuf>,
    },

    /// Show the status and contents of a model artifact directory
    Info {
        #[arg(short, long)]
        model_dir: Option<PathBuf>,
    },

    /// Predict one application from a JSON file
    Predict {
        /// JSON application file, or `-` for stdin
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        model_dir: Option<PathBuf>,
    },
}

fn resolve_model_dir(model_dir: Option<PathBuf>) -> PathBuf {
    model_dir.unwrap_or_else(|| crate::server::ServerConfig::default().model_dir)
}

// ─── Serve ─────────────────────────────────────────────────────────────────────

pub async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    model_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    let defaults = ServerConfig::default();
    let config = ServerConfig {
        host: host.unwrap_or(defaults.host),
        port: port.unwrap_or(defaults.port),
        model_dir: model_dir.unwrap_or(defaults.model_dir),
    };

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Loan Approval API".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Predict", &format!("http://{}:{}/predict", config.host, config.port)));
    line_box(&kv("Health ", &format!("http://{}:{}/health", config.host, config.port)));
    line_box(&kv("Models ", &config.model_dir.display().to_string()));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    run_server(config).await
}

// ─── Info ──────────────────────────────────────────────────────────────────────

pub fn cmd_info(model_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = resolve_model_dir(model_dir);
    let paths = ArtifactPaths::new(&dir);
    let store = ArtifactStore::load(&dir);
    let status = store.status();

    section("Artifacts");
    println!("  {:<12} {}", muted("Directory"), dir.display());
    for (name, path, loaded) in [
        ("Model", paths.model(), status.model),
        ("Scaler", paths.scaler(), status.scaler),
        ("Encoders", paths.encoders(), status.encoders),
        ("Features", paths.features(), status.features),
    ] {
        println!("  {:<12} {:<8} {}", muted(name), status_mark(loaded), dim(&path.display().to_string()));
    }

    if let Some(model) = &store.model {
        section("Model");
        println!("  {:<12} {}", muted("Type"), model.model_type());
        println!("  {:<12} {}", muted("Features"), model.n_features());
    }

    if let Some(encoders) = &store.encoders {
        println!("  {:<12} {} columns", muted("Encoded"), encoders.len());
    }

    if let Some(features) = &store.features {
        section("Schema");
        for (i, column) in features.columns().iter().enumerate() {
            let kind = match &store.encoders {
                Some(encoders) => match encoders.get(column) {
                    Some(encoder) => format!("categorical ({} classes)", encoder.classes().len()),
                    None => "numeric".to_string(),
                },
                None => "unknown".to_string(),
            };
            println!("  {:>3}  {:<20} {}", dim(&i.to_string()), column, muted(&kind));
        }
    }

    match InferenceService::from_artifacts(store) {
        Ok(service) => {
            if let Some(importance) = service.feature_importance() {
                section("Feature importance");
                for (name, score) in importance.iter() {
                    let bar = "█".repeat((score * 40.0).round() as usize);
                    println!("  {:<20} {:>7.4} {}", name, score, bar.truecolor(120, 170, 255));
                }
            }
            println!();
            println!("  {} {}", ok("✓"), "ready to serve predictions");
        }
        Err(e) => {
            println!();
            println!("  {} {}", bad("✗"), e);
        }
    }

    println!();
    Ok(())
}

// ─── Predict ───────────────────────────────────────────────────────────────────

fn read_input(input: &Path) -> anyhow::Result<String> {
    let mut raw = String::new();
    if input == Path::new("-") {
        std::io::stdin().read_to_string(&mut raw)?;
    } else {
        raw = std::fs::read_to_string(input)?;
    }
    Ok(raw)
}

/// Run one prediction on the application stored at `input`.
///
/// Client-side failures carry the same bare message the HTTP surface returns.
pub fn predict_file(input: &Path, model_dir: Option<PathBuf>) -> anyhow::Result<PredictionResult> {
    let dir = resolve_model_dir(model_dir);
    let service = InferenceService::from_artifacts(ArtifactStore::load(&dir))?;

    let application: serde_json::Value = serde_json::from_str(&read_input(input)?)?;
    service.predict(&application).map_err(|e| match e {
        LoanError::Validation(msg) | LoanError::Processing(msg) => anyhow::anyhow!(msg),
        other => other.into(),
    })
}

pub fn cmd_predict(input: &Path, model_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let result = predict_file(input, model_dir)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
