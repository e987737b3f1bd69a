use crate::analyzer::ProjectAnalyzer;
use crate::cache::AnalysisCache;
use crate::config::load_config;
use crate::core::ProjectAnalysis;
use crate::scanner::TreeScanner;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ServeConfig {
    /// Overrides the `[cache]` section of `.svcmap.toml`
    pub ttl_seconds: Option<u64>,
}

/// One line of output per request
#[derive(Serialize)]
#[serde(untagged)]
enum ServeResponse<'a> {
    Analysis {
        analysis: &'a ProjectAnalysis,
        from_cache: bool,
    },
    Failure {
        path: &'a str,
        error: String,
    },
}

pub fn handle_serve(config: ServeConfig) -> Result<()> {
    let settings = load_config();
    let ttl = config
        .ttl_seconds
        .map(Duration::from_secs)
        .unwrap_or_else(|| settings.cache_ttl());

    let analyzer = ProjectAnalyzer::new(
        TreeScanner::new(settings.scan_options()),
        Arc::new(AnalysisCache::new(ttl)),
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    serve_requests(&analyzer, stdin.lock(), stdout.lock())?;

    let stats = analyzer.cache().stats();
    info!(
        entries = stats.entries,
        hits = stats.hits,
        misses = stats.misses,
        "Session finished"
    );
    Ok(())
}

/// Answer each non-blank line of `input` with one JSON line on `output`.
///
/// A request that fails is answered with its error and the session goes on;
/// only I/O failures on the streams end it.
pub fn serve_requests<R: BufRead, W: Write>(
    analyzer: &ProjectAnalyzer,
    input: R,
    mut output: W,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read request")?;
        let request = line.trim();
        if request.is_empty() {
            continue;
        }

        let result = analyzer.analyze(Path::new(request));
        let response = match &result {
            Ok(outcome) => ServeResponse::Analysis {
                analysis: &outcome.analysis,
                from_cache: outcome.from_cache,
            },
            Err(err) => ServeResponse::Failure {
                path: request,
                error: err.to_string(),
            },
        };

        serde_json::to_writer(&mut output, &response)?;
        writeln!(output)?;
        output.flush()?;
    }
    Ok(())
}
