use crate::analyzer::ProjectAnalyzer;
use crate::cache::AnalysisCache;
use crate::config::load_config_from;
use crate::io::{create_writer, OutputFormat};
use crate::scanner::TreeScanner;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub plain: bool,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let config_start = fs::canonicalize(&config.path).unwrap_or_else(|_| config.path.clone());
    let settings = load_config_from(config_start);

    // One request per process, so the cache never serves a hit here; `serve`
    // keeps one cache across requests.
    let analyzer = ProjectAnalyzer::new(
        TreeScanner::new(settings.scan_options()),
        Arc::new(AnalysisCache::new(settings.cache_ttl())),
    );
    let outcome = analyzer
        .analyze(&config.path)
        .with_context(|| format!("Failed to analyze {}", config.path.display()))?;

    let (sink, plain): (Box<dyn Write>, bool) = match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            (Box::new(BufWriter::new(file)), true)
        }
        None => (Box::new(io::stdout()), config.plain),
    };

    let mut writer = create_writer(config.format, sink, plain);
    writer.write_analysis(&outcome.analysis, outcome.from_cache)?;

    if let Some(path) = &config.output {
        eprintln!("Analysis written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn analyze_config(path: PathBuf, output: PathBuf, format: OutputFormat) -> AnalyzeConfig {
        AnalyzeConfig {
            path,
            format,
            output: Some(output),
            plain: true,
        }
    }

    #[test]
    fn test_json_report_written_to_file() {
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join("user.api"),
            "service user-api {\n  @handler GetUser\n  get /user/:id\n}\n",
        )
        .unwrap();
        let out = TempDir::new().unwrap();
        let report = out.path().join("report.json");

        handle_analyze(analyze_config(
            project.path().to_path_buf(),
            report.clone(),
            OutputFormat::Json,
        ))
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(value["from_cache"], false);
        assert_eq!(value["analysis"]["summary"]["http_services"], 1);
    }

    #[test]
    fn test_missing_project_is_an_error() {
        let out = TempDir::new().unwrap();
        let err = handle_analyze(analyze_config(
            PathBuf::from("/nonexistent/svcmap/project"),
            out.path().join("report.md"),
            OutputFormat::Markdown,
        ))
        .unwrap_err();

        assert!(format!("{err:#}").contains("does not exist"));
    }
}
