use crate::core::{ProjectAnalysis, ServiceInfo, ServiceKind};
use colored::*;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Direct dependencies listed before the rest are summarized as a count
const MAX_LISTED_DEPENDENCIES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_analysis(&mut self, analysis: &ProjectAnalysis, from_cache: bool)
        -> anyhow::Result<()>;
}

#[derive(Serialize)]
struct JsonReport<'a> {
    analysis: &'a ProjectAnalysis,
    from_cache: bool,
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_analysis(
        &mut self,
        analysis: &ProjectAnalysis,
        from_cache: bool,
    ) -> anyhow::Result<()> {
        let report = JsonReport {
            analysis,
            from_cache,
        };
        let json = serde_json::to_string_pretty(&report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    plain: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, plain: bool) -> Self {
        Self { writer, plain }
    }

    fn write_summary(&mut self, analysis: &ProjectAnalysis) -> anyhow::Result<()> {
        let summary = analysis.summary();
        writeln!(self.writer, "{}", heading("Summary", self.plain))?;
        writeln!(self.writer, "Total Services: {}", summary.total_services)?;
        writeln!(self.writer, "  - API Services: {}", summary.http_services)?;
        writeln!(self.writer, "  - RPC Services: {}", summary.rpc_services)?;
        writeln!(self.writer, "Total Endpoints: {}", summary.total_endpoints)?;
        writeln!(self.writer, "Total RPC Methods: {}", summary.total_rpc_methods)?;
        writeln!(self.writer, "Dependencies: {}", summary.total_dependencies)?;
        if let Some(module) = analysis.module() {
            writeln!(self.writer, "Module: {}", module)?;
        }
        if !summary.framework_version.is_empty() {
            writeln!(self.writer, "Framework Version: {}", summary.framework_version)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_services(&mut self, analysis: &ProjectAnalysis) -> anyhow::Result<()> {
        if analysis.services().is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "{}", heading("Services", self.plain))?;
        for (i, service) in analysis.services().iter().enumerate() {
            writeln!(
                self.writer,
                "\n{}. {} ({})",
                i + 1,
                service.name,
                service.kind.label()
            )?;
            writeln!(self.writer, "   Path: {}", service.path.display())?;
            writeln!(self.writer, "   Spec: {}", service.spec_file.display())?;
            self.write_service_members(service)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_service_members(&mut self, service: &ServiceInfo) -> anyhow::Result<()> {
        match service.kind {
            ServiceKind::Http if !service.endpoints.is_empty() => {
                writeln!(self.writer, "   Endpoints:")?;
                for endpoint in &service.endpoints {
                    writeln!(
                        self.writer,
                        "     - {} {} ({})",
                        endpoint.method, endpoint.path, endpoint.handler
                    )?;
                }
            }
            ServiceKind::Rpc if !service.rpc_methods.is_empty() => {
                writeln!(self.writer, "   RPC Methods:")?;
                for method in &service.rpc_methods {
                    let stream = if method.stream.is_streaming() {
                        format!(" [stream: {}]", method.stream)
                    } else {
                        String::new()
                    };
                    writeln!(
                        self.writer,
                        "     - {}({}) returns {}{}",
                        method.name, method.request, method.response, stream
                    )?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn write_dependencies(&mut self, analysis: &ProjectAnalysis) -> anyhow::Result<()> {
        if analysis.dependencies().is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "{}", heading("Key Dependencies", self.plain))?;
        let direct: Vec<_> = analysis.direct_dependencies().collect();
        for dep in direct.iter().take(MAX_LISTED_DEPENDENCIES) {
            writeln!(self.writer, "  - {} {}", dep.name, dep.version)?;
        }
        if direct.len() > MAX_LISTED_DEPENDENCIES {
            writeln!(
                self.writer,
                "  ... and {} more direct dependencies",
                direct.len() - MAX_LISTED_DEPENDENCIES
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_configs(&mut self, analysis: &ProjectAnalysis) -> anyhow::Result<()> {
        if analysis.configs().is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "{}", heading("Configuration Files", self.plain))?;
        for config in analysis.configs() {
            writeln!(
                self.writer,
                "  - {} ({})",
                relative_to(&config.path, analysis.project_path()).display(),
                config.format
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_skipped(&mut self, analysis: &ProjectAnalysis) -> anyhow::Result<()> {
        if analysis.skipped().is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "{}", heading("Skipped Files", self.plain))?;
        for skipped in analysis.skipped() {
            writeln!(
                self.writer,
                "  - {}: {}",
                relative_to(&skipped.path, analysis.project_path()).display(),
                skipped.reason
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_analysis(
        &mut self,
        analysis: &ProjectAnalysis,
        from_cache: bool,
    ) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "Project Analysis: {}\n",
            analysis.project_path().display()
        )?;
        if from_cache {
            writeln!(self.writer, "(Results from cache)\n")?;
        }

        self.write_summary(analysis)?;
        self.write_services(analysis)?;
        self.write_dependencies(analysis)?;
        self.write_configs(analysis)?;
        self.write_skipped(analysis)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_summary_row(&mut self, metric: &str, value: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "| {metric} | {value} |")?;
        Ok(())
    }

    fn write_summary(&mut self, analysis: &ProjectAnalysis) -> anyhow::Result<()> {
        let summary = analysis.summary();
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        self.write_summary_row("Total Services", &summary.total_services.to_string())?;
        self.write_summary_row("API Services", &summary.http_services.to_string())?;
        self.write_summary_row("RPC Services", &summary.rpc_services.to_string())?;
        self.write_summary_row("Endpoints", &summary.total_endpoints.to_string())?;
        self.write_summary_row("RPC Methods", &summary.total_rpc_methods.to_string())?;
        self.write_summary_row("Dependencies", &summary.total_dependencies.to_string())?;
        let version = if summary.framework_version.is_empty() {
            "-"
        } else {
            summary.framework_version.as_str()
        };
        self.write_summary_row("Framework Version", version)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_services(&mut self, analysis: &ProjectAnalysis) -> anyhow::Result<()> {
        if analysis.services().is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Services")?;
        for service in analysis.services() {
            writeln!(self.writer)?;
            writeln!(self.writer, "### {} ({})", service.name, service.kind.label())?;
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "Spec: `{}`",
                relative_to(&service.spec_file, analysis.project_path()).display()
            )?;
            writeln!(self.writer)?;
            for endpoint in &service.endpoints {
                writeln!(
                    self.writer,
                    "- `{} {}` → `{}`",
                    endpoint.method, endpoint.path, endpoint.handler
                )?;
            }
            for method in &service.rpc_methods {
                writeln!(
                    self.writer,
                    "- `{}({}) returns ({})` stream: {}",
                    method.name, method.request, method.response, method.stream
                )?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_configs(&mut self, analysis: &ProjectAnalysis) -> anyhow::Result<()> {
        if analysis.configs().is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Configuration Files")?;
        writeln!(self.writer)?;
        for config in analysis.configs() {
            writeln!(
                self.writer,
                "- `{}` ({})",
                relative_to(&config.path, analysis.project_path()).display(),
                config.format
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_analysis(
        &mut self,
        analysis: &ProjectAnalysis,
        from_cache: bool,
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "# Project Analysis")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Project: `{}`", analysis.project_path().display())?;
        writeln!(
            self.writer,
            "Scanned: {}{}",
            analysis.scanned_at().format("%Y-%m-%d %H:%M:%S UTC"),
            if from_cache { " (cached)" } else { "" }
        )?;
        writeln!(self.writer)?;

        self.write_summary(analysis)?;
        self.write_services(analysis)?;
        self.write_configs(analysis)?;
        Ok(())
    }
}

fn heading(title: &str, plain: bool) -> String {
    let text = format!("=== {} ===", title);
    if plain {
        text
    } else {
        text.as_str().bold().cyan().to_string()
    }
}

fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

pub fn create_writer(
    format: OutputFormat,
    writer: Box<dyn Write>,
    plain: bool,
) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer, plain)),
    }
}
