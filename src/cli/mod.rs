//! # Command Line Interface
//!
//! Renders EnvoyFilter manifests for a service from a filter manifest, and
//! shows the workload selector an inbound patch would be scoped to.

pub mod manifest;
pub mod output;

use crate::config::AppConfig;
use crate::domain::{EnvoyFilter, PatchWrapper, Port};
use crate::envoyfilter::{resolve_workload_selector, NetworkFilterPatchGenerator};
use crate::observability::init_logging;
use crate::xds::filters::FilterConfig;
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use manifest::{load_service, FilterManifest};
use output::{render_documents, OutputFormat};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "aeraki-envoyfilter")]
#[command(about = "Generate EnvoyFilter patches for protocol-aware network filters")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (YAML, JSON or TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render EnvoyFilter manifests for a service
    Render(RenderArgs),

    /// Print the workload selector resolved for a service
    Selector {
        /// Service descriptor file
        #[arg(long)]
        service: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Service descriptor file
    #[arg(long)]
    pub service: PathBuf,

    /// Filter manifest file
    #[arg(long)]
    pub filter: PathBuf,

    /// How the filter is placed relative to the TCP proxy
    #[arg(long, value_enum, default_value_t = Operation::InsertBefore)]
    pub operation: Operation,

    /// Port to patch with `replace`; defaults to the service's first port
    #[arg(long)]
    pub port: Option<u32>,

    /// Namespace for the rendered EnvoyFilters
    #[arg(long)]
    pub namespace: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    InsertBefore,
    Replace,
}

/// Run CLI commands
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.verbose {
        config.observability.log_level = "debug".to_string();
    }
    init_logging(&config.observability)?;

    let out = match cli.command {
        Commands::Render(args) => render(&args, &config)?,
        Commands::Selector { service } => selector(&service)?,
    };
    print!("{}", out);

    Ok(())
}

/// Render the EnvoyFilters for `args`.
pub fn render(args: &RenderArgs, config: &AppConfig) -> anyhow::Result<String> {
    let service = load_service(&args.service)?;
    let manifest = FilterManifest::from_path(&args.filter)?;

    let filter_name = manifest.filter_name()?;
    let filter_type = manifest.filter_type()?;
    let outbound = manifest.outbound_config().context("Invalid outbound filter configuration")?;
    let inbound = manifest.inbound_config().context("Invalid inbound filter configuration")?;

    let generator = NetworkFilterPatchGenerator::from_settings(&config.generator);
    let outbound = outbound.as_deref().map(|c| c as &dyn FilterConfig);
    let inbound = inbound.as_deref().map(|c| c as &dyn FilterConfig);

    let patches: Vec<PatchWrapper> = match args.operation {
        Operation::InsertBefore => {
            if args.port.is_some() {
                warn!("--port is ignored for insert-before; the service's first port is used");
            }
            generator.insert_filter_before_default(&service, outbound, inbound, filter_name, filter_type)
        }
        Operation::Replace => {
            let port = match args.port {
                Some(number) => Port::new(number),
                None => service
                    .primary_port()
                    .cloned()
                    .context("Service declares no ports; pass --port")?,
            };
            generator.replace_default_filter(&service, &port, outbound, inbound, filter_name, filter_type)
        }
    };

    if patches.is_empty() {
        warn!(service = %args.service.display(), "No patches generated");
    } else {
        info!(count = patches.len(), "Rendered EnvoyFilters");
    }

    let filters: Vec<EnvoyFilter> =
        patches.iter().map(|p| p.to_envoy_filter(args.namespace.as_deref())).collect();
    render_documents(&filters, args.format)
}

/// Render the resolved workload selector as YAML.
pub fn selector(service: &std::path::Path) -> anyhow::Result<String> {
    let service = load_service(service)?;
    let selector = resolve_workload_selector(&service);
    Ok(serde_yaml::to_string(&selector)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::File::create(&path).unwrap().write_all(content.as_bytes()).unwrap();
        path
    }

    fn args(dir: &tempfile::TempDir) -> RenderArgs {
        RenderArgs {
            service: write(
                dir,
                "service.yaml",
                "hosts: [svcA]\naddresses: [10.0.0.1, 10.0.0.2]\nports:\n  - number: 9080\nannotations:\n  workloadSelector: svcA\n",
            ),
            filter: write(
                dir,
                "filter.yaml",
                "protocol: kafka_broker\noutbound:\n  stat_prefix: outbound\ninbound:\n  stat_prefix: inbound\n",
            ),
            operation: Operation::Replace,
            port: None,
            namespace: Some("istio-system".to_string()),
            format: OutputFormat::Json,
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_args_parse() {
        let cli = Cli::try_parse_from([
            "aeraki-envoyfilter",
            "render",
            "--service",
            "s.yaml",
            "--filter",
            "f.yaml",
            "--operation",
            "replace",
            "--port",
            "9080",
        ])
        .unwrap();

        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.operation, Operation::Replace);
                assert_eq!(args.port, Some(9080));
                assert_eq!(args.format, OutputFormat::Yaml);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_render_replace_json() {
        let dir = tempfile::tempdir().unwrap();
        let out = render(&args(&dir), &AppConfig::default()).unwrap();
        let filters: serde_json::Value = serde_json::from_str(&out).unwrap();
        let filters = filters.as_array().unwrap();

        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0]["metadata"]["name"], "aeraki-outbound-svcA-10.0.0.1-9080");
        assert_eq!(filters[0]["metadata"]["namespace"], "istio-system");
        assert_eq!(filters[2]["spec"]["workloadSelector"]["labels"]["app"], "svcA");
        assert_eq!(filters[2]["spec"]["configPatches"][0]["patch"]["operation"], "REPLACE");
    }

    #[test]
    fn test_render_yaml_documents() {
        let dir = tempfile::tempdir().unwrap();
        let args = RenderArgs { format: OutputFormat::Yaml, operation: Operation::InsertBefore, ..args(&dir) };
        let out = render(&args, &AppConfig::default()).unwrap();

        assert_eq!(out.matches("---\n").count(), 3);
        assert!(out.contains("INSERT_BEFORE"));
    }

    #[test]
    fn test_render_rejects_invalid_outbound_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = RenderArgs {
            filter: write(&dir, "custom.yaml", "protocol: custom\nname: x\ntype_url: y\noutbound: {}\n"),
            ..args(&dir)
        };
        assert!(render(&args, &AppConfig::default()).is_err());
    }

    #[test]
    fn test_selector_command() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "svc.yaml", "hosts: [svcA]\nannotations:\n  workloadSelector: 'app: foo'\n");
        let out = selector(&path).unwrap();
        let parsed: crate::domain::WorkloadSelector = serde_yaml::from_str(&out).unwrap();
        assert_eq!(parsed.get("app"), Some("app:foo"));
    }
}
