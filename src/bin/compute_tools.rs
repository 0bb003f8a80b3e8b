//! Serves the compute tools as JSON lines over stdin and stdout.
//!
//! Usage:
//!
//! ```text
//! compute-tools [--config PATH] [--profile NAME] [--mode local|restricted]
//!               [--realm-domain DOMAIN] [--snapshot demos/tenancy.json]
//! ```
//!
//! Requests go to the live identity and compute services, signed with the
//! profile's API key. `--snapshot` serves a tenancy snapshot from memory
//! instead; its tenancy must match the profile's.
//!
//! Each input line is a request such as:
//!
//! ```json
//! {"tool": "list_compute_instances", "arguments": {"compartment_name": "prod"}}
//! ```
//!
//! and each output line is the tool's result envelope. The pseudo tool
//! `list_tools` returns the tool definitions. Logs go to stderr.

use camino::Utf8PathBuf;
use clap::Parser;
use eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use oci_compute_tools::compute::adapters::memory::TenancySnapshot;
use oci_compute_tools::compute::adapters::oci::{DEFAULT_REALM_DOMAIN, OciConnector};
use oci_compute_tools::compute::domain::ValidationError;
use oci_compute_tools::compute::ports::ProviderConnector;
use oci_compute_tools::compute::services::RegionClientPool;
use oci_compute_tools::config::{
    CONFIG_FILE_VAR, DEFAULT_PROFILE, EnvironmentOverrides, PROFILE_VAR, REALM_DOMAIN_VAR,
    ServerSettings, TransportMode, default_config_file,
};
use oci_compute_tools::tools::{ComputeTools, ResponseNormalizer, ToolResult, tool_definitions};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LIST_TOOLS: &str = "list_tools";

#[derive(Debug, Parser)]
#[command(name = "compute-tools", about = "Serve compartment and compute tools as JSON lines")]
struct Args {
    /// Provider config file [default: ~/.oci/config].
    #[arg(long, env = CONFIG_FILE_VAR)]
    config: Option<Utf8PathBuf>,
    /// Profile within the config file.
    #[arg(long, env = PROFILE_VAR, default_value = DEFAULT_PROFILE)]
    profile: String,
    /// Transport mode; `restricted` applies tenancy and region overrides.
    #[arg(long, value_enum, default_value_t = TransportMode::Local)]
    mode: TransportMode,
    /// Realm domain the service endpoints are derived from.
    #[arg(long, env = REALM_DOMAIN_VAR, default_value = DEFAULT_REALM_DOMAIN)]
    realm_domain: String,
    /// Serve this tenancy snapshot from memory instead of the live services.
    #[arg(long)]
    snapshot: Option<Utf8PathBuf>,
}

impl Args {
    fn into_settings(self) -> ServerSettings {
        ServerSettings {
            config_file: self.config.unwrap_or_else(default_config_file),
            profile: self.profile,
            mode: self.mode,
            realm_domain: self.realm_domain,
            snapshot: self.snapshot,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Request {
    tool: String,
    #[serde(default)]
    arguments: Value,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let settings = Args::parse().into_settings();

    let context = Arc::new(
        settings
            .resolve_context(&EnvironmentOverrides::from_env())
            .wrap_err("failed to resolve credential context")?,
    );

    info!(
        profile = context.profile(),
        region = %context.default_region(),
        mode = ?settings.mode,
        "serving compute tools"
    );

    if let Some(path) = settings.snapshot.as_deref() {
        let snapshot = TenancySnapshot::load(path)?;
        snapshot.ensure_tenancy(context.tenancy_id())?;
        let cloud = snapshot.into_cloud(&DefaultClock)?;
        info!(snapshot = %path, "serving tenancy snapshot");
        let pool = RegionClientPool::new(cloud.connector(), context);
        return serve(&ComputeTools::new(Arc::new(pool))).await;
    }

    let connector = OciConnector::new(settings.endpoints(), Arc::new(DefaultClock));
    info!(endpoints = ?connector.endpoints(), "serving live services");
    let pool = RegionClientPool::new(connector, context);
    serve(&ComputeTools::new(Arc::new(pool))).await
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| eyre!(err))
}

async fn serve<C: ProviderConnector>(tools: &ComputeTools<C>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.wrap_err("failed to read request")? {
        if line.trim().is_empty() {
            continue;
        }
        let response = respond(tools, &line).await;
        stdout.write_all(response.to_json_line().as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}

async fn respond<C: ProviderConnector>(tools: &ComputeTools<C>, line: &str) -> ToolResult {
    match serde_json::from_str::<Request>(line) {
        Ok(request) if request.tool == LIST_TOOLS => {
            ResponseNormalizer::wrap(Ok(tool_definitions()))
        }
        Ok(request) => tools.invoke(&request.tool, request.arguments).await,
        Err(err) => ToolResult::from(ValidationError::InvalidArguments {
            tool: "request".to_owned(),
            reason: err.to_string(),
        }),
    }
}
