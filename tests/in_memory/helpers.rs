//! Shared fixtures for in-memory integration tests.

use mockable::DefaultClock;
use oci_compute_tools::compute::{
    adapters::memory::{InMemoryCloud, InMemoryConnector, ProviderOperation, TenancySnapshot},
    domain::{CompartmentId, RegionId},
    services::RegionClientPool,
};
use oci_compute_tools::config::{AuthMaterial, CredentialContext, SecretString};
use oci_compute_tools::tools::{ComputeTools, ToolResult};
use rstest::fixture;
use serde_json::Value;
use std::sync::Arc;

/// Tenancy root of the test snapshot.
pub const TENANCY: &str = "ocid1.tenancy.oc1..acme";

/// Default region of the test credential context.
pub const ASHBURN: &str = "us-ashburn-1";

/// Secondary region holding one instance.
pub const PHOENIX: &str = "us-phoenix-1";

/// Running instance in `prod`, Ashburn.
pub const WEB_1: &str = "ocid1.instance.oc1.iad..web1";

/// Stopped instance in `prod`, Ashburn.
pub const BATCH_1: &str = "ocid1.instance.oc1.iad..batch1";

/// Running instance in `dev`, Phoenix.
pub const EDGE_1: &str = "ocid1.instance.oc1.phx..edge1";

const SNAPSHOT: &str = r#"{
  "tenancy": { "id": "ocid1.tenancy.oc1..acme", "name": "acme" },
  "compartments": [
    { "id": "c1", "name": "prod", "description": "Production" },
    { "id": "c2", "name": "dev" },
    { "id": "c3", "name": "web", "parent_id": "c1" },
    { "id": "c4", "name": "retired", "lifecycle_state": "DELETED" }
  ],
  "instances": [
    { "id": "ocid1.instance.oc1.iad..web1", "display_name": "web-1",
      "compartment_id": "c1", "region": "us-ashburn-1",
      "shape": "VM.Standard.E4.Flex", "lifecycle_state": "RUNNING",
      "availability_domain": "Uocm:US-ASHBURN-AD-1",
      "time_created": "2025-03-14T09:30:00Z",
      "fault_domain": "FAULT-DOMAIN-2", "image_id": "ocid1.image.oc1.iad..ol9",
      "launch_mode": "PARAVIRTUALIZED",
      "shape_config": { "ocpus": 2.0, "memory_in_gbs": 32.0 },
      "metadata": { "role": "frontend" } },
    { "id": "ocid1.instance.oc1.iad..batch1", "display_name": "batch-1",
      "compartment_id": "c1", "region": "us-ashburn-1",
      "shape": "VM.Standard.E4.Flex", "lifecycle_state": "STOPPED",
      "availability_domain": "Uocm:US-ASHBURN-AD-2" },
    { "id": "ocid1.instance.oc1.iad..devbox", "display_name": "devbox",
      "compartment_id": "c2", "region": "us-ashburn-1",
      "shape": "VM.Standard.E4.Flex", "lifecycle_state": "RUNNING",
      "availability_domain": "Uocm:US-ASHBURN-AD-1" },
    { "id": "ocid1.instance.oc1.phx..edge1", "display_name": "edge-1",
      "compartment_id": "c2", "region": "us-phoenix-1",
      "shape": "VM.Standard.A1.Flex", "lifecycle_state": "RUNNING",
      "availability_domain": "Uocm:PHX-AD-1" }
  ]
}"#;

/// Tool surface plus a handle on the cloud it serves.
pub struct Harness {
    /// Shared in-memory provider state.
    pub cloud: InMemoryCloud,
    /// Tool surface over a fresh client pool.
    pub tools: ComputeTools<InMemoryConnector>,
}

/// Builds a credential context for the test tenancy in `region`.
#[must_use]
pub fn context(region: &str) -> Arc<CredentialContext> {
    let auth = AuthMaterial::ApiKey {
        user: "ocid1.user.oc1..tester".to_owned(),
        fingerprint: "aa:bb:cc".to_owned(),
        private_key: SecretString::new("test-key".to_owned()),
        pass_phrase: None,
    };
    Arc::new(CredentialContext::new(
        "DEFAULT",
        CompartmentId::new(TENANCY).expect("valid tenancy"),
        RegionId::new(region).expect("valid region"),
        auth,
    ))
}

/// Loads the test snapshot into a fresh cloud.
#[fixture]
pub fn cloud() -> InMemoryCloud {
    TenancySnapshot::from_json(SNAPSHOT)
        .expect("snapshot should parse")
        .into_cloud(&DefaultClock)
        .expect("snapshot should load")
}

/// Provides tools whose default region is Ashburn.
#[fixture]
pub fn harness(cloud: InMemoryCloud) -> Harness {
    let pool = RegionClientPool::new(cloud.connector(), context(ASHBURN));
    Harness {
        tools: ComputeTools::new(Arc::new(pool)),
        cloud,
    }
}

/// Returns the success payload of a tool result.
#[must_use]
pub fn data(result: &ToolResult) -> &Value {
    assert!(result.is_ok(), "expected success, got {result:?}");
    result.data().expect("successful result should carry data")
}

/// Returns the string at `pointer` in the success payload.
#[must_use]
pub fn field<'a>(result: &'a ToolResult, pointer: &str) -> &'a str {
    data(result)
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("payload should have a string at {pointer}"))
}

/// Lists the operations the cloud has received from `region`.
#[must_use]
pub fn operations_in(cloud: &InMemoryCloud, region: &str) -> Vec<ProviderOperation> {
    cloud
        .requests()
        .expect("request log")
        .into_iter()
        .filter(|request| request.region.as_str() == region)
        .map(|request| request.operation)
        .collect()
}
