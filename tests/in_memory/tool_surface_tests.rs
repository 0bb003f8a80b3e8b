//! Name-based dispatch and the uniform result envelope.

use super::helpers::{BATCH_1, Harness, WEB_1, data, field, harness};
use eyre::{Result, eyre};
use oci_compute_tools::compute::{adapters::memory::ProviderOperation, ports::ProviderError};
use oci_compute_tools::tools::ErrorKind;
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scenario_prod_resolves_and_staging_is_not_found(harness: Harness) -> Result<()> {
    let prod = harness
        .tools
        .invoke("get_compartment_by_name", json!({ "compartment_name": "prod" }))
        .await;
    let staging = harness
        .tools
        .invoke("get_compartment_by_name", json!({ "compartment_name": "staging" }))
        .await;

    let prod_line: Value = serde_json::from_str(&prod.to_json_line())?;
    let staging_line: Value = serde_json::from_str(&staging.to_json_line())?;

    assert_eq!(prod_line.get("ok"), Some(&json!(true)));
    assert_eq!(prod_line.pointer("/data/id"), Some(&json!("c1")));
    assert_eq!(staging_line.get("ok"), Some(&json!(false)));
    assert_eq!(staging_line.get("errorKind"), Some(&json!("not_found")));
    let message = staging_line
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| eyre!("failure should carry a message"))?;
    assert!(message.contains("staging"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatch_reaches_every_tool(harness: Harness) {
    let calls = [
        ("list_compartments", Value::Null),
        ("get_compartment_by_name", json!({ "compartment_name": "dev" })),
        ("list_compute_instances", json!({ "compartment_name": "prod" })),
        ("get_compute_instance", json!({ "instance_id": WEB_1 })),
        (
            "get_compute_instance_by_name",
            json!({ "instance_name": "batch-1", "compartment_name": "prod" }),
        ),
        (
            "compute_instance_action",
            json!({ "instance_id": BATCH_1, "action": "START", "region": "" }),
        ),
    ];

    for (tool, arguments) in calls {
        let result = harness.tools.invoke(tool, arguments).await;
        assert!(result.is_ok(), "{tool} should succeed: {result:?}");
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_tools_are_invalid_arguments(harness: Harness) {
    let result = harness.tools.invoke("terminate_instance", json!({})).await;

    assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArgument));
    assert_eq!(result.message(), Some("unknown tool 'terminate_instance'"));
}

#[rstest]
#[case("get_compute_instance", json!({}))]
#[case("get_compute_instance", json!({ "instance_id": WEB_1, "zone": "a" }))]
#[case("compute_instance_action", json!({ "instance_id": WEB_1 }))]
#[case("list_compartments", json!({ "compartment_name": "prod" }))]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_arguments_never_reach_the_provider(
    harness: Harness,
    #[case] tool: &str,
    #[case] arguments: Value,
) {
    let result = harness.tools.invoke(tool, arguments).await;

    assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArgument));
    assert!(harness.cloud.requests().expect("request log").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provider_failures_become_service_errors_with_their_text(harness: Harness) {
    harness
        .cloud
        .fail_operation(
            ProviderOperation::ListInstances,
            ProviderError::new(
                oci_compute_tools::compute::ports::ProviderErrorKind::NotAuthorized,
                "NotAuthorized",
                "Authorization failed: missing inspect instances permission",
            ),
        )
        .expect("inject failure");

    let result = harness
        .tools
        .invoke("list_compute_instances", json!({ "compartment_name": "prod" }))
        .await;

    assert_eq!(result.error_kind(), Some(ErrorKind::ServiceError));
    assert_eq!(
        result.message(),
        Some("Authorization failed: missing inspect instances permission")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_default_region_is_a_configuration_error(harness: Harness) {
    let ashburn = oci_compute_tools::compute::domain::RegionId::new("us-ashburn-1")
        .expect("valid region");
    harness
        .cloud
        .make_unreachable(ashburn, "connection refused")
        .expect("make unreachable");

    let result = harness.tools.invoke("list_compartments", Value::Null).await;

    assert_eq!(result.error_kind(), Some(ErrorKind::Configuration));
    assert!(
        result
            .message()
            .is_some_and(|message| message.contains("connection refused"))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn typed_and_dispatched_calls_agree(harness: Harness) {
    let dispatched = harness
        .tools
        .invoke("get_compute_instance", json!({ "instance_id": WEB_1 }))
        .await;
    let typed = harness
        .tools
        .get_compute_instance(&oci_compute_tools::tools::GetComputeInstanceParams {
            instance_id: WEB_1.to_owned(),
            region: None,
        })
        .await;

    assert_eq!(data(&dispatched), data(&typed));
    assert_eq!(field(&typed, "/display_name"), "web-1");
}
