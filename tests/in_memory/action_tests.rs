//! Lifecycle actions through the tool surface.

use super::helpers::{
    ASHBURN, BATCH_1, EDGE_1, Harness, PHOENIX, WEB_1, field, harness, operations_in,
};
use oci_compute_tools::compute::domain::InstanceLifecycleState;
use oci_compute_tools::tools::{ComputeInstanceActionParams, ErrorKind, GetComputeInstanceParams};
use rstest::rstest;

fn action(instance_id: &str, action: &str, region: Option<&str>) -> ComputeInstanceActionParams {
    ComputeInstanceActionParams {
        instance_id: instance_id.to_owned(),
        action: action.to_owned(),
        region: region.map(str::to_owned),
    }
}

fn get(instance_id: &str) -> GetComputeInstanceParams {
    GetComputeInstanceParams {
        instance_id: instance_id.to_owned(),
        region: None,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stopping_a_stopped_instance_is_a_service_error(harness: Harness) {
    let result = harness
        .tools
        .compute_instance_action(&action(BATCH_1, "STOP", None))
        .await;

    assert!(!result.is_ok());
    assert_eq!(result.error_kind(), Some(ErrorKind::ServiceError));
    assert_eq!(
        result.message(),
        Some(
            "Instance ocid1.instance.oc1.iad..batch1 is in lifecycle state STOPPED and cannot accept action STOP"
        )
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_is_accepted_and_later_fetches_see_a_documented_state(harness: Harness) {
    let accepted = harness
        .tools
        .compute_instance_action(&action(BATCH_1, "start", None))
        .await;

    assert_eq!(field(&accepted, "/status"), "accepted");
    assert_eq!(field(&accepted, "/action"), "START");
    assert_eq!(field(&accepted, "/provider_action"), "START");
    assert_eq!(field(&accepted, "/previous_state"), "STOPPED");

    let during = harness.tools.get_compute_instance(&get(BATCH_1)).await;
    let state = InstanceLifecycleState::from(field(&during, "/lifecycle_state"));
    assert!(state.is_known(), "state should be documented: {state}");

    harness.cloud.settle().expect("settle transitions");
    let after = harness.tools.get_compute_instance(&get(BATCH_1)).await;
    assert_eq!(field(&after, "/lifecycle_state"), "RUNNING");
}

#[rstest]
#[case("RESTART", "SOFTRESET")]
#[case("reset", "RESET")]
#[case(" Stop ", "STOP")]
#[tokio::test(flavor = "multi_thread")]
async fn actions_map_to_provider_verbs(
    harness: Harness,
    #[case] requested: &str,
    #[case] provider_action: &str,
) {
    let result = harness
        .tools
        .compute_instance_action(&action(WEB_1, requested, None))
        .await;

    assert_eq!(field(&result, "/provider_action"), provider_action);
    assert_eq!(field(&result, "/previous_state"), "RUNNING");
    assert_eq!(field(&result, "/lifecycle_state"), "STOPPING");
}

#[rstest]
#[case("REBOOT")]
#[case("TERMINATE")]
#[case("")]
#[tokio::test(flavor = "multi_thread")]
async fn unsupported_actions_make_no_provider_calls(harness: Harness, #[case] requested: &str) {
    let result = harness
        .tools
        .compute_instance_action(&action(WEB_1, requested, None))
        .await;

    assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArgument));
    assert!(
        result
            .message()
            .is_some_and(|message| message.contains("START, STOP, RESTART, RESET"))
    );
    assert!(harness.cloud.requests().expect("request log").is_empty());
    assert_eq!(harness.cloud.connect_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn actions_are_routed_to_the_requested_region(harness: Harness) {
    let result = harness
        .tools
        .compute_instance_action(&action(EDGE_1, "STOP", Some(PHOENIX)))
        .await;

    assert_eq!(field(&result, "/instance_id"), EDGE_1);
    assert!(operations_in(&harness.cloud, ASHBURN).is_empty());
    assert_eq!(operations_in(&harness.cloud, PHOENIX).len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn actions_on_unknown_instances_are_not_found(harness: Harness) {
    let result = harness
        .tools
        .compute_instance_action(&action("ocid1.instance.oc1.iad..gone", "START", None))
        .await;

    assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
}
