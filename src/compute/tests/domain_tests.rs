//! Unit tests for compute domain types.

use crate::compute::domain::{
    ActionRequest, CompartmentId, CompartmentLifecycleState, ComputeInstance, ComputeInstanceData,
    InstanceAction, InstanceId, InstanceLifecycleState, ProviderAction, RegionError, RegionId,
    ShapeConfig, ValidationError,
};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::json;

fn sample_instance() -> ComputeInstance {
    ComputeInstance::new(ComputeInstanceData {
        id: InstanceId::new("ocid1.instance.oc1.iad..one").expect("valid id"),
        display_name: "web-1".to_owned(),
        compartment_id: CompartmentId::new("ocid1.compartment.oc1..prod").expect("valid id"),
        region: RegionId::new("us-ashburn-1").expect("valid region"),
        shape: "VM.Standard.E4.Flex".to_owned(),
        lifecycle_state: InstanceLifecycleState::Running,
        availability_domain: "Uocm:US-ASHBURN-AD-1".to_owned(),
        time_created: Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
    })
}

// ── Identifiers ────────────────────────────────────────────────────

#[rstest]
#[case("")]
#[case("   ")]
fn empty_identifiers_are_rejected(#[case] input: &str) {
    assert_eq!(
        InstanceId::new(input),
        Err(ValidationError::EmptyIdentifier { kind: "instance" })
    );
    assert_eq!(
        CompartmentId::new(input),
        Err(ValidationError::EmptyIdentifier { kind: "compartment" })
    );
}

#[rstest]
fn identifiers_are_trimmed_but_otherwise_opaque() {
    let id = InstanceId::new("  ocid1.instance.oc1.iad..MixedCase ").expect("valid id");
    assert_eq!(id.as_str(), "ocid1.instance.oc1.iad..MixedCase");
}

// ── Regions ────────────────────────────────────────────────────────

#[rstest]
#[case("us-ashburn-1")]
#[case("eu-frankfurt-1")]
#[case("us-gov-ashburn-1")]
#[case("ap-melbourne-12")]
fn valid_region_codes_are_accepted(#[case] input: &str) {
    let region = RegionId::new(input).expect("region should be valid");
    assert_eq!(region.as_str(), input);
}

#[rstest]
#[case("")]
#[case("us-ashburn")]
#[case("ashburn-1")]
#[case("US-ASHBURN-1")]
#[case("us--ashburn-1")]
#[case("us-ashburn-1a")]
#[case("us_ashburn_1")]
fn malformed_region_codes_are_rejected(#[case] input: &str) {
    assert_eq!(
        RegionId::new(input),
        Err(RegionError::InvalidRegion(input.to_owned()))
    );
}

#[rstest]
fn region_deserialization_validates() {
    let parsed: Result<RegionId, _> = serde_json::from_str("\"not a region\"");
    assert!(parsed.is_err());
}

// ── Lifecycle states ───────────────────────────────────────────────

#[rstest]
#[case("RUNNING", InstanceLifecycleState::Running)]
#[case("stopped", InstanceLifecycleState::Stopped)]
#[case("CREATING_IMAGE", InstanceLifecycleState::CreatingImage)]
#[case("MOVING", InstanceLifecycleState::Moving)]
fn documented_instance_states_parse(#[case] raw: &str, #[case] expected: InstanceLifecycleState) {
    let state = InstanceLifecycleState::from(raw);
    assert_eq!(state, expected);
    assert!(state.is_known());
}

#[rstest]
fn unknown_instance_states_are_preserved_verbatim() {
    let state = InstanceLifecycleState::from("HIBERNATING");
    assert_eq!(state, InstanceLifecycleState::Unknown("HIBERNATING".to_owned()));
    assert!(!state.is_known());
    assert_eq!(state.to_string(), "HIBERNATING");
}

#[rstest]
#[case("ACTIVE", true)]
#[case("DELETED", false)]
#[case("INACTIVE", false)]
fn compartment_activity_follows_state(#[case] raw: &str, #[case] active: bool) {
    assert_eq!(CompartmentLifecycleState::from(raw).is_active(), active);
}

// ── Actions ────────────────────────────────────────────────────────

#[rstest]
#[case("START", InstanceAction::Start, ProviderAction::Start)]
#[case("stop", InstanceAction::Stop, ProviderAction::Stop)]
#[case(" Restart ", InstanceAction::Restart, ProviderAction::SoftReset)]
#[case("reset", InstanceAction::Reset, ProviderAction::Reset)]
fn actions_parse_case_insensitively(
    #[case] raw: &str,
    #[case] expected: InstanceAction,
    #[case] provider: ProviderAction,
) {
    let action: InstanceAction = raw.parse().expect("action should parse");
    assert_eq!(action, expected);
    assert_eq!(action.provider_action(), provider);
}

#[rstest]
#[case("REBOOT")]
#[case("")]
#[case("SOFTRESET")]
fn unsupported_actions_name_the_valid_set(#[case] raw: &str) {
    let err = raw
        .parse::<InstanceAction>()
        .expect_err("action should be rejected");
    assert_eq!(err, ValidationError::UnknownAction(raw.to_owned()));
    assert!(err.to_string().contains("START, STOP, RESTART, RESET"));
}

#[rstest]
fn provider_action_uses_soft_reset_wire_name() {
    let wire = serde_json::to_value(ProviderAction::SoftReset).expect("serializes");
    assert_eq!(wire, json!("SOFTRESET"));
    assert_eq!(ProviderAction::SoftReset.as_str(), "SOFTRESET");
}

#[rstest]
fn action_request_targets_region_when_given() {
    let request = ActionRequest::parse("ocid1.instance.oc1.phx..one", "stop")
        .expect("request should parse")
        .in_region("us-phoenix-1")
        .expect("region should be valid");

    assert_eq!(request.action(), InstanceAction::Stop);
    assert_eq!(
        request.region().map(RegionId::as_str),
        Some("us-phoenix-1")
    );
}

#[rstest]
fn action_request_rejects_empty_instance_id() {
    assert_eq!(
        ActionRequest::parse(" ", "START"),
        Err(ValidationError::EmptyIdentifier { kind: "instance" })
    );
}

// ── Instances ──────────────────────────────────────────────────────

#[rstest]
fn summary_drops_detail_fields() {
    let detailed = sample_instance()
        .with_fault_domain("FAULT-DOMAIN-1")
        .with_image_id("ocid1.image.oc1.iad..ol9")
        .with_shape_config(ShapeConfig {
            ocpus: Some(2.0),
            memory_in_gbs: Some(16.0),
        })
        .with_metadata("role", "frontend");

    let summary = detailed.summary();

    assert_eq!(summary.fault_domain(), None);
    assert_eq!(summary.image_id(), None);
    assert!(summary.shape_config().is_none());
    assert!(summary.metadata().is_empty());
    assert_eq!(summary.id(), detailed.id());
    assert_eq!(summary.lifecycle_state(), detailed.lifecycle_state());
}

#[rstest]
fn instance_serializes_summary_fields_and_states_as_text() {
    let value = serde_json::to_value(sample_instance()).expect("serializes");

    assert_eq!(value.get("display_name"), Some(&json!("web-1")));
    assert_eq!(value.get("lifecycle_state"), Some(&json!("RUNNING")));
    assert_eq!(value.get("region"), Some(&json!("us-ashburn-1")));
    assert!(value.get("fault_domain").is_none());
    assert!(value.get("metadata").is_none());
}
