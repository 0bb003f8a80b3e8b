//! Instance listing, fetch and region routing through the tool surface.

use super::helpers::{ASHBURN, EDGE_1, Harness, PHOENIX, WEB_1, data, field, harness, operations_in};
use oci_compute_tools::compute::adapters::memory::ProviderOperation;
use oci_compute_tools::tools::{
    ErrorKind, GetComputeInstanceByNameParams, GetComputeInstanceParams,
    ListComputeInstancesParams,
};
use rstest::rstest;
use serde_json::{Value, json};

fn list_params(compartment: &str, region: Option<&str>) -> ListComputeInstancesParams {
    ListComputeInstancesParams {
        compartment_name: compartment.to_owned(),
        region: region.map(str::to_owned),
    }
}

fn get_params(instance_id: &str, region: Option<&str>) -> GetComputeInstanceParams {
    GetComputeInstanceParams {
        instance_id: instance_id.to_owned(),
        region: region.map(str::to_owned),
    }
}

fn names(result: &oci_compute_tools::tools::ToolResult) -> Vec<String> {
    data(result)
        .as_array()
        .expect("listing should be an array")
        .iter()
        .filter_map(|instance| instance.get("display_name").and_then(Value::as_str))
        .map(str::to_owned)
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unspecified_region_lists_in_the_default_region(harness: Harness) {
    let result = harness
        .tools
        .list_compute_instances(&list_params("dev", None))
        .await;

    assert_eq!(names(&result), vec!["devbox"]);
    assert!(operations_in(&harness.cloud, ASHBURN).contains(&ProviderOperation::ListInstances));
    assert!(operations_in(&harness.cloud, PHOENIX).is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_region_lists_there_but_resolves_names_in_the_default_region(harness: Harness) {
    let result = harness
        .tools
        .list_compute_instances(&list_params("dev", Some(PHOENIX)))
        .await;

    assert_eq!(names(&result), vec!["edge-1"]);
    assert_eq!(
        operations_in(&harness.cloud, PHOENIX),
        vec![ProviderOperation::ListInstances]
    );
    assert!(!operations_in(&harness.cloud, ASHBURN).contains(&ProviderOperation::ListInstances));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_page_of_instances_is_read(harness: Harness) {
    harness.cloud.set_page_size(1).expect("page size");

    let result = harness
        .tools
        .list_compute_instances(&list_params("prod", None))
        .await;

    assert_eq!(names(&result), vec!["web-1", "batch-1"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_omit_detail_fields_and_get_includes_them(harness: Harness) {
    let listed = harness
        .tools
        .list_compute_instances(&list_params("prod", None))
        .await;
    let first = data(&listed)
        .as_array()
        .and_then(|instances| instances.first())
        .expect("listing should not be empty");
    assert!(first.get("fault_domain").is_none());

    let fetched = harness.tools.get_compute_instance(&get_params(WEB_1, None)).await;
    assert_eq!(field(&fetched, "/fault_domain"), "FAULT-DOMAIN-2");
    assert_eq!(field(&fetched, "/metadata/role"), "frontend");
    assert_eq!(
        data(&fetched).pointer("/shape_config/ocpus"),
        Some(&json!(2.0))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn instances_are_only_visible_in_their_region(harness: Harness) {
    let wrong_region = harness.tools.get_compute_instance(&get_params(EDGE_1, None)).await;
    assert_eq!(wrong_region.error_kind(), Some(ErrorKind::NotFound));

    let right_region = harness
        .tools
        .get_compute_instance(&get_params(EDGE_1, Some(PHOENIX)))
        .await;
    assert_eq!(field(&right_region, "/region"), PHOENIX);
}

#[rstest]
#[case(Some("ashburn"))]
#[case(Some("US-ASHBURN-1"))]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_regions_fail_before_any_provider_call(
    harness: Harness,
    #[case] region: Option<&str>,
) {
    let result = harness.tools.get_compute_instance(&get_params(WEB_1, region)).await;

    assert_eq!(result.error_kind(), Some(ErrorKind::Configuration));
    assert!(harness.cloud.requests().expect("request log").is_empty());
    assert_eq!(harness.cloud.connect_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lookup_by_name_returns_the_detailed_instance(harness: Harness) {
    let result = harness
        .tools
        .get_compute_instance_by_name(&GetComputeInstanceByNameParams {
            instance_name: "web-1".to_owned(),
            compartment_name: "prod".to_owned(),
            region: None,
        })
        .await;

    assert_eq!(field(&result, "/id"), WEB_1);
    assert_eq!(field(&result, "/image_id"), "ocid1.image.oc1.iad..ol9");
}

#[rstest]
#[case("WEB-1", "prod", ErrorKind::NotFound)]
#[case("web-1", "dev", ErrorKind::NotFound)]
#[case("web-1", "staging", ErrorKind::NotFound)]
#[case(" ", "prod", ErrorKind::InvalidArgument)]
#[tokio::test(flavor = "multi_thread")]
async fn lookup_by_name_failures_are_classified(
    harness: Harness,
    #[case] instance_name: &str,
    #[case] compartment_name: &str,
    #[case] expected: ErrorKind,
) {
    let result = harness
        .tools
        .get_compute_instance_by_name(&GetComputeInstanceByNameParams {
            instance_name: instance_name.to_owned(),
            compartment_name: compartment_name.to_owned(),
            region: None,
        })
        .await;

    assert_eq!(result.error_kind(), Some(expected));
}
