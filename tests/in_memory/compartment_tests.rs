//! Compartment listing and name lookup through the tool surface.

use super::helpers::{Harness, TENANCY, data, field, harness};
use oci_compute_tools::compute::adapters::memory::ProviderOperation;
use oci_compute_tools::tools::{ErrorKind, GetCompartmentByNameParams, ListCompartmentsParams};
use rstest::rstest;
use serde_json::Value;

fn by_name(name: &str) -> GetCompartmentByNameParams {
    GetCompartmentByNameParams {
        compartment_name: name.to_owned(),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_includes_the_root_and_active_descendants(harness: Harness) {
    let result = harness
        .tools
        .list_compartments(&ListCompartmentsParams {})
        .await;

    let ids: Vec<&str> = data(&result)
        .as_array()
        .expect("listing should be an array")
        .iter()
        .filter_map(|compartment| compartment.get("id").and_then(Value::as_str))
        .collect();
    assert_eq!(ids, vec![TENANCY, "c1", "c2", "c3"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn existing_name_resolves_to_its_compartment(harness: Harness) {
    let result = harness.tools.get_compartment_by_name(&by_name("prod")).await;

    assert_eq!(field(&result, "/id"), "c1");
    assert_eq!(field(&result, "/name"), "prod");
    assert_eq!(field(&result, "/lifecycle_state"), "ACTIVE");
}

#[rstest]
#[case("staging")]
#[case("Prod")]
#[case("retired")]
#[tokio::test(flavor = "multi_thread")]
async fn absent_names_are_not_found(harness: Harness, #[case] name: &str) {
    let result = harness.tools.get_compartment_by_name(&by_name(name)).await;

    assert!(!result.is_ok());
    assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
    assert!(
        result.message().is_some_and(|message| message.contains(name)),
        "message should name the compartment: {result:?}"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn an_empty_name_is_an_invalid_argument(harness: Harness) {
    let result = harness.tools.get_compartment_by_name(&by_name("")).await;

    assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArgument));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_page_of_a_paginated_tree_is_read(harness: Harness) {
    harness.cloud.set_page_size(1).expect("page size");

    let result = harness
        .tools
        .list_compartments(&ListCompartmentsParams {})
        .await;

    let listed = data(&result).as_array().map_or(0, Vec::len);
    assert_eq!(listed, 4);
    let listings = harness
        .cloud
        .requests()
        .expect("request log")
        .iter()
        .filter(|request| request.operation == ProviderOperation::ListCompartments)
        .count();
    // one subtree listing: c1, c2, c3 and c4 on four pages
    assert_eq!(listings, 4);
}
