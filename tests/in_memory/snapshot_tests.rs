//! Loading a tenancy from JSON.

use super::helpers::TENANCY;
use camino::Utf8PathBuf;
use mockable::DefaultClock;
use oci_compute_tools::compute::adapters::memory::{SnapshotError, TenancySnapshot};
use oci_compute_tools::compute::domain::{CompartmentId, InstanceId, RegionId};
use oci_compute_tools::compute::ports::ProviderClient;
use rstest::rstest;

const MINIMAL: &str = r#"{
  "tenancy": { "id": "ocid1.tenancy.oc1..acme", "name": "acme" },
  "compartments": [{ "id": "c1", "name": "prod" }],
  "instances": [
    { "id": "i1", "display_name": "one", "compartment_id": "c1",
      "region": "us-ashburn-1", "shape": "VM.Standard.E4.Flex",
      "lifecycle_state": "STOPPED", "availability_domain": "AD-1" }
  ]
}"#;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn snapshots_populate_the_cloud() {
    let cloud = TenancySnapshot::from_json(MINIMAL)
        .expect("snapshot should parse")
        .into_cloud(&DefaultClock)
        .expect("snapshot should load");
    let client = cloud.client(RegionId::new("us-ashburn-1").expect("valid region"));

    let fetched = client
        .get_instance(&InstanceId::new("i1").expect("valid id"))
        .await
        .expect("instance should exist");

    assert_eq!(fetched.display_name(), "one");
    assert_eq!(cloud.tenancy_id().expect("tenancy").as_str(), TENANCY);
}

#[rstest]
fn snapshots_load_from_disk() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("tenancy.json"))
        .expect("temp path should be UTF-8");
    std::fs::write(&path, MINIMAL).expect("write snapshot");

    let snapshot = TenancySnapshot::load(&path).expect("snapshot should load");

    assert_eq!(snapshot.tenancy_id(), TENANCY);
}

#[rstest]
#[case(r#"{ "tenancy": { "id": "t", "name": "n" }, "extra": [] }"#)]
#[case(r#"{ "compartments": [] }"#)]
#[case("not json")]
fn malformed_snapshots_are_parse_errors(#[case] content: &str) {
    let err = TenancySnapshot::from_json(content).expect_err("snapshot should be rejected");
    assert!(matches!(err, SnapshotError::Parse(_)));
}

#[rstest]
fn invalid_regions_are_rejected_on_load() {
    let content = MINIMAL.replace("us-ashburn-1", "ashburn");
    let err = TenancySnapshot::from_json(&content)
        .expect("snapshot should parse")
        .into_cloud(&DefaultClock)
        .expect_err("region should be rejected");
    assert!(matches!(err, SnapshotError::InvalidRegion(_)));
}

#[rstest]
fn missing_snapshot_files_are_io_errors() {
    let err = TenancySnapshot::load(&Utf8PathBuf::from("/nonexistent/tenancy.json"))
        .expect_err("missing file should fail");
    assert!(matches!(err, SnapshotError::Io { .. }));
}

#[rstest]
fn snapshots_for_another_tenancy_are_refused() {
    let snapshot = TenancySnapshot::from_json(MINIMAL).expect("snapshot should parse");

    snapshot
        .ensure_tenancy(&CompartmentId::new(TENANCY).expect("valid id"))
        .expect("matching tenancy should be accepted");
    let err = snapshot
        .ensure_tenancy(&CompartmentId::new("ocid1.tenancy.oc1..other").expect("valid id"))
        .expect_err("mismatched tenancy should be refused");

    assert!(matches!(
        err,
        SnapshotError::TenancyMismatch { snapshot: ref declared, ref configured }
            if declared == TENANCY && configured == "ocid1.tenancy.oc1..other"
    ));
}
