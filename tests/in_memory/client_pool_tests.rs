//! Per-region client construction.

use super::helpers::{ASHBURN, PHOENIX, cloud, context};
use oci_compute_tools::compute::{
    adapters::memory::{InMemoryCloud, InMemoryConnector},
    domain::{RegionError, RegionId},
    ports::ProviderClient,
    services::RegionClientPool,
};
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

fn pool(cloud: &InMemoryCloud) -> Arc<RegionClientPool<InMemoryConnector>> {
    Arc::new(RegionClientPool::new(cloud.connector(), context(ASHBURN)))
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_requests_construct_one_client(cloud: InMemoryCloud) {
    cloud
        .set_connect_delay(Duration::from_millis(50))
        .expect("connect delay");
    let shared = pool(&cloud);

    let mut tasks = JoinSet::new();
    for _ in 0..32 {
        let worker = Arc::clone(&shared);
        tasks.spawn(async move { worker.get_client(Some(PHOENIX)).await });
    }

    let mut clients = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        clients.push(joined.expect("task should not panic").expect("client should build"));
    }

    assert_eq!(cloud.connect_count(), 1);
    assert_eq!(clients.len(), 32);
    assert!(
        clients
            .iter()
            .all(|client| Arc::ptr_eq(client, clients.first().expect("at least one client")))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn no_region_means_the_default_region(cloud: InMemoryCloud) {
    let shared = pool(&cloud);

    let client = shared.get_client(None).await.expect("client should build");

    assert_eq!(client.region().as_str(), ASHBURN);
    assert_eq!(
        shared.cached_regions().expect("cache readable"),
        vec![RegionId::new(ASHBURN).expect("valid region")]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_region_gets_its_own_client(cloud: InMemoryCloud) {
    let shared = pool(&cloud);

    let ashburn = shared.get_client(None).await.expect("client should build");
    let phoenix = shared.get_client(Some(PHOENIX)).await.expect("client should build");
    let again = shared.get_client(Some(ASHBURN)).await.expect("client should build");

    assert!(Arc::ptr_eq(&ashburn, &again));
    assert!(!Arc::ptr_eq(&ashburn, &phoenix));
    assert_eq!(cloud.connect_count(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_region_codes_never_reach_the_connector(cloud: InMemoryCloud) {
    let err = pool(&cloud)
        .get_client(Some("moon-base"))
        .await
        .expect_err("region should be rejected");

    assert_eq!(err, RegionError::InvalidRegion("moon-base".to_owned()));
    assert_eq!(cloud.connect_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_construction_is_reported_and_not_cached(cloud: InMemoryCloud) {
    let phoenix = RegionId::new(PHOENIX).expect("valid region");
    cloud
        .make_unreachable(phoenix.clone(), "endpoint unreachable")
        .expect("make unreachable");
    let shared = pool(&cloud);

    let err = shared
        .get_client(Some(PHOENIX))
        .await
        .expect_err("construction should fail");

    assert_eq!(
        err,
        RegionError::Connect {
            region: PHOENIX.to_owned(),
            message: "endpoint unreachable".to_owned(),
        }
    );
    assert!(shared.cached_regions().expect("cache readable").is_empty());
    assert_eq!(shared.slot_count().expect("cache readable"), 0);

    shared
        .get_client(Some(PHOENIX))
        .await
        .expect_err("second attempt should also fail");
    assert_eq!(cloud.connect_count(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn regions_that_never_connect_leave_no_slots_behind(cloud: InMemoryCloud) {
    let unreachable = ["xx-nowhere-1", "xx-nowhere-2", "xx-nowhere-3"];
    for code in unreachable {
        cloud
            .make_unreachable(RegionId::new(code).expect("valid region"), "no such region")
            .expect("make unreachable");
    }
    let shared = pool(&cloud);

    for code in unreachable {
        shared
            .get_client(Some(code))
            .await
            .expect_err("construction should fail");
    }
    shared.get_client(None).await.expect("client should build");

    assert_eq!(shared.slot_count().expect("cache readable"), 1);
    assert_eq!(
        shared.cached_regions().expect("cache readable"),
        vec![RegionId::new(ASHBURN).expect("valid region")]
    );
}
