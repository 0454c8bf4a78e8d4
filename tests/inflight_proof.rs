//! Many concurrent requests in flight when termination arrives: every one of
//! them must still get its response.

use axum::http::StatusCode;
use std::time::Duration;

use gracewrap::Graceful;

mod common;

async fn run_proof(requests: usize, processing: Duration) {
    let graceful = Graceful::new(common::config(Duration::from_secs(10)));
    let (router, probe) = common::slow_router(processing);
    let addr = graceful.wrap_http(router, "127.0.0.1:0").await.unwrap();
    let client = reqwest::Client::new();

    let in_flight: Vec<_> = (0..requests)
        .map(|_| {
            let client = client.clone();
            let url = format!("http://{addr}/slow");
            tokio::spawn(async move { client.get(url).send().await })
        })
        .collect();

    assert!(
        common::eventually(Duration::from_secs(5), || graceful.in_flight() == requests as u64).await,
        "only {} of {requests} requests started",
        graceful.in_flight()
    );

    let report = graceful.shutdown().await;
    assert!(report.drained, "{report:?}");

    let mut completed = 0;
    for request in in_flight {
        let response = request.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        completed += 1;
    }

    assert_eq!(completed, requests);
    assert_eq!(probe.completed(), requests);
    assert_eq!(graceful.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn quick_requests_all_complete() {
    run_proof(100, Duration::from_millis(300)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slow_requests_all_complete() {
    run_proof(25, Duration::from_millis(1_000)).await;
}
