//! OS signal delivery triggers the drain.

#![cfg(unix)]

use std::process::Command;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};

use gracewrap::{Graceful, Phase};

mod common;

#[tokio::test]
async fn sigterm_triggers_shutdown() {
    // Keep a handler registered for the whole test so the signal can never
    // fall through to the default action and kill the test binary.
    let _guard = signal(SignalKind::terminate()).unwrap();

    let graceful = Graceful::new(common::config(Duration::from_secs(1)));
    let waiter = {
        let graceful = graceful.clone();
        tokio::spawn(async move { graceful.wait(std::future::pending()).await })
    };

    // Give the waiter time to install its own listener.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(graceful.phase(), Phase::Running);

    let sent = Command::new("kill")
        .args(["-TERM", &std::process::id().to_string()])
        .status();
    if !sent.map(|status| status.success()).unwrap_or(false) {
        eprintln!("skipping: unable to deliver SIGTERM in this environment");
        return;
    }

    let report = tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .expect("wait did not return after SIGTERM")
        .unwrap();

    assert!(report.drained);
    assert!(!graceful.is_ready());
    assert!(graceful.phase().is_stopped());
}
