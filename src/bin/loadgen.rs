//! Load generator for the gracewrap demo service.
//!
//! Keeps requests in flight against the demo API so a drain can be watched
//! on `/metrics` or in the logs.

use clap::{Parser, ValueEnum};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "loadgen")]
#[command(about = "Generate load against the gracewrap demo service", long_about = None)]
struct Cli {
    /// Load profile
    #[arg(value_enum)]
    mode: Mode,

    /// Base URL of the demo service
    #[arg(long, default_value = "http://localhost:8080")]
    url: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// One quick request every 2 seconds
    Light,
    /// 10 concurrent requests every second, a third of them slow
    Heavy,
    /// One slow request every 800 ms
    Database,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    println!("Starting load generation: {:?} mode", cli.mode);
    println!("Watch metrics at: {}/metrics", cli.url);
    println!("Press Ctrl+C to stop load generation\n");

    tokio::select! {
        _ = run(cli.mode, cli.url) => {}
        _ = tokio::signal::ctrl_c() => println!("\nStopping load generation"),
    }
    Ok(())
}

async fn run(mode: Mode, base: String) {
    match mode {
        Mode::Light => light(&base).await,
        Mode::Heavy => heavy(&base).await,
        Mode::Database => database(&base).await,
    }
}

fn client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

async fn light(base: &str) {
    let client = client(Duration::from_secs(5));
    let url = format!("{base}/api/test");

    for id in 1u64.. {
        let client = client.clone();
        let url = url.clone();
        tokio::spawn(async move {
            match client.get(&url).send().await {
                Ok(response) => {
                    let body = response.text().await.unwrap_or_default();
                    println!("Request {id}: {}", body.trim_end());
                }
                Err(e) => println!("Request {id} failed: {e}"),
            }
        });
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}

async fn heavy(base: &str) {
    let client = client(Duration::from_secs(10));
    let mut id = 0u64;

    loop {
        for _ in 0..10 {
            id += 1;
            let endpoint = if id % 3 == 0 { "/api/database" } else { "/api/test" };
            let url = format!("{base}{endpoint}");
            let client = client.clone();
            tokio::spawn(async move {
                match client.get(&url).send().await {
                    Ok(response) if response.status().is_success() => {
                        println!("Request {id} succeeded ({endpoint})");
                    }
                    Ok(response) => {
                        println!("Request {id} status {} ({endpoint})", response.status());
                    }
                    Err(e) => println!("Request {id} failed: {e}"),
                }
            });
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

async fn database(base: &str) {
    let client = client(Duration::from_secs(15));
    let url = format!("{base}/api/database");

    for id in 1u64.. {
        let client = client.clone();
        let url = url.clone();
        tokio::spawn(async move {
            let start = Instant::now();
            match client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    println!("DB request {id} completed in {:?}", start.elapsed());
                }
                Ok(response) => {
                    println!(
                        "DB request {id} status {} after {:?}",
                        response.status(),
                        start.elapsed()
                    );
                }
                Err(e) => println!("DB request {id} failed after {:?}: {e}", start.elapsed()),
            }
        });
        tokio::time::sleep(Duration::from_millis(800)).await;
    }
}
