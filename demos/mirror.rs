//! Example mirroring the top of a Debian suite
//!
//! Fetches the release files of a suite in parallel, then reads the package
//! index through whichever compressed variant the mirror provides.

use color_eyre::Result;
use fetchpool::download::Status;
use fetchpool::{result_channel, DownloaderBuilder};
use reqwest::Url;
use std::io::Read;
use tracing_subscriber::EnvFilter;

const MIRROR: &str = "http://deb.debian.org/debian/dists/stable";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let downloader = DownloaderBuilder::new()
        .workers(3)
        .on_complete(|summary| {
            if let Status::Fail(msg) | Status::HashMismatch(msg) = summary.status() {
                eprintln!("{}: {}", summary.url(), msg);
            }
        })
        .build()?;

    // Queue the release files; each one reports on its own channel.
    let mut pending = Vec::new();
    for name in ["Release", "Release.gpg", "InRelease"] {
        let (tx, rx) = result_channel();
        let url = Url::parse(&format!("{}/{}", MIRROR, name))?;
        downloader
            .download(url, format!("mirror/dists/stable/{}", name), tx)
            .await;
        pending.push((name, rx));
    }

    for (name, rx) in pending {
        match rx.await? {
            Ok(()) => println!("{} committed", name),
            Err(e) => println!("{} failed: {}", name, e),
        }
    }

    let mut packages = downloader
        .download_try_compression(&format!("{}/main/binary-all/Packages", MIRROR))
        .await?;
    let mut index = String::new();
    packages.read_to_string(&mut index)?;
    println!(
        "Packages ({}) lists {} packages",
        packages.compression(),
        index.matches("\nPackage: ").count() + 1
    );

    downloader.shutdown().await;
    Ok(())
}
