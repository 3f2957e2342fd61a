//! The default sequence: Boost first, then flip, stopping at the first failure.
//!
//! The command runner, git and HTTP are replaced with in-memory fakes so the
//! ordering can be observed without a toolchain or network.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tpsetup_cli::{CliConfig, CliError, bootstrap, handlers};
use tpsetup_core::Platform;
use tpsetup_runtime::flip::read_local_commit;
use tpsetup_runtime::{
    ArchiveFetcher, BuildStep, CommandRunner, ProvisionResult, SubmoduleSource,
};
use zip::write::SimpleFileOptions;

#[derive(Clone, Default)]
struct RecordingRunner {
    steps: Arc<Mutex<Vec<&'static str>>>,
}

impl CommandRunner for RecordingRunner {
    fn run(&self, step: &BuildStep) -> ProvisionResult<()> {
        self.steps.lock().unwrap().push(step.label);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct CountingSubmodule {
    queries: Arc<AtomicUsize>,
}

impl SubmoduleSource for CountingSubmodule {
    fn status(&self, submodule_path: &str) -> ProvisionResult<String> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            " aaaaaaaaaa5f3c2e1d0b9a8f7e6d5c4b3a2f1e {submodule_path} (heads/master)\n"
        ))
    }
}

#[derive(Clone, Default)]
struct ZipFetcher {
    requests: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ArchiveFetcher for ZipFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> ProvisionResult<u64> {
        self.requests.lock().unwrap().push(url.to_string());

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("include/flip/Document.h", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"#pragma once\n").unwrap();
        let body = writer.finish().unwrap().into_inner();

        fs::write(dest, &body).unwrap();
        Ok(body.len() as u64)
    }
}

fn config_for(root: &Path) -> CliConfig {
    CliConfig {
        root: Some(root.to_path_buf()),
        ..CliConfig::default()
    }
}

#[tokio::test]
async fn test_boost_failure_stops_before_flip() {
    if Platform::detect().is_err() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let runner = RecordingRunner::default();
    let submodule = CountingSubmodule::default();
    let fetcher = ZipFetcher::default();

    let ctx = bootstrap(&config_for(dir.path()))
        .unwrap()
        .with_runner(runner.clone())
        .with_submodules(submodule.clone())
        .with_fetcher(fetcher.clone());

    // ThirdParty/boost is missing
    let err = handlers::run::execute(&ctx).await.unwrap_err();

    assert_eq!(CliError::from_anyhow(&err).exit_code(), 74);
    assert!(runner.steps.lock().unwrap().is_empty());
    assert_eq!(submodule.queries.load(Ordering::SeqCst), 0);
    assert!(fetcher.requests.lock().unwrap().is_empty());
    assert!(!ctx.layout.sync_library_dir().exists());
}

#[tokio::test]
async fn test_successful_build_is_followed_by_flip() {
    let Ok(platform) = Platform::detect() else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let runner = RecordingRunner::default();
    let submodule = CountingSubmodule::default();
    let fetcher = ZipFetcher::default();

    let ctx = bootstrap(&config_for(dir.path()))
        .unwrap()
        .with_runner(runner.clone())
        .with_submodules(submodule.clone())
        .with_fetcher(fetcher.clone());
    fs::create_dir_all(ctx.layout.static_library_dir()).unwrap();

    handlers::run::execute(&ctx).await.unwrap();

    let expected: Vec<&str> = ctx.recipe().steps.iter().map(|s| s.label).collect();
    assert_eq!(*runner.steps.lock().unwrap(), expected);
    assert_eq!(submodule.queries.load(Ordering::SeqCst), 1);

    let requests = fetcher.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert!(
        requests[0].ends_with(&format!("flip-demo-{}-aaaaaaaaaa.zip", platform.archive_tag())),
        "{requests:?}"
    );
    assert_eq!(read_local_commit(&ctx.layout.marker_path()), "aaaaaaaaaa");
    assert!(
        ctx.layout
            .sync_library_dir()
            .join("include/flip/Document.h")
            .is_file()
    );
}
