// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use upem_core::config::{
    ENV_ADDRESS, ENV_DOWNLOADS_DIR, ENV_LISTEN_ADDR, ENV_PASSWORD, ENV_USERNAME,
};

fn test_config(downloads: &Path) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        (ENV_ADDRESS, "10.0.0.1".to_string()),
        (ENV_USERNAME, "viewer".to_string()),
        (ENV_PASSWORD, "secret".to_string()),
        (ENV_LISTEN_ADDR, "127.0.0.1:0".to_string()),
        (ENV_DOWNLOADS_DIR, downloads.display().to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

async fn http_get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", path);
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn startup_creates_downloads_root() {
    let dir = tempfile::tempdir().unwrap();
    let downloads = dir.path().join("nested/downloads");

    let daemon = startup(&test_config(&downloads)).await.unwrap();

    assert!(downloads.is_dir());
    assert!(daemon.scheduler().is_empty());
    assert_ne!(daemon.local_addr().unwrap().port(), 0);
}

#[tokio::test]
async fn serves_api_and_discards_events_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = startup(&test_config(dir.path())).await.unwrap();
    let addr = daemon.local_addr().unwrap();
    let scheduler = daemon.scheduler().clone();
    scheduler.extend("porch", None, None, vec![]);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(daemon.serve(async move {
        let _ = stop_rx.await;
    }));

    let response = http_get(addr, "/health").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.contains(r#""active_events":1"#), "{}", response);

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
    assert!(scheduler.is_empty());
}

#[tokio::test]
async fn bind_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut config = test_config(dir.path());
    config.listen_addr = taken.local_addr().unwrap();

    let result = startup(&config).await;

    assert!(matches!(result, Err(LifecycleError::BindFailed(_, _))));
}

#[test]
fn build_scheduler_uses_configured_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.defaults.future_minutes = 2;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        let scheduler = build_scheduler(&config);
        let outcome = scheduler.extend("porch", None, None, vec![]);
        assert_eq!(outcome.fires_in.as_secs(), 120);
        scheduler.shutdown();
    });
}

#[test]
fn log_path_is_split_into_dir_and_file() {
    assert_eq!(
        split_log_path(Path::new("/var/log/upem.log")).unwrap(),
        (PathBuf::from("/var/log"), PathBuf::from("upem.log"))
    );
    assert_eq!(
        split_log_path(Path::new("upem.log")).unwrap(),
        (PathBuf::from("."), PathBuf::from("upem.log"))
    );
    assert!(split_log_path(Path::new("/")).is_err());
}
