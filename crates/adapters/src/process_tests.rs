// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sh(script: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    cmd
}

#[tokio::test]
async fn successful_process_reports_zero() {
    let code = run_streaming(sh("echo hello; echo oops >&2"), Duration::from_secs(10))
        .await
        .unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn exit_code_is_passed_through() {
    let code = run_streaming(sh("exit 3"), Duration::from_secs(10))
        .await
        .unwrap();
    assert_eq!(code, 3);
}

#[tokio::test]
async fn missing_program_is_launch_error() {
    let result = run_streaming(
        Command::new("/nonexistent/upem-test-binary"),
        Duration::from_secs(10),
    )
    .await;
    assert!(matches!(result, Err(ProcessError::Launch { .. })));
}

#[tokio::test]
async fn long_running_process_times_out() {
    let start = std::time::Instant::now();
    let result = run_streaming(sh("sleep 30"), Duration::from_millis(200)).await;

    assert!(matches!(result, Err(ProcessError::Timeout { .. })));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn large_output_does_not_block() {
    // Enough output to fill a pipe buffer several times over
    let code = run_streaming(
        sh("i=0; while [ $i -lt 5000 ]; do echo line $i; echo err $i >&2; i=$((i+1)); done"),
        Duration::from_secs(30),
    )
    .await
    .unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn failed_forwarder_is_counted_not_fatal() {
    let ok = tokio::spawn(async {});
    let stuck = tokio::spawn(std::future::pending::<()>());
    stuck.abort();

    assert_eq!(join_forwarders([ok, stuck]).await, 1);
}

#[tokio::test]
async fn clean_forwarders_report_no_failures() {
    let tasks = (0..2).map(|_| tokio::spawn(async {}));
    assert_eq!(join_forwarders(tasks).await, 0);
}
