// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn missing_program_is_launch_error() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = FfmpegConcatAdapter::new("/nonexistent/ffmpeg");
    let result = adapter
        .concat(&dir.path().join("list.txt"), &dir.path().join("out.mp4"))
        .await;
    assert!(matches!(result, Err(ConcatError::Launch(_))));
}

#[tokio::test]
async fn nonzero_exit_is_failure() {
    let dir = tempfile::tempdir().unwrap();
    // `false` ignores its arguments and exits 1
    let adapter = FfmpegConcatAdapter::new("false");
    let result = adapter
        .concat(&dir.path().join("list.txt"), &dir.path().join("out.mp4"))
        .await;
    assert!(matches!(result, Err(ConcatError::Failed { code: 1, .. })));
}

#[tokio::test]
async fn zero_exit_is_success() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = FfmpegConcatAdapter::new("true");
    adapter
        .concat(&dir.path().join("list.txt"), &dir.path().join("out.mp4"))
        .await
        .unwrap();
}
