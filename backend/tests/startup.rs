//! Runs the `linktree` binary far enough to load and validate settings.
//!
//! Each case fails startup before a socket is bound, so no port is needed.

use std::process::{Command, Output};

use rstest::rstest;

const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

fn run_with(env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_linktree"));
    for key in [
        "LINKTREE_DATABASE_URL",
        "LINKTREE_SECRET_KEY_FILE",
        "LINKTREE_BIND_ADDR",
        "LINKTREE_TOKEN_TTL_SECS",
        "LINKTREE_ALLOW_EPHEMERAL_SECRET",
        "LINKTREE_DB_MAX_CONNECTIONS",
    ] {
        command.env_remove(key);
    }
    command
        .env("LINKTREE_SECRET_KEY", SECRET)
        .envs(env.iter().copied())
        .output()
        .expect("spawn linktree binary")
}

#[rstest]
fn zero_token_lifetime_aborts_startup() {
    let output = run_with(&[("LINKTREE_TOKEN_TTL_SECS", "0")]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("LINKTREE_TOKEN_TTL_SECS must be greater than zero"),
        "unexpected stderr: {stderr}"
    );
}

#[rstest]
fn short_secret_aborts_startup() {
    let output = run_with(&[("LINKTREE_SECRET_KEY", "short")]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("failed to resolve signing secret"),
        "unexpected stderr: {stderr}"
    );
}
