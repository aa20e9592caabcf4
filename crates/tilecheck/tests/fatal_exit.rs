//! Runs the fatal path in a child copy of this test binary and checks the
//! exit status it leaves behind.

use assert_cmd::Command;
use tilecheck_engine::fatal::{self, Status};
use tilecheck_engine::tiled::{TileCoord, TiledError};

const CHILD_ENV: &str = "TILECHECK_FATAL_CHILD";

/// Expected process exit code, as the host reports it.
fn reported(status: Status) -> i32 {
    let code = status.exit_code();
    if cfg!(unix) { code & 0xFF } else { code }
}

fn run_child(case: &str) -> assert_cmd::assert::Assert {
    let exe = std::env::current_exe().unwrap();
    Command::new(exe)
        .args(["--exact", "child_entry", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, case)
        .env("RUST_LOG", "off")
        .assert()
}

/// Entry point of the child process; a no-op in the parent run.
#[test]
fn child_entry() {
    let Some(case) = std::env::var_os(CHILD_ENV) else {
        return;
    };
    match case.to_str() {
        Some("unmapped-write") => {
            let err = anyhow::Error::new(TiledError::TileNotMapped(TileCoord::new(1, 0)))
                .context("failed to write the tile");
            fatal::fail(err);
        }
        Some("success-status") => fatal::terminate(Status::OK),
        _ => panic!("unknown child case {case:?}"),
    }
}

#[test]
fn unmapped_write_exits_with_invalid_argument() {
    let expected = reported(Status::E_INVALIDARG);
    assert_ne!(expected, 0);
    run_child("unmapped-write").failure().code(expected);
}

#[test]
fn terminate_never_reports_success() {
    run_child("success-status")
        .failure()
        .code(reported(Status::E_UNEXPECTED));
}
