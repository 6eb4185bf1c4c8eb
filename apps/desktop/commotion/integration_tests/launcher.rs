// ============================================================================
// End-to-end tests that run the real `commotion` binary as separate processes
// ============================================================================

use std::fs::read_to_string;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

use tempfile::TempDir;

const COMMOTION_BIN: &str = env!("CARGO_BIN_EXE_commotion");
const WAIT_LIMIT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Kills the child on drop so a failed assertion never leaks a primary.
struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn launcher(config_dir: &Path, log_file: &Path, key: &str) -> Command {
    let mut command = Command::new(COMMOTION_BIN);
    command
        .arg("--config-dir")
        .arg(config_dir)
        .arg("--logfile")
        .arg(log_file)
        .arg("--key")
        .arg(key)
        .arg("--verbose")
        .arg("4")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

fn wait_for_log(log_file: &Path, needle: &str) -> bool {
    let started = Instant::now();
    while started.elapsed() < WAIT_LIMIT {
        if read_to_string(log_file).is_ok_and(|contents| contents.contains(needle)) {
            return true;
        }
        sleep(POLL_INTERVAL);
    }
    false
}

/// Temp dir names are unique, so keys derived from them are too.
fn unique_key(dir: &TempDir) -> String {
    let name = dir
        .path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("e2e{name}")
}

/// **VALUE**: Two real processes with one key: the second hands off and exits 1,
/// the first shows its window.
///
/// **WHY THIS MATTERS**: This is the only test where the lock and the channel
/// cross a real process boundary, which is how users hit them.
///
/// **BUG THIS CATCHES**: Locks or channels that only work within one process
/// (for example a lock kept in a static instead of on the file).
#[test]
fn given_running_daemon_when_second_process_launched_then_it_forwards_and_exits_one() {
    // GIVEN: A daemon primary that is listening
    let dir = TempDir::new().expect("temp dir");
    let key = unique_key(&dir);
    let primary_log = dir.path().join("primary.log");
    let secondary_log = dir.path().join("secondary.log");

    let primary = launcher(dir.path(), &primary_log, &key)
        .arg("--daemon")
        .spawn()
        .expect("spawn primary");
    let _primary = ChildGuard(primary);
    assert!(
        wait_for_log(&primary_log, "Message server listening"),
        "primary never started listening"
    );

    // WHEN: A second process is launched with the same key
    let status = launcher(dir.path(), &secondary_log, &key)
        .status()
        .expect("run secondary");

    // THEN: The secondary exits with 1 and the primary shows its window
    assert_eq!(status.code(), Some(1), "secondary must exit with code 1");
    assert!(
        wait_for_log(&secondary_log, "running as secondary"),
        "secondary should have found the lock held"
    );
    assert!(
        wait_for_log(&primary_log, "shown"),
        "primary should show its window after showMain"
    );
}

#[test]
fn given_blank_key_when_launched_then_exits_one() {
    let dir = TempDir::new().expect("temp dir");

    let status = launcher(dir.path(), &dir.path().join("blank.log"), "   ")
        .status()
        .expect("run launcher");

    assert_eq!(status.code(), Some(1));
}
