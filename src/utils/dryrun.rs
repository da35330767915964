//! Dry-run mode utilities

use colored::Colorize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

static DRY_RUN: AtomicBool = AtomicBool::new(false);

/// Turn dry-run mode on for the rest of the process
pub fn enable() {
    DRY_RUN.store(true, Ordering::Relaxed);
}

pub fn is_dry_run() -> bool {
    DRY_RUN.load(Ordering::Relaxed)
}

/// Log a dry-run action
pub fn log_action(action: &str) {
    if is_dry_run() {
        println!("  {} {}", "[DRY RUN]".cyan().bold(), action);
    }
}

/// Await `op` unless in dry-run mode, where only `action_desc` is printed
pub async fn exec_unless_dry_run<F, E>(action_desc: &str, op: F) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
{
    if is_dry_run() {
        log_action(action_desc);
        Ok(())
    } else {
        op.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the flag is process-wide and can only be switched on.
    #[tokio::test]
    async fn test_exec_unless_dry_run() {
        assert!(!is_dry_run());

        let mut executed = false;
        let result: Result<(), String> = exec_unless_dry_run("delete pod sg-1-host-1", async {
            executed = true;
            Ok(())
        })
        .await;
        assert!(result.is_ok());
        assert!(executed);

        enable();
        assert!(is_dry_run());

        let mut executed = false;
        let result: Result<(), String> = exec_unless_dry_run("delete pod sg-1-host-1", async {
            executed = true;
            Ok(())
        })
        .await;
        assert!(result.is_ok());
        assert!(!executed);
    }
}
