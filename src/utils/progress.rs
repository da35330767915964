//! Spinner for long-running cluster calls

use crate::utils::errors::{Result, SgError};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::future::Future;
use std::time::Duration;

const FREQUENCY: Duration = Duration::from_millis(100);
const FRAMES: &[&str] = &["∙∙∙", "●∙∙", "∙●∙", "∙∙●", "∙∙∙"];
// `{msg}` carries its own ": " so the line reads `prefix: message ∙●∙`
const TEMPLATE: &str = "{prefix}{msg} {spinner:.green}";

/// A spinner with a fixed prefix and preset success / failure lines
pub struct Spinner {
    pb: ProgressBar,
    done_style: ProgressStyle,
    success_msg: String,
    fail_msg: String,
}

/// Build a spinner.
///
/// `prefix` is what the spinner is working on, `success_msg` is printed as
/// `✓  <msg>` by [`Spinner::stop`] and `fail_msg` as `✗  <msg>` by
/// [`Spinner::stop_fail`].
pub fn spinner_config(prefix: &str, success_msg: &str, fail_msg: &str) -> Result<Spinner> {
    let style = ProgressStyle::with_template(TEMPLATE)
        .map_err(|e| SgError::Spinner(e.to_string()))?
        .tick_strings(FRAMES);
    let done_style =
        ProgressStyle::with_template("{prefix}\n{msg}").map_err(|e| SgError::Spinner(e.to_string()))?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_prefix(prefix.to_string());

    Ok(Spinner {
        pb,
        done_style,
        success_msg: success_msg.to_string(),
        fail_msg: fail_msg.to_string(),
    })
}

impl Spinner {
    /// Never draw anything, for quiet runs and non-interactive output
    pub fn hidden(self) -> Self {
        self.pb.set_draw_target(ProgressDrawTarget::hidden());
        self
    }

    pub fn start(&self) {
        self.pb.enable_steady_tick(FREQUENCY);
    }

    /// Message shown after the spinner, rendered as `: <msg>`
    pub fn message(&self, msg: &str) {
        if msg.is_empty() {
            self.pb.set_message(String::new());
        } else {
            self.pb.set_message(format!(": {}", msg));
        }
    }

    pub fn current_message(&self) -> String {
        self.pb.message().trim_start_matches(": ").to_string()
    }

    pub fn prefix(&self) -> String {
        self.pb.prefix()
    }

    pub fn stop(&self) {
        self.finish(format!("✓  {}", self.success_msg).green().to_string());
    }

    pub fn stop_fail(&self) {
        self.finish(format!("✗  {}", self.fail_msg).red().to_string());
    }

    pub fn is_finished(&self) -> bool {
        self.pb.is_finished()
    }

    fn finish(&self, line: String) {
        self.pb.set_style(self.done_style.clone());
        self.pb.finish_with_message(line);
    }
}

/// Run `op` under `spinner`, stopping with success or failure to match its result
pub async fn with_spinner<F, T, E>(spinner: &Spinner, op: F) -> std::result::Result<T, E>
where
    F: Future<Output = std::result::Result<T, E>>,
{
    spinner.start();
    let result = op.await;
    match &result {
        Ok(_) => spinner.stop(),
        Err(_) => spinner.stop_fail(),
    }
    result
}
