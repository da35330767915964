//! Command implementations for the sg-toolbox CLI

pub mod image;
pub mod list;
pub mod pod;
pub mod secret;
pub mod service;

use crate::config::Settings;
use crate::k8s::{config_client, NameFilter};
use crate::utils::{confirm_unless, dryrun, spinner_config, Spinner};
use anyhow::{Context as _, Result};
use clap::Args;
use kube::Client;
use std::path::{Path, PathBuf};

/// Group / node / row flags shared by the listing commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Storage group to match, e.g. sg-1
    #[arg(long)]
    pub group: Option<String>,

    /// Node to match, e.g. host-1
    #[arg(long)]
    pub node: Option<String>,

    /// Row to match (with --node), looked up in the row file
    #[arg(long)]
    pub row: Option<String>,

    /// Row list file, lines of "<row> <sg-name>,"
    #[arg(long)]
    pub row_file: Option<PathBuf>,
}

/// Options resolved from the command line and the settings file
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    pub namespace: String,
    pub kubeconfig: Option<PathBuf>,
    pub kube_context: Option<String>,
    pub quiet: bool,
}

impl Context {
    pub fn new(
        settings: Settings,
        namespace: Option<String>,
        kubeconfig: Option<PathBuf>,
        kube_context: Option<String>,
        quiet: bool,
    ) -> Self {
        let namespace = namespace.unwrap_or_else(|| settings.defaults.namespace.clone());
        let kubeconfig = resolve_kubeconfig(
            kubeconfig,
            std::env::var_os("KUBECONFIG").is_some(),
            &settings,
        );
        Self {
            settings,
            namespace,
            kubeconfig,
            kube_context,
            quiet,
        }
    }

    pub async fn client(&self) -> Result<Client> {
        config_client(self.kubeconfig.as_deref(), self.kube_context.as_deref())
            .await
            .context("Failed to create Kubernetes client")
    }

    /// Ask before a destructive action unless running quiet or configured not to
    pub fn confirm(&self, question: &str) -> Result<bool> {
        let skip = self.quiet || !self.settings.behavior.confirm_destructive;
        Ok(confirm_unless(skip, question)?)
    }

    pub fn spinner(&self, prefix: &str, success_msg: &str, fail_msg: &str) -> Result<Spinner> {
        let spinner = spinner_config(prefix, success_msg, fail_msg)?;
        if self.quiet || !self.settings.behavior.show_progress {
            Ok(spinner.hidden())
        } else {
            Ok(spinner)
        }
    }

    /// Spinner for a change that `--dry-run` skips; a skipped change never
    /// reports its success line
    pub fn change_spinner(&self, prefix: &str, success_msg: &str, fail_msg: &str) -> Result<Spinner> {
        self.spinner(prefix, &change_success_msg(success_msg, dryrun::is_dry_run()), fail_msg)
    }

    /// Build the name filter; `--row-file` falls back to `defaults.row_file`
    pub fn filter(&self, args: &FilterArgs) -> Result<NameFilter> {
        let row_file = args
            .row_file
            .as_deref()
            .or_else(|| self.settings.defaults.row_file.as_deref().map(Path::new));
        Ok(NameFilter::new(
            args.group.as_deref().unwrap_or_default(),
            args.node.as_deref().unwrap_or_default(),
            args.row.as_deref().unwrap_or_default(),
            row_file,
        )?)
    }
}

fn change_success_msg(success_msg: &str, dry_run: bool) -> String {
    if dry_run {
        "dry run, nothing changed".to_string()
    } else {
        success_msg.to_string()
    }
}

/// `--kubeconfig` wins; `defaults.kubeconfig` only applies when `KUBECONFIG`
/// is unset too, so kube's inference still sees the env var.
fn resolve_kubeconfig(flag: Option<PathBuf>, env_set: bool, settings: &Settings) -> Option<PathBuf> {
    if flag.is_some() || env_set {
        return flag;
    }
    settings.defaults.kubeconfig.as_ref().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn context(settings: Settings) -> Context {
        Context::new(settings, None, None, None, true)
    }

    #[test]
    fn test_namespace_falls_back_to_settings() {
        let mut settings = Settings::default();
        settings.defaults.namespace = "sg-lab".to_string();
        assert_eq!(context(settings.clone()).namespace, "sg-lab");

        let ctx = Context::new(settings, Some("other".to_string()), None, None, false);
        assert_eq!(ctx.namespace, "other");
    }

    #[test]
    fn test_kubeconfig_falls_back_to_settings() {
        let mut settings = Settings::default();
        settings.defaults.kubeconfig = Some("/etc/sg/kubeconfig".to_string());
        assert_eq!(
            resolve_kubeconfig(None, false, &settings).as_deref(),
            Some(Path::new("/etc/sg/kubeconfig"))
        );
        assert_eq!(resolve_kubeconfig(None, true, &settings), None);
        assert_eq!(
            resolve_kubeconfig(Some(PathBuf::from("/tmp/kc")), true, &settings).as_deref(),
            Some(Path::new("/tmp/kc"))
        );
    }

    #[test]
    fn test_quiet_skips_confirmation() {
        assert!(context(Settings::default()).confirm("Delete?").unwrap());
    }

    #[test]
    fn test_filter_uses_settings_row_file() {
        let mut rows = tempfile::NamedTempFile::new().unwrap();
        writeln!(rows, "r1 sg-5,").unwrap();

        let mut settings = Settings::default();
        settings.defaults.row_file = Some(rows.path().to_string_lossy().into_owned());
        let ctx = context(settings);

        let args = FilterArgs {
            node: Some("host-2".to_string()),
            row: Some("r1".to_string()),
            ..FilterArgs::default()
        };
        let filter = ctx.filter(&args).unwrap();
        assert!(filter.matches_name("sg-5-host-2-a-b").unwrap());
        assert!(!filter.matches_name("sg-6-host-2-a-b").unwrap());
    }

    #[test]
    fn test_change_success_msg_in_dry_run() {
        assert_eq!(change_success_msg("sg-1-host-1-a-b deleted", false), "sg-1-host-1-a-b deleted");
        let skipped = change_success_msg("sg-1-host-1-a-b deleted", true);
        assert!(!skipped.contains("deleted"));
        assert!(skipped.contains("dry run"));
    }

    #[test]
    fn test_filter_rejects_bad_group() {
        let ctx = context(Settings::default());
        let args = FilterArgs {
            group: Some("sg1".to_string()),
            ..FilterArgs::default()
        };
        assert!(ctx.filter(&args).is_err());
    }
}
