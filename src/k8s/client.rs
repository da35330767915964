//! Kubernetes client construction

use crate::utils::errors::{Result, SgError};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;

/// Build a client from `kubeconfig`, or from kube's default lookup
/// (`KUBECONFIG`, `~/.kube/config`, in-cluster service account) when `None`.
/// `context` selects a kubeconfig context other than the current one.
pub async fn config_client(kubeconfig: Option<&Path>, context: Option<&str>) -> Result<Client> {
    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        cluster: None,
        user: None,
    };

    let config = match kubeconfig {
        Some(path) => {
            tracing::debug!("loading kubeconfig from {}", path.display());
            let kubeconfig = read_kubeconfigs(path)?;
            Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| SgError::Config(format!("failed to build config: {}", e)))?
        }
        None if options.context.is_some() => Config::from_kubeconfig(&options)
            .await
            .map_err(|e| SgError::Config(format!("failed to build config: {}", e)))?,
        None => Config::infer()
            .await
            .map_err(|e| SgError::Config(format!("failed to infer config: {}", e)))?,
    };

    tracing::debug!("connecting to {}", config.cluster_url);
    Client::try_from(config).map_err(|e| SgError::Config(format!("failed to create client: {}", e)))
}

/// Read a kubeconfig path, or a `KUBECONFIG`-style path list merged in order
fn read_kubeconfigs(paths: &Path) -> Result<Kubeconfig> {
    let mut merged: Option<Kubeconfig> = None;
    for path in std::env::split_paths(paths.as_os_str()).filter(|p| !p.as_os_str().is_empty()) {
        let next = Kubeconfig::read_from(&path).map_err(|e| {
            SgError::Config(format!("failed to load kubeconfig {}: {}", path.display(), e))
        })?;
        merged = Some(match merged {
            Some(config) => config
                .merge(next)
                .map_err(|e| SgError::Config(format!("failed to merge kubeconfig {}: {}", path.display(), e)))?,
            None => next,
        });
    }
    merged.ok_or_else(|| SgError::Config("kubeconfig path cannot be empty".to_string()))
}

/// Turn a 404 from the API into [`SgError::NotFound`]
pub(crate) fn not_found_or(
    err: kube::Error,
    resource_type: &'static str,
    name: &str,
    namespace: &str,
) -> SgError {
    match err {
        kube::Error::Api(ref status) if status.code == 404 => {
            SgError::not_found(resource_type, name, namespace)
        }
        other => SgError::Kube(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_kubeconfig_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let Err(err) = config_client(Some(&dir.path().join("nope")), None).await else {
            panic!("expected an error for a missing kubeconfig");
        };
        assert!(matches!(err, SgError::Config(_)));
    }

    #[tokio::test]
    async fn test_unknown_context_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(
            &path,
            r#"apiVersion: v1
kind: Config
clusters:
- name: lab
  cluster:
    server: https://127.0.0.1:6443
contexts:
- name: lab
  context:
    cluster: lab
    user: ops
current-context: lab
users:
- name: ops
  user:
    token: abc
"#,
        )
        .unwrap();

        let Err(err) = config_client(Some(&path), Some("missing")).await else {
            panic!("expected an error for an unknown context");
        };
        assert!(matches!(err, SgError::Config(_)));
    }

    #[tokio::test]
    async fn test_kubeconfig_path_list_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let clusters = dir.path().join("clusters");
        let users = dir.path().join("users");
        std::fs::write(
            &clusters,
            r#"apiVersion: v1
kind: Config
clusters:
- name: lab
  cluster:
    server: https://127.0.0.1:6443
contexts:
- name: lab
  context:
    cluster: lab
    user: ops
current-context: lab
"#,
        )
        .unwrap();
        std::fs::write(
            &users,
            r#"apiVersion: v1
kind: Config
users:
- name: ops
  user:
    token: abc
"#,
        )
        .unwrap();

        let list = std::env::join_paths([&clusters, &users]).unwrap();
        let merged = read_kubeconfigs(Path::new(&list)).unwrap();
        assert_eq!(merged.current_context.as_deref(), Some("lab"));
        assert_eq!(merged.clusters.len(), 1);
        assert_eq!(merged.auth_infos.len(), 1);

        assert!(config_client(Some(Path::new(&list)), None).await.is_ok());
    }

    #[tokio::test]
    async fn test_client_build_failure_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(
            &path,
            r#"apiVersion: v1
kind: Config
clusters:
- name: lab
  cluster:
    server: https://127.0.0.1:6443
    proxy-url: ftp://127.0.0.1:2121
contexts:
- name: lab
  context:
    cluster: lab
    user: ops
current-context: lab
users:
- name: ops
  user:
    token: abc
"#,
        )
        .unwrap();

        let Err(err) = config_client(Some(&path), None).await else {
            panic!("expected an unsupported proxy to fail");
        };
        assert!(matches!(err, SgError::Config(_)));
    }
}
