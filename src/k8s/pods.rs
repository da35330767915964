//! Storage-group pod operations

use crate::config::settings::Labels;
use crate::k8s::client::not_found_or;
use crate::k8s::names::{NameFilter, StorageName};
use crate::utils::errors::{Result, SgError};
use k8s_openapi::api::core::v1::Pod;
use kube::api::{DeleteParams, ListParams, PostParams};
use kube::{Api, Client, ResourceExt};

/// Names of all pods in `namespace`
pub async fn list_pod_names(client: &Client, namespace: &str) -> Result<Vec<String>> {
    let api: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let pods = api.list(&ListParams::default()).await?;
    tracing::debug!("{} pod(s) in namespace {}", pods.items.len(), namespace);
    Ok(pods.items.iter().map(|p| p.name_any()).collect())
}

/// Pod names related to a group, a node, or both (optionally narrowed to a row)
pub async fn list_sg_pod_names(
    client: &Client,
    namespace: &str,
    filter: &NameFilter,
) -> Result<Vec<String>> {
    let names = list_pod_names(client, namespace).await?;
    let selected = filter.select(names.iter().map(String::as_str))?;
    if selected.is_empty() {
        return Err(filter.no_match("pods"));
    }
    Ok(selected)
}

/// Pods out of `pod_names` that belong to `deployment`
pub fn pods_of_deployment<'a, I>(deployment: &str, pod_names: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let deployment_name = StorageName::parse(deployment)?;
    if deployment_name.node().is_none() {
        return Err(SgError::InvalidName(deployment.to_string()));
    }

    let mut pods = Vec::new();
    for pod in pod_names {
        if deployment_name.same_deployment(&StorageName::parse(pod)?) {
            pods.push(pod.to_string());
        }
    }
    Ok(pods)
}

/// Pod names for a deployment name such as `sg-1-host-1`
pub async fn pod_names_for_deployment(
    client: &Client,
    namespace: &str,
    deployment: &str,
) -> Result<Vec<String>> {
    let names = list_pod_names(client, namespace).await?;
    let pods = pods_of_deployment(deployment, names.iter().map(String::as_str))?;
    if pods.is_empty() {
        return Err(SgError::not_found("pod", deployment, namespace));
    }
    Ok(pods)
}

/// Delete a storage-group pod; its deployment schedules a replacement
pub async fn delete_sg_pod(client: &Client, namespace: &str, pod: &str) -> Result<()> {
    let api: Api<Pod> = Api::namespaced(client.clone(), namespace);
    api.delete(pod, &DeleteParams::default())
        .await
        .map_err(|e| not_found_or(e, "pod", pod, namespace))?;
    crate::log_info!("Deleted pod {}/{}", namespace, pod);
    Ok(())
}

/// Set the active label on a pod object, returning the previous value
pub fn set_active_label(pod: &mut Pod, labels: &Labels, enabled: bool) -> Option<String> {
    let value = if enabled {
        &labels.enabled_value
    } else {
        &labels.disabled_value
    };
    pod.labels_mut()
        .insert(labels.active_key.clone(), value.clone())
}

/// Read the active label of a pod object
pub fn active_label<'a>(pod: &'a Pod, labels: &Labels) -> Option<&'a str> {
    pod.labels().get(&labels.active_key).map(String::as_str)
}

async fn set_sg_pod_active(
    client: &Client,
    namespace: &str,
    pod_name: &str,
    labels: &Labels,
    enabled: bool,
) -> Result<()> {
    let api: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let mut pod = api
        .get(pod_name)
        .await
        .map_err(|e| not_found_or(e, "pod", pod_name, namespace))?;

    let previous = set_active_label(&mut pod, labels, enabled);
    tracing::debug!(
        "pod {} label {}: {:?} -> {}",
        pod_name,
        labels.active_key,
        previous,
        active_label(&pod, labels).unwrap_or_default()
    );

    api.replace(pod_name, &PostParams::default(), &pod).await?;
    Ok(())
}

/// Take a pod out of service by setting its active label to the disabled value
pub async fn disable_sg_pod(client: &Client, namespace: &str, pod: &str, labels: &Labels) -> Result<()> {
    set_sg_pod_active(client, namespace, pod, labels, false).await?;
    crate::log_info!("Disabled pod {}/{}", namespace, pod);
    Ok(())
}

/// Put a pod back in service by setting its active label to the enabled value
pub async fn enable_sg_pod(client: &Client, namespace: &str, pod: &str, labels: &Labels) -> Result<()> {
    set_sg_pod_active(client, namespace, pod, labels, true).await?;
    crate::log_info!("Enabled pod {}/{}", namespace, pod);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pods_of_deployment() {
        let pods = [
            "sg-1-host-1-6c9d8-abcde",
            "sg-1-host-12-6c9d8-abcde",
            "sg-1-host-1-77f4c-zzzzz",
            "sg-11-host-1-6c9d8-abcde",
        ];
        let found = pods_of_deployment("sg-1-host-1", pods).unwrap();
        assert_eq!(found, vec!["sg-1-host-1-6c9d8-abcde", "sg-1-host-1-77f4c-zzzzz"]);
    }

    #[test]
    fn test_pods_of_short_deployment_name() {
        assert!(matches!(
            pods_of_deployment("sg-1", ["sg-1-host-1-a-b"]),
            Err(SgError::InvalidName(_))
        ));
        assert!(matches!(pods_of_deployment("", ["sg-1-host-1-a-b"]), Err(SgError::EmptyName)));
    }

    #[test]
    fn test_pods_of_deployment_skips_unrelated() {
        let found = pods_of_deployment("sg-2-host-3", ["coredns-abc", "sg-2-host-3-a-b"]).unwrap();
        assert_eq!(found, vec!["sg-2-host-3-a-b"]);
    }

    #[test]
    fn test_set_active_label() {
        let mut pod: Pod = serde_json::from_value(json!({
            "metadata": { "name": "sg-1-host-1-a-b", "labels": { "active": "enable", "app": "sg" } }
        }))
        .unwrap();
        let labels = Labels::default();

        let previous = set_active_label(&mut pod, &labels, false);
        assert_eq!(previous.as_deref(), Some("enable"));
        assert_eq!(active_label(&pod, &labels), Some("disable"));
        assert_eq!(pod.labels().get("app").map(String::as_str), Some("sg"));

        set_active_label(&mut pod, &labels, true);
        assert_eq!(active_label(&pod, &labels), Some("enable"));
    }

    #[test]
    fn test_set_active_label_without_labels() {
        let mut pod: Pod = serde_json::from_value(json!({
            "metadata": { "name": "sg-1-host-1-a-b" }
        }))
        .unwrap();
        let labels = Labels {
            active_key: "sg/active".to_string(),
            enabled_value: "on".to_string(),
            disabled_value: "off".to_string(),
        };

        assert_eq!(set_active_label(&mut pod, &labels, false), None);
        assert_eq!(active_label(&pod, &labels), Some("off"));
    }
}
