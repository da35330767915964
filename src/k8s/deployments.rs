//! Storage-group deployment operations

use crate::k8s::client::not_found_or;
use crate::k8s::names::NameFilter;
use crate::utils::errors::{Result, SgError};
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{ListParams, PostParams};
use kube::{Api, Client, ResourceExt};

/// Names of all deployments in `namespace`
pub async fn list_deployment_names(client: &Client, namespace: &str) -> Result<Vec<String>> {
    let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let deployments = api.list(&ListParams::default()).await?;
    tracing::debug!(
        "{} deployment(s) in namespace {}",
        deployments.items.len(),
        namespace
    );
    Ok(deployments.items.iter().map(|d| d.name_any()).collect())
}

/// Deployment names related to a group, a node, or both (optionally narrowed to a row)
pub async fn list_sg_deployment_names(
    client: &Client,
    namespace: &str,
    filter: &NameFilter,
) -> Result<Vec<String>> {
    let names = list_deployment_names(client, namespace).await?;
    let selected = filter.select(names.iter().map(String::as_str))?;
    if selected.is_empty() {
        return Err(filter.no_match("deployments"));
    }
    Ok(selected)
}

/// Point the first container of `deployment` at `image`, returning the old image
pub fn set_first_container_image(deployment: &mut Deployment, image: &str) -> Result<Option<String>> {
    let name = deployment.name_any();
    let container = deployment
        .spec
        .as_mut()
        .and_then(|spec| spec.template.spec.as_mut())
        .and_then(|pod_spec| pod_spec.containers.first_mut())
        .ok_or_else(|| SgError::InvalidResource(format!("deployment {} has no containers", name)))?;

    Ok(container.image.replace(image.to_string()))
}

/// Update the image of a deployment's first container
pub async fn update_deployment_image(
    client: &Client,
    namespace: &str,
    deployment_name: &str,
    image: &str,
) -> Result<()> {
    let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let mut deployment = api
        .get(deployment_name)
        .await
        .map_err(|e| not_found_or(e, "deployment", deployment_name, namespace))?;

    let previous = set_first_container_image(&mut deployment, image)?;
    api.replace(deployment_name, &PostParams::default(), &deployment)
        .await?;

    crate::log_info!(
        "Updated deployment {}/{} image: {} -> {}",
        namespace,
        deployment_name,
        previous.as_deref().unwrap_or("<none>"),
        image
    );
    Ok(())
}
