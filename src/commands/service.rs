//! Tenant service lookup and port-forwarding

use super::Context;
use crate::k8s::services;
use anyhow::{Context as _, Result};

/// Print the storage-group service name of a tenant
pub async fn tenant_service(ctx: &Context, tenant: &str) -> Result<()> {
    let client = ctx.client().await?;
    let name = services::service_name_for_tenant(&client, &ctx.namespace, tenant).await?;
    println!("{}", name);
    Ok(())
}

/// Forward a local port to a service until Ctrl+C
pub async fn port_forward(
    ctx: &Context,
    service: Option<&str>,
    tenant: Option<&str>,
    local_port: u16,
    remote_port: u16,
) -> Result<()> {
    let client = ctx.client().await?;

    let service = match (service, tenant) {
        (Some(service), _) => service.to_string(),
        (None, Some(tenant)) => services::service_name_for_tenant(&client, &ctx.namespace, tenant).await?,
        (None, None) => anyhow::bail!("either a service name or --tenant is required"),
    };

    let forward = services::create_service_port_forwarder(
        &client,
        &ctx.namespace,
        &service,
        local_port,
        remote_port,
    )
    .await
    .with_context(|| format!("Failed to port-forward to svc/{}", service))?;

    println!(
        "Forwarding from {} -> svc/{}:{} (pod {} port {})",
        forward.local_addr(),
        service,
        remote_port,
        forward.pod_name(),
        forward.pod_port()
    );
    println!("Press Ctrl+C to stop port-forwarding");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    crate::log_info!("Stopping port-forward");
    forward.stop();
    forward.wait().await?;
    Ok(())
}
