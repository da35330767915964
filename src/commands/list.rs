//! Listing and matching commands

use super::{Context, FilterArgs};
use crate::k8s::{deployments, pods};
use crate::utils::output::{render_names, OutputFormat};
use crate::utils::with_spinner;
use anyhow::Result;

/// Print pods matching the group / node / row filter
pub async fn pods(ctx: &Context, args: &FilterArgs, output: OutputFormat) -> Result<()> {
    let filter = ctx.filter(args)?;
    let client = ctx.client().await?;

    let spinner = ctx.spinner("Listing pods", "pods listed", "listing pods failed")?;
    let names = with_spinner(&spinner, pods::list_sg_pod_names(&client, &ctx.namespace, &filter)).await?;

    crate::log_info!("Found {} pod(s) in {}", names.len(), ctx.namespace);
    print!("{}", render_names(&names, output)?);
    Ok(())
}

/// Print deployments matching the group / node / row filter
pub async fn deployments(ctx: &Context, args: &FilterArgs, output: OutputFormat) -> Result<()> {
    let filter = ctx.filter(args)?;
    let client = ctx.client().await?;

    let spinner = ctx.spinner("Listing deployments", "deployments listed", "listing deployments failed")?;
    let names = with_spinner(
        &spinner,
        deployments::list_sg_deployment_names(&client, &ctx.namespace, &filter),
    )
    .await?;

    crate::log_info!("Found {} deployment(s) in {}", names.len(), ctx.namespace);
    print!("{}", render_names(&names, output)?);
    Ok(())
}

/// Print the pods that belong to a deployment
pub async fn deployment_pods(ctx: &Context, deployment: &str, output: OutputFormat) -> Result<()> {
    let client = ctx.client().await?;
    let names = pods::pod_names_for_deployment(&client, &ctx.namespace, deployment).await?;
    print!("{}", render_names(&names, output)?);
    Ok(())
}

/// Check a single name against the filter without contacting the cluster
pub fn match_name(ctx: &Context, name: &str, args: &FilterArgs) -> Result<bool> {
    let filter = ctx.filter(args)?;
    let matched = filter.matches_name(name)?;
    println!("{}", matched);
    Ok(matched)
}
