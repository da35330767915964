//! Pod commands: delete, disable, enable

use super::Context;
use crate::k8s::pods;
use crate::utils::dryrun::exec_unless_dry_run;
use crate::utils::with_spinner;
use anyhow::Result;

/// Delete a storage-group pod so its deployment recreates it
pub async fn delete(ctx: &Context, pod: &str) -> Result<()> {
    if !ctx.confirm(&format!(
        "Delete pod {} in namespace {}? A new one will be deployed. (yes/no)",
        pod, ctx.namespace
    ))? {
        crate::log_info!("Deletion cancelled");
        return Ok(());
    }

    let client = ctx.client().await?;
    let spinner = ctx.change_spinner(
        &format!("Deleting {}", pod),
        &format!("{} deleted", pod),
        &format!("failed to delete {}", pod),
    )?;
    with_spinner(
        &spinner,
        exec_unless_dry_run(
            &format!("delete pod {}/{}", ctx.namespace, pod),
            pods::delete_sg_pod(&client, &ctx.namespace, pod),
        ),
    )
    .await?;
    Ok(())
}

/// Switch the pod's active label to the disabled value
pub async fn disable(ctx: &Context, pod: &str) -> Result<()> {
    set_active(ctx, pod, false).await
}

/// Switch the pod's active label to the enabled value
pub async fn enable(ctx: &Context, pod: &str) -> Result<()> {
    set_active(ctx, pod, true).await
}

async fn set_active(ctx: &Context, pod: &str, enabled: bool) -> Result<()> {
    let labels = &ctx.settings.labels;
    let (verb, value) = if enabled {
        ("Enable", &labels.enabled_value)
    } else {
        ("Disable", &labels.disabled_value)
    };

    if !ctx.confirm(&format!(
        "{} pod {} ({}={})? (yes/no)",
        verb, pod, labels.active_key, value
    ))? {
        crate::log_info!("{} cancelled", verb);
        return Ok(());
    }

    let client = ctx.client().await?;
    let spinner = ctx.change_spinner(
        &format!("{} {}", verb, pod),
        &format!("{} is now {}", pod, value),
        &format!("failed to set {}={} on {}", labels.active_key, value, pod),
    )?;

    let action = format!("label pod {}/{} {}={}", ctx.namespace, pod, labels.active_key, value);
    let update = async {
        if enabled {
            pods::enable_sg_pod(&client, &ctx.namespace, pod, labels).await
        } else {
            pods::disable_sg_pod(&client, &ctx.namespace, pod, labels).await
        }
    };
    with_spinner(&spinner, exec_unless_dry_run(&action, update)).await?;
    Ok(())
}
