//! Deployment image updates

use super::{Context, FilterArgs};
use crate::k8s::deployments;
use crate::utils::dryrun::exec_unless_dry_run;
use crate::utils::with_spinner;
use anyhow::{Context as _, Result};

/// Update the image of one deployment, or of every deployment matching the filter
pub async fn update_image(
    ctx: &Context,
    image: &str,
    deployment: Option<&str>,
    args: &FilterArgs,
) -> Result<()> {
    let client = ctx.client().await?;

    let targets = match deployment {
        Some(name) => vec![name.to_string()],
        None => {
            let filter = ctx.filter(args)?;
            deployments::list_sg_deployment_names(&client, &ctx.namespace, &filter).await?
        }
    };

    println!("Deployments to update to {}:", image);
    for name in &targets {
        println!("  - {}", name);
    }
    if !ctx.confirm(&format!("Update {} deployment(s)? (yes/no)", targets.len()))? {
        crate::log_info!("Image update cancelled");
        return Ok(());
    }

    for name in &targets {
        let spinner = ctx.change_spinner(
            &format!("Updating {}", name),
            &format!("{} now runs {}", name, image),
            &format!("failed to update {}", name),
        )?;
        with_spinner(
            &spinner,
            exec_unless_dry_run(
                &format!("set image of deployment {}/{} to {}", ctx.namespace, name, image),
                deployments::update_deployment_image(&client, &ctx.namespace, name, image),
            ),
        )
        .await
        .with_context(|| format!("Failed to update deployment {}", name))?;
    }

    Ok(())
}
