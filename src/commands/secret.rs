//! Secret display

use super::Context;
use crate::k8s::secrets;
use crate::utils::output::{render_structured, OutputFormat};
use anyhow::Result;
use std::collections::BTreeMap;

/// Print the keys of a secret, and the values when `show_values` is set
pub async fn show(ctx: &Context, name: &str, show_values: bool, output: OutputFormat) -> Result<()> {
    let client = ctx.client().await?;
    let data = secrets::secret_content(&client, &ctx.namespace, name).await?;
    print!("{}", render_secret(&data, show_values, output)?);
    Ok(())
}

/// Values are shown as UTF-8 (lossy) or as a byte count when hidden
pub fn render_secret(
    data: &BTreeMap<String, Vec<u8>>,
    show_values: bool,
    output: OutputFormat,
) -> Result<String> {
    let rendered: BTreeMap<&str, String> = data
        .iter()
        .map(|(key, value)| {
            let shown = if show_values {
                String::from_utf8_lossy(value).into_owned()
            } else {
                format!("<{} bytes>", value.len())
            };
            (key.as_str(), shown)
        })
        .collect();

    match output {
        OutputFormat::Text => Ok(rendered
            .iter()
            .map(|(key, value)| format!("{}: {}\n", key, value))
            .collect()),
        _ => render_structured(&rendered, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> BTreeMap<String, Vec<u8>> {
        BTreeMap::from([
            ("password".to_string(), b"s3cr3t".to_vec()),
            ("username".to_string(), b"admin".to_vec()),
        ])
    }

    #[test]
    fn test_values_hidden_by_default() {
        let out = render_secret(&data(), false, OutputFormat::Text).unwrap();
        assert_eq!(out, "password: <6 bytes>\nusername: <5 bytes>\n");
    }

    #[test]
    fn test_values_shown() {
        let out = render_secret(&data(), true, OutputFormat::Json).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["username"], "admin");
        assert_eq!(parsed["password"], "s3cr3t");
    }
}
