//! Output formats for command results

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One entry per line
    #[default]
    Text,
    Json,
    Yaml,
}

/// Render a list of names
pub fn render_names(names: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(names.iter().map(|n| format!("{}\n", n)).collect()),
        _ => render_structured(&names, format),
    }
}

/// Render any serializable value as JSON or YAML. Text falls back to YAML.
pub fn render_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(value).context("Failed to encode JSON")?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml | OutputFormat::Text => {
            serde_yaml::to_string(value).context("Failed to encode YAML")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["sg-1-host-1".to_string(), "sg-2-host-1".to_string()]
    }

    #[test]
    fn test_text() {
        assert_eq!(
            render_names(&names(), OutputFormat::Text).unwrap(),
            "sg-1-host-1\nsg-2-host-1\n"
        );
        assert_eq!(render_names(&[], OutputFormat::Text).unwrap(), "");
    }

    #[test]
    fn test_json() {
        let out = render_names(&names(), OutputFormat::Json).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, names());
    }

    #[test]
    fn test_yaml() {
        let out = render_names(&names(), OutputFormat::Yaml).unwrap();
        assert_eq!(out, "- sg-1-host-1\n- sg-2-host-1\n");
    }
}
