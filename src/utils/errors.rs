//! Error type for the toolbox with actionable suggestions

use colored::Colorize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SgError>;

#[derive(Error, Debug)]
pub enum SgError {
    #[error("name to check cannot be empty")]
    EmptyName,

    #[error("name={0} is invalid, expected hyphen-delimited name like sg-1-host-1")]
    InvalidName(String),

    #[error("sg group name={0} is invalid group name should look like sg-1")]
    InvalidGroupName(String),

    #[error("node name={0} is invalid node name should look like host-1")]
    InvalidNodeName(String),

    #[error("row file error: {0}")]
    RowFile(String),

    #[error("no {kind} were found in node {node} for group {group}")]
    NoMatch {
        kind: &'static str,
        node: String,
        group: String,
    },

    #[error("no {resource_type} was found for {name} in namespace '{namespace}'")]
    NotFound {
        resource_type: &'static str,
        name: String,
        namespace: String,
    },

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Kubernetes config error: {0}")]
    Config(String),

    #[error("port-forward error: {0}")]
    PortForward(String),

    #[error("confirmation prompt failed: {0}")]
    Prompt(String),

    #[error("spinner template error: {0}")]
    Spinner(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SgError {
    pub fn not_found(
        resource_type: &'static str,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type,
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn no_match(kind: &'static str, node: &str, group: &str) -> Self {
        Self::NoMatch {
            kind,
            node: node.to_string(),
            group: group.to_string(),
        }
    }

    /// Hints shown under the error message
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            SgError::InvalidGroupName(_) => vec!["Pass the group as sg-<number>, e.g. --group sg-1".into()],
            SgError::InvalidNodeName(_) => vec!["Pass the node as <host>-<number>, e.g. --node host-1".into()],
            SgError::RowFile(_) => vec![
                "Row filtering needs --row-file (or defaults.row_file in the config)".into(),
                "Each line should look like: <row> <sg-name>,".into(),
            ],
            SgError::NoMatch { .. } => vec![
                "Check the group/node spelling".into(),
                "List everything with: sg-toolbox pods".into(),
            ],
            SgError::NotFound { namespace, .. } => {
                vec![format!("Verify the namespace: --namespace {}", namespace)]
            }
            SgError::Kube(kube::Error::Api(ae)) if ae.code == 401 || ae.code == 403 => vec![
                "Verify you have sufficient permissions in the namespace".into(),
                "Check which context your kubeconfig points to".into(),
            ],
            SgError::Kube(_) | SgError::Config(_) => vec![
                "Use --kubeconfig to point at the right cluster".into(),
                "Run with -v for more details".into(),
            ],
            SgError::PortForward(_) => vec!["Make sure the local port is free and the service has a running pod".into()],
            _ => Vec::new(),
        }
    }

    /// Print the error followed by its suggestions
    pub fn display(&self) {
        crate::log_error!("{}", self);

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            eprintln!();
            eprintln!("{}", "Suggestions:".yellow().bold());
            for suggestion in &suggestions {
                eprintln!("  {} {}", "→".blue(), suggestion);
            }
        }
    }
}

/// Print an error chain, with suggestions when it wraps an `SgError`
pub fn display_error(err: &anyhow::Error) {
    match err.downcast_ref::<SgError>() {
        Some(sg) => {
            for cause in err.chain().take_while(|c| c.downcast_ref::<SgError>().is_none()) {
                crate::log_error!("{}", cause);
            }
            sg.display();
        }
        None => crate::log_error!("{:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_message() {
        let err = SgError::no_match("pods", "host-1", "sg-2");
        assert_eq!(
            err.to_string(),
            "no pods were found in node host-1 for group sg-2"
        );
        assert_eq!(err.suggestions().len(), 2);
    }

    #[test]
    fn test_not_found_suggests_namespace() {
        let err = SgError::not_found("service", "acme", "storagepod");
        assert!(err.to_string().contains("acme"));
        assert!(err.suggestions()[0].contains("storagepod"));
    }

    #[test]
    fn test_invalid_names_have_hints() {
        assert!(!SgError::InvalidGroupName("sg1".into()).suggestions().is_empty());
        assert!(!SgError::InvalidNodeName("host".into()).suggestions().is_empty());
        assert!(SgError::EmptyName.suggestions().is_empty());
    }

    #[test]
    fn test_display_error_with_context() {
        let err = anyhow::Error::new(SgError::EmptyName).context("matching name");
        // Should not panic
        display_error(&err);
    }
}
