//! sg-toolbox: helpers for operating storage-group pods and deployments on Kubernetes
//!
//! The library holds the pieces operational scripts share: name matching
//! against group / node / row filters, pod and deployment API helpers,
//! service port-forwarding, confirmation prompts, a spinner and the flag
//! usage printer. The `sg-toolbox` binary is a thin front end over them.

pub mod commands;
pub mod config;
pub mod k8s;
pub mod utils;

pub use config::Settings;
pub use k8s::{check_name_in_group_or_node, NameFilter};
pub use utils::{Result, SgError};
