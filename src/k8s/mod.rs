//! Kubernetes helpers for storage-group pods, deployments and services

pub mod client;
pub mod deployments;
pub mod names;
pub mod pods;
pub mod rows;
pub mod secrets;
pub mod services;

pub use client::config_client;
pub use names::{check_name_in_group_or_node, split_names, GroupName, NameFilter, NodeName, StorageName};
pub use rows::RowMembership;
