//! Storage-group name parsing and group/node/row matching
//!
//! Storage-group resources are named `sg-<n>-<host>-<m>[-...]`: the first two
//! fields are the group (`sg-1`), the next two the node it runs on
//! (`host-1`). A deployment `sg-1-host-1` owns pods named
//! `sg-1-host-1-<replicaset>-<suffix>`.

use crate::k8s::rows::RowMembership;
use crate::utils::errors::{Result, SgError};
use std::fmt;
use std::path::Path;

const SG_PREFIX: &str = "sg";

/// A group filter such as `sg-1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupName {
    kind: String,
    number: String,
}

impl GroupName {
    pub fn parse(name: &str) -> Result<Self> {
        match name.split('-').collect::<Vec<_>>().as_slice() {
            [kind, number] => Ok(Self {
                kind: kind.to_string(),
                number: number.to_string(),
            }),
            _ => Err(SgError::InvalidGroupName(name.to_string())),
        }
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.number)
    }
}

/// A node filter such as `host-1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeName {
    host: String,
    number: String,
}

impl NodeName {
    pub fn parse(name: &str) -> Result<Self> {
        match name.split('-').collect::<Vec<_>>().as_slice() {
            [host, number] => Ok(Self {
                host: host.to_string(),
                number: number.to_string(),
            }),
            _ => Err(SgError::InvalidNodeName(name.to_string())),
        }
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.host, self.number)
    }
}

/// A pod, deployment or service name split on `-`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageName<'a> {
    raw: &'a str,
    fields: Vec<&'a str>,
}

impl<'a> StorageName<'a> {
    pub fn parse(name: &'a str) -> Result<Self> {
        if name.is_empty() {
            return Err(SgError::EmptyName);
        }
        Ok(Self {
            raw: name,
            fields: name.split('-').collect(),
        })
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }

    /// Fields 0 and 1
    pub fn group(&self) -> Option<(&'a str, &'a str)> {
        match self.fields.as_slice() {
            [kind, number, ..] => Some((*kind, *number)),
            _ => None,
        }
    }

    /// Fields 2 and 3
    pub fn node(&self) -> Option<(&'a str, &'a str)> {
        match self.fields.as_slice() {
            [_, _, host, number, ..] => Some((*host, *number)),
            _ => None,
        }
    }

    pub fn is_storage_group(&self) -> bool {
        self.fields.first() == Some(&SG_PREFIX)
    }

    /// `sg-<n>` as it appears in the row file
    pub fn group_key(&self) -> Option<String> {
        self.group().map(|(kind, number)| format!("{}-{}", kind, number))
    }

    fn in_group(&self, group: &GroupName) -> bool {
        self.group() == Some((group.kind.as_str(), group.number.as_str()))
    }

    fn on_node(&self, node: &NodeName) -> bool {
        self.node() == Some((node.host.as_str(), node.number.as_str()))
    }

    /// Whether `other` carries the same group and node fields, i.e. a pod
    /// that belongs to this deployment
    pub fn same_deployment(&self, other: &StorageName<'_>) -> bool {
        match (self.fields.get(..4), other.fields.get(..4)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Group / node / row filter applied to resource names
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    group: Option<GroupName>,
    node: Option<NodeName>,
    row: Option<RowMembership>,
}

impl NameFilter {
    /// Build a filter from raw flag values; an empty string leaves that
    /// filter unset. A non-empty `row` loads `row_file` once, here.
    pub fn new(group: &str, node: &str, row: &str, row_file: Option<&Path>) -> Result<Self> {
        let (node, group) = split_names(node, group)?;

        let row = if row.is_empty() {
            None
        } else {
            Some(RowMembership::load(row_file.unwrap_or(Path::new("")), row)?)
        };

        Ok(Self { group, node, row })
    }

    pub fn with_group(mut self, group: GroupName) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_node(mut self, node: NodeName) -> Self {
        self.node = Some(node);
        self
    }

    pub fn with_row(mut self, row: RowMembership) -> Self {
        self.row = Some(row);
        self
    }

    pub fn group(&self) -> Option<&GroupName> {
        self.group.as_ref()
    }

    pub fn node(&self) -> Option<&NodeName> {
        self.node.as_ref()
    }

    /// Group filter set: the name is in the group, and on the node if one is
    /// given. The row is not consulted.
    /// Only a node filter set: the name is a storage group on that node, and
    /// in the row if one is given.
    /// Nothing set: no match.
    pub fn matches(&self, name: &StorageName<'_>) -> bool {
        match (&self.group, &self.node) {
            (Some(group), node) => {
                name.in_group(group) && node.as_ref().is_none_or(|n| name.on_node(n))
            }
            (None, Some(node)) => {
                name.is_storage_group()
                    && name.on_node(node)
                    && self.row.as_ref().is_none_or(|row| {
                        name.group_key().is_some_and(|key| row.contains(&key))
                    })
            }
            (None, None) => false,
        }
    }

    pub fn matches_name(&self, name: &str) -> Result<bool> {
        Ok(self.matches(&StorageName::parse(name)?))
    }

    /// Names out of `names` that pass the filter, in input order
    pub fn select<'a, I>(&self, names: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut selected = Vec::new();
        for name in names {
            if self.matches_name(name)? {
                selected.push(name.to_string());
            }
        }
        Ok(selected)
    }

    /// Error for an empty selection of `kind`
    pub fn no_match(&self, kind: &'static str) -> SgError {
        let node = self.node.as_ref().map(ToString::to_string).unwrap_or_default();
        let group = self.group.as_ref().map(ToString::to_string).unwrap_or_default();
        SgError::no_match(kind, &node, &group)
    }
}

/// Validate node and group filters. Empty strings stay unset.
pub fn split_names(node: &str, group: &str) -> Result<(Option<NodeName>, Option<GroupName>)> {
    let node = (!node.is_empty()).then(|| NodeName::parse(node)).transpose()?;
    let group = (!group.is_empty()).then(|| GroupName::parse(group)).transpose()?;
    Ok((node, group))
}

/// One-shot form of [`NameFilter::matches`] taking raw flag values.
///
/// Use it to ask whether a pod is on a node (`group = ""`), in a group
/// (`node = ""`), or on a node within a row (`row` plus `row_file`).
pub fn check_name_in_group_or_node(
    name: &str,
    group: &str,
    node: &str,
    row: &str,
    row_file: &str,
) -> Result<bool> {
    let name = StorageName::parse(name)?;
    let filter = NameFilter::new(group, node, row, Some(Path::new(row_file)))?;
    Ok(filter.matches(&name))
}
