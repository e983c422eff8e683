//! # Addressing
//!
//! A [`Path`] walks one element list: each index selects a child of the node
//! reached so far, and which container that is (elements or chips) depends on
//! the node's variant.
//!
//! Custom elements are not entered by a flat path. Their subflows are
//! addressed with a separate two-part [`SubflowPath`] (subflow index plus a
//! path inside that subflow's elements). [`ListAddress`] and [`NodeAddress`]
//! lift both kinds to flow level.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Index sequence into a single element list
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The empty path, addressing the list itself
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Path of the `index`-th child of this node
    pub fn child(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Path(indices)
    }

    /// Parent path and this node's index in the parent container
    pub fn split_last(&self) -> Option<(Path, usize)> {
        let (&last, parent) = self.0.split_last()?;
        Some((Path(parent.to_vec()), last))
    }

    pub fn parent(&self) -> Option<Path> {
        self.split_last().map(|(parent, _)| parent)
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// True if `self` equals `ancestor` or lies beneath it
    pub fn starts_with(&self, ancestor: &Path) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    /// Where this path points once the node at `removed` has left its list
    ///
    /// An index at the removed node's depth is decremented when the removed
    /// node was an earlier sibling. Returns `None` if this path lies inside
    /// the removed subtree.
    pub fn after_removal(&self, removed: &Path) -> Option<Path> {
        if self.starts_with(removed) {
            return None;
        }
        let mut shifted = self.clone();
        if let Some((removed_parent, removed_index)) = removed.split_last() {
            let depth = removed_parent.len();
            if shifted.len() > depth
                && shifted.starts_with(&removed_parent)
                && shifted.0[depth] > removed_index
            {
                shifted.0[depth] -= 1;
            }
        }
        Some(shifted)
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Path(indices)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Path(indices.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid path segment '{segment}' in '{input}'")]
pub struct PathParseError {
    pub input: String,
    pub segment: String,
}

impl FromStr for Path {
    type Err = PathParseError;

    /// Accepts `/0/2/1`, `0/2/1` and `/` (root)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                segment.trim().parse::<usize>().map_err(|_| PathParseError {
                    input: s.to_string(),
                    segment: segment.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Path)
    }
}

/// Two-part address inside a Custom element: which subflow, then where
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubflowPath {
    pub subflow_index: usize,
    pub path: Path,
}

impl SubflowPath {
    pub fn new(subflow_index: usize, path: impl Into<Path>) -> Self {
        Self {
            subflow_index,
            path: path.into(),
        }
    }
}

/// The Custom element (by page-level path) and subflow owning a list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubflowOwner {
    pub custom: Path,
    pub subflow_index: usize,
}

/// One editable element list: a page's root list or a subflow's list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListAddress {
    pub page: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subflow: Option<SubflowOwner>,
}

impl ListAddress {
    pub fn page(page: usize) -> Self {
        Self {
            page,
            subflow: None,
        }
    }

    pub fn subflow(page: usize, custom: impl Into<Path>, subflow_index: usize) -> Self {
        Self {
            page,
            subflow: Some(SubflowOwner {
                custom: custom.into(),
                subflow_index,
            }),
        }
    }

    pub fn node(&self, path: impl Into<Path>) -> NodeAddress {
        NodeAddress {
            list: self.clone(),
            path: path.into(),
        }
    }
}

/// One node anywhere in the edit pages of a flow
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddress {
    pub list: ListAddress,
    pub path: Path,
}

impl NodeAddress {
    pub fn new(list: ListAddress, path: impl Into<Path>) -> Self {
        Self {
            list,
            path: path.into(),
        }
    }

    /// Node addressed by a page-level path
    pub fn on_page(page: usize, path: impl Into<Path>) -> Self {
        ListAddress::page(page).node(path)
    }

    /// Node addressed by the two-part form beneath the Custom element at `custom`
    pub fn in_subflow(page: usize, custom: impl Into<Path>, address: SubflowPath) -> Self {
        ListAddress::subflow(page, custom, address.subflow_index).node(address.path)
    }

    /// The two-part form of this address, if it lies inside a subflow
    pub fn subflow_path(&self) -> Option<SubflowPath> {
        self.list.subflow.as_ref().map(|owner| SubflowPath {
            subflow_index: owner.subflow_index,
            path: self.path.clone(),
        })
    }

    /// True if removing `removed` also removes the node at `self`
    pub fn is_within(&self, removed: &NodeAddress) -> bool {
        if self.list.page != removed.list.page {
            return false;
        }

        match (&self.list.subflow, &removed.list.subflow) {
            (None, None) => self.path.starts_with(&removed.path),
            (Some(owner), None) => owner.custom.starts_with(&removed.path),
            (Some(owner), Some(removed_owner)) => {
                owner == removed_owner && self.path.starts_with(&removed.path)
            }
            (None, Some(_)) => false,
        }
    }

    /// Shift this address after the node at `removed` left its list
    ///
    /// Returns `None` if this address was inside the removed subtree.
    pub fn after_removal_of(&self, removed: &NodeAddress) -> Option<NodeAddress> {
        if self.is_within(removed) {
            return None;
        }
        if self.list.page != removed.list.page {
            return Some(self.clone());
        }

        let mut shifted = self.clone();
        match (&mut shifted.list.subflow, &removed.list.subflow) {
            (None, None) => shifted.path = self.path.after_removal(&removed.path)?,
            (Some(owner), None) => owner.custom = owner.custom.after_removal(&removed.path)?,
            (Some(owner), Some(removed_owner)) if *owner == *removed_owner => {
                shifted.path = self.path.after_removal(&removed.path)?
            }
            _ => {}
        }
        Some(shifted)
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.list.subflow {
            None => write!(f, "page {} {}", self.list.page, self.path),
            Some(owner) => write!(
                f,
                "page {} {} subflow {} {}",
                self.list.page, owner.custom, owner.subflow_index, self.path
            ),
        }
    }
}
