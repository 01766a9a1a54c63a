//! Token-addressed state tree
//!
//! Gathered answers and prompt counts are both stored as a tree of
//! segment-keyed nodes: `ORDER.PIZZA.SIZE` lives under the `ORDER` branch,
//! then the `PIZZA` branch, in the `SIZE` leaf. Keys are kept sorted so the
//! serialized form is deterministic.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single node: either a nested branch or a stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateNode<T> {
    Branch(StateTree<T>),
    Leaf(T),
}

/// A mapping from canonical token segments to nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateTree<T> {
    nodes: BTreeMap<String, StateNode<T>>,
}

/// Why a write could not be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// A segment along the path does not exist
    Missing,
    /// A segment along the path holds a leaf where a branch is needed
    Blocked,
}

impl<T> Default for StateTree<T> {
    fn default() -> Self {
        Self { nodes: BTreeMap::new() }
    }
}

impl<T> StateTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up the node at `path`
    pub fn get(&self, path: &[String]) -> Option<&StateNode<T>> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = match current.nodes.get(segment)? {
                StateNode::Branch(branch) => branch,
                StateNode::Leaf(_) => return None,
            };
        }
        current.nodes.get(last)
    }

    /// Look up the leaf at `path`
    pub fn get_leaf(&self, path: &[String]) -> Option<&T> {
        match self.get(path)? {
            StateNode::Leaf(value) => Some(value),
            StateNode::Branch(_) => None,
        }
    }

    pub fn contains(&self, path: &[String]) -> bool {
        self.get(path).is_some()
    }

    /// Store `node` at `path`, creating intermediate branches.
    ///
    /// Overwrites whatever was stored at the final segment.
    pub fn insert(&mut self, path: &[String], node: StateNode<T>) -> Result<(), PathError> {
        let (last, parents) = path.split_last().ok_or(PathError::Missing)?;
        let branch = self.branch_or_create(parents)?;
        branch.nodes.insert(last.clone(), node);
        Ok(())
    }

    /// Remove the node at `path`; parents are left in place even if empty.
    pub fn remove(&mut self, path: &[String]) -> Option<StateNode<T>> {
        let (last, parents) = path.split_last()?;
        self.existing_branch_mut(parents).ok()?.nodes.remove(last)
    }

    /// Mutable access to an existing leaf at `path`
    pub fn leaf_mut(&mut self, path: &[String]) -> Result<&mut T, PathError> {
        let (last, parents) = path.split_last().ok_or(PathError::Missing)?;
        match self.existing_branch_mut(parents)?.nodes.get_mut(last) {
            Some(StateNode::Leaf(value)) => Ok(value),
            Some(StateNode::Branch(_)) => Err(PathError::Blocked),
            None => Err(PathError::Missing),
        }
    }

    /// Update the leaf at `path` in place, or insert `init` when the final
    /// segment is missing. Intermediate branches are created as needed.
    pub fn upsert_leaf<F>(&mut self, path: &[String], init: T, update: F) -> Result<(), PathError>
    where
        F: FnOnce(&mut T),
    {
        let (last, parents) = path.split_last().ok_or(PathError::Missing)?;
        let branch = self.branch_or_create(parents)?;
        match branch.nodes.entry(last.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(StateNode::Leaf(init));
                Ok(())
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                StateNode::Leaf(value) => {
                    update(value);
                    Ok(())
                }
                StateNode::Branch(_) => Err(PathError::Blocked),
            },
        }
    }

    /// Number of leaves in the whole tree
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| match node {
                StateNode::Leaf(_) => 1,
                StateNode::Branch(branch) => branch.leaf_count(),
            })
            .sum()
    }

    /// Length of the longest path stored in the tree
    pub fn depth(&self) -> usize {
        self.nodes
            .values()
            .map(|node| match node {
                StateNode::Leaf(_) => 1,
                StateNode::Branch(branch) => 1 + branch.depth(),
            })
            .max()
            .unwrap_or(0)
    }

    fn branch_or_create(&mut self, parents: &[String]) -> Result<&mut StateTree<T>, PathError> {
        let mut current = self;
        for segment in parents {
            let node = current
                .nodes
                .entry(segment.clone())
                .or_insert_with(|| StateNode::Branch(StateTree::new()));
            current = match node {
                StateNode::Branch(branch) => branch,
                StateNode::Leaf(_) => return Err(PathError::Blocked),
            };
        }
        Ok(current)
    }

    fn existing_branch_mut(&mut self, parents: &[String]) -> Result<&mut StateTree<T>, PathError> {
        let mut current = self;
        for segment in parents {
            current = match current.nodes.get_mut(segment) {
                Some(StateNode::Branch(branch)) => branch,
                Some(StateNode::Leaf(_)) => return Err(PathError::Blocked),
                None => return Err(PathError::Missing),
            };
        }
        Ok(current)
    }
}

impl StateNode<Value> {
    /// Build a node from a JSON value; objects become branches so that
    /// their members stay addressable by token.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => StateNode::Branch(StateTree {
                nodes: map
                    .into_iter()
                    .map(|(key, value)| (key, StateNode::from_value(value)))
                    .collect(),
            }),
            other => StateNode::Leaf(other),
        }
    }

    /// Render the node back as a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            StateNode::Leaf(value) => value.clone(),
            StateNode::Branch(branch) => Value::Object(
                branch
                    .nodes
                    .iter()
                    .map(|(key, node)| (key.clone(), node.to_value()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}
