//! Arena-backed tree of task form nodes.
//!
//! Nodes are addressed from the outside by [`NodePath`], the child indices
//! leading from the root. Every walk over the tree is iterative.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::FormError;
use crate::model::CreateTaskPayload;

/// Deepest level a subtask may sit at. The root is level 0.
pub const MAX_SUBTASK_DEPTH: usize = 3;

/// Child indices from the root to a node. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The root node.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the `index`th subtask of this node.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Nesting level; the root is 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Child indices from the root.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    fn split_last(&self) -> Option<(Self, usize)> {
        let (last, parent) = self.0.split_last()?;
        Some((Self(parent.to_vec()), *last))
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("root");
        }
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "subtasks.{}", parts.join(".subtasks."))
    }
}

/// Plain recursive form values, as read from a seed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFormValues {
    /// Title as typed.
    #[serde(default)]
    pub title: String,
    /// Selected skill ids.
    #[serde(default)]
    pub skills: Vec<u32>,
    /// Nested subtasks.
    #[serde(default)]
    pub subtasks: Vec<TaskFormValues>,
}

/// Stable handle to a node slot in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One section of the form.
#[derive(Debug, Clone, Default)]
pub struct FormNode {
    /// Title as typed.
    pub title: String,
    /// Selected skill ids in selection order.
    pub skills: Vec<u32>,
    children: Vec<NodeId>,
}

/// The form's node arena. Always holds a root.
#[derive(Debug, Clone)]
pub struct FormTree {
    slots: Vec<Option<FormNode>>,
    free: Vec<usize>,
}

impl Default for FormTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FormTree {
    /// A tree with one empty root.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: vec![Some(FormNode::default())], free: Vec::new() }
    }

    /// Handle of the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Resolves `path` to a node handle.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownPath`] if any index is out of range.
    pub fn resolve(&self, path: &NodePath) -> Result<NodeId, FormError> {
        let mut current = self.root();
        for &index in path.indices() {
            current = *self
                .node(current)
                .children
                .get(index)
                .ok_or_else(|| FormError::UnknownPath(path.to_string()))?;
        }
        Ok(current)
    }

    /// The node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was removed. Handles only come from this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &FormNode {
        self.slots[id.0].as_ref().expect("node handle outlived its node")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut FormNode {
        self.slots[id.0].as_mut().expect("node handle outlived its node")
    }

    /// The node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownPath`] if the path does not exist.
    pub fn get(&self, path: &NodePath) -> Result<&FormNode, FormError> {
        Ok(self.node(self.resolve(path)?))
    }

    /// Number of subtasks directly under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownPath`] if the path does not exist.
    pub fn child_count(&self, path: &NodePath) -> Result<usize, FormError> {
        Ok(self.get(path)?.children.len())
    }

    /// Replaces the title at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownPath`] if the path does not exist.
    pub fn set_title(&mut self, path: &NodePath, title: &str) -> Result<NodeId, FormError> {
        let id = self.resolve(path)?;
        title.clone_into(&mut self.node_mut(id).title);
        Ok(id)
    }

    /// Adds `skill_id` if absent, removes it if present. Returns whether
    /// the skill is selected afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownPath`] if the path does not exist.
    pub fn toggle_skill(&mut self, path: &NodePath, skill_id: u32) -> Result<bool, FormError> {
        let id = self.resolve(path)?;
        let skills = &mut self.node_mut(id).skills;
        if let Some(position) = skills.iter().position(|&s| s == skill_id) {
            skills.remove(position);
            Ok(false)
        } else {
            skills.push(skill_id);
            Ok(true)
        }
    }

    /// Whether a subtask may be added under `path`.
    #[must_use]
    pub fn can_add_subtask(&self, path: &NodePath) -> bool {
        path.depth() < MAX_SUBTASK_DEPTH && self.resolve(path).is_ok()
    }

    /// Appends an empty subtask under `path` and returns its path and handle.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DepthLimitReached`] at the maximum depth (the
    /// tree is left unchanged) and [`FormError::UnknownPath`] for a missing
    /// parent.
    pub fn add_subtask(&mut self, path: &NodePath) -> Result<(NodePath, NodeId), FormError> {
        let parent = self.resolve(path)?;
        if path.depth() >= MAX_SUBTASK_DEPTH {
            return Err(FormError::DepthLimitReached { max: MAX_SUBTASK_DEPTH });
        }
        let child = self.alloc(FormNode::default());
        let children = &mut self.node_mut(parent).children;
        children.push(child);
        Ok((path.child(children.len() - 1), child))
    }

    /// Removes the subtask at `path` together with everything below it.
    /// Returns the handles that were freed.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::CannotRemoveRoot`] for the root and
    /// [`FormError::UnknownPath`] for a missing node.
    pub fn remove_subtask(&mut self, path: &NodePath) -> Result<Vec<NodeId>, FormError> {
        let (parent_path, index) = path.split_last().ok_or(FormError::CannotRemoveRoot)?;
        let target = self.resolve(path)?;
        let parent = self.resolve(&parent_path)?;
        self.node_mut(parent).children.remove(index);

        let mut removed = Vec::new();
        let mut stack = vec![target];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.slots[id.0].take() {
                stack.extend(node.children);
                self.free.push(id.0);
                removed.push(id);
            }
        }
        Ok(removed)
    }

    /// Every live node in preorder, with its path.
    #[must_use]
    pub fn walk(&self) -> Vec<(NodePath, NodeId)> {
        let mut out = Vec::new();
        let mut stack = vec![(NodePath::root(), self.root())];
        while let Some((path, id)) = stack.pop() {
            let children = &self.node(id).children;
            for (index, child) in children.iter().enumerate().rev() {
                stack.push((path.child(index), *child));
            }
            out.push((path, id));
        }
        out
    }

    /// Serializes the tree into a create request. Titles are trimmed and
    /// empty skill or subtask lists are left out.
    #[must_use]
    pub fn to_payload(&self) -> CreateTaskPayload {
        self.fold(|node, subtasks| CreateTaskPayload {
            title: node.title.trim().to_string(),
            skills: (!node.skills.is_empty()).then(|| node.skills.clone()),
            subtasks: (!subtasks.is_empty()).then_some(subtasks),
            parent_task_id: None,
        })
    }

    /// Copies the tree out as plain values.
    #[must_use]
    pub fn to_values(&self) -> TaskFormValues {
        self.fold(|node, subtasks| TaskFormValues {
            title: node.title.clone(),
            skills: node.skills.clone(),
            subtasks,
        })
    }

    /// Builds one `T` per node, children before parents, and returns the
    /// root's.
    fn fold<T>(&self, mut build: impl FnMut(&FormNode, Vec<T>) -> T) -> T {
        let order = self.walk();
        let mut built: HashMap<NodeId, T> = HashMap::with_capacity(order.len());
        for (_, id) in order.into_iter().rev() {
            let node = self.node(id);
            let children = node.children.iter().filter_map(|child| built.remove(child)).collect();
            built.insert(id, build(node, children));
        }
        built.remove(&self.root()).expect("root is always built")
    }

    fn alloc(&mut self, node: FormNode) -> NodeId {
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(node);
            NodeId(slot)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }
}
