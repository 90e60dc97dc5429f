//! Arena of tree nodes addressed by creation-ordered ids
//!
//! Nodes live in a single `Vec`; parent and child links are [`NodeId`]s into
//! it, so the tree owns every node and there are no ownership cycles. Node
//! ids start at 1 (the root) and increase by one per created node, which makes
//! iteration order and id order the same thing.

use crate::error::TupleError;
use crate::render::Tuple;
use rustc_hash::FxHashMap;
use std::fmt;

/// Identity of a node within one [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(1);

    /// Returns the id as used in the canonical output.
    pub fn get(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named node holding either a scalar payload or children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    name: String,
    data: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(id: NodeId, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name: String::new(),
            data: String::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in discovery order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_container(&self) -> bool {
        !self.children.is_empty()
    }
}

/// The parsed tree; always contains at least the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// A tree holding only an unnamed root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeId::ROOT, None)],
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// The node `id` hangs under; `None` for the root or an unknown id.
    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        self.get(id)?.parent.and_then(|parent| self.get(parent))
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |child| &self.nodes[child.index()])
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent(id);
        while let Some(parent) = cursor {
            depth += 1;
            cursor = self.parent(parent.id());
        }
        depth
    }

    /// Create a node under `parent` and return its id.
    pub(crate) fn add_child(&mut self, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len() as u32 + 1);
        self.nodes.push(Node::new(id, Some(parent)));
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub(crate) fn set_name(&mut self, id: NodeId, name: &str) {
        name.clone_into(&mut self.nodes[id.index()].name);
    }

    pub(crate) fn set_data(&mut self, id: NodeId, data: &str) {
        data.clone_into(&mut self.nodes[id.index()].data);
    }

    pub(crate) fn take_name(&mut self, id: NodeId) -> String {
        std::mem::take(&mut self.nodes[id.index()].name)
    }

    /// Rebuild a tree from canonical tuples.
    ///
    /// The first tuple is the root (parent `0`); every other tuple must name a
    /// parent that appeared earlier. Ids only need to be unique: nodes are
    /// renumbered densely in input order, so canonical output maps back onto
    /// the same ids.
    pub fn from_tuples<I>(tuples: I) -> Result<Tree, TupleError>
    where
        I: IntoIterator<Item = Tuple>,
    {
        let mut tuples = tuples.into_iter();
        let root = tuples.next().ok_or(TupleError::Empty)?;
        if root.parent != 0 {
            return Err(TupleError::RootHasParent {
                id: root.id,
                parent: root.parent,
            });
        }

        let mut tree = Tree::new();
        tree.set_name(NodeId::ROOT, &root.name);
        tree.set_data(NodeId::ROOT, &root.data);

        let mut ids: FxHashMap<u32, NodeId> = FxHashMap::default();
        ids.insert(root.id, NodeId::ROOT);

        for tuple in tuples {
            if ids.contains_key(&tuple.id) {
                return Err(TupleError::DuplicateId(tuple.id));
            }
            let parent = *ids.get(&tuple.parent).ok_or(TupleError::UnknownParent {
                id: tuple.id,
                parent: tuple.parent,
            })?;
            let id = tree.add_child(parent);
            tree.set_name(id, &tuple.name);
            tree.set_data(id, &tuple.data);
            ids.insert(tuple.id, id);
        }

        Ok(tree)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
