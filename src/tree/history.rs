use std::sync::Arc;

use super::Node;

/// Append-only list of nodes with a cursor.
///
/// Pushing never mutates a shared list: nodes past the cursor (undone steps)
/// are dropped from the new copy only. Undo and redo just move the cursor.
#[derive(Debug)]
pub struct MutationTree<T> {
    nodes: Arc<Vec<Node<T>>>,
    cursor: usize,
}

impl<T> Default for MutationTree<T> {
    fn default() -> Self {
        MutationTree {
            nodes: Arc::new(Vec::new()),
            cursor: 0,
        }
    }
}

impl<T> Clone for MutationTree<T> {
    fn clone(&self) -> Self {
        MutationTree {
            nodes: self.nodes.clone(),
            cursor: self.cursor,
        }
    }
}

impl<T> MutationTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, node: Node<T>) -> Self {
        self.extend(std::iter::once(node))
    }

    pub fn extend<I>(&self, nodes: I) -> Self
    where
        I: IntoIterator<Item = Node<T>>,
    {
        let mut next: Vec<Node<T>> = self.nodes[..self.cursor].to_vec();
        next.extend(nodes);
        MutationTree {
            cursor: next.len(),
            nodes: Arc::new(next),
        }
    }

    pub fn undo(&self, steps: usize) -> Self {
        MutationTree {
            nodes: self.nodes.clone(),
            cursor: self.cursor.saturating_sub(steps),
        }
    }

    pub fn redo(&self, steps: usize) -> Self {
        MutationTree {
            nodes: self.nodes.clone(),
            cursor: self.cursor.saturating_add(steps).min(self.nodes.len()),
        }
    }

    /// Active nodes, up to the cursor.
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes[..self.cursor]
    }

    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }
}
