//! Recency List Module
//!
//! Doubly-linked list of keys ordered by recency, stored in a slot arena.

// == Node Handle ==
/// Stable handle to a node in a [`RecencyList`].
///
/// Handles stay valid until the node is removed; the slot may then be
/// reused by a later insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Tracks access order for LRU eviction.
///
/// - Head = most recently used
/// - Tail = least recently used
///
/// Insert at head, unlink by handle, and pop from tail are all O(1).
#[derive(Debug)]
pub struct RecencyList<K> {
    nodes: Vec<Option<Node<K>>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K> RecencyList<K> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a key at the head and returns its handle.
    pub fn push_front(&mut self, key: K) -> NodeId {
        let node = Node {
            key,
            prev: None,
            next: self.head,
        };
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };

        if let Some(old_head) = self.head {
            if let Some(head) = self.nodes[old_head].as_mut() {
                head.prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
        self.len += 1;
        NodeId(idx)
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    ///
    /// Returns false if the handle does not point to a live node.
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.head == Some(id.0) {
            return true;
        }

        self.unlink(id.0);
        let old_head = self.head;
        if let Some(node) = self.nodes[id.0].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(old_head) = old_head {
            if let Some(head) = self.nodes[old_head].as_mut() {
                head.prev = Some(id.0);
            }
        }
        self.head = Some(id.0);
        true
    }

    // == Remove ==
    /// Removes a node by handle and returns its key.
    pub fn remove(&mut self, id: NodeId) -> Option<K> {
        if !self.contains(id) {
            return None;
        }
        self.unlink(id.0);
        let node = self.nodes[id.0].take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(node.key)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used key.
    ///
    /// Returns None if the list is empty.
    pub fn pop_back(&mut self) -> Option<K> {
        let tail = self.tail?;
        self.remove(NodeId(tail))
    }

    // == Peek ==
    /// Returns the least recently used key without removing it.
    pub fn peek_back(&self) -> Option<&K> {
        self.tail.and_then(|idx| self.key(NodeId(idx)))
    }

    /// Returns the most recently used key without removing it.
    pub fn peek_front(&self) -> Option<&K> {
        self.head.and_then(|idx| self.key(NodeId(idx)))
    }

    /// Returns the key stored at a handle.
    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.nodes
            .get(id.0)
            .and_then(|slot| slot.as_ref())
            .map(|node| &node.key)
    }

    /// Checks if a handle points to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.0), Some(Some(_)))
    }

    // == Length ==
    /// Returns the number of keys in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every node and releases the slots.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iteration ==
    /// Iterates keys from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.nodes[prev_idx].as_mut() {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.nodes[next_idx].as_mut() {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}

impl<K> Default for RecencyList<K> {
    fn default() -> Self {
        Self::new()
    }
}

// == Iterator ==
/// Front-to-back iterator over the keys of a [`RecencyList`].
pub struct Iter<'a, K> {
    list: &'a RecencyList<K>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let idx = self.cursor?;
        let node = list.nodes[idx].as_ref()?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
