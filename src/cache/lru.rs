//! LRU Recency List Module
//!
//! Arena-backed doubly-linked list that tracks access order for LRU eviction.
//! Nodes live in a `Vec` and link to each other by index, so touch, remove and
//! evict are all O(1) without unsafe code.

const NIL: usize = usize::MAX;

// == Node Id ==
/// Handle to a node in a [`RecencyList`], stable until the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node<K> {
    key: Option<K>,
    prev: usize,
    next: usize,
}

// == Recency List ==
/// Tracks access order for LRU eviction.
///
/// - Head = most recently used
/// - Tail = least recently used
#[derive(Debug)]
pub struct RecencyList<K> {
    nodes: Vec<Node<K>>,
    head: usize,
    tail: usize,
    /// Head of the chain of recycled slots
    free: usize,
    len: usize,
}

impl<K> Default for RecencyList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RecencyList<K> {
    // == Constructor ==
    /// Creates a new empty recency list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            free: NIL,
            len: 0,
        }
    }

    // == Push Front ==
    /// Adds a key as the most recently used and returns its node handle.
    pub fn push_front(&mut self, key: K) -> NodeId {
        let idx = if self.free != NIL {
            let idx = self.free;
            self.free = self.nodes[idx].next;
            self.nodes[idx] = Node {
                key: Some(key),
                prev: NIL,
                next: NIL,
            };
            idx
        } else {
            self.nodes.push(Node {
                key: Some(key),
                prev: NIL,
                next: NIL,
            });
            self.nodes.len() - 1
        };

        self.attach_front(idx);
        self.len += 1;
        NodeId(idx)
    }

    // == Touch ==
    /// Marks a node as most recently used (moves it to the front).
    pub fn touch(&mut self, id: NodeId) {
        if self.head == id.0 || !self.is_live(id) {
            return;
        }
        self.detach(id.0);
        self.attach_front(id.0);
    }

    // == Remove ==
    /// Unlinks a node and returns its key.
    pub fn remove(&mut self, id: NodeId) -> Option<K> {
        if !self.is_live(id) {
            return None;
        }
        self.detach(id.0);
        let key = self.nodes[id.0].key.take();
        self.nodes[id.0].next = self.free;
        self.free = id.0;
        self.len -= 1;
        key
    }

    // == Pop Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the list is empty.
    pub fn pop_oldest(&mut self) -> Option<K> {
        if self.tail == NIL {
            return None;
        }
        self.remove(NodeId(self.tail))
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&K> {
        if self.tail == NIL {
            return None;
        }
        self.nodes[self.tail].key.as_ref()
    }

    /// Iterates keys from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Length ==
    /// Returns the number of tracked keys.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every node, including recycled slots.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = NIL;
        self.tail = NIL;
        self.free = NIL;
        self.len = 0;
    }

    fn is_live(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.0)
            .map(|node| node.key.is_some())
            .unwrap_or(false)
    }

    fn attach_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }
}

// == Iterator ==
/// Iterator over keys in MRU to LRU order.
#[derive(Debug)]
pub struct Iter<'a, K> {
    list: &'a RecencyList<K>,
    cursor: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor != NIL {
            let node = &self.list.nodes[self.cursor];
            self.cursor = node.next;
            if let Some(key) = node.key.as_ref() {
                return Some(key);
            }
        }
        None
    }
}
