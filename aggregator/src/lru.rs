//! Recency order over live correlation keys.
//!
//! Arena-backed doubly-linked list with a key index, so touching,
//! removing, or evicting a key costs O(1) regardless of how many groups
//! are resident. The front of the list is the least-recently-touched key.

use std::collections::HashMap;

const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node {
    key: String,
    prev: usize,
    next: usize,
}

#[derive(Debug)]
pub(crate) struct RecencyList {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
}

impl RecencyList {
    pub fn new() -> Self {
        RecencyList {
            nodes: Vec::new(),
            index: HashMap::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Appends a key at the most-recent end. The key must not already be
    /// present.
    pub fn push(&mut self, key: &str) {
        debug_assert!(!self.index.contains_key(key));
        let node = Node {
            key: key.to_owned(),
            prev: self.tail,
            next: NIL,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        if self.tail != NIL {
            self.nodes[self.tail].next = slot;
        } else {
            self.head = slot;
        }
        self.tail = slot;
        self.index.insert(key.to_owned(), slot);
    }

    /// Moves an existing key to the most-recent end. Unknown keys are
    /// ignored.
    pub fn touch(&mut self, key: &str) {
        let Some(&slot) = self.index.get(key) else {
            return;
        };
        if slot == self.tail {
            return;
        }
        self.unlink(slot);
        self.nodes[slot].prev = self.tail;
        self.nodes[slot].next = NIL;
        if self.tail != NIL {
            self.nodes[self.tail].next = slot;
        } else {
            self.head = slot;
        }
        self.tail = slot;
    }

    /// Removes and returns the least-recently-touched key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        if self.head == NIL {
            return None;
        }
        let slot = self.head;
        self.unlink(slot);
        let key = std::mem::take(&mut self.nodes[slot].key);
        self.index.remove(&key);
        self.free.push(slot);
        Some(key)
    }

    /// Removes a key wherever it sits in the order. Unknown keys are
    /// ignored.
    pub fn remove(&mut self, key: &str) {
        let Some(slot) = self.index.remove(key) else {
            return;
        };
        self.unlink(slot);
        self.nodes[slot].key.clear();
        self.free.push(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
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
    }

    #[cfg(test)]
    fn keys_oldest_first(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len());
        let mut slot = self.head;
        while slot != NIL {
            keys.push(self.nodes[slot].key.clone());
            slot = self.nodes[slot].next;
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_insertion_order() {
        let mut list = RecencyList::new();
        list.push("a");
        list.push("b");
        list.push("c");
        assert_eq!(list.keys_oldest_first(), ["a", "b", "c"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_touch_moves_key_to_most_recent_end() {
        let mut list = RecencyList::new();
        list.push("a");
        list.push("b");
        list.push("c");

        list.touch("a");
        assert_eq!(list.keys_oldest_first(), ["b", "c", "a"]);

        // Touching the most recent key is a no-op.
        list.touch("a");
        assert_eq!(list.keys_oldest_first(), ["b", "c", "a"]);

        list.touch("unknown");
        assert_eq!(list.keys_oldest_first(), ["b", "c", "a"]);
    }

    #[test]
    fn test_pop_oldest_follows_recency() {
        let mut list = RecencyList::new();
        list.push("a");
        list.push("b");
        list.push("c");
        list.touch("b");

        assert_eq!(list.pop_oldest().as_deref(), Some("a"));
        assert_eq!(list.pop_oldest().as_deref(), Some("c"));
        assert_eq!(list.pop_oldest().as_deref(), Some("b"));
        assert_eq!(list.pop_oldest(), None);
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_remove_from_any_position() {
        let mut list = RecencyList::new();
        list.push("a");
        list.push("b");
        list.push("c");

        list.remove("b");
        assert_eq!(list.keys_oldest_first(), ["a", "c"]);

        list.remove("a");
        assert_eq!(list.keys_oldest_first(), ["c"]);

        list.remove("c");
        assert!(list.keys_oldest_first().is_empty());

        list.remove("never-inserted");
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_slots_are_reused_after_removal() {
        let mut list = RecencyList::new();
        list.push("a");
        list.push("b");
        assert_eq!(list.pop_oldest().as_deref(), Some("a"));

        list.push("c");
        list.push("d");
        assert_eq!(list.keys_oldest_first(), ["b", "c", "d"]);
        // One slot was recycled, so the arena holds exactly three nodes.
        assert_eq!(list.nodes.len(), 3);
    }
}
