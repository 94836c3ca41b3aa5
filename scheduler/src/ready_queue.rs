use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::common_types::ProcessId;
use crate::SimError;

/// How a ready queue keeps its entries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueDiscipline {
    /// Insertion order
    Fifo,
    /// Ascending by [`SortKey`]; equal keys keep insertion order
    Sorted,
}

/// Ordering key of a queued process
///
/// Compared field by field. `tiebreak` is `None` for policies that rely on
/// insertion order for equal keys, `Some(id)` for the ones that break ties
/// by process id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub primary: usize,
    pub secondary: usize,
    pub tiebreak: Option<ProcessId>,
}

impl SortKey {
    /// Key that only carries a primary value
    pub fn primary(value: usize) -> SortKey {
        SortKey {
            primary: value,
            secondary: 0,
            tiebreak: None,
        }
    }

    pub fn with_secondary(mut self, value: usize) -> SortKey {
        self.secondary = value;
        self
    }

    pub fn with_tiebreak(mut self, id: ProcessId) -> SortKey {
        self.tiebreak = Some(id);
        self
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    slot: usize,
    id: ProcessId,
    key: SortKey,
}

/// Processes waiting for the CPU
///
/// Entries are process slots, the stable index of a process in the set.
#[derive(Clone, Debug)]
pub struct ReadyQueue {
    discipline: QueueDiscipline,
    entries: VecDeque<Entry>,
}

impl ReadyQueue {
    pub fn new(discipline: QueueDiscipline) -> ReadyQueue {
        ReadyQueue {
            discipline,
            entries: VecDeque::new(),
        }
    }

    pub fn discipline(&self) -> QueueDiscipline {
        self.discipline
    }

    /// Enqueues a process according to the queue discipline
    ///
    /// * `slot` - index of the process in the process set
    /// * `id` - process label, kept for snapshots
    /// * `key` - ordering key, ignored by FIFO queues
    pub fn push(&mut self, slot: usize, id: ProcessId, key: SortKey) {
        let entry = Entry { slot, id, key };

        match self.discipline {
            QueueDiscipline::Fifo => self.entries.push_back(entry),
            QueueDiscipline::Sorted => {
                // after every entry whose key is not greater
                let position = self
                    .entries
                    .iter()
                    .position(|e| key.cmp(&e.key) == Ordering::Less)
                    .unwrap_or(self.entries.len());
                self.entries.insert(position, entry);
            }
        }
    }

    /// Puts a process at the head regardless of its key
    pub fn push_front(&mut self, slot: usize, id: ProcessId, key: SortKey) {
        self.entries.push_front(Entry { slot, id, key });
    }

    /// Removes the head of the queue
    ///
    /// Callers check [`ReadyQueue::is_empty`] first; an empty queue here is an
    /// invariant violation.
    pub fn pop_front(&mut self) -> Result<usize, SimError> {
        self.entries
            .pop_front()
            .map(|e| e.slot)
            .ok_or_else(|| SimError::invariant("pop from an empty ready queue"))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.entries.iter().any(|e| e.slot == slot)
    }

    /// The key a queued process was inserted with
    pub fn peek_order(&self, slot: usize) -> Option<SortKey> {
        self.entries.iter().find(|e| e.slot == slot).map(|e| e.key)
    }

    /// Queued process ids, head first
    pub fn snapshot(&self) -> Vec<ProcessId> {
        self.entries.iter().map(|e| e.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(label: &str) -> ProcessId {
        label.parse().unwrap()
    }

    fn labels(queue: &ReadyQueue) -> Vec<String> {
        queue.snapshot().iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn fifo_ignores_keys() {
        let mut queue = ReadyQueue::new(QueueDiscipline::Fifo);

        queue.push(0, id("A0"), SortKey::primary(50));
        queue.push(1, id("A1"), SortKey::primary(5));
        queue.push_front(2, id("A2"), SortKey::primary(500));

        assert_eq!(labels(&queue), ["A2", "A0", "A1"]);
        assert_eq!(queue.pop_front().unwrap(), 2);
    }

    #[test]
    fn sorted_insertion_is_stable_for_equal_keys() {
        let mut queue = ReadyQueue::new(QueueDiscipline::Sorted);

        queue.push(1, id("B0"), SortKey::primary(10));
        queue.push(0, id("A0"), SortKey::primary(10));
        queue.push(2, id("A5"), SortKey::primary(3));

        assert_eq!(labels(&queue), ["A5", "B0", "A0"]);
    }

    #[test]
    fn sorted_breaks_ties_on_secondary_then_id() {
        let mut queue = ReadyQueue::new(QueueDiscipline::Sorted);

        queue.push(3, id("B0"), SortKey::primary(10).with_secondary(100).with_tiebreak(id("B0")));
        queue.push(2, id("A1"), SortKey::primary(10).with_secondary(100).with_tiebreak(id("A1")));
        queue.push(1, id("C4"), SortKey::primary(10).with_secondary(40).with_tiebreak(id("C4")));

        assert_eq!(labels(&queue), ["C4", "A1", "B0"]);
        assert_eq!(queue.peek_order(2).unwrap().primary, 10);
        assert!(queue.contains(3));
    }

    #[test]
    fn popping_an_empty_queue_fails() {
        let mut queue = ReadyQueue::new(QueueDiscipline::Fifo);

        assert!(queue.is_empty());
        assert!(matches!(queue.pop_front(), Err(SimError::Invariant(_))));
    }
}
