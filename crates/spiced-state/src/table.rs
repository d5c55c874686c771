//! In-memory priority table and the allocation rule.

use std::collections::{BTreeMap, HashSet};

use crate::error::{StateError, StateResult};

/// Highest rule priority an application load balancer listener accepts.
pub const MAX_PRIORITY: u32 = 50_000;

/// Stack name → listener rule priority.
///
/// Values are positive and unique. Entries are never removed, so the next
/// priority is always one above the current maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityTable {
    entries: BTreeMap<String, u32>,
}

impl PriorityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, rejecting zero and duplicate priorities.
    pub fn from_entries(entries: BTreeMap<String, u32>) -> StateResult<Self> {
        let mut seen = HashSet::new();
        for (stack, priority) in &entries {
            if *priority == 0 {
                return Err(StateError::Invalid(format!(
                    "priority of {stack} must be positive"
                )));
            }
            if !seen.insert(*priority) {
                return Err(StateError::Invalid(format!(
                    "priority {priority} of {stack} is already taken"
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &BTreeMap<String, u32> {
        &self.entries
    }

    pub fn get(&self, stack_name: &str) -> Option<u32> {
        self.entries.get(stack_name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `1 + max(0, all priorities)`.
    pub fn next_priority(&self) -> u32 {
        self.entries.values().copied().max().unwrap_or(0) + 1
    }

    /// Return the priority of `stack_name`, assigning the next one if the
    /// stack is new. The flag is true when an entry was inserted.
    pub fn allocate(&mut self, stack_name: &str) -> StateResult<(u32, bool)> {
        if let Some(priority) = self.get(stack_name) {
            return Ok((priority, false));
        }
        let priority = self.next_priority();
        if priority > MAX_PRIORITY {
            return Err(StateError::Exhausted(MAX_PRIORITY));
        }
        self.entries.insert(stack_name.to_string(), priority);
        Ok((priority, true))
    }
}
