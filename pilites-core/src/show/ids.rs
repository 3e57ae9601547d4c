//! Identifier generation.
//!
//! Editors receive an [`IdGenerator`] at construction so tests can use a
//! deterministic sequence while production uses random UUIDs.

use uuid::Uuid;

/// Produces fresh entity identifiers of the form `<prefix>-<unique>`.
pub trait IdGenerator: Send {
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Random v4 UUID identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4())
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... identifiers.
///
/// The counter is owned by the instance; two generators never share it.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_isolated() {
        let mut a = SequentialIds::new();
        let mut b = SequentialIds::new();
        assert_eq!(a.next_id("cue"), "cue-1");
        assert_eq!(a.next_id("region"), "region-2");
        assert_eq!(b.next_id("cue"), "cue-1");
    }

    #[test]
    fn uuid_ids_are_prefixed_and_unique() {
        let mut ids = UuidIds;
        let a = ids.next_id("effect");
        let b = ids.next_id("effect");
        assert!(a.starts_with("effect-"));
        assert_ne!(a, b);
    }
}
