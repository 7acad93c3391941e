//! Scope registry and threshold resolution
//!
//! Scopes are recorded in construction order. A scope has no parent pointer:
//! its effective level comes from walking backward through the registry to
//! the nearest live slot with an explicit threshold.
//!
//! Releasing a scope only marks its slot dead. Dead slots at the tail are
//! popped immediately, so when scopes are released in stack order the
//! registry shrinks back with them.

use super::config::ResolutionMode;
use super::error::{LoggerError, Result};
use super::log_level::{LogLevel, Threshold};

/// Index of a scope's slot in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    threshold: Threshold,
    live: bool,
}

#[derive(Debug, Default)]
pub struct ScopeRegistry {
    slots: Vec<Slot>,
    live: usize,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scope. O(1) amortized.
    pub fn push(&mut self, threshold: Threshold) -> ScopeId {
        let id = ScopeId(self.slots.len());
        self.slots.push(Slot {
            threshold,
            live: true,
        });
        self.live += 1;
        id
    }

    /// Mark a scope dead and drop any dead slots left at the tail
    pub fn release(&mut self, id: ScopeId) {
        let Some(slot) = self.slots.get_mut(id.0) else {
            return;
        };
        if !slot.live {
            return;
        }
        slot.live = false;
        self.live -= 1;

        while self.slots.last().is_some_and(|slot| !slot.live) {
            self.slots.pop();
        }
    }

    /// Capacity hint for the expected maximum nesting depth
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        let current = self.slots.len();
        if capacity <= current {
            return Err(LoggerError::capacity_hint(capacity, current));
        }
        self.slots.reserve(capacity - current);
        Ok(())
    }

    pub fn threshold(&self, id: ScopeId) -> Option<Threshold> {
        self.slots
            .get(id.0)
            .filter(|slot| slot.live)
            .map(|slot| slot.threshold)
    }

    pub fn set_threshold(&mut self, id: ScopeId, threshold: Threshold) -> bool {
        match self.slots.get_mut(id.0) {
            Some(slot) if slot.live => {
                slot.threshold = threshold;
                true
            }
            _ => false,
        }
    }

    /// Resolve the level in force for `id`.
    ///
    /// Falls back to `default` when no live slot before the starting point
    /// carries an explicit threshold.
    pub fn resolve(&self, id: ScopeId, mode: ResolutionMode, default: LogLevel) -> LogLevel {
        let end = match mode {
            ResolutionMode::RegistryTail => self.slots.len(),
            ResolutionMode::OwnPosition => (id.0 + 1).min(self.slots.len()),
        };

        self.slots[..end]
            .iter()
            .rev()
            .filter(|slot| slot.live)
            .find_map(|slot| slot.threshold.level())
            .unwrap_or(default)
    }

    /// Number of live scopes
    pub fn depth(&self) -> usize {
        self.live
    }

    /// Number of slots, live or dead
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: LogLevel = LogLevel::Warn;

    fn level(level: LogLevel) -> Threshold {
        Threshold::Level(level)
    }

    #[test]
    fn test_all_inherit_resolves_to_default() {
        let mut registry = ScopeRegistry::new();
        let ids: Vec<_> = (0..10).map(|_| registry.push(Threshold::Inherit)).collect();

        for id in ids {
            assert_eq!(registry.resolve(id, ResolutionMode::RegistryTail, DEFAULT), DEFAULT);
            assert_eq!(registry.resolve(id, ResolutionMode::OwnPosition, DEFAULT), DEFAULT);
        }
    }

    #[test]
    fn test_tail_resolution_ignores_queried_position() {
        let mut registry = ScopeRegistry::new();
        let a = registry.push(level(LogLevel::Info));
        let b = registry.push(Threshold::Inherit);
        let c = registry.push(level(LogLevel::Debug));
        let d = registry.push(Threshold::Inherit);

        for id in [a, b, c, d] {
            assert_eq!(
                registry.resolve(id, ResolutionMode::RegistryTail, DEFAULT),
                LogLevel::Debug
            );
        }
    }

    #[test]
    fn test_own_position_resolution() {
        let mut registry = ScopeRegistry::new();
        let a = registry.push(level(LogLevel::Info));
        let b = registry.push(Threshold::Inherit);
        let c = registry.push(level(LogLevel::Debug));
        let d = registry.push(Threshold::Inherit);

        let mode = ResolutionMode::OwnPosition;
        assert_eq!(registry.resolve(a, mode, DEFAULT), LogLevel::Info);
        assert_eq!(registry.resolve(b, mode, DEFAULT), LogLevel::Info);
        assert_eq!(registry.resolve(c, mode, DEFAULT), LogLevel::Debug);
        assert_eq!(registry.resolve(d, mode, DEFAULT), LogLevel::Debug);
    }

    #[test]
    fn test_released_scope_no_longer_applies() {
        let mut registry = ScopeRegistry::new();
        let outer = registry.push(level(LogLevel::Error));
        let inner = registry.push(level(LogLevel::Debug));

        assert_eq!(
            registry.resolve(outer, ResolutionMode::RegistryTail, DEFAULT),
            LogLevel::Debug
        );

        registry.release(inner);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.resolve(outer, ResolutionMode::RegistryTail, DEFAULT),
            LogLevel::Error
        );
    }

    #[test]
    fn test_out_of_order_release_is_skipped_then_compacted() {
        let mut registry = ScopeRegistry::new();
        let a = registry.push(level(LogLevel::Info));
        let b = registry.push(level(LogLevel::Debug));
        let c = registry.push(Threshold::Inherit);

        registry.release(b);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.depth(), 2);
        assert_eq!(
            registry.resolve(c, ResolutionMode::RegistryTail, DEFAULT),
            LogLevel::Info
        );

        registry.release(c);
        assert_eq!(registry.len(), 1);
        registry.release(a);
        assert!(registry.is_empty());
        assert_eq!(registry.depth(), 0);
    }

    #[test]
    fn test_release_twice_is_harmless() {
        let mut registry = ScopeRegistry::new();
        let a = registry.push(Threshold::Inherit);
        registry.release(a);
        registry.release(a);
        assert_eq!(registry.depth(), 0);
    }

    #[test]
    fn test_set_threshold() {
        let mut registry = ScopeRegistry::new();
        let a = registry.push(Threshold::Inherit);

        assert!(registry.set_threshold(a, level(LogLevel::Fatal)));
        assert_eq!(registry.threshold(a), Some(level(LogLevel::Fatal)));

        registry.release(a);
        assert!(!registry.set_threshold(a, level(LogLevel::Debug)));
        assert_eq!(registry.threshold(a), None);
    }

    #[test]
    fn test_reserve_requires_growth() {
        let mut registry = ScopeRegistry::new();
        registry.push(Threshold::Inherit);
        registry.push(Threshold::Inherit);

        assert!(matches!(
            registry.reserve(2),
            Err(LoggerError::CapacityHint { requested: 2, current: 2 })
        ));
        registry.reserve(64).unwrap();
        assert!(registry.capacity() >= 64);
    }
}
