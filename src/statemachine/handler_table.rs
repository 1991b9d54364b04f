//! [`HandlerTable`]: the flattened `event type -> handler declaration` map,
//! plus the push-time merge that implements §4.3's precedence rules.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::statemachine::def::{HandlerDecl, HandlerKey};

/// A resolved handler map: either a state's own statically-inherited
/// (class-chain) table, or the runtime-merged effective map for a pushed
/// stack frame.
#[derive(Debug, Clone, Default)]
pub struct HandlerTable {
    entries: HashMap<HandlerKey, HandlerDecl>,
}

impl HandlerTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &HandlerKey) -> Option<&HandlerDecl> {
        self.entries.get(key)
    }

    pub fn wildcard(&self) -> Option<&HandlerDecl> {
        self.entries.get(&HandlerKey::Wildcard)
    }

    pub fn insert(&mut self, key: HandlerKey, decl: HandlerDecl) {
        self.entries.insert(key, decl);
    }

    /// Concrete event types (wildcard excluded) whose declaration satisfies
    /// `predicate`; used to recompute the inbox's deferred/ignored sets
    /// after every transition.
    pub fn keys_with(&self, predicate: impl Fn(&HandlerDecl) -> bool) -> Vec<crate::event::EventType> {
        self.entries
            .iter()
            .filter_map(|(key, decl)| match key {
                HandlerKey::Type(event_type) if predicate(decl) => Some(*event_type),
                _ => None,
            })
            .collect()
    }

    /// Merge `child`'s own declarations onto `parent`'s effective map,
    /// highest precedence first (§4.3 "State-stack discipline"):
    /// 1. a wildcard declared by `child` clears the inherited map first;
    /// 2-4. every other declaration from `child` overwrites the inherited
    ///    entry for the same key, regardless of declaration kind.
    pub fn merge(parent: &HandlerTable, child: &HandlerTable) -> HandlerTable {
        let mut result = parent.clone();
        if let Some(wildcard) = child.wildcard() {
            result.entries.clear();
            result.entries.insert(HandlerKey::Wildcard, wildcard.clone());
        }
        for (key, decl) in &child.entries {
            if *key == HandlerKey::Wildcard {
                continue;
            }
            result.entries.insert(*key, decl.clone());
        }
        result
    }
}
