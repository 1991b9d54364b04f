//! Data-driven state machine declarations (§9 "Reflection-discovered
//! declarations": source discovers states/handlers via reflection over
//! class attributes; here every user type instead registers an explicit
//! [`StateMachineDef`] value — data, not code — consumed by the runtime
//! with no reflection on the hot path).

// Layer 1: Standard library imports
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt::{self, Debug};

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::event::EventType;
use crate::statemachine::errors::StateMachineError;
use crate::statemachine::handler_table::HandlerTable;

/// The name of a user-declared entry/exit/action method, resolved by the
/// concrete actor's `StateMachineActions` implementation at dispatch time.
pub type ActionName = &'static str;

/// Identifies a user-declared state class, the same way [`crate::event::EventType`]
/// identifies an event payload type.
#[derive(Clone, Copy)]
pub struct StateId {
    type_id: TypeId,
    name: &'static str,
}

impl StateId {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for StateId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for StateId {}

impl std::hash::Hash for StateId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateId").field(&self.name).finish()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A handler-map key: either a concrete event type, or the wildcard marker
/// that matches any event type not otherwise declared (§3, §4.3 rule 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKey {
    Type(EventType),
    Wildcard,
}

/// A single handler declaration (§3 "StateMachine extensions").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerDecl {
    Action(ActionName),
    Goto {
        target: StateId,
        on_exit: Option<ActionName>,
    },
    Push {
        target: StateId,
    },
    Defer,
    Ignore,
}

/// One user-declared state: entry/exit actions, its own handler
/// declarations, an optional base state to inherit from, and whether it is
/// the machine's start state.
pub struct StateDef {
    id: StateId,
    base: Option<StateId>,
    entry: Option<ActionName>,
    exit: Option<ActionName>,
    is_start: bool,
    own: HashMap<HandlerKey, HandlerDecl>,
}

impl StateDef {
    pub fn builder(id: StateId) -> StateDefBuilder {
        StateDefBuilder {
            id,
            base: None,
            entry: None,
            exit: None,
            is_start: false,
            own: HashMap::new(),
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn base(&self) -> Option<StateId> {
        self.base
    }

    pub fn entry(&self) -> Option<ActionName> {
        self.entry
    }

    pub fn exit(&self) -> Option<ActionName> {
        self.exit
    }

    pub fn is_start(&self) -> bool {
        self.is_start
    }
}

/// Builder for [`StateDef`], mirroring the crate's builder-with-validation
/// convention.
pub struct StateDefBuilder {
    id: StateId,
    base: Option<StateId>,
    entry: Option<ActionName>,
    exit: Option<ActionName>,
    is_start: bool,
    own: HashMap<HandlerKey, HandlerDecl>,
}

impl StateDefBuilder {
    pub fn base(mut self, base: StateId) -> Self {
        self.base = Some(base);
        self
    }

    pub fn entry(mut self, action: ActionName) -> Self {
        self.entry = Some(action);
        self
    }

    pub fn exit(mut self, action: ActionName) -> Self {
        self.exit = Some(action);
        self
    }

    pub fn start(mut self) -> Self {
        self.is_start = true;
        self
    }

    pub fn on_event(mut self, event: EventType, decl: HandlerDecl) -> Self {
        self.own.insert(HandlerKey::Type(event), decl);
        self
    }

    pub fn on_wildcard(mut self, decl: HandlerDecl) -> Self {
        self.own.insert(HandlerKey::Wildcard, decl);
        self
    }

    pub fn build(self) -> StateDef {
        StateDef {
            id: self.id,
            base: self.base,
            entry: self.entry,
            exit: self.exit,
            is_start: self.is_start,
            own: self.own,
        }
    }
}

/// The complete, data-driven declaration set for one state machine type,
/// keyed by a type tag (§9). The runtime consumes only this value.
pub struct StateMachineDef {
    states: HashMap<StateId, StateDef>,
    start: StateId,
    canonical: HashMap<StateId, HandlerTable>,
}

impl StateMachineDef {
    pub fn builder() -> StateMachineDefBuilder {
        StateMachineDefBuilder {
            states: HashMap::new(),
        }
    }

    pub fn start_state(&self) -> StateId {
        self.start
    }

    pub fn state(&self, id: StateId) -> Option<&StateDef> {
        self.states.get(&id)
    }

    /// The statically resolved (class-inheritance) handler table for `id`,
    /// computed once at `build()` time.
    pub fn canonical_handlers(&self, id: StateId) -> &HandlerTable {
        self.canonical
            .get(&id)
            .expect("StateMachineDef only hands out ids it resolved at build time")
    }
}

pub struct StateMachineDefBuilder {
    states: HashMap<StateId, StateDef>,
}

impl StateMachineDefBuilder {
    pub fn add_state(mut self, def: StateDef) -> Self {
        self.states.insert(def.id(), def);
        self
    }

    pub fn build(self) -> Result<StateMachineDef, StateMachineError> {
        let mut start = None;
        for def in self.states.values() {
            if def.is_start() {
                if let Some(first) = start {
                    return Err(StateMachineError::MultipleStartStates {
                        first,
                        second: def.id(),
                    });
                }
                start = Some(def.id());
            }
        }
        let start = start.ok_or(StateMachineError::MissingStartState)?;

        let mut canonical = HashMap::new();
        let ids: Vec<StateId> = self.states.keys().copied().collect();
        for id in ids {
            Self::resolve_canonical(&self.states, &mut canonical, id)?;
        }

        Ok(StateMachineDef {
            states: self.states,
            start,
            canonical,
        })
    }

    fn resolve_canonical(
        states: &HashMap<StateId, StateDef>,
        canonical: &mut HashMap<StateId, HandlerTable>,
        id: StateId,
    ) -> Result<HandlerTable, StateMachineError> {
        if let Some(existing) = canonical.get(&id) {
            return Ok(existing.clone());
        }
        let def = states.get(&id).ok_or(StateMachineError::UnknownBaseState {
            state: id,
            base: id,
        })?;

        let mut table = match def.base {
            Some(base_id) => {
                if !states.contains_key(&base_id) {
                    return Err(StateMachineError::UnknownBaseState { state: id, base: base_id });
                }
                Self::resolve_canonical(states, canonical, base_id)?
            }
            None => HandlerTable::empty(),
        };

        for (key, decl) in &def.own {
            match key {
                HandlerKey::Wildcard => {
                    if table.wildcard().is_some() {
                        return Err(StateMachineError::DuplicateWildcard { state: id });
                    }
                }
                HandlerKey::Type(event_type) => {
                    if table.get(key).is_some() {
                        return Err(StateMachineError::DuplicateHandler {
                            state: id,
                            event_type: event_type.name().to_string(),
                        });
                    }
                }
            }
            table.insert(*key, decl.clone());
        }

        canonical.insert(id, table.clone());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct EventA;

    struct Init;
    struct Sub;

    #[test]
    fn build_requires_exactly_one_start_state() {
        let def = StateMachineDef::builder()
            .add_state(StateDef::builder(StateId::of::<Init>()).build())
            .build();
        assert_eq!(def.unwrap_err(), StateMachineError::MissingStartState);
    }

    #[test]
    fn subclass_redeclaring_base_handler_is_rejected() {
        let init = StateId::of::<Init>();
        let sub = StateId::of::<Sub>();
        let def = StateMachineDef::builder()
            .add_state(
                StateDef::builder(init)
                    .start()
                    .on_event(EventType::of::<EventA>(), HandlerDecl::Action("h1"))
                    .build(),
            )
            .add_state(
                StateDef::builder(sub)
                    .base(init)
                    .on_event(EventType::of::<EventA>(), HandlerDecl::Action("h2"))
                    .build(),
            )
            .build();
        assert!(matches!(
            def,
            Err(StateMachineError::DuplicateHandler { .. })
        ));
    }

    #[test]
    fn canonical_table_inherits_base_entries() {
        let init = StateId::of::<Init>();
        let sub = StateId::of::<Sub>();
        let def = StateMachineDef::builder()
            .add_state(
                StateDef::builder(init)
                    .start()
                    .on_event(EventType::of::<EventA>(), HandlerDecl::Action("h1"))
                    .build(),
            )
            .add_state(StateDef::builder(sub).base(init).build())
            .build()
            .expect("valid def");
        let table = def.canonical_handlers(sub);
        assert!(matches!(
            table.get(&HandlerKey::Type(EventType::of::<EventA>())),
            Some(HandlerDecl::Action("h1"))
        ));
    }
}
