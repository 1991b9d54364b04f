//! C4: single-threaded event-handler actors (§3 "Actor", §4.2).
//!
//! # Components
//!
//! - [`Actor`] — the trait concrete actor types implement (entry/exit/action
//!   callbacks plus the lifecycle hooks the runtime calls at well-known
//!   points).
//! - [`ActorRuntime`] — owns one actor's inbox, state machine, and lifecycle;
//!   drives the handler loop one event at a time.
//! - [`ActorLifecycle`] / [`ActorState`] — `Created → Initializing → Running
//!   ↔ Idle → Halting → Halted`.
//!
//! # Design Philosophy
//!
//! A plain `Actor` is a [`crate::statemachine::StateMachineInstance`] with
//! exactly one declared state: §4.2's "base Actor dispatch" is what
//! `dispatch(e)` (§4.3) reduces to once push/goto never grows the stack past
//! depth one. State machines with more than one state reuse the same engine.
//!
//! Each actor owns its state exclusively — no shared mutable state between
//! actors, communication only through enqueued events (§3 Glossary).
//!
//! # Module Organization
//!
//! - `traits.rs` — [`Actor`]
//! - `runtime.rs` — [`ActorRuntime`], the event-loop driver
//! - `lifecycle.rs` — [`ActorLifecycle`] and [`ActorState`]
//! - `errors.rs` — [`ActorRuntimeError`]
//!
//! # See Also
//!
//! - [`crate::statemachine`] — the dispatch engine an actor's single state
//!   degenerates to
//! - [`crate::inbox`] — the per-actor event queue an [`ActorRuntime`] drains
//! - [`crate::context`] — the execution context that creates actors and
//!   drives their runtimes

pub mod errors;
pub mod lifecycle;
pub mod runtime;
pub mod traits;

pub use errors::ActorRuntimeError;
pub use lifecycle::{ActorLifecycle, ActorState};
pub use runtime::{ActorRuntime, StepOutcome, TimerCommand};
pub use traits::Actor;
