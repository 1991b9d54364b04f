//! Event payloads and the runtime-type machinery used to route them (§3 C1).

pub mod control;
pub mod envelope;
pub mod traits;

pub use control::{DefaultEvent, GotoState, Halt, PushState, TimerElapsed, TimerInfo};
pub use envelope::{EventEnvelope, EventInfo, SendOptions};
pub use traits::{downcast_event, BoxedEvent, Event, EventType};
pub use crate::util::EventGroupId;
