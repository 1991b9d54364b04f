//! End-to-end actor lifecycle scenarios driven through [`ExecutionContext`]
//! (§4.4, §8).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use conductor_rt::prelude::*;

#[derive(Debug)]
struct Ping;

#[derive(Debug)]
struct Shutdown;

struct Idle;

#[derive(Default)]
struct Counter {
    pings: u32,
}

impl StateMachineActions for Counter {
    fn invoke_entry(&mut self, _action: &'static str, _ctx: &mut TransitionContext) -> Result<(), StateMachineError> {
        Ok(())
    }

    fn invoke_exit(&mut self, _action: &'static str, _ctx: &mut TransitionContext) -> Result<(), StateMachineError> {
        Ok(())
    }

    fn invoke_action(
        &mut self,
        action: &'static str,
        event: &dyn Event,
        _ctx: &mut TransitionContext,
    ) -> Result<(), StateMachineError> {
        if action == "count" && downcast_event::<Ping>(event).is_some() {
            self.pings += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl Actor for Counter {
    type Error = std::convert::Infallible;
}

fn counter_def() -> Arc<StateMachineDef> {
    let idle = StateId::of::<Idle>();
    Arc::new(
        StateMachineDef::builder()
            .add_state(
                StateDef::builder(idle)
                    .start()
                    .on_event(EventType::of::<Ping>(), HandlerDecl::Action("count"))
                    .on_event(EventType::of::<Shutdown>(), HandlerDecl::Action("count"))
                    .build(),
            )
            .build()
            .expect("valid def"),
    )
}

#[tokio::test]
async fn ping_pong_round_trip_between_two_actors() {
    let context = ExecutionContext::uncontrolled(0);
    let op = OperationId::next();

    let alice = context
        .create_actor(Counter::default(), counter_def(), Some("alice"), None, op)
        .await
        .unwrap();
    let bob = context
        .create_actor(Counter::default(), counter_def(), Some("bob"), None, op)
        .await
        .unwrap();

    for _ in 0..5 {
        context
            .send_event_and_execute(&alice, Box::new(Ping), None, SendOptions::new(), op)
            .await
            .unwrap();
        context
            .send_event_and_execute(&bob, Box::new(Ping), None, SendOptions::new(), op)
            .await
            .unwrap();
    }

    assert_eq!(context.actor_count(), 2);
    context.stop().await;
}

#[tokio::test]
async fn sending_to_a_name_twice_resolves_the_same_actor() {
    let context = ExecutionContext::uncontrolled(1);
    let op = OperationId::next();

    let first = context.actor_id_from_name("singleton", "pkg::Counter");
    let second = context.actor_id_from_name("singleton", "pkg::Counter");
    assert_eq!(first, second);

    context
        .create_actor_by_id(first.clone(), Counter::default(), counter_def(), None, op)
        .await
        .unwrap();

    let status = context
        .send_event_and_execute(&second, Box::new(Ping), None, SendOptions::new(), op)
        .await
        .unwrap();
    assert_eq!(status, EnqueueStatus::EnqueuedAndStarted);

    context.stop().await;
}

#[tokio::test]
async fn sending_to_an_unknown_actor_without_must_handle_drops_silently() {
    let context = ExecutionContext::uncontrolled(2);
    let op = OperationId::next();
    let ghost = context.actor_id_from_name("ghost", "pkg::Counter");

    let status = context
        .send_event(&ghost, Box::new(Ping), None, SendOptions::new(), op)
        .await
        .unwrap();
    assert_eq!(status, EnqueueStatus::Dropped);
}

#[tokio::test]
async fn sending_to_an_unknown_actor_with_must_handle_errors() {
    let context = ExecutionContext::uncontrolled(3);
    let op = OperationId::next();
    let ghost = context.actor_id_from_name("ghost", "pkg::Counter");

    let err = context
        .send_event(&ghost, Box::new(Ping), None, SendOptions::new().must_handle(), op)
        .await
        .unwrap_err();
    assert!(matches!(err, ContextError::UnknownActor { .. }));
}

#[tokio::test]
async fn duplicate_actor_id_is_rejected() {
    let context = ExecutionContext::uncontrolled(4);
    let op = OperationId::next();
    let id = context.actor_id_from_name("dup", "pkg::Counter");

    context
        .create_actor_by_id(id.clone(), Counter::default(), counter_def(), None, op)
        .await
        .unwrap();
    let err = context
        .create_actor_by_id(id, Counter::default(), counter_def(), None, op)
        .await
        .unwrap_err();
    assert!(matches!(err, ContextError::DuplicateActorId { .. }));
}

#[tokio::test]
async fn context_stop_is_recorded_as_a_stopped_termination() {
    let context = ExecutionContext::uncontrolled(5);
    let sink = Arc::new(VecLogSink::new());
    context.register_log(sink.clone());
    let op = OperationId::next();

    let id = context
        .create_actor(Counter::default(), counter_def(), Some("doomed"), None, op)
        .await
        .unwrap();

    context
        .send_event_and_execute(&id, Box::new(Ping), None, SendOptions::new(), op)
        .await
        .unwrap();

    context.stop().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    let terminated = sink
        .entries()
        .into_iter()
        .any(|e| matches!(e.record, LogRecord::EventHandlerTerminated { status, .. } if status == "stopped"));
    assert!(terminated, "expected a termination record for the halted actor");
    assert!(context.is_halted(&id));
}

#[derive(Debug)]
struct Ping2;

struct WaitingForPong;

#[derive(Default)]
struct PongWaiter {
    pongs: u32,
}

impl StateMachineActions for PongWaiter {
    fn invoke_entry(&mut self, _action: &'static str, _ctx: &mut TransitionContext) -> Result<(), StateMachineError> {
        Ok(())
    }
    fn invoke_exit(&mut self, _action: &'static str, _ctx: &mut TransitionContext) -> Result<(), StateMachineError> {
        Ok(())
    }
    fn invoke_action(
        &mut self,
        action: &'static str,
        event: &dyn Event,
        ctx: &mut TransitionContext,
    ) -> Result<(), StateMachineError> {
        if action == "await_pong" && downcast_event::<Ping2>(event).is_some() {
            ctx.receive(vec![EventType::of::<Ping>()]);
        }
        if action == "count_pong" && downcast_event::<Ping>(event).is_some() {
            self.pongs += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl Actor for PongWaiter {
    type Error = std::convert::Infallible;
}

fn pong_waiter_def() -> Arc<StateMachineDef> {
    let waiting = StateId::of::<WaitingForPong>();
    Arc::new(
        StateMachineDef::builder()
            .add_state(
                StateDef::builder(waiting)
                    .start()
                    .on_event(EventType::of::<Ping2>(), HandlerDecl::Action("await_pong"))
                    .on_event(EventType::of::<Ping>(), HandlerDecl::Action("count_pong"))
                    .build(),
            )
            .build()
            .expect("valid def"),
    )
}

#[tokio::test]
async fn receive_async_suspends_the_actor_until_a_matching_send_arrives() {
    let context = ExecutionContext::uncontrolled(6);
    let op = OperationId::next();

    let id = context
        .create_actor(PongWaiter::default(), pong_waiter_def(), Some("waiter"), None, op)
        .await
        .unwrap();

    context
        .send_event_and_execute(&id, Box::new(Ping2), None, SendOptions::new(), op)
        .await
        .unwrap();

    context
        .send_event_and_execute(&id, Box::new(Ping), None, SendOptions::new(), op)
        .await
        .unwrap();

    context.stop().await;
}

struct TimerIdle;

#[derive(Default)]
struct PeriodicActor {
    fires: Arc<std::sync::atomic::AtomicU32>,
    timer_id: Option<u64>,
}

impl StateMachineActions for PeriodicActor {
    fn invoke_entry(&mut self, _action: &'static str, _ctx: &mut TransitionContext) -> Result<(), StateMachineError> {
        Ok(())
    }
    fn invoke_exit(&mut self, _action: &'static str, _ctx: &mut TransitionContext) -> Result<(), StateMachineError> {
        Ok(())
    }
    fn invoke_action(
        &mut self,
        action: &'static str,
        event: &dyn Event,
        ctx: &mut TransitionContext,
    ) -> Result<(), StateMachineError> {
        match action {
            "arm" if downcast_event::<Ping>(event).is_some() => {
                self.timer_id = Some(ctx.start_periodic_timer(Duration::from_millis(5)));
            }
            "tick" => {
                if let Some(TimerElapsed(info)) = downcast_event::<TimerElapsed>(event) {
                    if Some(info.timer_id) == self.timer_id {
                        self.fires.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[async_trait]
impl Actor for PeriodicActor {
    type Error = std::convert::Infallible;
}

fn periodic_actor_def() -> Arc<StateMachineDef> {
    let idle = StateId::of::<TimerIdle>();
    Arc::new(
        StateMachineDef::builder()
            .add_state(
                StateDef::builder(idle)
                    .start()
                    .on_event(EventType::of::<Ping>(), HandlerDecl::Action("arm"))
                    .on_event(EventType::of::<TimerElapsed>(), HandlerDecl::Action("tick"))
                    .build(),
            )
            .build()
            .expect("valid def"),
    )
}

#[tokio::test]
async fn periodic_timer_self_delivers_timer_elapsed_repeatedly() {
    let context = ExecutionContext::uncontrolled(7);
    let op = OperationId::next();
    let fires = Arc::new(std::sync::atomic::AtomicU32::new(0));

    let id = context
        .create_actor(
            PeriodicActor { fires: fires.clone(), timer_id: None },
            periodic_actor_def(),
            Some("clock"),
            None,
            op,
        )
        .await
        .unwrap();

    context
        .send_event_and_execute(&id, Box::new(Ping), None, SendOptions::new(), op)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(60)).await;
    context.stop().await;

    assert!(fires.load(std::sync::atomic::Ordering::SeqCst) >= 2, "expected the periodic timer to have fired at least twice");
}
