//! Two actors, each handling a single `Ping`, driven externally by
//! alternating `SendEventAndExecute` calls (§4.4, §8 "Ping-Pong").
//!
//! Run with `cargo run --example ping_pong`.

use std::sync::Arc;

use async_trait::async_trait;
use conductor_rt::prelude::*;

#[derive(Debug)]
struct Ping(u32);

struct Idle;

#[derive(Default)]
struct Echo {
    name: &'static str,
    seen: u32,
}

impl StateMachineActions for Echo {
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
        if action == "echo" {
            if let Some(ping) = downcast_event::<Ping>(event) {
                self.seen += 1;
                println!("{} received Ping({}), total seen = {}", self.name, ping.0, self.seen);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Actor for Echo {
    type Error = std::convert::Infallible;
}

fn echo_def() -> Arc<StateMachineDef> {
    let idle = StateId::of::<Idle>();
    Arc::new(
        StateMachineDef::builder()
            .add_state(
                StateDef::builder(idle)
                    .start()
                    .on_event(EventType::of::<Ping>(), HandlerDecl::Action("echo"))
                    .build(),
            )
            .build()
            .expect("valid def"),
    )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let context = ExecutionContext::uncontrolled(0);
    let op = OperationId::next();

    let alice = context
        .create_actor(Echo { name: "alice", seen: 0 }, echo_def(), Some("alice"), None, op)
        .await
        .expect("create alice");
    let bob = context
        .create_actor(Echo { name: "bob", seen: 0 }, echo_def(), Some("bob"), None, op)
        .await
        .expect("create bob");

    for round in 0..3 {
        context
            .send_event_and_execute(&alice, Box::new(Ping(round)), None, SendOptions::new(), op)
            .await
            .expect("send to alice");
        context
            .send_event_and_execute(&bob, Box::new(Ping(round)), None, SendOptions::new(), op)
            .await
            .expect("send to bob");
    }

    context.stop().await;
}
