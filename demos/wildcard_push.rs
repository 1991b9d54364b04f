//! A single actor that pushes into a verbose logging substate on demand;
//! the substate's wildcard handler catches everything else while it's
//! active (§4.3 rule 1 "wildcard", §8 "Wildcard push").
//!
//! Run with `cargo run --example wildcard_push`.

use std::sync::Arc;

use async_trait::async_trait;
use conductor_rt::prelude::*;

#[derive(Debug)]
struct EnterVerbose;

#[derive(Debug)]
struct ExitVerbose;

#[derive(Debug)]
struct Anything(&'static str);

struct Idle;
struct Verbose;

#[derive(Default)]
struct Logger {
    logged: Vec<String>,
}

impl StateMachineActions for Logger {
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
            "log_any" => {
                if let Some(payload) = downcast_event::<Anything>(event) {
                    let line = format!("[verbose] {}", payload.0);
                    println!("{line}");
                    self.logged.push(line);
                }
                Ok(())
            }
            "leave_verbose" => {
                println!("leaving verbose mode");
                ctx.pop();
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Actor for Logger {
    type Error = std::convert::Infallible;
}

fn logger_def() -> Arc<StateMachineDef> {
    let idle = StateId::of::<Idle>();
    let verbose = StateId::of::<Verbose>();
    Arc::new(
        StateMachineDef::builder()
            .add_state(
                StateDef::builder(idle)
                    .start()
                    .on_event(
                        EventType::of::<EnterVerbose>(),
                        HandlerDecl::Push { target: verbose },
                    )
                    .build(),
            )
            .add_state(
                StateDef::builder(verbose)
                    .on_event(EventType::of::<ExitVerbose>(), HandlerDecl::Action("leave_verbose"))
                    .on_wildcard(HandlerDecl::Action("log_any"))
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

    let logger = context
        .create_actor(Logger::default(), logger_def(), Some("logger"), None, op)
        .await
        .expect("create logger");

    context
        .send_event_and_execute(&logger, Box::new(EnterVerbose), None, SendOptions::new(), op)
        .await
        .expect("enter verbose");
    context
        .send_event_and_execute(&logger, Box::new(Anything("first")), None, SendOptions::new(), op)
        .await
        .expect("log first");
    context
        .send_event_and_execute(&logger, Box::new(Anything("second")), None, SendOptions::new(), op)
        .await
        .expect("log second");
    context
        .send_event_and_execute(&logger, Box::new(ExitVerbose), None, SendOptions::new(), op)
        .await
        .expect("exit verbose");

    context.stop().await;
}
