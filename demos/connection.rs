//! Connection lifecycle modelled as a table-driven hierarchy.
//!
//! ```text
//! Line (initial Offline)
//! ├── Offline
//! └── Online (initial Connecting)
//!     ├── Connecting
//!     └── Connected
//! ```
//!
//! Run with `cargo run --example connection`.

use strata::builder::{MachineBuilder, RuleBuilder, StateBuilder};
use strata::core::State;
use strata::{event_enum, state_enum};

state_enum! {
    enum Link {
        Line,
        Offline,
        Online,
        Connecting,
        Connected,
    }
}

event_enum! {
    enum Signal {
        Dial,
        Established,
        Dropped,
        Send,
        HangUp,
    }
}

#[derive(Debug, Default)]
struct Session {
    retries: u32,
    sent: Vec<String>,
}

const MAX_RETRIES: u32 = 2;

type Def = StateBuilder<Link, Signal, Session, String>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut machine = MachineBuilder::<Link, Signal, Session, String>::new()
        .name("connection")
        .initial(Link::Line)
        .record_history(Some(16))
        .state(Def::new(Link::Line).initial(Link::Offline))
        .state(
            Def::new(Link::Offline)
                .parent(Link::Line)
                .rule(
                    RuleBuilder::new()
                        .on(Signal::Dial)
                        .to(Link::Online)
                        .run(|session: &mut Session, _, _| session.retries = 0),
                )?,
        )
        .state(
            Def::new(Link::Online)
                .parent(Link::Line)
                .initial(Link::Connecting)
                .transition(Signal::HangUp, Link::Offline),
        )
        .state(
            Def::new(Link::Connecting)
                .parent(Link::Online)
                .on_enter(|session: &mut Session, _| {
                    tracing::info!("connecting (retry {})", session.retries)
                })
                .transition(Signal::Established, Link::Connected)
                .rule(
                    RuleBuilder::new()
                        .on(Signal::Dropped)
                        .to(Link::Connecting)
                        .external()
                        .when(|session: &Session| session.retries < MAX_RETRIES)
                        .run(|session: &mut Session, _, _| session.retries += 1),
                )?
                .transition(Signal::Dropped, Link::Offline),
        )
        .state(
            Def::new(Link::Connected)
                .parent(Link::Online)
                .on_enter(|_, ctx| ctx.post_with(Signal::Send, "hello".to_string()))
                .rule(
                    RuleBuilder::new()
                        .on(Signal::Send)
                        .run(|session: &mut Session, payload: Option<&String>, _| {
                            session.sent.extend(payload.cloned())
                        }),
                )?
                .transition(Signal::Dropped, Link::Connecting),
        )
        .build()?;

    machine.handle(Signal::Dial)?;
    machine.handle(Signal::Established)?;
    machine.handle_with(Signal::Send, "status?".to_string())?;
    machine.handle(Signal::Dropped)?;

    for _ in 0..=MAX_RETRIES {
        machine.handle(Signal::Dropped)?;
    }

    let report = machine.handle(Signal::HangUp)?;
    tracing::info!("hang up while offline: {:?}", report);

    tracing::info!(
        "final state {:?} after {} transitions, sent {:?}",
        machine.current_state(),
        machine.version(),
        machine.hierarchy().data().sent
    );

    if let Some(history) = machine.history() {
        let path: Vec<&str> = history.get_path().into_iter().map(|s| s.name()).collect();
        tracing::info!("path: {}", path.join(" -> "));
    }

    Ok(())
}
