//! Actions that raise further events on their own machine.

use statemap::builder::{TableBuilder, TransitionBuilder};
use statemap::core::Context;
use statemap::engine::{FsmError, StateMachine};
use statemap::table::{Action, TransitionTable};
use statemap::{event_enum, state_enum};

state_enum! {
    enum Link { Down, Dialing, Up }
}

event_enum! {
    enum Signal { Dial, Tone, Drop }
}

#[derive(Default)]
struct Modem {
    seen: Vec<String>,
}

impl Context for Modem {
    type State = Link;
    type Event = Signal;
    type Error = std::convert::Infallible;
    type Args = ();
}

fn t() -> TransitionBuilder<Modem> {
    TransitionBuilder::new()
}

fn log(entry: &'static str) -> Action<Modem> {
    Action::call(entry, move |m: &mut Modem| m.seen.push(entry.to_string()))
}

/// Records the state and in-flight event an action observes.
fn observe(label: &'static str) -> Action<Modem> {
    Action::new(label, move |machine: &mut StateMachine<Modem>| {
        let state = machine.state().map(|s| format!("{s:?}")).unwrap_or_default();
        let event = machine.transition().map(|e| format!("{e:?}")).unwrap_or_default();
        machine
            .context_mut()
            .seen
            .push(format!("{label}: {state} {event}"));
        Ok(())
    })
}

fn table() -> TransitionTable<Modem> {
    TableBuilder::new()
        .name("Modem")
        .start(Link::Down)
        .entry(Link::Up, log("enter Up"))
        .exit(Link::Down, log("exit Down"))
        .transition(
            t().from(Link::Down)
                .on(Signal::Dial)
                .to(Link::Dialing)
                .action(observe("dial"))
                .action(Action::new("raise tone", |m: &mut StateMachine<Modem>| {
                    m.dispatch(Signal::Tone)
                }))
                .action(observe("after tone")),
        )
        .unwrap()
        // A nested Tone still sees Down, since Dial has not committed yet.
        .transition(t().from(Link::Down).on(Signal::Tone).stay().action(observe("tone")))
        .unwrap()
        .transition(t().from(Link::Dialing).on(Signal::Tone).to(Link::Up))
        .unwrap()
        .transition(t().from(Link::Up).on(Signal::Drop).to(Link::Down).action(Action::new(
            "redial",
            |m: &mut StateMachine<Modem>| m.dispatch(Signal::Dial),
        )))
        .unwrap()
        .transition(t().from(Link::Dialing).on(Signal::Drop).to(Link::Down).action(Action::new(
            "late tone",
            |m: &mut StateMachine<Modem>| m.dispatch(Signal::Tone),
        )))
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn nested_dispatch_resolves_against_outer_source_state() {
    let mut machine = StateMachine::new(table(), Modem::default());
    machine.enter_start_state().unwrap();

    machine.dispatch(Signal::Dial).unwrap();

    assert_eq!(machine.state(), Some(&Link::Dialing));
    assert_eq!(machine.previous_state(), Some(&Link::Down));
    assert_eq!(
        machine.context().seen,
        vec![
            "exit Down",
            "dial: Down Dial",
            "tone: Down Tone",
            "after tone: Down Dial",
        ]
    );
    assert!(!machine.is_in_transition());
}

#[test]
fn nested_unhandled_event_aborts_outer_transition() {
    let mut machine = StateMachine::new(table(), Modem::default());
    machine.enter_start_state().unwrap();
    machine.dispatch(Signal::Dial).unwrap();
    machine.dispatch(Signal::Tone).unwrap();
    assert_eq!(machine.state(), Some(&Link::Up));

    // Dial is raised while still in Up, where nothing handles it.
    let result = machine.dispatch(Signal::Drop);

    assert!(matches!(result, Err(FsmError::UnhandledTransition { .. })));
    assert_eq!(machine.state(), Some(&Link::Up));
    assert!(!machine.is_in_transition());
}

#[test]
fn outer_commit_wins_over_nested_commit() {
    let mut machine = StateMachine::new(table(), Modem::default());
    machine.enter_start_state().unwrap();
    machine.dispatch(Signal::Dial).unwrap();
    machine.context_mut().seen.clear();

    machine.dispatch(Signal::Drop).unwrap();

    assert_eq!(machine.context().seen, vec!["enter Up"]);
    assert_eq!(machine.state(), Some(&Link::Down));
    assert_eq!(machine.previous_state(), Some(&Link::Dialing));
}

state_enum! {
    enum Lamp { Off, Warm, Lit }
}

event_enum! {
    enum Flip { Go, Hop }
}

#[derive(Debug, thiserror::Error)]
#[error("bulb blew")]
struct Blown;

#[derive(Default)]
struct Bulb;

impl Context for Bulb {
    type State = Lamp;
    type Event = Flip;
    type Error = Blown;
    type Args = ();
}

#[test]
fn failed_outer_action_undoes_nested_commit() {
    let table = TableBuilder::<Bulb>::new()
        .start(Lamp::Off)
        .transition(
            TransitionBuilder::new()
                .from(Lamp::Off)
                .on(Flip::Go)
                .to(Lamp::Warm)
                .action(Action::new("hop", |m: &mut StateMachine<Bulb>| m.dispatch(Flip::Hop)))
                .action(Action::try_call("fail", |_: &mut Bulb| Err(Blown))),
        )
        .unwrap()
        .transition(TransitionBuilder::new().from(Lamp::Off).on(Flip::Hop).to(Lamp::Lit))
        .unwrap()
        .build()
        .unwrap();
    let mut machine = StateMachine::new(table, Bulb);
    machine.enter_start_state().unwrap();
    machine.record_history(None);

    let result = machine.dispatch(Flip::Go);

    assert!(matches!(result, Err(FsmError::Action { ref action, .. }) if action == "fail"));
    assert_eq!(machine.state(), Some(&Lamp::Off));
    assert_eq!(machine.previous_state(), None);
    assert!(machine.history().unwrap().is_empty());
    assert!(!machine.is_in_transition());
}
