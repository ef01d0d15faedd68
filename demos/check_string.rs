//! Decide whether each argument is a binary string.
//!
//! ```text
//! STATEMAP_DEBUG=1 RUST_LOG=statemap=debug cargo run --example check_string -- 101 1x1
//! ```

use statemap::builder::{TableBuilder, TransitionBuilder};
use statemap::config::FsmConfig;
use statemap::core::Context;
use statemap::engine::{DispatchResult, StateMachine};
use statemap::table::{Action, TransitionTable};
use statemap::{dispatch_methods, event_enum, state_enum};
use tracing_subscriber::EnvFilter;

state_enum! {
    pub enum Symbol { Start, Zero, One, End }
}

event_enum! {
    pub enum Input { Zero, One, Unknown, Eos }
}

#[derive(Default)]
struct Checker {
    acceptable: bool,
}

impl Context for Checker {
    type State = Symbol;
    type Event = Input;
    type Error = std::convert::Infallible;
    type Args = ();
}

dispatch_methods! {
    trait CheckerEvents for Checker {
        fn zero => Input::Zero;
        fn one => Input::One;
        fn unknown => Input::Unknown;
        fn eos => Input::Eos;
    }
}

fn table() -> Result<TransitionTable<Checker>, statemap::BuildError> {
    let t = TransitionBuilder::<Checker>::new;
    let acceptable = Action::call("Acceptable", |c: &mut Checker| c.acceptable = true);
    let unacceptable = Action::call("Unacceptable", |c: &mut Checker| c.acceptable = false);

    let mut builder = TableBuilder::new().name("Checker").start(Symbol::Start);
    for state in [Symbol::Start, Symbol::Zero, Symbol::One] {
        builder = builder
            .transition(t().from(state).on(Input::Zero).to(Symbol::Zero))?
            .transition(t().from(state).on(Input::One).to(Symbol::One))?
            .transition(
                t().from(state)
                    .on(Input::Unknown)
                    .to(Symbol::End)
                    .action(unacceptable.clone()),
            )?;
    }
    builder
        .transition(t().from(Symbol::Start).on(Input::Eos).to(Symbol::End))?
        .transition(t().from(Symbol::Zero).on(Input::Eos).to(Symbol::End).action(acceptable.clone()))?
        .transition(t().from(Symbol::One).on(Input::Eos).to(Symbol::End).action(acceptable))?
        .transition(t().from(Symbol::End).otherwise().stay())?
        .build()
}

fn check_string(machine: &mut StateMachine<Checker>, input: &str) -> DispatchResult<Checker> {
    machine.context_mut().acceptable = false;
    machine.enter_start_state()?;
    for c in input.chars() {
        match c {
            '0' => machine.zero()?,
            '1' => machine.one()?,
            _ => machine.unknown()?,
        }
    }
    machine.eos()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = FsmConfig::default().with_env()?;
    let mut machine = StateMachine::with_config(table()?, Checker::default(), &config);

    let inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.is_empty() {
        eprintln!("usage: check_string <string>...");
        return Ok(());
    }

    for input in inputs {
        check_string(&mut machine, &input)?;
        let verdict = if machine.context().acceptable {
            "acceptable"
        } else {
            "not acceptable"
        };
        println!("\"{input}\" is {verdict}");
    }
    Ok(())
}
