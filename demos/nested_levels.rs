//! Nested States
//!
//! This example demonstrates hierarchical states: entry and exit ordering,
//! transitions inherited from ancestors, an eventless decision state, and
//! checkpointing a running instance.
//!
//! Key concepts:
//! - Exits run leaf first, entries run outermost first
//! - An ancestor's transition applies to every descendant
//! - Transient states resolve before `handle_event` returns
//! - Checkpoints restore the configuration without rerunning entries
//!
//! Run with: cargo run --example nested_levels

use chartwell::builder::{StatechartBuilder, TransitionBuilder};
use chartwell::core::Action;
use chartwell::{event_enum, state_enum, Event, MachineInstance, State};
use std::sync::Arc;

state_enum! {
    enum Player {
        Root,
        Stopped,
        Active,
        Playing,
        Paused,
        Checking,
    }
}

event_enum! {
    enum Control {
        Play,
        Pause,
        Stop,
        Eject,
    }
}

#[derive(Debug, Default)]
struct Deck {
    log: Vec<String>,
    has_disc: bool,
}

fn log_entry(state: Player) -> Action<Deck> {
    let line = format!("enter {}", state.name());
    Action::new(line.clone(), move |deck: &mut Deck| deck.log.push(line.clone()))
}

fn log_exit(state: Player) -> Action<Deck> {
    let line = format!("exit {}", state.name());
    Action::new(line.clone(), move |deck: &mut Deck| deck.log.push(line.clone()))
}

fn main() {
    println!("=== Nested States Example ===\n");

    let mut builder = StatechartBuilder::new()
        .root(Player::Root)
        .state(Player::Stopped, Player::Root)
        .state(Player::Checking, Player::Root)
        .state(Player::Active, Player::Root)
        .state(Player::Playing, Player::Active)
        .state(Player::Paused, Player::Active)
        .initial(Player::Root, Player::Stopped)
        .initial(Player::Active, Player::Playing);

    for state in [Player::Stopped, Player::Active, Player::Playing, Player::Paused] {
        builder = builder
            .on_entry(state, log_entry(state))
            .on_exit(state, log_exit(state));
    }

    let definition = builder
        .transition(TransitionBuilder::new().from(Player::Stopped).on(Control::Play).to(Player::Checking))
        .unwrap()
        .transition(
            TransitionBuilder::new()
                .from(Player::Checking)
                .eventless()
                .when("disc loaded", |deck: &Deck| deck.has_disc)
                .to(Player::Active),
        )
        .unwrap()
        .transition(TransitionBuilder::new().from(Player::Checking).eventless().otherwise().to(Player::Stopped))
        .unwrap()
        .transition(TransitionBuilder::new().from(Player::Playing).on(Control::Pause).to(Player::Paused))
        .unwrap()
        .transition(TransitionBuilder::new().from(Player::Paused).on(Control::Play).to(Player::Playing))
        .unwrap()
        .transition(TransitionBuilder::new().from(Player::Active).on(Control::Stop).to(Player::Stopped))
        .unwrap()
        .transition(
            TransitionBuilder::new()
                .from(Player::Stopped)
                .on(Control::Eject)
                .run("toggle disc", |deck: &mut Deck| deck.has_disc = !deck.has_disc)
                .internal(),
        )
        .unwrap()
        .build()
        .unwrap();
    let definition = Arc::new(definition);

    let mut player = MachineInstance::new(Arc::clone(&definition), Deck::default());
    player.init().unwrap();

    for control in [
        Control::Play,
        Control::Eject,
        Control::Play,
        Control::Pause,
    ] {
        player.context_mut().log.clear();
        let outcome = player.handle_event(control).unwrap();
        println!("{:<6} -> {:?}", control.name(), outcome);
        for line in &player.context().log {
            println!("         {line}");
        }
        println!("         active: {:?}", player.configuration().as_slice());
    }

    println!("\nCheckpointing while paused...");
    let json = player.checkpoint().unwrap().to_json().unwrap();
    println!("{json}\n");

    let checkpoint = chartwell::checkpoint::Checkpoint::from_json(&json).unwrap();
    let mut resumed = MachineInstance::resume(
        definition,
        Deck {
            has_disc: true,
            ..Deck::default()
        },
        checkpoint,
    )
    .unwrap();
    println!("Resumed at {:?}", resumed.leaf());

    resumed.handle_event(Control::Stop).unwrap();
    println!("Stop from a nested state exits leaf first:");
    for line in &resumed.context().log {
        println!("  {line}");
    }

    println!("\n=== Example Complete ===");
}
