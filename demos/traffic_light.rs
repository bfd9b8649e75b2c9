//! Traffic Light Statechart
//!
//! This example demonstrates a flat cyclic machine driven by timer events,
//! with a pedestrian request that only matters while the light is green.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - Guards reading caller-owned context
//! - Ignored events are reported, not errors
//!
//! Run with: cargo run --example traffic_light

use chartwell::builder::{guarded_transition, simple_transition, StatechartBuilder};
use chartwell::{event_enum, state_enum, Event, MachineInstance, Outcome, State};
use std::sync::Arc;

state_enum! {
    enum TrafficLight {
        Root,
        Red,
        Yellow,
        Green,
    }
}

event_enum! {
    enum Signal {
        Tick,
        Request,
    }
}

#[derive(Debug, Default)]
struct Crossing {
    waiting: bool,
}

fn main() {
    println!("=== Traffic Light Statechart ===\n");

    let definition = StatechartBuilder::new()
        .root(TrafficLight::Root)
        .state(TrafficLight::Red, TrafficLight::Root)
        .state(TrafficLight::Yellow, TrafficLight::Root)
        .state(TrafficLight::Green, TrafficLight::Root)
        .initial(TrafficLight::Root, TrafficLight::Red)
        .transitions(vec![
            simple_transition(TrafficLight::Red, Signal::Tick, TrafficLight::Green),
            guarded_transition(
                TrafficLight::Green,
                Signal::Tick,
                TrafficLight::Yellow,
                "pedestrian waiting",
                |c: &Crossing| c.waiting,
            ),
            simple_transition(TrafficLight::Yellow, Signal::Tick, TrafficLight::Red),
        ])
        .build()
        .unwrap();

    let mut light = MachineInstance::new(Arc::new(definition), Crossing::default());
    light.init().unwrap();
    println!("Initial state: {:?}\n", light.leaf());

    let script = [
        Signal::Tick,
        Signal::Tick,
        Signal::Request,
        Signal::Tick,
        Signal::Tick,
    ];

    for signal in script {
        if signal == Signal::Request {
            light.context_mut().waiting = true;
        }
        match light.handle_event(signal).unwrap() {
            Outcome::Transitioned { from, to } => {
                println!("  {:<8} {} -> {}", signal.name(), from.name(), to.name());
                if to == TrafficLight::Red {
                    light.context_mut().waiting = false;
                }
            }
            Outcome::Internal { state } => println!("  {:<8} handled in {}", signal.name(), state.name()),
            Outcome::Ignored => println!("  {:<8} ignored", signal.name()),
        }
    }

    println!("\nVisited: {:?}", light.history().leaf_path());

    println!("\nKey Characteristics:");
    println!("- Green holds until a pedestrian is waiting");
    println!("- Unhandled events return Outcome::Ignored");
    println!("- No final state (cycles indefinitely)");

    println!("\n=== Example Complete ===");
}
