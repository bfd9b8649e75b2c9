//! Property-based tests for the hierarchy, dispatcher, and executor.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated event sequences.

use chartwell::builder::{StatechartBuilder, TransitionBuilder};
use chartwell::core::Action;
use chartwell::{event_enum, state_enum, MachineDefinition, MachineInstance, Outcome, State};
use proptest::prelude::*;
use std::sync::Arc;

state_enum! {
    enum Node {
        Root,
        Left,
        LeftA,
        LeftB,
        Right,
        RightA,
        RightB,
        Gate,
    }
}

event_enum! {
    enum Input {
        Swap,
        Flip,
        Bump,
        Home,
        Unused,
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Tally {
    bumps: u32,
    entries: u32,
    exits: u32,
}

fn count_entry(state: &str) -> Action<Tally> {
    Action::new(format!("enter {state}"), |t: &mut Tally| t.entries += 1)
}

fn count_exit(state: &str) -> Action<Tally> {
    Action::new(format!("exit {state}"), |t: &mut Tally| t.exits += 1)
}

/// Two nested regions, a transient gate, and handlers at several levels.
fn definition() -> Arc<MachineDefinition<Node, Input, Tally>> {
    let mut builder = StatechartBuilder::new()
        .root(Node::Root)
        .state(Node::Left, Node::Root)
        .state(Node::LeftA, Node::Left)
        .state(Node::LeftB, Node::Left)
        .state(Node::Right, Node::Root)
        .state(Node::RightA, Node::Right)
        .state(Node::RightB, Node::Right)
        .state(Node::Gate, Node::Root)
        .initial(Node::Root, Node::Left)
        .initial(Node::Left, Node::LeftA)
        .initial(Node::Right, Node::RightA);

    for node in [Node::Root, Node::Left, Node::LeftA, Node::LeftB, Node::Right, Node::RightA, Node::RightB, Node::Gate] {
        builder = builder
            .on_entry(node, count_entry(node.name()))
            .on_exit(node, count_exit(node.name()));
    }

    let transitions = vec![
        TransitionBuilder::new().from(Node::Left).on(Input::Swap).to(Node::Right),
        TransitionBuilder::new().from(Node::Right).on(Input::Swap).to(Node::Left),
        TransitionBuilder::new().from(Node::LeftA).on(Input::Flip).to(Node::LeftB),
        TransitionBuilder::new().from(Node::LeftB).on(Input::Flip).to(Node::LeftA),
        TransitionBuilder::new().from(Node::RightA).on(Input::Flip).to(Node::RightB),
        TransitionBuilder::new()
            .from(Node::RightB)
            .on(Input::Flip)
            .when("even bumps", |t: &Tally| t.bumps % 2 == 0)
            .to(Node::Gate),
        TransitionBuilder::new()
            .from(Node::Root)
            .on(Input::Bump)
            .run("bump", |t: &mut Tally| t.bumps += 1)
            .internal(),
        TransitionBuilder::new().from(Node::Right).on(Input::Home).to(Node::Root),
        TransitionBuilder::new()
            .from(Node::Gate)
            .eventless()
            .when("many bumps", |t: &Tally| t.bumps > 3)
            .to(Node::RightA),
        TransitionBuilder::new()
            .from(Node::Gate)
            .eventless()
            .otherwise()
            .to(Node::LeftB),
    ];
    for transition in transitions {
        builder = builder.transition(transition).unwrap();
    }

    Arc::new(builder.build().unwrap())
}

fn started(definition: &Arc<MachineDefinition<Node, Input, Tally>>) -> MachineInstance<Node, Input, Tally> {
    let mut machine = MachineInstance::new(Arc::clone(definition), Tally::default());
    machine.init().unwrap();
    machine
}

prop_compose! {
    fn arbitrary_input()(variant in 0..5u8) -> Input {
        match variant {
            0 => Input::Swap,
            1 => Input::Flip,
            2 => Input::Bump,
            3 => Input::Home,
            _ => Input::Unused,
        }
    }
}

proptest! {
    #[test]
    fn configuration_stays_a_root_to_leaf_path(
        inputs in prop::collection::vec(arbitrary_input(), 0..40)
    ) {
        let definition = definition();
        let mut machine = started(&definition);

        for input in inputs {
            machine.handle_event(input).unwrap();
            prop_assert!(machine.configuration().is_consistent_with(definition.hierarchy()));
            // No transient leaf survives a completed step.
            prop_assert_ne!(machine.leaf(), Some(Node::Gate));
        }
    }

    #[test]
    fn entries_and_exits_balance_with_depth(
        inputs in prop::collection::vec(arbitrary_input(), 0..40)
    ) {
        let definition = definition();
        let mut machine = started(&definition);

        for input in inputs {
            machine.handle_event(input).unwrap();
            let tally = machine.context();
            prop_assert_eq!(
                tally.entries - tally.exits,
                machine.configuration().len() as u32
            );
        }
    }

    #[test]
    fn unmatched_events_change_nothing(
        inputs in prop::collection::vec(arbitrary_input(), 0..20)
    ) {
        let definition = definition();
        let mut machine = started(&definition);
        for input in inputs {
            machine.handle_event(input).unwrap();
        }

        let configuration = machine.configuration().clone();
        let tally = machine.context().clone();
        let recorded = machine.history().len();

        prop_assert_eq!(machine.handle_event(Input::Unused).unwrap(), Outcome::Ignored);
        prop_assert_eq!(machine.configuration(), &configuration);
        prop_assert_eq!(machine.context(), &tally);
        prop_assert_eq!(machine.history().len(), recorded);
    }

    #[test]
    fn unmatched_event_before_effective_one_is_invisible(
        prefix in prop::collection::vec(arbitrary_input(), 0..20),
        effective in arbitrary_input()
    ) {
        let definition = definition();
        let mut direct = started(&definition);
        let mut detour = started(&definition);
        for &input in &prefix {
            direct.handle_event(input).unwrap();
            detour.handle_event(input).unwrap();
        }

        detour.handle_event(Input::Unused).unwrap();
        detour.handle_event(effective).unwrap();
        direct.handle_event(effective).unwrap();

        prop_assert_eq!(direct.configuration(), detour.configuration());
        prop_assert_eq!(direct.context(), detour.context());
    }

    #[test]
    fn execution_is_deterministic(
        inputs in prop::collection::vec(arbitrary_input(), 0..40)
    ) {
        let definition = definition();
        let mut first = started(&definition);
        let mut second = started(&definition);

        for input in inputs {
            let a = first.handle_event(input).unwrap();
            let b = second.handle_event(input).unwrap();
            prop_assert_eq!(a, b);
        }
        prop_assert_eq!(first.history().leaf_path(), second.history().leaf_path());
    }

    #[test]
    fn least_common_ancestor_is_an_ancestor_of_both(a in 0..8usize, b in 0..8usize) {
        let definition = definition();
        let hierarchy = definition.hierarchy();
        let states: Vec<Node> = hierarchy.states().collect();
        let (a, b) = (states[a], states[b]);

        let lca = hierarchy.least_common_ancestor(a, b).unwrap();
        prop_assert!(lca == a || hierarchy.is_ancestor(lca, a));
        prop_assert!(lca == b || hierarchy.is_ancestor(lca, b));
        prop_assert_eq!(Some(lca), hierarchy.least_common_ancestor(b, a));
        for child in hierarchy.children(lca) {
            let covers_a = *child == a || hierarchy.is_ancestor(*child, a);
            let covers_b = *child == b || hierarchy.is_ancestor(*child, b);
            prop_assert!(!(covers_a && covers_b));
        }
    }

    #[test]
    fn state_roundtrip_serialization(index in 0..8usize) {
        let definition = definition();
        let state = definition.hierarchy().states().nth(index).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: Node = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(state, deserialized);
    }
}

#[test]
fn init_lands_on_default_leaf() {
    let definition = definition();
    let machine = started(&definition);

    assert_eq!(
        machine.configuration().as_slice(),
        &[Node::Root, Node::Left, Node::LeftA]
    );
    assert_eq!(machine.context().entries, 3);
}
