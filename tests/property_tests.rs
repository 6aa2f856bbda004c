//! Property-based tests for the editor.
//!
//! These tests use proptest to drive editors through random action
//! sequences and check that the phonebook stays consistent.

use phonebook_editor::core::{Position, StateSpec, TransitionConfig, TransitionRef};
use phonebook_editor::{Editor, InfoSpec, Phonebook, StateId};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Action {
    AddState(String),
    UpdateState(usize, String),
    RemoveState(usize),
    Focus(usize),
    SetInitial(usize),
    AddDial(usize, usize, u8),
    AddTimeout(usize, usize, u16),
    AddPickUp(usize, usize),
    RemoveDial(usize, u8),
    RemoveTimeout(usize),
    Move(usize, i16, i16),
    UpdateInfo(String),
    BumpIteration,
    Undo,
    Redo,
}

prop_compose! {
    fn arbitrary_name()(name in "[A-Za-z ]{0,12}") -> String {
        name
    }
}

fn arbitrary_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => arbitrary_name().prop_map(Action::AddState),
        1 => (any::<usize>(), arbitrary_name()).prop_map(|(i, n)| Action::UpdateState(i, n)),
        2 => any::<usize>().prop_map(Action::RemoveState),
        1 => any::<usize>().prop_map(Action::Focus),
        1 => any::<usize>().prop_map(Action::SetInitial),
        2 => (any::<usize>(), any::<usize>(), 0..10u8).prop_map(|(f, t, d)| Action::AddDial(f, t, d)),
        1 => (any::<usize>(), any::<usize>(), any::<u16>()).prop_map(|(f, t, s)| Action::AddTimeout(f, t, s)),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(f, t)| Action::AddPickUp(f, t)),
        1 => (any::<usize>(), 0..10u8).prop_map(|(f, d)| Action::RemoveDial(f, d)),
        1 => any::<usize>().prop_map(Action::RemoveTimeout),
        1 => (any::<usize>(), any::<i16>(), any::<i16>()).prop_map(|(i, x, y)| Action::Move(i, x, y)),
        1 => arbitrary_name().prop_map(Action::UpdateInfo),
        1 => Just(Action::BumpIteration),
        2 => Just(Action::Undo),
        1 => Just(Action::Redo),
    ]
}

/// All state ids including `any`.
fn ids(book: &Phonebook) -> Vec<StateId> {
    book.states().map(|s| s.id.clone()).collect()
}

fn pick(ids: &[StateId], index: usize) -> Option<StateId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[index % ids.len()].clone())
    }
}

fn pick_target(book: &Phonebook, index: usize) -> Option<StateId> {
    let targets: Vec<_> = ids(book).into_iter().filter(|id| !id.is_any()).collect();
    pick(&targets, index)
}

fn run(editor: &mut Editor, action: &Action) {
    let all = ids(editor.phonebook());
    match action {
        Action::AddState(name) => {
            editor.add_state(StateSpec::new().name(name.clone()));
        }
        Action::UpdateState(i, name) => {
            if let Some(id) = pick(&all, *i) {
                editor.update_state(&id, StateSpec::new().name(name.clone()));
            }
        }
        Action::RemoveState(i) => {
            if let Some(id) = pick(&all, *i) {
                let result = editor.remove_state(&id);
                assert_eq!(result.is_err(), id.is_any());
            }
        }
        Action::Focus(i) => editor.focus_state(pick(&all, *i).as_ref()),
        Action::SetInitial(i) => {
            let target = pick_target(editor.phonebook(), *i);
            editor.set_initial_state(target.as_ref());
        }
        Action::AddDial(f, t, digit) => {
            if let (Some(from), Some(to)) = (pick(&all, *f), pick_target(editor.phonebook(), *t)) {
                editor
                    .add_transition(&from, TransitionConfig::Dial { num: digit.to_string(), to })
                    .unwrap();
            }
        }
        Action::AddTimeout(f, t, tenths) => {
            if let (Some(from), Some(to)) = (pick(&all, *f), pick_target(editor.phonebook(), *t)) {
                let after = f64::from(*tenths) / 10.0;
                editor
                    .add_transition(&from, TransitionConfig::Timeout { after, to })
                    .unwrap();
            }
        }
        Action::AddPickUp(f, t) => {
            if let (Some(from), Some(to)) = (pick(&all, *f), pick_target(editor.phonebook(), *t)) {
                editor
                    .add_transition(&from, TransitionConfig::PickUp { to })
                    .unwrap();
            }
        }
        Action::RemoveDial(f, digit) => {
            if let Some(from) = pick(&all, *f) {
                editor
                    .remove_transition(&from, TransitionRef::Dial { num: digit.to_string() })
                    .unwrap();
            }
        }
        Action::RemoveTimeout(f) => {
            if let Some(from) = pick(&all, *f) {
                editor.remove_transition(&from, TransitionRef::Timeout).unwrap();
            }
        }
        Action::Move(i, x, y) => {
            if let Some(id) = pick(&all, *i) {
                editor.move_state(&id, Position::new(f64::from(*x), f64::from(*y)));
            }
        }
        Action::UpdateInfo(title) => editor.update_info(&InfoSpec::new().title(title.clone())),
        Action::BumpIteration => {
            editor.bump_iteration();
        }
        Action::Undo => {
            let _ = editor.undo();
        }
        Action::Redo => {
            let _ = editor.redo();
        }
    }
}

/// Referential integrity of the whole phonebook.
fn assert_consistent(book: &Phonebook) {
    let known = ids(book);
    assert!(known.contains(&StateId::any()));

    for id in &known {
        assert!(book.transitions_of(id).is_some(), "missing transitions of {id}");
        assert!(book.extension(id).is_some(), "missing extension of {id}");
    }
    assert_eq!(book.transitions().len(), known.len());
    assert_eq!(book.vendor().extension_properties.states.len(), known.len());

    for (from, set) in book.transitions() {
        for config in set.entries() {
            assert!(
                book.find_state(config.target()).is_some(),
                "{from} has a dangling {} transition",
                config.kind()
            );
        }
    }
    if let Some(initial) = book.initial() {
        assert!(book.find_state(initial).is_some());
    }
    if let Some(focused) = book.focused_state_id() {
        assert!(book.find_state(focused).is_some());
    }
}

proptest! {
    #[test]
    fn phonebook_stays_consistent(actions in prop::collection::vec(arbitrary_action(), 0..60)) {
        let mut editor = Editor::new();
        for action in &actions {
            run(&mut editor, action);
            assert_consistent(editor.phonebook());
        }
    }

    #[test]
    fn undo_all_then_redo_all_returns_to_same_phonebook(
        actions in prop::collection::vec(arbitrary_action(), 0..40)
    ) {
        let mut editor = Editor::new();
        for action in actions.iter().filter(|a| !matches!(a, Action::BumpIteration)) {
            run(&mut editor, action);
        }
        while editor.can_redo() {
            editor.redo().unwrap();
        }
        let done = editor.phonebook().clone();

        while editor.can_undo() {
            editor.undo().unwrap();
            assert_consistent(editor.phonebook());
        }
        prop_assert_eq!(editor.phonebook(), &Phonebook::new());

        while editor.can_redo() {
            editor.redo().unwrap();
            assert_consistent(editor.phonebook());
        }
        prop_assert_eq!(editor.phonebook(), &done);
    }

    #[test]
    fn iteration_never_decreases(actions in prop::collection::vec(arbitrary_action(), 0..60)) {
        let mut editor = Editor::new();
        let mut last = editor.phonebook().info().iteration;
        for action in &actions {
            run(&mut editor, action);
            let iteration = editor.phonebook().info().iteration;
            prop_assert!(iteration >= last);
            last = iteration;
        }
    }

    #[test]
    fn remove_then_undo_restores_added_state(
        name in arbitrary_name(),
        description in arbitrary_name(),
        ring in 0.0..=1.0f64,
        terminal in any::<bool>(),
    ) {
        let mut editor = Editor::new();
        let spec = StateSpec::new()
            .name(name)
            .description(description)
            .ring(ring)
            .terminal(terminal);
        let id = editor.add_state(spec);
        let added = editor.phonebook().find_state(&id).cloned();

        editor.remove_state(&id).unwrap();
        prop_assert!(editor.phonebook().find_state(&id).is_none());

        editor.undo().unwrap();
        prop_assert_eq!(editor.phonebook().find_state(&id).cloned(), added);

        editor.redo().unwrap();
        prop_assert!(editor.phonebook().find_state(&id).is_none());
    }

    #[test]
    fn any_state_cannot_be_removed(actions in prop::collection::vec(arbitrary_action(), 0..30)) {
        let mut editor = Editor::new();
        for action in &actions {
            run(&mut editor, action);
        }
        prop_assert!(editor.remove_state(&StateId::any()).is_err());
        prop_assert!(editor.phonebook().find_state(&StateId::any()).is_some());
    }
}
