use crashboard_core::{update, AppState, Key, Msg};

#[test]
fn other_keys_leave_state_untouched() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::QueryKeyPressed(Key::Other));

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(state, next);
}

#[test]
fn typing_then_other_key_does_not_submit() {
    let (mut state, _) = update(AppState::new(), Msg::QueryInputChanged("hola".to_string()));
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, Msg::QueryKeyPressed(Key::Other));
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert!(!state.view().query.loader_visible);
}
