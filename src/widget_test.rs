use super::*;

#[test]
fn first_load_is_allowed() {
    let mut state = LoadState::default();
    assert!(state.begin().is_ok());
    assert_eq!(state, LoadState::Loading);
}

#[test]
fn load_while_loading_is_rejected() {
    let mut state = LoadState::Loading;
    assert!(matches!(state.begin(), Err(MapperError::AlreadyLoaded)));
    assert_eq!(state, LoadState::Loading);
}

#[test]
fn load_after_success_is_rejected() {
    let mut state = LoadState::Loaded;
    assert!(matches!(state.begin(), Err(MapperError::AlreadyLoaded)));
}

#[test]
fn failed_load_can_be_retried() {
    let mut state = LoadState::default();
    state.begin().unwrap();
    state = LoadState::Unloaded;
    assert!(state.begin().is_ok());
}
