//! Action registry - Lists every action the binary can run.

use crate::destinations::friendbuy;
use crate::Action;
use std::sync::Arc;

/// Returns all available actions.
pub fn get_all_actions() -> Vec<Arc<dyn Action>> {
    friendbuy::actions()
}

/// Looks an action up by name.
pub fn find_action(name: &str) -> Option<Arc<dyn Action>> {
    get_all_actions().into_iter().find(|a| a.name() == name)
}
