//! Input: keyboard, touch and scripted input decoded into runner actions.
//!
//! # Invariants
//! - The run consumes `Action`s only, never raw key names or pointer deltas.
//! - Every input source maps onto the same small action set.

pub mod action;
pub mod script;

pub use action::Action;
pub use script::{InputScript, ScriptError, ScriptedAction};

pub fn crate_info() -> &'static str {
    "laneway-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
