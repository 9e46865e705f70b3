// src/domain/states.rs
use chrono::{DateTime, Utc};

pub trait State {
    /// Advance to the state valid at `now`. Calling it with a time that does
    /// not allow any transition returns an equal state.
    fn inc(&self, now: DateTime<Utc>) -> Self where Self: Sized;
    fn has_ended(&self) -> bool;
}
