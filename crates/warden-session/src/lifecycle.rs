use serde::{Deserialize, Serialize};

/// Session lifecycle. Monotonic: `Init -> Active -> Closed`, no
/// back-transitions (spec §3, Invariant 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lifecycle {
    #[default]
    Init,
    Active,
    Closed,
}

impl Lifecycle {
    /// Whether transitioning from `self` to `next` respects the
    /// monotonic partial order `INIT < ACTIVE < CLOSED`.
    pub fn can_transition_to(self, next: Lifecycle) -> bool {
        next >= self
    }
}
