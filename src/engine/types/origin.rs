use serde::{Deserialize, Serialize};

/// Why a block occupies local space. Set at admission; a re-store of an
/// altruistic id as `Personal` promotes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Explicitly requested by the local user. Never an eviction candidate.
    Personal,
    /// Cached for network health out of the flex pool.
    Altruistic,
}

impl Origin {
    pub fn is_personal(&self) -> bool {
        matches!(self, Origin::Personal)
    }

    pub fn is_altruistic(&self) -> bool {
        matches!(self, Origin::Altruistic)
    }
}
