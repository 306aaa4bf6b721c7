//! User activity and view visibility state

use serde::{Deserialize, Serialize};

/// Combined activity signal the scheduler keys its cadence on.
///
/// `user_active` reflects recent input; `view_visible` reflects whether the
/// host surface is currently shown. Polling only runs while both hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityState {
    pub user_active: bool,
    pub view_visible: bool,
}

impl ActivityState {
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        self.user_active && self.view_visible
    }
}
