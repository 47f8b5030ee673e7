//! Rule switches shared by every worker in a run.

use serde::{Deserialize, Serialize};

/// Optional battle rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Units under half health heal instead of looking for targets.
    pub heal_when_wounded: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            heal_when_wounded: true,
        }
    }
}
