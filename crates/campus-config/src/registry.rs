use std::env;

use crate::parse_flag;

/// Rules applied by the records core.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// `PREREQUISITE_REJECT_CYCLES`, default true.
    pub reject_prerequisite_cycles: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reject_prerequisite_cycles: true,
        }
    }
}

impl RegistryConfig {
    pub fn from_env() -> Self {
        let reject_prerequisite_cycles = env::var("PREREQUISITE_REJECT_CYCLES")
            .ok()
            .and_then(|s| parse_flag(&s))
            .unwrap_or(true);

        Self {
            reject_prerequisite_cycles,
        }
    }
}
