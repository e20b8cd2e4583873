use serde::{Deserialize, Serialize};

use crate::*;

/// Tuning knobs for input and layout. Missing fields fall back to their defaults when deserialized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gesture: GestureConfig,
    pub view: ViewConfig,
}
