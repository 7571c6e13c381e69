//! Accompaniment advice model

use serde::{Deserialize, Serialize};

/// Free-text playing advice generated for one chord progression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccompanimentText {
    /// Overall playing style and dynamics suggestion
    pub playing_style_suggestion: String,
    /// Strumming pattern in "D DU UDU" notation
    pub strumming_pattern: String,
    /// Optional advanced-technique suggestions (palm muting, hammer-ons, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_techniques: Option<String>,
}
