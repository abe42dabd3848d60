/// Bible projection payloads
///
/// Fetching, caching, and searching scripture happens elsewhere; these are
/// only the shapes the projection window renders.
use serde::{Deserialize, Serialize};

/// One verse of projected text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub number: u32,
    pub text: String,
}

/// Passage currently shown on the projection display
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleContent {
    /// Human-readable reference, e.g. "John 3:16-17"
    pub reference: String,

    /// Translation code, e.g. "KJV"
    pub translation: String,

    pub verses: Vec<Verse>,

    /// Verse the operator has highlighted
    #[serde(default)]
    pub highlighted: Option<u32>,
}
