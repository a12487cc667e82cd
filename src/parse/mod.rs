pub mod dialect;
pub mod extract;
pub mod numeral;

use std::collections::HashMap;

use serde::Serialize;

use crate::system::FortuneSystem;

/// The unified, immutable result of parsing one stick entry. Produced fresh
/// per lookup; a pure function of `(corpus text, system, number)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FortuneRecord {
    pub system: FortuneSystem,
    pub number: u32,
    pub display_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    pub verse_lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub sections: HashMap<String, String>,
}

/// Parse the record for `number` out of `corpus`, using the dialect the
/// system is encoded in. `None` means no entry matched; range and identity
/// validation belong to the caller.
pub fn lookup(system: FortuneSystem, corpus: &str, number: u32) -> Option<FortuneRecord> {
    match system {
        FortuneSystem::Liushijiazi | FortuneSystem::Mazu => {
            dialect::parse_jiazi(system, corpus, number)
        }
        FortuneSystem::Guanyin => dialect::parse_guanyin(corpus, number),
        FortuneSystem::Guandi => dialect::parse_guandi(corpus, number),
        FortuneSystem::Lvzu => dialect::parse_lvzu(corpus, number),
    }
}
