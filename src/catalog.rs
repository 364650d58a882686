use std::collections::HashSet;

use icu_normalizer::ComposingNormalizerBorrowed;
use serde::Deserialize;

const KANA_GROUPS: &str = include_str!("../assets/kana.json");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Hiragana,
    Katakana,
}

/// One row of the gojūon table: parallel kana/romanization columns.
#[derive(Clone, Debug, Deserialize)]
pub struct KanaGroup {
    pub script: Script,
    pub name: String,
    pub kana: Vec<String>,
    pub romaji: Vec<String>,
}

/// A single character/romanization pair, tagged with the index of the
/// group it was flattened from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterEntry {
    pub character: String,
    pub romanization: String,
    pub group: usize,
}

/// The embedded character catalog. Loaded once; everything downstream
/// borrows or clones entries out of it.
pub struct KanaCatalog {
    groups: Vec<KanaGroup>,
    entries: Vec<CharacterEntry>,
}

impl KanaCatalog {
    pub fn load() -> Self {
        let groups: Vec<KanaGroup> = serde_json::from_str(KANA_GROUPS).unwrap_or_default();

        // A group is only usable when the kana and romaji columns line up.
        let groups: Vec<KanaGroup> = groups
            .into_iter()
            .filter(|g| !g.kana.is_empty() && g.kana.len() == g.romaji.len())
            .collect();

        let mut entries = Vec::new();
        for (index, group) in groups.iter().enumerate() {
            for (kana, romaji) in group.kana.iter().zip(group.romaji.iter()) {
                entries.push(CharacterEntry {
                    character: kana.clone(),
                    romanization: romaji.clone(),
                    group: index,
                });
            }
        }

        Self { groups, entries }
    }

    pub fn groups(&self) -> &[KanaGroup] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Every pair in the catalog. Timed tests always draw from this pool
    /// rather than the practice selection.
    pub fn full_pool(&self) -> Vec<CharacterEntry> {
        self.entries.clone()
    }

    /// Flatten a group selection into the eligible pool, preserving
    /// selection order. Unknown and repeated indices are skipped.
    pub fn eligible_pool(&self, selection: &[usize]) -> Vec<CharacterEntry> {
        let mut seen = HashSet::new();
        let mut pool = Vec::new();
        for &index in selection {
            if index >= self.groups.len() || !seen.insert(index) {
                continue;
            }
            pool.extend(self.entries.iter().filter(|e| e.group == index).cloned());
        }
        pool
    }
}

pub fn romanization_of<'a>(pool: &'a [CharacterEntry], character: &str) -> Option<&'a str> {
    pool.iter()
        .find(|e| e.character == character)
        .map(|e| e.romanization.as_str())
}

/// First pool occurrence of a romanization. This is the stable pick used
/// for option pools and result reconstruction when several characters
/// share a romanization (the ji/zu pairs, or both scripts selected).
pub fn primary_character<'a>(pool: &'a [CharacterEntry], romanization: &str) -> Option<&'a str> {
    pool.iter()
        .find(|e| e.romanization == romanization)
        .map(|e| e.character.as_str())
}

fn last_character<'a>(pool: &'a [CharacterEntry], romanization: &str) -> Option<&'a str> {
    pool.iter()
        .rev()
        .find(|e| e.romanization == romanization)
        .map(|e| e.character.as_str())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReverseMatch {
    Primary,
    Secondary,
    NoMatch,
}

/// Classify a submitted character against a displayed romanization.
/// Both the first and the last pool occurrence count as correct answers;
/// with more than two duplicates the middle candidates do not.
pub fn classify_reverse(pool: &[CharacterEntry], romanization: &str, candidate: &str) -> ReverseMatch {
    let candidate = nfc(candidate);
    let Some(primary) = primary_character(pool, romanization) else {
        return ReverseMatch::NoMatch;
    };
    if primary == candidate {
        return ReverseMatch::Primary;
    }
    match last_character(pool, romanization) {
        Some(last) if last == candidate => ReverseMatch::Secondary,
        _ => ReverseMatch::NoMatch,
    }
}

/// NFC-fold a submitted kana string so decomposed dakuten forms
/// (e.g. "か" + U+3099) compare equal to the precomposed catalog entries.
pub fn nfc(text: &str) -> String {
    ComposingNormalizerBorrowed::new_nfc()
        .normalize_iter(text.chars())
        .collect()
}
