use std::ops::Range;

use tracing::debug;

use crate::overlay::Word;

/// Owner of every base-text character, as an index into the word slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterWordMap {
    owners: Vec<Option<usize>>,
}

impl CharacterWordMap {
    fn new(len: usize) -> Self {
        Self {
            owners: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn owner(&self, offset: usize) -> Option<usize> {
        self.owners.get(offset).copied().flatten()
    }

    pub fn owners(&self) -> &[Option<usize>] {
        &self.owners
    }

    /// Character offsets claimed by `word`, in text order.
    pub fn span_of(&self, word: usize) -> Vec<usize> {
        self.owners
            .iter()
            .enumerate()
            .filter_map(|(offset, owner)| (*owner == Some(word)).then_some(offset))
            .collect()
    }

    /// Indices below `word_count` that own no character.
    pub fn unmapped_words(&self, word_count: usize) -> Vec<usize> {
        let mut mapped = vec![false; word_count];
        for word in self.owners.iter().flatten() {
            if let Some(slot) = mapped.get_mut(*word) {
                *slot = true;
            }
        }
        mapped
            .iter()
            .enumerate()
            .filter_map(|(word, hit)| (!hit).then_some(word))
            .collect()
    }

    fn is_free(&self, range: Range<usize>) -> bool {
        self.owners[range].iter().all(Option::is_none)
    }

    fn claim(&mut self, range: Range<usize>, word: usize) {
        for slot in &mut self.owners[range] {
            *slot = Some(word);
        }
    }
}

/// Assigns each word to a span of the base text.
///
/// A forward scan places words in token order behind a moving cursor. Words
/// the scan cannot place are retried against the whole text, taking the
/// first occurrence whose characters are all still free. A character is
/// never claimed twice; earlier tokens win ties.
pub fn align_words(text: &[char], words: &[Word]) -> CharacterWordMap {
    let mut map = CharacterWordMap::new(text.len());
    let mut cursor = 0usize;
    let mut deferred = Vec::new();

    for (index, word) in words.iter().enumerate() {
        let needle: Vec<char> = word.surface_form.chars().collect();
        match find_from(text, &needle, cursor) {
            Some(start) => {
                let end = start + needle.len();
                map.claim(start..end, index);
                cursor = end;
            }
            None => deferred.push((index, needle)),
        }
    }

    let retried = deferred.len();
    let mut recovered = 0usize;
    for (index, needle) in deferred {
        if let Some(start) = find_free(text, &needle, &map) {
            map.claim(start..start + needle.len(), index);
            recovered += 1;
        }
    }
    if retried > 0 {
        debug!("align: recovered {} of {} deferred words", recovered, retried);
    }

    map
}

fn find_from(text: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= text.len() || needle.len() > text.len() - from {
        return None;
    }
    text[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

// TODO: index candidate start positions by first character if pages with
// many repeated short tokens make this rescan show up in profiles.
fn find_free(text: &[char], needle: &[char], map: &CharacterWordMap) -> Option<usize> {
    if needle.is_empty() || needle.len() > text.len() {
        return None;
    }
    text.windows(needle.len())
        .enumerate()
        .find(|(start, window)| {
            *window == needle && map.is_free(*start..*start + needle.len())
        })
        .map(|(start, _)| start)
}
