use std::collections::BTreeMap;

use crate::structures::scene::Tone;

/// Emphasis applied to one element: its tone plus a bounce/fade scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mark {
    pub tone: Tone,
    /// Bounce or fade amount in `[0, 1]`; 0 means no effect
    pub effect: f32,
}

/// Tracks which elements are emphasized, keyed by index or node identity.
///
/// Owned by a controller and mutated only by its active animation.
#[derive(Debug, Clone)]
pub struct Highlights<K> {
    marks: BTreeMap<K, Mark>,
}

impl<K> Default for Highlights<K> {
    fn default() -> Self {
        Self {
            marks: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> Highlights<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Emphasize `key`, keeping any effect already applied to it
    pub fn mark(&mut self, key: K, tone: Tone) {
        self.marks
            .entry(key)
            .and_modify(|m| m.tone = tone)
            .or_insert(Mark { tone, effect: 0.0 });
    }

    /// Replace the whole set with a single key
    pub fn only(&mut self, key: K, tone: Tone) {
        let effect = self.effect(key);
        self.marks.clear();
        self.marks.insert(key, Mark { tone, effect });
    }

    pub fn mark_all(&mut self, keys: impl IntoIterator<Item = K>, tone: Tone) {
        for key in keys {
            self.mark(key, tone);
        }
    }

    pub fn get(&self, key: K) -> Option<Mark> {
        self.marks.get(&key).copied()
    }

    pub fn tone(&self, key: K) -> Option<Tone> {
        self.marks.get(&key).map(|m| m.tone)
    }

    pub fn contains(&self, key: K) -> bool {
        self.marks.contains_key(&key)
    }

    /// Effect scalar for `key`, or 0 when it is not marked
    pub fn effect(&self, key: K) -> f32 {
        self.marks.get(&key).map(|m| m.effect).unwrap_or(0.0)
    }

    /// Set the effect scalar of an already marked key
    pub fn set_effect(&mut self, key: K, effect: f32) {
        if let Some(mark) = self.marks.get_mut(&key) {
            mark.effect = effect.clamp(0.0, 1.0);
        }
    }

    /// Reduce the effect scalar of `key` by `amount`, never below zero
    pub fn decay(&mut self, key: K, amount: f32) {
        if let Some(mark) = self.marks.get_mut(&key) {
            mark.effect = (mark.effect - amount).max(0.0);
        }
    }

    /// Keys currently carrying `tone`
    pub fn with_tone(&self, tone: Tone) -> Vec<K> {
        self.marks
            .iter()
            .filter(|(_, m)| m.tone == tone)
            .map(|(k, _)| *k)
            .collect()
    }
}
