use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::{CoreError, Result};
use crate::models::Draw;

/// Where historical draws come from. Implementations decide about transport,
/// timeouts and retries; the pipeline never retries.
pub trait DrawSource {
    fn latest_index(&self) -> Result<u32>;
    /// `DrawNotFound` for unknown or future contests.
    fn fetch_draw(&self, index: u32) -> Result<Draw>;
}

/// Draws already in memory, keyed by contest index.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    draws: BTreeMap<u32, Draw>,
}

impl MemorySource {
    /// Fails on a repeated contest index instead of keeping either copy.
    pub fn new(draws: impl IntoIterator<Item = Draw>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for draw in draws {
            match map.entry(draw.index()) {
                Entry::Occupied(_) => {
                    return Err(CoreError::malformed(draw.index(), "duplicate contest index"));
                }
                Entry::Vacant(slot) => {
                    slot.insert(draw);
                }
            }
        }
        Ok(Self { draws: map })
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

impl DrawSource for MemorySource {
    fn latest_index(&self) -> Result<u32> {
        self.draws
            .keys()
            .next_back()
            .copied()
            .ok_or_else(|| CoreError::SourceUnavailable("no draws loaded".to_string()))
    }

    fn fetch_draw(&self, index: u32) -> Result<Draw> {
        self.draws
            .get(&index)
            .cloned()
            .ok_or(CoreError::DrawNotFound(index))
    }
}
