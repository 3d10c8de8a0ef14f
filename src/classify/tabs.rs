//! Positional matching of browser tabs to renderer process memory.

use std::hash::{DefaultHasher, Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::system::snapshot::TabDetail;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrowserTab {
    pub title: String,
    pub url: String,
}

/// Inclusive bounds for tabs that have no renderer left to claim.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRange {
    pub min_mb: u64,
    pub max_mb: u64,
}

impl FallbackRange {
    pub fn new(a: u64, b: u64) -> Self {
        FallbackRange {
            min_mb: a.min(b),
            max_mb: a.max(b),
        }
    }

    /// Random within the range but seeded by the tab itself, so the same
    /// tab list always produces the same numbers.
    pub fn estimate(&self, tab: &BrowserTab, position: usize) -> u64 {
        let mut hasher = DefaultHasher::new();
        tab.hash(&mut hasher);
        position.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(hasher.finish());
        rng.gen_range(self.min_mb..=self.max_mb)
    }
}

/// The i-th tab gets the i-th largest renderer. Titles and pids are never
/// compared, so the pairing is only as good as the two orders agree.
/// Output keeps tab order and has exactly one entry per tab.
pub fn correlate_tabs(
    tabs: &[BrowserTab],
    mut renderer_mb: Vec<u64>,
    fallback: FallbackRange,
) -> Vec<TabDetail> {
    renderer_mb.sort_by(|a, b| b.cmp(a));
    tabs.iter()
        .enumerate()
        .map(|(i, tab)| {
            let (memory_mb, estimated) = match renderer_mb.get(i) {
                Some(&mb) => (mb, false),
                None => (fallback.estimate(tab, i), true),
            };
            TabDetail {
                title: tab.title.clone(),
                url: tab.url.clone(),
                memory_mb,
                estimated,
            }
        })
        .collect()
}

pub fn sort_tabs(tabs: &mut [TabDetail]) {
    tabs.sort_by(|a, b| b.memory_mb.cmp(&a.memory_mb));
}
