use crate::format::{bytes_to_gb, round_1};

/// Page counts from a `vm_stat` block. Missing lines count as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VmStats {
    pub page_size: Option<u64>,
    pub wired: u64,
    pub active: u64,
    pub compressor: u64,
}

pub fn parse_vm_stat(text: &str) -> VmStats {
    let mut stats = VmStats::default();
    for line in text.lines() {
        if let Some(rest) = line.split("page size of ").nth(1) {
            stats.page_size = rest.split_whitespace().next().and_then(|v| v.parse().ok());
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let Ok(pages) = value.trim().trim_end_matches('.').parse::<u64>() else {
            continue;
        };
        match key.trim() {
            "Pages wired down" => stats.wired = pages,
            "Pages active" => stats.active = pages,
            "Pages occupied by compressor" => stats.compressor = pages,
            _ => {}
        }
    }
    stats
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemoryTotals {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
}

/// Used = wired + active + compressor. `stats` is `None` when vm_stat could not
/// be read, in which case used and free are reported as zero.
pub fn memory_totals(
    total_bytes: u64,
    stats: Option<&VmStats>,
    default_page_size: u64,
) -> MemoryTotals {
    let total_gb = bytes_to_gb(total_bytes);
    let Some(stats) = stats else {
        return MemoryTotals {
            total_gb: round_1(total_gb),
            ..MemoryTotals::default()
        };
    };
    let page_size = stats.page_size.unwrap_or(default_page_size);
    let used_pages = stats.wired + stats.active + stats.compressor;
    let used_gb = bytes_to_gb(used_pages.saturating_mul(page_size));
    let free_gb = (total_gb - used_gb).max(0.0);
    MemoryTotals {
        total_gb: round_1(total_gb),
        used_gb: round_1(used_gb),
        free_gb: round_1(free_gb),
    }
}
