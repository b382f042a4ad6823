//! The PDF417 symbol set.
//!
//! A codeword is 17 modules across 8 runs (4 bars, 4 spaces). The decoder
//! classifies a scanned codeword by its six two-bar edge widths
//! (`e_i = x_i + x_{i+1}`, each 2..=9), packs them into an 18-bit key (3
//! bits per width after subtracting 2), and looks the key up here to obtain
//! the codeword's cluster and value.
//!
//! The table is built once at first use and immutable afterwards: every
//! 17-module pattern with runs in 1..=6 whose cluster
//! `(x1 - x3 + x5 - x7) mod 9` is 0, 3 or 6 and whose edge widths all fit
//! 2..=9 is collected, deduplicated by edge sequence (the edge sequence
//! determines the cluster, and PDF417 is edge-to-edge decodable, so each
//! sequence names exactly one codeword), and the first 929 sequences of
//! each cluster in ascending packed order carry values 0..=928.

use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Modules spanned by one codeword.
pub const MODULES_PER_CODEWORD: i32 = 17;

/// Codeword values per cluster; 900..=928 are control codewords.
pub const VALUES_PER_CLUSTER: u16 = 929;

/// Run widths of the start pattern (17 modules, begins with a bar).
pub const START_PATTERN: [u8; 8] = [8, 1, 1, 1, 1, 1, 1, 3];

/// Run widths of the stop pattern (18 modules, begins with a bar).
pub const STOP_PATTERN: [u8; 9] = [7, 1, 1, 3, 1, 1, 1, 2, 1];

struct SymbolTables {
    /// `(packed_edges << 12) | (cluster << 10) | value`, sorted by key.
    lookup: Vec<u32>,
    /// Canonical run widths per cluster and value, for rendering.
    patterns: [Vec<[u8; 8]>; 3],
}

static TABLES: OnceLock<SymbolTables> = OnceLock::new();

fn tables() -> &'static SymbolTables {
    TABLES.get_or_init(build_tables)
}

/// Resolve an 18-bit packed edge sequence to `(cluster << 10) | value`.
pub fn lookup(symbol: u32) -> Option<u16> {
    let t = tables();
    t.lookup
        .binary_search_by_key(&symbol, |entry| entry >> 12)
        .ok()
        .map(|i| (t.lookup[i] & 0xfff) as u16)
}

/// Canonical run widths of a codeword, bars and spaces interleaved
/// starting on a bar. `cluster` is 0, 1 or 2 (for clusters 0, 3, 6).
pub fn bar_widths(cluster: u8, value: u16) -> Option<[u8; 8]> {
    tables()
        .patterns
        .get(cluster as usize)?
        .get(value as usize)
        .copied()
}

/// Pack six two-bar edge widths into the 18-bit lookup key.
pub fn pack_edges(edges: [u8; 6]) -> u32 {
    let mut packed = 0u32;
    for (i, &e) in edges.iter().enumerate() {
        packed |= u32::from(e - 2) << (3 * (5 - i));
    }
    packed
}

fn build_tables() -> SymbolTables {
    let mut by_cluster: [BTreeMap<u32, [u8; 8]>; 3] =
        [BTreeMap::new(), BTreeMap::new(), BTreeMap::new()];

    let mut runs = [0u8; 8];
    enumerate_runs(&mut runs, 0, MODULES_PER_CODEWORD, &mut |runs| {
        let cluster = (i32::from(runs[0]) - i32::from(runs[2]) + i32::from(runs[4])
            - i32::from(runs[6]))
        .rem_euclid(9);
        if cluster % 3 != 0 {
            return;
        }
        let mut packed = 0u32;
        for i in 0..6 {
            let edge = runs[i] + runs[i + 1];
            if edge > 9 {
                return;
            }
            packed |= u32::from(edge - 2) << (3 * (5 - i));
        }
        by_cluster[(cluster / 3) as usize].entry(packed).or_insert(*runs);
    });

    let mut lookup = Vec::with_capacity(3 * VALUES_PER_CLUSTER as usize);
    let mut patterns: [Vec<[u8; 8]>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for (cluster, map) in by_cluster.iter().enumerate() {
        for (value, (&packed, &runs)) in map.iter().take(VALUES_PER_CLUSTER as usize).enumerate()
        {
            lookup.push((packed << 12) | ((cluster as u32) << 10) | value as u32);
            patterns[cluster].push(runs);
        }
    }
    lookup.sort_unstable();

    SymbolTables { lookup, patterns }
}

/// Enumerate 8-run compositions of `remaining` modules, each run 1..=6, in
/// lexicographic order.
fn enumerate_runs(
    runs: &mut [u8; 8],
    index: usize,
    remaining: i32,
    visit: &mut impl FnMut(&[u8; 8]),
) {
    if index == 7 {
        if (1..=6).contains(&remaining) {
            runs[7] = remaining as u8;
            visit(runs);
        }
        return;
    }
    let slots_left = 7 - index as i32;
    for width in 1..=6 {
        let rest = remaining - width;
        if rest < slots_left || rest > 6 * slots_left {
            continue;
        }
        runs[index] = width as u8;
        enumerate_runs(runs, index + 1, rest, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges_of(runs: &[u8; 8]) -> [u8; 6] {
        let mut edges = [0u8; 6];
        for i in 0..6 {
            edges[i] = runs[i] + runs[i + 1];
        }
        edges
    }

    #[test]
    fn each_cluster_holds_the_full_value_range() {
        for cluster in 0..3u8 {
            assert!(bar_widths(cluster, VALUES_PER_CLUSTER - 1).is_some());
            assert_eq!(bar_widths(cluster, VALUES_PER_CLUSTER), None);
        }
        assert_eq!(tables().lookup.len(), 3 * VALUES_PER_CLUSTER as usize);
    }

    #[test]
    fn every_pattern_spans_seventeen_modules() {
        for cluster in 0..3u8 {
            for value in (0..VALUES_PER_CLUSTER).step_by(31) {
                let runs = bar_widths(cluster, value).expect("pattern");
                let total: u32 = runs.iter().map(|&r| u32::from(r)).sum();
                assert_eq!(total, 17, "cluster {cluster} value {value}");
                assert!(runs.iter().all(|&r| (1..=6).contains(&r)));
            }
        }
    }

    #[test]
    fn lookup_round_trips_through_bar_widths() {
        for cluster in 0..3u8 {
            for value in (0..VALUES_PER_CLUSTER).step_by(17) {
                let runs = bar_widths(cluster, value).expect("pattern");
                let packed = pack_edges(edges_of(&runs));
                let resolved = lookup(packed).expect("in table");
                assert_eq!(resolved >> 10, u16::from(cluster));
                assert_eq!(resolved & 0x3ff, value);
            }
        }
    }

    #[test]
    fn cluster_formula_matches_table_assignment() {
        for cluster in 0..3u8 {
            let runs = bar_widths(cluster, 500).expect("pattern");
            let k = (i32::from(runs[0]) - i32::from(runs[2]) + i32::from(runs[4])
                - i32::from(runs[6]))
            .rem_euclid(9);
            assert_eq!(k, 3 * i32::from(cluster));
        }
    }

    #[test]
    fn start_signature_is_not_a_codeword() {
        // The start pattern's edge sequence has mode 7, outside every
        // cluster, so it can never be mistaken for data.
        let edges = edges_of(&START_PATTERN);
        assert_eq!(lookup(pack_edges(edges)), None);
    }

    #[test]
    fn values_are_unique_within_a_cluster() {
        let t = tables();
        for pair in t.lookup.windows(2) {
            assert!(pair[0] >> 12 < pair[1] >> 12, "duplicate packed key");
        }
    }
}
