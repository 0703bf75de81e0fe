//! Soft heap insertion, meld and extraction on random keys

use analytics_core::math::soft_heap::{SoftHeap, SoftHeapEntry};
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

/// Arguments of `soft-heap`
#[derive(Args, Debug, Clone)]
pub struct SoftHeapArgs {
    /// Error parameter r
    #[arg(long, default_value_t = 10)]
    pub r: u32,

    /// Keys drawn per heap
    #[arg(long, default_value_t = 1000)]
    pub keys: usize,

    /// Insert each pair of keys into the first heap only once
    #[arg(long)]
    pub single_insert: bool,

    /// Extracted entries printed in text mode
    #[arg(long, default_value_t = 20)]
    pub show: usize,
}

impl Default for SoftHeapArgs {
    fn default() -> Self {
        Self {
            r: 10,
            keys: 1000,
            single_insert: false,
            show: 20,
        }
    }
}

/// Root tree of a heap
#[derive(Debug, Clone, Serialize)]
pub struct RootSummary {
    pub rank: u32,
    pub ckey: f64,
    pub items: usize,
}

/// One extracted entry
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedEntry {
    pub key: f64,
    pub ckey: f64,
    pub corrupted: bool,
}

impl From<SoftHeapEntry<f64, f64>> for ExtractedEntry {
    fn from(entry: SoftHeapEntry<f64, f64>) -> Self {
        Self {
            corrupted: entry.is_corrupted(),
            key: entry.key,
            ckey: entry.ckey,
        }
    }
}

/// Result of `soft-heap`
#[derive(Debug, Clone, Serialize)]
pub struct SoftHeapReport {
    pub seed: u64,
    pub r: u32,
    pub error_rate: f64,
    pub first_roots: Vec<RootSummary>,
    pub second_roots: Vec<RootSummary>,
    pub melded_len: usize,
    pub extracted: Vec<ExtractedEntry>,
    pub corrupted: usize,
    /// Adjacent extractions whose keys come out of order
    pub key_inversions: usize,
    pub show: usize,
}

fn roots(heap: &SoftHeap<f64, f64>) -> Vec<RootSummary> {
    heap.roots()
        .map(|(rank, ckey, items)| RootSummary {
            rank,
            ckey: *ckey,
            items,
        })
        .collect()
}

fn print_roots(label: &str, roots: &[RootSummary]) {
    println!("{label}: {} trees", roots.len());
    for root in roots {
        println!("  rank {:>3}  ckey {:>10}  items {}", root.rank, fmt_num(root.ckey, 6), root.items);
    }
}

impl Report for SoftHeapReport {
    fn title(&self) -> String {
        format!("Kaplan-Zwick Soft Heap (r = {})", self.r)
    }

    fn print_text(&self) {
        print_roots("After insertion #1", &self.first_roots);
        print_roots("After insertion #2", &self.second_roots);
        println!();
        println!("{:<22} {}", "Melded size:", self.melded_len);
        for (i, e) in self.extracted.iter().take(self.show).enumerate() {
            let marker = if e.corrupted { " *" } else { "" };
            println!(
                "  [{:>4}] {} (ckey {}){}",
                i + 1,
                fmt_num(e.key, 6),
                fmt_num(e.ckey, 6),
                marker
            );
        }
        if self.extracted.len() > self.show {
            println!("  ... {} more", self.extracted.len() - self.show);
        }
        println!();
        println!("{:<22} {}", "Corrupted:", self.corrupted);
        println!("{:<22} {}", "Key inversions:", self.key_inversions);
        println!("{:<22} {}", "Error rate bound:", fmt_num(self.error_rate, 6));
    }
}

/// Fills two heaps, melds them and drains the result
pub fn compute(args: &SoftHeapArgs, seed: u64) -> Result<SoftHeapReport> {
    if args.keys == 0 {
        return Err(CliError::InvalidArgument("keys must be positive".to_string()));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut first = SoftHeap::new(args.r);
    let mut second = SoftHeap::new(args.r);
    for _ in 0..args.keys {
        let (a, b): (f64, f64) = (rng.gen(), rng.gen());
        first.insert(a, a);
        second.insert(b, b);
        if !args.single_insert {
            first.insert(a, a);
            first.insert(b, b);
        }
    }
    debug!(first = first.len(), second = second.len(), "filled soft heaps");
    let (first_roots, second_roots) = (roots(&first), roots(&second));

    first.meld(second);
    let melded_len = first.len();
    let extracted: Vec<ExtractedEntry> = std::iter::from_fn(|| first.extract_min())
        .map(ExtractedEntry::from)
        .collect();
    let corrupted = extracted.iter().filter(|e| e.corrupted).count();
    let key_inversions = extracted.windows(2).filter(|w| w[1].key < w[0].key).count();

    Ok(SoftHeapReport {
        seed,
        r: args.r,
        error_rate: first.error_rate(),
        first_roots,
        second_roots,
        melded_len,
        extracted,
        corrupted,
        key_inversions,
        show: args.show,
    })
}

/// Run the soft-heap command
pub fn run(args: &SoftHeapArgs, ctx: &RunContext) -> Result<()> {
    info!(r = args.r, keys = args.keys, "exercising soft heap");
    emit(&compute(args, ctx.seed)?, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_is_extracted() {
        let report = compute(&SoftHeapArgs::default(), 42).unwrap();
        assert_eq!(report.melded_len, 4000);
        assert_eq!(report.extracted.len(), 4000);
        assert!(report.extracted.iter().all(|e| e.ckey >= e.key));
        assert_eq!(report.corrupted, report.extracted.iter().filter(|e| e.ckey > e.key).count());
        assert_eq!(report.error_rate, 1.0 / 1024.0);
        assert!(report.corrupted as f64 <= report.error_rate * report.melded_len as f64);
    }

    #[test]
    fn test_large_r_is_exact() {
        let args = SoftHeapArgs {
            r: 20,
            ..SoftHeapArgs::default()
        };
        let report = compute(&args, 3).unwrap();
        assert_eq!(report.corrupted, 0);
        assert_eq!(report.key_inversions, 0);
    }

    #[test]
    fn test_single_insert_sizes() {
        let args = SoftHeapArgs {
            keys: 100,
            single_insert: true,
            ..SoftHeapArgs::default()
        };
        let report = compute(&args, 1).unwrap();
        assert_eq!(report.melded_len, 200);
        assert!(report.first_roots.windows(2).all(|w| w[0].rank <= w[1].rank));
    }
}
