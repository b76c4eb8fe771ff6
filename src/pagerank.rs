//! Batch iterative damped PageRank over the stored link graph, with the
//! pull-dangling variant redistributing dangling mass uniformly.

use std::collections::HashMap;

use crate::error::Result;
use crate::store::Store;

/// Computes and persists PageRank for every page in `store`. A no-op on an
/// empty store.
pub fn calculate(store: &Store, damping_factor: f64, iterations: usize) -> Result<()> {
    let pages = store.list_pages()?;
    let page_ids: Vec<i64> = pages.iter().map(|(id, _)| *id).collect();
    let n = page_ids.len();
    if n == 0 {
        return Ok(());
    }

    let mut pr: HashMap<i64, f64> = page_ids.iter().map(|&id| (id, 1.0 / n as f64)).collect();

    let mut outlinks: HashMap<i64, Vec<i64>> = page_ids.iter().map(|&id| (id, Vec::new())).collect();
    for (source, target) in store.iter_links()? {
        if let Some(targets) = outlinks.get_mut(&source) {
            if pr.contains_key(&target) {
                targets.push(target);
            }
        }
    }

    let dangling: Vec<i64> = page_ids
        .iter()
        .copied()
        .filter(|id| outlinks.get(id).map(Vec::is_empty).unwrap_or(true))
        .collect();

    for _ in 0..iterations {
        let dangling_sum: f64 = dangling.iter().map(|id| pr[id]).sum();
        let mut contrib: HashMap<i64, f64> = page_ids.iter().map(|&id| (id, 0.0)).collect();

        for &source in &page_ids {
            let targets = &outlinks[&source];
            if targets.is_empty() {
                continue;
            }
            let share = pr[&source] / targets.len() as f64;
            for target in targets {
                *contrib.get_mut(target).unwrap() += share;
            }
        }

        let base = (1.0 - damping_factor) / n as f64;
        let dangling_val = damping_factor * dangling_sum / n as f64;

        let mut next_pr = HashMap::with_capacity(n);
        for &id in &page_ids {
            next_pr.insert(id, base + dangling_val + damping_factor * contrib[&id]);
        }
        pr = next_pr;
    }

    tracing::info!(pages = n, "saving pagerank scores");
    for (id, score) in pr {
        store.update_pagerank(id, score)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(store: &Store, url: &str) -> i64 {
        store.upsert_page(url, Some("t"), Some("c"), Some("text")).unwrap()
    }

    #[test]
    fn empty_store_is_a_no_op() {
        let store = Store::open(":memory:").unwrap();
        calculate(&store, 0.85, 20).unwrap();
    }

    #[test]
    fn single_page_gets_full_rank() {
        let store = Store::open(":memory:").unwrap();
        let a = page(&store, "https://a.com");
        calculate(&store, 0.85, 20).unwrap();
        assert!((store.get_pagerank(a).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn two_page_cycle_splits_rank_evenly() {
        let store = Store::open(":memory:").unwrap();
        let a = page(&store, "https://a.com");
        let b = page(&store, "https://b.com");
        store.add_link(a, b).unwrap();
        store.add_link(b, a).unwrap();

        calculate(&store, 0.85, 50).unwrap();

        assert!((store.get_pagerank(a).unwrap() - 0.5).abs() < 1e-6);
        assert!((store.get_pagerank(b).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn dangling_page_still_sums_to_one_and_outranks_source() {
        let store = Store::open(":memory:").unwrap();
        let a = page(&store, "https://a.com");
        let b = page(&store, "https://b.com");
        store.add_link(a, b).unwrap();

        calculate(&store, 0.85, 50).unwrap();

        let pr_a = store.get_pagerank(a).unwrap();
        let pr_b = store.get_pagerank(b).unwrap();
        assert!((pr_a + pr_b - 1.0).abs() < 1e-6);
        assert!(pr_b > pr_a);
    }
}
