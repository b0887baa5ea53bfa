//! Structural invariants under sustained churn, for both policies.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rulecache::policy::lfu::LfuRuleCache;
use rulecache::policy::lru::{LruRuleCache, ScanDirection};
use rulecache::traits::RuleCache;

fn eq_probe(rule: &u64, contents: &u64) -> bool {
    rule == contents
}

#[test]
fn lfu_capacity_bound_holds_under_random_workload() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut cache: LfuRuleCache<u64> = LfuRuleCache::new(8);

    for _ in 0..2_000 {
        let contents: u64 = rng.gen_range(0..32);
        match cache.get(&contents, &eq_probe) {
            Some(_) => cache.record_hit(),
            None => {
                cache.record_miss();
                cache.put(Arc::new(contents));
            },
        }
        assert!(cache.len() <= 8);
    }

    cache.check_invariants().unwrap();
    let stats = cache.stats();
    assert_eq!(stats.lookups(), 2_000);
    assert!(stats.hits > 0 && stats.misses > 0);
}

#[test]
fn lru_capacity_bound_holds_in_both_directions() {
    for direction in [
        ScanDirection::MostRecentFirst,
        ScanDirection::LeastRecentFirst,
    ] {
        let mut rng = StdRng::seed_from_u64(11);
        let mut cache: LruRuleCache<u64> = LruRuleCache::with_direction(8, direction);

        for _ in 0..2_000 {
            let contents: u64 = rng.gen_range(0..32);
            match cache.get(&contents, &eq_probe) {
                Some(_) => cache.record_hit(),
                None => {
                    cache.record_miss();
                    cache.put(Arc::new(contents));
                },
            }
            assert!(cache.len() <= 8);
        }

        cache.check_invariants().unwrap();
        assert_eq!(cache.scan_direction(), direction);
    }
}

#[test]
fn zero_capacity_caches_stay_empty_and_count_misses() {
    let mut lfu: LfuRuleCache<u64> = LfuRuleCache::new(0);
    let mut lru: LruRuleCache<u64> = LruRuleCache::new(0);

    for contents in 0..50u64 {
        assert!(lfu.get(&contents, &eq_probe).is_none());
        lfu.record_miss();
        lfu.put(Arc::new(contents));

        assert!(lru.get(&contents, &eq_probe).is_none());
        lru.record_miss();
        lru.put(Arc::new(contents));
    }

    assert!(lfu.is_empty());
    assert!(lru.is_empty());
    assert_eq!(lfu.stats().misses, 50);
    assert_eq!(lru.stats().misses, 50);
    lfu.check_invariants().unwrap();
    lru.check_invariants().unwrap();
}

#[test]
fn lfu_frequency_order_survives_promotion_heavy_churn() {
    let mut cache: LfuRuleCache<u64> = LfuRuleCache::new(4);
    for rule in 0..4u64 {
        cache.put(Arc::new(rule));
    }

    // Skew hits hard toward rule 3, mildly toward rule 2.
    for _ in 0..50 {
        cache.get(&3, &eq_probe).unwrap();
        cache.record_hit();
    }
    for _ in 0..5 {
        cache.get(&2, &eq_probe).unwrap();
        cache.record_hit();
    }
    cache.check_invariants().unwrap();

    let hit = cache.get(&3, &eq_probe).unwrap();
    assert_eq!(cache.frequency_of(&hit), Some(51));

    // The never-hit rules are the eviction candidates, in insertion order.
    cache.put(Arc::new(10));
    cache.put(Arc::new(11));
    assert!(cache.get(&0, &eq_probe).is_none());
    assert!(cache.get(&1, &eq_probe).is_none());
    assert!(cache.get(&2, &eq_probe).is_some());
    assert!(cache.get(&3, &eq_probe).is_some());
    cache.check_invariants().unwrap();
}

#[test]
fn lru_pending_hit_never_dangles_across_churn() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut cache: LruRuleCache<u64> = LruRuleCache::new(4);

    for step in 0..1_000u64 {
        let contents: u64 = rng.gen_range(0..16);
        if cache.get(&contents, &eq_probe).is_some() {
            // Occasionally abandon the probe instead of committing.
            if step % 7 != 0 {
                cache.record_hit();
            }
        } else {
            cache.record_miss();
            cache.put(Arc::new(contents));
        }
        cache.check_invariants().unwrap();
    }
}
