#![no_main]

use clockkit::policy::clock_pro_plus::ClockProPlusCache;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences against the replacement engine.
//
// Interprets the input as (op, key) pairs over a small key space so ghost
// hits, promotions, demotions, and test-page pruning all fire, and checks
// the resident and metadata bounds plus the full structural invariants
// after every operation.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let capacity = (data[0] as usize % 30).max(2);
    let mut cache: ClockProPlusCache<u8, u32> = match ClockProPlusCache::new(capacity) {
        Ok(cache) => cache,
        Err(_) => return,
    };

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 4;
        let key = data[idx + 1] % (capacity as u8 * 3).max(1);

        match op {
            0 => {
                cache.insert(key, idx as u32);
            }
            1 => {
                let _ = cache.get(&key);
            }
            2 => {
                let _ = cache.try_get_or_insert_with(key, || {
                    if idx % 5 == 0 {
                        Err("fetch failed")
                    } else {
                        Ok(idx as u32)
                    }
                });
            }
            _ => {
                let _ = cache.peek(&key);
            }
        }

        assert!(cache.len() <= capacity);
        assert!(cache.len() + cache.ghost_count() <= capacity * 2);
        assert!(cache.keys().count() == cache.len());
        #[cfg(debug_assertions)]
        cache.debug_validate_invariants();

        idx += 2;
    }
});
