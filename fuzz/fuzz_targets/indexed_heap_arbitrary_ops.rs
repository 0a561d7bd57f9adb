#![no_main]

use libfuzzer_sys::fuzz_target;
use tiercache::ds::IndexedMinHeap;

// Fuzz arbitrary operation sequences on IndexedMinHeap
//
// Checks that pop_min always yields the smallest access count and that
// increment, remove and push keep the heap consistent.
fuzz_target!(|data: &[u8]| {
    let mut heap: IndexedMinHeap<u8, u8> = IndexedMinHeap::new();

    for pair in data.chunks_exact(2) {
        let op = pair[0] % 5;
        let key = pair[1] % 48;

        match op {
            0 => {
                let had = heap.contains(&key);
                assert_eq!(heap.push(key, pair[0]).is_some(), had);
                assert_eq!(heap.get(&key), Some(&pair[0]));
            }
            1 => {
                let before = heap.count(&key);
                let hit = heap.increment(&key).is_some();
                assert_eq!(hit, before.is_some());
                if let Some(count) = before {
                    assert_eq!(heap.count(&key), Some(count + 1));
                }
            }
            2 => {
                let min = heap.peek_min().map(|(_, _, count)| count);
                let popped = heap.pop_min();
                assert_eq!(popped.as_ref().map(|(_, _, count)| *count), min);
                if let Some((_, _, count)) = popped
                    && let Some((_, _, next)) = heap.peek_min()
                {
                    assert!(next >= count);
                }
            }
            3 => {
                let had = heap.contains(&key);
                assert_eq!(heap.remove(&key).is_some(), had);
                assert!(!heap.contains(&key));
            }
            4 => {
                if pair[1] % 16 == 0 {
                    heap.clear();
                    assert!(heap.is_empty());
                }
            }
            _ => unreachable!(),
        }

        heap.debug_validate_invariants();
    }
});
