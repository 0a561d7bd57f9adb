#![no_main]

use libfuzzer_sys::fuzz_target;
use tiercache::ds::KeyedList;

// Fuzz arbitrary operation sequences on KeyedList
//
// Tests random sequences of push_front, touch, pop_front, pop_back, remove,
// get and clear with a small key space so keys collide often.
fuzz_target!(|data: &[u8]| {
    let mut list: KeyedList<u8, u32> = KeyedList::new();

    for pair in data.chunks_exact(2) {
        let op = pair[0] % 7;
        let key = pair[1] % 32;

        match op {
            0 => {
                let had = list.contains(&key);
                let old_len = list.len();
                let replaced = list.push_front(key, u32::from(pair[1]));
                assert_eq!(replaced.is_some(), had);
                assert_eq!(list.len(), if had { old_len } else { old_len + 1 });
                assert_eq!(list.front().map(|(k, _)| *k), Some(key));
            }
            1 => {
                let had = list.contains(&key);
                assert_eq!(list.touch(&key), had);
                if had {
                    assert_eq!(list.front().map(|(k, _)| *k), Some(key));
                }
            }
            2 => {
                let expected = list.front().map(|(k, _)| *k);
                assert_eq!(list.pop_front().map(|(k, _)| k), expected);
            }
            3 => {
                let expected = list.back().map(|(k, _)| *k);
                assert_eq!(list.pop_back().map(|(k, _)| k), expected);
            }
            4 => {
                let had = list.contains(&key);
                assert_eq!(list.remove(&key).is_some(), had);
                assert!(!list.contains(&key));
            }
            5 => {
                assert_eq!(list.get(&key).is_some(), list.contains(&key));
            }
            6 => {
                if pair[1] % 16 == 0 {
                    list.clear();
                    assert!(list.is_empty());
                }
            }
            _ => unreachable!(),
        }

        assert_eq!(list.keys().count(), list.len());
        list.debug_validate_invariants();
    }
});
