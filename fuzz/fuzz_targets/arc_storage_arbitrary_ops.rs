#![no_main]

use libfuzzer_sys::fuzz_target;
use tiercache::policy::arc::ArcStorage;
use tiercache::storage::Storage;

// Fuzz arbitrary save/get/remove sequences on ArcStorage
//
// The first byte picks the capacity; the list bounds and the target p must
// hold after every operation.
fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(first % 16) + 1;
    let mut arc: ArcStorage<u32> = ArcStorage::new(capacity);

    for pair in rest.chunks_exact(2) {
        let key = (pair[1] % 64).to_string();

        match pair[0] % 4 {
            0 | 1 => {
                arc.save(&key, u32::from(pair[1])).unwrap();
                assert_eq!(arc.peek(&key).unwrap(), Some(u32::from(pair[1])));
            }
            2 => {
                let expected = arc.peek(&key).unwrap();
                assert_eq!(arc.get(&key).unwrap(), expected);
            }
            3 => {
                arc.remove(&key).unwrap();
                assert_eq!(arc.peek(&key).unwrap(), None);
            }
            _ => unreachable!(),
        }

        assert!(arc.len() <= capacity);
        assert!(arc.t1_len() + arc.b1_len() <= capacity);
        assert!(arc.len() + arc.b1_len() + arc.b2_len() <= 2 * capacity);
        assert!(arc.p_value() <= capacity);
        arc.debug_validate_invariants();
    }
});
