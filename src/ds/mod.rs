pub mod indexed_heap;
pub mod intrusive_list;
pub mod keyed_list;
pub mod slot_arena;

pub use indexed_heap::IndexedMinHeap;
pub use intrusive_list::IntrusiveList;
pub use keyed_list::KeyedList;
pub use slot_arena::{SlotArena, SlotId};
