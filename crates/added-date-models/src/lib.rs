pub mod batch_row;
pub mod date_spec;
pub mod media;
pub mod undo;

pub use batch_row::BatchRow;
pub use date_spec::{DateSpec, CANONICAL_FORMAT};
pub use media::{Item, ItemKind};
pub use undo::UndoRecord;
