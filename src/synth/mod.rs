// Purpose: voice slots, polyphony bookkeeping, control messages
// The timing path reads what this layer writes

pub mod message;
pub mod table;
pub mod voice;

pub use table::VoiceTable;
pub use voice::{Note, Voice, EMPTY_PITCH};
