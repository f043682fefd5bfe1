use crate::{
    clock::Clock,
    synth::voice::{Note, Voice},
    NOTE_ARRAY_SIZE,
};

/// Fixed-capacity voice table and the only code allowed to change it.
///
/// Slots are scanned in index order and the first empty one wins. There is no
/// voice stealing: when every slot is busy a new note has nowhere to go and
/// the caller drops it.
///
/// Every write replaces a whole [`Voice`] in one assignment, so a reader never
/// sees a new pitch paired with an old period.
#[derive(Debug, Clone)]
pub struct VoiceTable<const N: usize = NOTE_ARRAY_SIZE> {
    slots: [Voice; N],
}

impl<const N: usize> VoiceTable<N> {
    pub fn new() -> Self {
        Self {
            slots: [Voice::Empty; N],
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Index of the first empty slot, or `None` when the table is full.
    pub fn find_first_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(Voice::is_empty)
    }

    /// Start a note in slot `index`.
    ///
    /// The slot is expected to be empty (take the index from
    /// [`find_first_empty_slot`](Self::find_first_empty_slot)); an occupied
    /// slot is overwritten without complaint. Out-of-range indices are
    /// ignored.
    pub fn assign<C: Clock>(
        &mut self,
        index: usize,
        channel: u8,
        pitch: u8,
        velocity: u8,
        clock: &C,
    ) {
        debug_assert!(velocity > 0, "zero velocity is a note-off");
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Voice::Active(Note::start(
                channel,
                pitch,
                velocity,
                clock.micros(),
                clock.millis(),
            ));
        }
    }

    /// Return slot `index` to empty. Releasing an empty or out-of-range slot
    /// does nothing.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Voice::Empty;
        }
    }

    /// Scan for a free slot and start the note there.
    pub fn allocate<C: Clock>(
        &mut self,
        channel: u8,
        pitch: u8,
        velocity: u8,
        clock: &C,
    ) -> Option<usize> {
        let index = self.find_first_empty_slot()?;
        self.assign(index, channel, pitch, velocity, clock);
        Some(index)
    }

    /// First slot playing `pitch` on `channel`.
    pub fn find_voice(&self, channel: u8, pitch: u8) -> Option<usize> {
        self.slots.iter().position(|v| {
            v.note()
                .is_some_and(|n| n.channel == channel && n.pitch == pitch)
        })
    }

    /// Release the first slot playing `pitch` on `channel`.
    pub fn release_note(&mut self, channel: u8, pitch: u8) -> Option<usize> {
        let index = self.find_voice(channel, pitch)?;
        self.release(index);
        Some(index)
    }

    pub fn release_all(&mut self) {
        self.slots.fill(Voice::Empty);
    }

    pub fn get(&self, index: usize) -> Option<&Voice> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.slots.iter()
    }

    pub fn active_notes(&self) -> impl Iterator<Item = &Note> {
        self.slots.iter().filter_map(Voice::note)
    }

    pub fn active_count(&self) -> usize {
        self.active_notes().count()
    }

    pub fn is_full(&self) -> bool {
        self.find_first_empty_slot().is_none()
    }

    /// Copy of every slot, for readers on another thread.
    pub fn snapshot(&self) -> [Voice; N] {
        self.slots
    }
}

impl<const N: usize> Default for VoiceTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
