use std::collections::VecDeque;

use jiff::Timestamp;

/// One successful scan, never changed after it is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingEvent {
    text: String,
    serial_number: String,
    read_at: Timestamp,
}

impl ReadingEvent {
    pub fn new(text: String, serial_number: String) -> Self {
        Self::new_at(text, serial_number, Timestamp::now())
    }

    pub fn new_at(text: String, serial_number: String, read_at: Timestamp) -> Self {
        Self { text, serial_number, read_at }
    }

    /// The decoded message, one line per record
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn read_at(&self) -> Timestamp {
        self.read_at
    }
}

/// Serial number formatted the way browsers report it, `04:a2:1b:...`
pub fn serial_number_from_uid(uid: &[u8]) -> String {
    uid.iter().map(|byte| hex::encode([*byte])).collect::<Vec<_>>().join(":")
}

/// Readings of the current session, newest first, kept in memory only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanHistory {
    events: VecDeque<ReadingEvent>,
}

impl ScanHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ReadingEvent) {
        self.events.push_front(event);
    }

    pub fn latest(&self) -> Option<&ReadingEvent> {
        self.events.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReadingEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
