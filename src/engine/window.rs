use chrono::{NaiveTime, Timelike};

/// Daily clock window inside which an entry may be attempted.
///
/// Both bounds are inclusive and comparison happens at minute
/// resolution: the bounds come from HH:MM configuration, while tick
/// times carry real seconds, so the whole end minute (10:15:00 through
/// 10:15:59) belongs to a window ending at 10:15.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl EntryWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        let hm = (time.hour(), time.minute());
        (self.start.hour(), self.start.minute()) <= hm
            && hm <= (self.end.hour(), self.end.minute())
    }
}
