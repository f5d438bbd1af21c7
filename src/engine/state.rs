use chrono::NaiveDate;

/// Per-day entry state, owned exclusively by the engine task.
///
/// At most one armed→fired transition happens per calendar date; the
/// reset transition happens exactly once per date, at the first tick
/// observed on a new local date. Date-change detection (rather than a
/// fixed post-midnight interval) keeps the reset correct across missed
/// ticks and process restarts that span midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayState {
    armed: bool,
    last_reset_date: NaiveDate,
}

impl DayState {
    /// A fresh state starts armed for `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            armed: true,
            last_reset_date: today,
        }
    }

    /// Observe the tick's date. Re-arms and returns `true` exactly once
    /// per new date; every later tick on the same date returns `false`.
    pub fn roll(&mut self, today: NaiveDate) -> bool {
        if today == self.last_reset_date {
            return false;
        }
        self.armed = true;
        self.last_reset_date = today;
        true
    }

    pub fn armed(&self) -> bool {
        self.armed
    }

    /// Spend today's single permitted entry.
    pub fn consume(&mut self) {
        self.armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn starts_armed() {
        assert!(DayState::new(date(1)).armed());
    }

    #[test]
    fn consume_disarms_until_the_date_changes() {
        let mut state = DayState::new(date(1));
        state.consume();
        assert!(!state.armed());

        assert!(!state.roll(date(1)));
        assert!(!state.armed());

        assert!(state.roll(date(2)));
        assert!(state.armed());
    }

    #[test]
    fn roll_fires_exactly_once_per_date_regardless_of_tick_count() {
        let mut state = DayState::new(date(1));
        state.consume();

        assert!(state.roll(date(2)));
        for _ in 0..100 {
            assert!(!state.roll(date(2)));
        }
        assert!(state.armed());
    }

    #[test]
    fn roll_handles_multi_day_gaps() {
        // A process asleep over a weekend re-arms on its first tick back.
        let mut state = DayState::new(date(1));
        state.consume();

        assert!(state.roll(date(4)));
        assert!(state.armed());
    }
}
