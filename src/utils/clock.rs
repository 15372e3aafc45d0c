use chrono::{Local, NaiveDate, NaiveDateTime};

/// Represents an entity responsible for providing dates across application. This allows tests to
/// move the current moment around freely.
///
/// Routines are scheduled in local wall time and no timezone conversion happens anywhere, so the
/// clock hands out naive values.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
pub mod test_clock {
    use std::sync::{Arc, Mutex};

    use chrono::{Duration, NaiveDateTime};

    use super::Clock;

    /// Clock frozen at a moment until it is explicitly moved. Clones share the same moment.
    #[derive(Clone)]
    pub struct FixedClock {
        moment: Arc<Mutex<NaiveDateTime>>,
    }

    impl FixedClock {
        pub fn new(moment: NaiveDateTime) -> Self {
            Self {
                moment: Arc::new(Mutex::new(moment)),
            }
        }

        pub fn advance(&self, duration: Duration) {
            *self.moment.lock().unwrap() += duration;
        }

        pub fn set(&self, moment: NaiveDateTime) {
            *self.moment.lock().unwrap() = moment;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            *self.moment.lock().unwrap()
        }
    }
}
