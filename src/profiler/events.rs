//! Event notifications flowing from instrumented code into profilers.

use std::time::{Duration, Instant};

/// Receiver of "event fired" notifications
pub trait EventSink {
    /// The instrumented event `event` fired and took `elapsed`
    fn notify(&mut self, event: &str, elapsed: Duration);
}

/// Anything that can push its notifications into a sink
pub trait EventSource {
    /// Deliver pending notifications to `sink`, returning how many were sent
    fn emit(&mut self, sink: &mut dyn EventSink) -> usize;
}

/// Run `f` as one occurrence of `event`, reporting its duration to `sink`
///
/// # Example
/// ```
/// use event_prof::profiler::{measure, EventSink};
/// use std::time::Duration;
///
/// struct Counter(u32);
/// impl EventSink for Counter {
///     fn notify(&mut self, _event: &str, _elapsed: Duration) {
///         self.0 += 1;
///     }
/// }
///
/// let mut counter = Counter(0);
/// let rows = measure(&mut counter, "sql.query", || 42);
/// assert_eq!(rows, 42);
/// assert_eq!(counter.0, 1);
/// ```
pub fn measure<S, F, R>(sink: &mut S, event: &str, f: F) -> R
where
    S: EventSink + ?Sized,
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    sink.notify(event, start.elapsed());
    result
}

/// In-memory event buffer, drained on `emit`
#[derive(Debug, Clone, Default)]
pub struct RecordedEvents {
    events: Vec<(String, Duration)>,
}

impl RecordedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: impl Into<String>, elapsed: Duration) {
        self.events.push((event.into(), elapsed));
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for RecordedEvents {
    fn emit(&mut self, sink: &mut dyn EventSink) -> usize {
        let count = self.events.len();
        for (event, elapsed) in self.events.drain(..) {
            sink.notify(&event, elapsed);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect(Vec<(String, Duration)>);

    impl EventSink for Collect {
        fn notify(&mut self, event: &str, elapsed: Duration) {
            self.0.push((event.to_string(), elapsed));
        }
    }

    #[test]
    fn test_recorded_events_drain() {
        let mut source = RecordedEvents::new();
        source.push("sql.query", Duration::from_millis(3));
        source.push("factory.create", Duration::ZERO);

        let mut sink = Collect::default();
        assert_eq!(source.emit(&mut sink), 2);
        assert!(source.is_empty());
        assert_eq!(sink.0[0], ("sql.query".to_string(), Duration::from_millis(3)));
    }

    #[test]
    fn test_measure_reports_event_name() {
        let mut sink = Collect::default();
        measure(&mut sink, "cache.read", || ());
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].0, "cache.read");
    }
}
