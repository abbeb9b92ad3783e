//! Execution Timeline
//!
//! Records which procedure entries were skipped, started, completed or
//! failed during one run, for the end-of-run summary.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Type of timeline event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventType {
    /// Entry passed over while seeking the resume target
    Skipped,
    /// Step lifecycle started
    Started,
    /// Step lifecycle finished
    Completed,
    /// Step lifecycle ended with an error or an abort
    Failed,
}

/// A single event in the execution timeline.
#[derive(Debug, Clone)]
pub struct TimelineEvent {
    /// Name of the procedure entry
    pub step: String,
    /// Type of event
    pub event_type: EventType,
    /// When the event occurred
    pub timestamp: Instant,
}

/// Tracks the progress of a release run.
#[derive(Debug, Clone)]
pub struct ExecutionTimeline {
    events: Vec<TimelineEvent>,
    start_time: Instant,
}

impl ExecutionTimeline {
    /// Creates a new timeline starting now.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            start_time: Instant::now(),
        }
    }

    /// Records an event for a step.
    pub fn add_event(&mut self, step: impl Into<String>, event_type: EventType) {
        self.events.push(TimelineEvent {
            step: step.into(),
            event_type,
            timestamp: Instant::now(),
        });
    }

    /// Returns all recorded events.
    pub fn get_events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Returns the total elapsed time since timeline creation.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Names of steps whose lifecycle was started, in run order.
    pub fn executed(&self) -> Vec<&str> {
        self.names_with(EventType::Started)
    }

    /// Names of skipped entries, in procedure order.
    pub fn skipped(&self) -> Vec<&str> {
        self.names_with(EventType::Skipped)
    }

    /// Names of steps that finished their lifecycle.
    pub fn completed(&self) -> Vec<&str> {
        self.names_with(EventType::Completed)
    }

    fn names_with(&self, event_type: EventType) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.event_type == event_type)
            .map(|e| e.step.as_str())
            .collect()
    }

    /// Returns how long each completed or failed step took.
    pub fn get_durations(&self) -> HashMap<String, Duration> {
        let mut starts: HashMap<&str, Instant> = HashMap::new();
        let mut durations = HashMap::new();

        for event in &self.events {
            match event.event_type {
                EventType::Started => {
                    starts.insert(event.step.as_str(), event.timestamp);
                }
                EventType::Completed | EventType::Failed => {
                    if let Some(start) = starts.get(event.step.as_str()) {
                        durations.insert(
                            event.step.clone(),
                            event.timestamp.duration_since(*start),
                        );
                    }
                }
                EventType::Skipped => {}
            }
        }

        durations
    }

    /// Renders a short report of the run.
    pub fn summary(&self) -> String {
        let mut output = format!(
            "Steps run: {}, skipped: {}\nTotal time: {}\n",
            self.executed().len(),
            self.skipped().len(),
            format_duration(self.elapsed())
        );

        let durations = self.get_durations();
        for name in self.executed() {
            if let Some(duration) = durations.get(name) {
                output.push_str(&format!("  {:14} {}\n", name, format_duration(*duration)));
            }
        }
        output
    }
}

impl Default for ExecutionTimeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a duration as `1h 02m 03s`, `2m 03s` or `3s`.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_timeline_creation() {
        let timeline = ExecutionTimeline::new();
        assert!(timeline.get_events().is_empty());
    }

    #[test]
    fn test_executed_and_skipped() {
        let mut timeline = ExecutionTimeline::new();
        timeline.add_event("a", EventType::Skipped);
        timeline.add_event("b", EventType::Started);
        timeline.add_event("b", EventType::Completed);
        timeline.add_event("c", EventType::Started);
        timeline.add_event("c", EventType::Failed);

        assert_eq!(timeline.skipped(), vec!["a"]);
        assert_eq!(timeline.executed(), vec!["b", "c"]);
        assert_eq!(timeline.completed(), vec!["b"]);
    }

    #[test]
    fn test_get_durations() {
        let mut timeline = ExecutionTimeline::new();
        timeline.add_event("step1", EventType::Started);
        thread::sleep(Duration::from_millis(20));
        timeline.add_event("step1", EventType::Completed);

        let durations = timeline.get_durations();
        assert!(durations["step1"] >= Duration::from_millis(20));
    }

    #[test]
    fn test_get_durations_only_started() {
        let mut timeline = ExecutionTimeline::new();
        timeline.add_event("step1", EventType::Started);
        assert!(timeline.get_durations().is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let mut timeline = ExecutionTimeline::new();
        timeline.add_event("a", EventType::Skipped);
        timeline.add_event("b", EventType::Started);
        timeline.add_event("b", EventType::Completed);

        let summary = timeline.summary();
        assert!(summary.contains("Steps run: 1, skipped: 1"));
        assert!(summary.contains("  b"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(3)), "3s");
        assert_eq!(format_duration(Duration::from_secs(123)), "2m 03s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h 02m 03s");
    }

    #[test]
    fn test_timeline_default() {
        let timeline = ExecutionTimeline::default();
        assert!(timeline.executed().is_empty());
    }
}
