use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded step of a crew run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Position of the task in the crew (0-based)
    pub task_index: usize,
    pub task:       String,
    pub agent:      String,
    pub event:      String,
    pub data:       String,
    pub timestamp:  DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self { Self { entries: Vec::new() } }

    pub fn record(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all entries for a given task name
    pub fn for_task(&self, task: &str) -> Vec<&TraceEntry> {
        self.entries.iter().filter(|e| e.task == task).collect()
    }

    /// Returns all entries with the given event name
    pub fn events(&self, event: &str) -> Vec<&TraceEntry> {
        self.entries.iter().filter(|e| e.event == event).collect()
    }

    /// Serializes the trace to a pretty-printed JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.entries)
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// Prints a human-readable trace table to stdout
    pub fn print(&self) {
        println!("\n{:<4} {:<22} {:<16} {}", "#", "task", "event", "data");
        println!("{}", "─".repeat(80));
        for e in &self.entries {
            println!("{:<4} {:<22} {:<16} {}", e.task_index, e.task, e.event,
                     &e.data.chars().take(36).collect::<String>());
        }
    }
}
