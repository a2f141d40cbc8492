//! Workload configuration loading.
//!
//! Every section is optional; missing values fall back to the built-in
//! workload (four producers at 350/350/600/850 ms, a 2 400 ms hyperperiod
//! timer and a five-slot queue).
//!
//! The expected YAML structure is:
//! ```yaml
//! queue:
//!   capacity: 5
//! timer:
//!   name: Timer
//!   period_ms: 2400
//!   auto_reload: true
//! dispatcher:
//!   name: Rx
//!   priority: 5
//! producers:
//!   - { name: T1X, tag: task1, period_ms: 350, priority: 1 }
//!   - { name: T2X, tag: task2, period_ms: 350, priority: 2 }
//!   - { name: T3X, tag: task3, period_ms: 600, priority: 3 }
//!   - { name: T4X, tag: task4, period_ms: 850, priority: 4 }
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::kernel::Priority;
use crate::message::Tag;
use crate::producer::PeriodicProducer;
use crate::queue::DEFAULT_QUEUE_CAPACITY;

// ── Sections ──────────────────────────────────────────────────────────────────

/// Queue sizing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    /// Number of messages the queue can hold at once.
    ///
    /// Not range-checked here: an unusable capacity is reported by queue
    /// creation at start-up.
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// The recurring hyperperiod timer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimerConfig {
    pub name: String,
    pub period_ms: u64,
    pub auto_reload: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            name: String::from("Timer"),
            period_ms: 2_400,
            auto_reload: true,
        }
    }
}

impl TimerConfig {
    /// Expiry period as a `Duration`.
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

/// The consumer task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    pub name: String,
    pub priority: u8,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            name: String::from("Rx"),
            priority: 5,
        }
    }
}

/// One periodic producer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProducerConfig {
    pub name: String,
    pub tag: Tag,
    pub period_ms: u64,
    #[serde(default)]
    pub priority: u8,
}

impl ProducerConfig {
    fn new(name: &str, tag: Tag, period_ms: u64, priority: u8) -> Self {
        Self {
            name: name.to_string(),
            tag,
            period_ms,
            priority,
        }
    }

    /// Build the runtime producer for this entry.
    pub fn to_producer(&self) -> PeriodicProducer {
        PeriodicProducer::new(
            self.name.clone(),
            Duration::from_millis(self.period_ms),
            self.tag,
            Priority(self.priority),
        )
    }
}

/// Producers of the built-in workload.
fn default_producers() -> Vec<ProducerConfig> {
    vec![
        ProducerConfig::new("T1X", Tag::Task1, 350, 1),
        ProducerConfig::new("T2X", Tag::Task2, 350, 2),
        ProducerConfig::new("T3X", Tag::Task3, 600, 3),
        ProducerConfig::new("T4X", Tag::Task4, 850, 4),
    ]
}

// ── WorkloadConfig ────────────────────────────────────────────────────────────

/// Complete description of the workload started by
/// [`workload::start`](crate::workload::start).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkloadConfig {
    pub queue: QueueConfig,
    pub timer: TimerConfig,
    pub dispatcher: DispatcherConfig,
    pub producers: Vec<ProducerConfig>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            queue: QueueConfig::default(),
            timer: TimerConfig::default(),
            dispatcher: DispatcherConfig::default(),
            producers: default_producers(),
        }
    }
}

impl WorkloadConfig {
    /// Parse and validate the YAML file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, the YAML is structurally
    /// invalid, or [`validate`](Self::validate) rejects it.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading workload configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Invalid workload configuration: {}", path.display()))
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document means "all defaults".
        let config: WorkloadConfig = if content.trim().is_empty() {
            WorkloadConfig::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        config.validate()?;

        for p in &config.producers {
            debug!(
                "  Producer: {} | Tag: {} | Period: {}ms | Priority: {}",
                p.name, p.tag, p.period_ms, p.priority
            );
        }

        Ok(config)
    }

    /// Reject configurations the workload cannot run.
    ///
    /// A dispatcher that does not outrank every producer is accepted but
    /// warned about: the queue then fills while the dispatcher waits to run.
    pub fn validate(&self) -> Result<()> {
        if self.producers.is_empty() {
            bail!("at least one producer is required");
        }

        for p in &self.producers {
            if p.name.is_empty() {
                bail!("producer with tag '{}' has no name", p.tag);
            }
            if p.period_ms == 0 {
                bail!("producer '{}' has a zero period", p.name);
            }
        }

        if let Some(top) = self.producers.iter().max_by_key(|p| p.priority) {
            if top.priority >= self.dispatcher.priority {
                warn!(
                    dispatcher_priority = self.dispatcher.priority,
                    producer = %top.name,
                    producer_priority = top.priority,
                    "dispatcher does not outrank every producer; queue may fill"
                );
            }
        }

        Ok(())
    }

    /// Runtime producers in configuration order.
    pub fn producers(&self) -> Vec<PeriodicProducer> {
        self.producers.iter().map(ProducerConfig::to_producer).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults_match_the_built_in_workload() {
        let cfg = WorkloadConfig::default();
        assert_eq!(cfg.queue.capacity, 5);
        assert_eq!(cfg.timer.period_ms, 2_400);
        assert!(cfg.timer.auto_reload);
        assert_eq!(cfg.dispatcher.priority, 5);

        let periods: Vec<u64> = cfg.producers.iter().map(|p| p.period_ms).collect();
        assert_eq!(periods, vec![350, 350, 600, 850]);
        let tags: Vec<Tag> = cfg.producers.iter().map(|p| p.tag).collect();
        assert_eq!(tags, vec![Tag::Task1, Tag::Task2, Tag::Task3, Tag::Task4]);
        let prios: Vec<u8> = cfg.producers.iter().map(|p| p.priority).collect();
        assert_eq!(prios, vec![1, 2, 3, 4]);
        cfg.validate().unwrap();
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/workload.yaml");
        let cfg = WorkloadConfig::load_from_file(&path).unwrap();
        assert_eq!(cfg, WorkloadConfig::default());
    }

    #[test]
    fn load_full_yaml() {
        let yaml = r#"
queue:
  capacity: 8
timer:
  name: Hyper
  period_ms: 1200
  auto_reload: false
dispatcher:
  name: Consumer
  priority: 9
producers:
  - { name: A, tag: task2, period_ms: 100, priority: 3 }
  - { name: B, tag: task4, period_ms: 250, priority: 4 }
"#;
        let f = yaml_tempfile(yaml);
        let cfg = WorkloadConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.queue.capacity, 8);
        assert_eq!(cfg.timer.name, "Hyper");
        assert_eq!(cfg.timer.period(), Duration::from_millis(1_200));
        assert!(!cfg.timer.auto_reload);
        assert_eq!(cfg.dispatcher.name, "Consumer");
        assert_eq!(cfg.producers.len(), 2);
        assert_eq!(cfg.producers[1].tag, Tag::Task4);

        let producers = cfg.producers();
        assert_eq!(producers[0].name, "A");
        assert_eq!(producers[0].period, Duration::from_millis(100));
        assert_eq!(producers[0].priority, Priority(3));
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let cfg = WorkloadConfig::from_yaml("queue:\n  capacity: 2\n").unwrap();
        assert_eq!(cfg.queue.capacity, 2);
        assert_eq!(cfg.timer, TimerConfig::default());
        assert_eq!(cfg.producers.len(), 4);
    }

    #[test]
    fn empty_document_is_all_defaults() {
        assert_eq!(
            WorkloadConfig::from_yaml("  \n").unwrap(),
            WorkloadConfig::default()
        );
    }

    #[test]
    fn missing_file_returns_error() {
        let result = WorkloadConfig::load_from_file(Path::new("/nonexistent/workload.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(WorkloadConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let yaml = "producers:\n  - { name: X, tag: task9, period_ms: 100 }\n";
        assert!(WorkloadConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(WorkloadConfig::from_yaml("queue:\n  size: 3\n").is_err());
    }

    #[test]
    fn zero_period_is_rejected() {
        let yaml = "producers:\n  - { name: X, tag: task1, period_ms: 0 }\n";
        let err = WorkloadConfig::from_yaml(yaml).unwrap_err();
        assert!(format!("{err:#}").contains("zero period"));
    }

    #[test]
    fn empty_producer_list_is_rejected() {
        assert!(WorkloadConfig::from_yaml("producers: []\n").is_err());
    }

    #[test]
    fn low_dispatcher_priority_is_only_a_warning() {
        let yaml = "dispatcher:\n  priority: 1\n";
        let cfg = WorkloadConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.dispatcher.priority, 1);
    }
}
