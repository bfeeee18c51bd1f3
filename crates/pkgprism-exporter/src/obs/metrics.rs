//! Minimal Prometheus-compatible metrics registry.
//!
//! Counters carry dynamic labels backed by `DashMap`. Label sets are
//! flattened into sorted key vectors so output ordering is deterministic.
//! A counter is shared by `Arc` and may be registered in several registries;
//! every registry renders the same live values.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use pkgprism_core::error::{PkgPrismError, Result};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

#[derive(Debug)]
pub struct CounterVec {
    name: String,
    help: String,
    label_names: Vec<String>,
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    pub fn new(name: &str, help: &str, label_names: &[&str]) -> Result<Self> {
        if !valid_name(name) {
            return Err(PkgPrismError::InvalidMetric(format!("bad metric name: {name}")));
        }
        for l in label_names {
            if !valid_name(l) || l.contains(':') || l.starts_with("__") {
                return Err(PkgPrismError::InvalidMetric(format!("bad label name: {l}")));
            }
        }
        Ok(Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|l| l.to_string()).collect(),
            map: DashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) -> Result<()> {
        self.add(labels, 1)
    }

    /// Increment by an arbitrary value. Labels must be declared on the counter.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) -> Result<()> {
        if let Some((k, _)) = labels
            .iter()
            .find(|(k, _)| !self.label_names.iter().any(|n| n == k))
        {
            return Err(PkgPrismError::InvalidMetric(format!(
                "label {k} not declared on {}",
                self.name
            )));
        }
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();

        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
        Ok(())
    }

    /// Current value for a label set (order-insensitive), if it was ever touched.
    pub fn get(&self, labels: &[(&str, &str)]) -> Option<u64> {
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();
        self.map.get(&key).map(|c| c.load(Ordering::Relaxed))
    }

    /// Number of distinct label sets recorded.
    pub fn series_count(&self) -> usize {
        self.map.len()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, escape_help(&self.help));
        let _ = writeln!(out, "# TYPE {} counter", self.name);

        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| {
                let label_str = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                (label_str, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();

        for (label_str, val) in rows {
            if label_str.is_empty() {
                let _ = writeln!(out, "{} {}", self.name, val);
            } else {
                let _ = writeln!(out, "{}{{{}}} {}", self.name, label_str, val);
            }
        }
    }
}

/// Named collection of counters.
#[derive(Debug, Default)]
pub struct Registry {
    metrics: DashMap<String, Arc<CounterVec>>,
}

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide default registry. Created on first use, lives until exit.
    ///
    /// Library entry points take a registry handle instead of calling this;
    /// only the binary reaches for it.
    pub fn global() -> Arc<Registry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Registry::new())))
    }

    /// Attach a counter. Fails if a metric with that name is already present.
    pub fn register(&self, counter: Arc<CounterVec>) -> Result<()> {
        match self.metrics.entry(counter.name().to_string()) {
            dashmap::mapref::entry::Entry::Occupied(e) => {
                Err(PkgPrismError::MetricAlreadyRegistered(e.key().clone()))
            }
            dashmap::mapref::entry::Entry::Vacant(e) => {
                e.insert(counter);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<CounterVec>> {
        self.metrics.get(name).map(|m| Arc::clone(m.value()))
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Render every metric, sorted by name.
    pub fn render(&self) -> String {
        let mut metrics: Vec<Arc<CounterVec>> =
            self.metrics.iter().map(|m| Arc::clone(m.value())).collect();
        metrics.sort_by(|a, b| a.name().cmp(b.name()));

        let mut out = String::new();
        for m in metrics {
            m.render(&mut out);
        }
        out
    }

    /// Render the union of several registries.
    ///
    /// A counter shared by more than one registry is rendered once. Two
    /// different counters with the same name is a conflict.
    pub fn merge_render(registries: &[Arc<Registry>]) -> Result<String> {
        let mut picked: Vec<Arc<CounterVec>> = Vec::new();
        for reg in registries {
            for m in reg.metrics.iter() {
                let m = m.value();
                match picked.iter().find(|p| p.name() == m.name()) {
                    Some(p) if Arc::ptr_eq(p, m) => {}
                    Some(_) => {
                        return Err(PkgPrismError::MetricAlreadyRegistered(m.name().to_string()))
                    }
                    None => picked.push(Arc::clone(m)),
                }
            }
        }
        picked.sort_by(|a, b| a.name().cmp(b.name()));

        let mut out = String::new();
        for m in picked {
            m.render(&mut out);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(name: &str) -> Arc<CounterVec> {
        Arc::new(CounterVec::new(name, "test counter", &["kind", "id"]).unwrap())
    }

    #[test]
    fn render_sorts_labels_and_escapes() {
        let c = counter("things_total");
        c.inc(&[("kind", "a\"b"), ("id", "1")]).unwrap();
        c.inc(&[("id", "1"), ("kind", "a\"b")]).unwrap();

        let reg = Registry::new();
        reg.register(Arc::clone(&c)).unwrap();
        let out = reg.render();

        assert!(out.contains("# HELP things_total test counter\n"));
        assert!(out.contains("# TYPE things_total counter\n"));
        assert!(out.contains("things_total{id=\"1\",kind=\"a\\\"b\"} 2\n"));
    }

    #[test]
    fn undeclared_label_is_rejected() {
        let c = counter("things_total");
        let err = c.inc(&[("colour", "red")]).unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_METRIC");
        assert_eq!(c.series_count(), 0);
    }

    #[test]
    fn bad_names_are_rejected() {
        assert!(CounterVec::new("1bad", "", &[]).is_err());
        assert!(CounterVec::new("ok_total", "", &["__reserved"]).is_err());
        assert!(CounterVec::new("ok_total", "", &["a:b"]).is_err());
    }

    #[test]
    fn duplicate_registration_fails() {
        let reg = Registry::new();
        reg.register(counter("dup_total")).unwrap();
        let err = reg.register(counter("dup_total")).unwrap_err();
        assert_eq!(err.code().as_str(), "METRIC_CONFLICT");
    }

    #[test]
    fn merge_renders_shared_counter_once() {
        let shared = counter("shared_total");
        shared.inc(&[("kind", "x"), ("id", "1")]).unwrap();
        let a = Arc::new(Registry::new());
        let b = Arc::new(Registry::new());
        a.register(Arc::clone(&shared)).unwrap();
        b.register(Arc::clone(&shared)).unwrap();
        b.register(counter("other_total")).unwrap();

        let out = Registry::merge_render(&[a, b]).unwrap();
        assert_eq!(out.matches("# TYPE shared_total counter").count(), 1);
        assert!(out.contains("# TYPE other_total counter"));
        assert!(out.find("other_total").unwrap() < out.find("shared_total").unwrap());
    }

    #[test]
    fn merge_conflicting_names_errors() {
        let a = Arc::new(Registry::new());
        let b = Arc::new(Registry::new());
        a.register(counter("same_total")).unwrap();
        b.register(counter("same_total")).unwrap();

        assert!(Registry::merge_render(&[a, b]).is_err());
    }

    #[test]
    fn global_is_a_single_instance() {
        assert!(Arc::ptr_eq(&Registry::global(), &Registry::global()));
    }
}
