//! Plugin registry: name-keyed lookup for the three generator capabilities.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::domain::ports::{AnalyzerPlugin, ChartGenerator, PluginSet, ReportGenerator};

use super::charts::{
    ComparisonChart, LatencyChart, StrikesChart, ThroughputChart, TransactionsChart,
};
use super::reports::{ComplianceReport, DetailedReport, ExecutiveReport, StandardReport};

/// Registry of report generators, chart generators and analyzers.
///
/// Three independent namespaces, each last-writer-wins on name conflicts.
/// Constructed explicitly and shared by `Arc`; registration happens at
/// startup and is rare afterwards, lookups clone the `Arc` out under a
/// short read lock.
#[derive(Default)]
pub struct PluginRegistry {
    reports: RwLock<HashMap<String, Arc<dyn ReportGenerator>>>,
    charts: RwLock<HashMap<String, Arc<dyn ChartGenerator>>>,
    analyzers: RwLock<HashMap<String, Arc<dyn AnalyzerPlugin>>>,
}

impl PluginRegistry {
    /// Empty registry, no plugins registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in report and chart
    /// generators.
    pub fn with_builtins() -> Self {
        let registry = Self::new();

        registry.register_report("standard", Arc::new(StandardReport));
        registry.register_report("executive", Arc::new(ExecutiveReport));
        registry.register_report("detailed", Arc::new(DetailedReport));
        registry.register_report("compliance", Arc::new(ComplianceReport));

        registry.register_chart("throughput", Arc::new(ThroughputChart));
        registry.register_chart("latency", Arc::new(LatencyChart));
        registry.register_chart("strikes", Arc::new(StrikesChart));
        registry.register_chart("transactions", Arc::new(TransactionsChart));
        registry.register_chart("comparison", Arc::new(ComparisonChart));

        debug!("registered built-in plugins");
        registry
    }

    /// Register a report generator, replacing any prior one with the same
    /// name.
    pub fn register_report(&self, name: &str, generator: Arc<dyn ReportGenerator>) {
        self.reports
            .write()
            .expect("report registry lock poisoned")
            .insert(name.to_string(), generator);
    }

    pub fn register_chart(&self, name: &str, generator: Arc<dyn ChartGenerator>) {
        self.charts
            .write()
            .expect("chart registry lock poisoned")
            .insert(name.to_string(), generator);
    }

    pub fn register_analyzer(&self, name: &str, analyzer: Arc<dyn AnalyzerPlugin>) {
        self.analyzers
            .write()
            .expect("analyzer registry lock poisoned")
            .insert(name.to_string(), analyzer);
    }

    pub fn report(&self, name: &str) -> Option<Arc<dyn ReportGenerator>> {
        self.reports
            .read()
            .expect("report registry lock poisoned")
            .get(name)
            .cloned()
    }

    pub fn chart(&self, name: &str) -> Option<Arc<dyn ChartGenerator>> {
        self.charts
            .read()
            .expect("chart registry lock poisoned")
            .get(name)
            .cloned()
    }

    pub fn analyzer(&self, name: &str) -> Option<Arc<dyn AnalyzerPlugin>> {
        self.analyzers
            .read()
            .expect("analyzer registry lock poisoned")
            .get(name)
            .cloned()
    }

    /// Registered report generator names, sorted.
    pub fn report_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .reports
            .read()
            .expect("report registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Registered chart generator names, sorted.
    pub fn chart_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .charts
            .read()
            .expect("chart registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Install external plugin sets.
    ///
    /// Each set gets the registry handed to it and self-registers. A set
    /// that fails is logged and skipped; it never aborts installation of
    /// the remaining sets.
    pub fn install(&self, sets: &[Box<dyn PluginSet>]) {
        for set in sets {
            match set.register(self) {
                Ok(()) => debug!(plugin_set = set.name(), "installed plugin set"),
                Err(e) => {
                    warn!(plugin_set = set.name(), error = %e, "plugin set failed to install, skipping");
                }
            }
        }
    }
}
