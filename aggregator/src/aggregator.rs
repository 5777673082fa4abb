//! The streaming aggregation engine.
//!
//! One [`Aggregator`] instance serves one logical stream of records. It is
//! synchronous and single-writer: `process` never blocks, performs no I/O,
//! and must be externally serialized if the host receives records
//! concurrently. Anomalies never surface as errors; they degrade to
//! pass-through or silent drops (capacity eviction, staleness sweep,
//! duplicate suppression).

use crate::config::AggregatorConfig;
use crate::group::Group;
use crate::lru::RecencyList;
use crate::metrics_defs::{
    DUPLICATE_COMPLETIONS, GROUPS_CREATED, GROUPS_EVICTED, GROUPS_FLUSHED, GROUPS_SWEPT,
    LIVE_GROUPS, RECORDS_PASSED_THROUGH,
};
use crate::record::{self, Record};
use shared::{counter, gauge};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Outcome of feeding one record through the aggregator.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    /// The record was buffered into a group (or dropped as a duplicate
    /// completion signal); nothing goes downstream.
    Suppress,
    /// The record carries no usable correlation key and bypasses
    /// aggregation; forward it unchanged.
    PassThrough(Record),
    /// A group completed; forward the combined record.
    Emit(Record),
}

pub struct Aggregator {
    config: AggregatorConfig,
    groups: HashMap<String, Group>,
    recency: RecencyList,
    records_since_sweep: u64,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Aggregator {
            groups: HashMap::with_capacity(config.max_groups),
            recency: RecencyList::new(),
            records_since_sweep: 0,
            config,
        }
    }

    /// Number of currently resident groups.
    pub fn live_groups(&self) -> usize {
        self.groups.len()
    }

    /// Feeds one record through the aggregator.
    ///
    /// `timestamp` is wall-clock seconds; it drives the staleness sweep
    /// and per-group recency. This call never fails and never blocks.
    pub fn process(&mut self, record: Record, timestamp: u64) -> Decision {
        // The sweep runs every `sweep_interval` records regardless of
        // which keys they touch, so its latency is traffic-dependent: a
        // stale group is gone within `sweep_interval` further records,
        // not within a fixed number of seconds.
        self.records_since_sweep += 1;
        if self.records_since_sweep >= self.config.sweep_interval {
            self.sweep(timestamp);
            self.records_since_sweep = 0;
        }

        let Some(key) = record::correlation_key(&record, &self.config.key_field).map(str::to_owned)
        else {
            counter!(RECORDS_PASSED_THROUGH).increment(1);
            return Decision::PassThrough(record);
        };

        let message = record::message_text(&record, &self.config.message_field).to_owned();
        let is_completion = message.contains(&self.config.completion_marker);

        if !self.groups.contains_key(&key) && self.groups.len() >= self.config.max_groups {
            self.evict_oldest();
        }

        match self.groups.entry(key.clone()) {
            Entry::Occupied(entry) => {
                self.recency.touch(entry.key());
            }
            Entry::Vacant(entry) => {
                self.recency.push(entry.key());
                counter!(GROUPS_CREATED).increment(1);
                entry.insert(Group::new(timestamp));
            }
        }
        gauge!(LIVE_GROUPS).set(self.groups.len() as f64);

        let Some(group) = self.groups.get_mut(&key) else {
            // Unreachable: the key was inserted or found just above.
            return Decision::Suppress;
        };
        group.last_seen = timestamp;

        if group.completed {
            if is_completion {
                // The group flushed already; this is a repeat signal.
                counter!(DUPLICATE_COMPLETIONS).increment(1);
                return Decision::Suppress;
            }
            // A normal record after a flush starts a fresh request on
            // the same key.
            group.revive();
        }

        group.apply(&record, &message, &self.config.status_fields);

        if !is_completion {
            return Decision::Suppress;
        }

        let combined = group.flush(
            &self.config.key_field,
            &key,
            &self.config.message_field,
            &self.config.status_fields,
        );
        counter!(GROUPS_FLUSHED).increment(1);
        Decision::Emit(combined)
    }

    /// Drops the least-recently-touched group to make room for a new one.
    /// The group's buffered messages are discarded, not flushed.
    fn evict_oldest(&mut self) {
        if let Some(oldest) = self.recency.pop_oldest() {
            self.groups.remove(&oldest);
            counter!(GROUPS_EVICTED).increment(1);
            debug!(key = %oldest, "buffer at capacity, dropped least-recently-touched group");
        }
    }

    /// Drops every group untouched for longer than the staleness
    /// threshold. Silent: nothing is emitted for swept groups.
    fn sweep(&mut self, now: u64) {
        let stale: Vec<String> = self
            .groups
            .iter()
            .filter(|(_, group)| now.saturating_sub(group.last_seen) > self.config.stale_after_secs)
            .map(|(key, _)| key.clone())
            .collect();
        if stale.is_empty() {
            return;
        }

        for key in &stale {
            self.groups.remove(key);
            self.recency.remove(key);
        }
        counter!(GROUPS_SWEPT).increment(stale.len() as u64);
        gauge!(LIVE_GROUPS).set(self.groups.len() as f64);
        debug!(count = stale.len(), "dropped stale groups");
    }
}
