//! Metrics definitions for the aggregator.

use shared::metrics_defs::{MetricDef, MetricType};

pub const RECORDS_PASSED_THROUGH: MetricDef = MetricDef {
    name: "aggregator.records.passed_through",
    metric_type: MetricType::Counter,
    description: "Records forwarded unaggregated due to a missing or invalid correlation key",
};

pub const GROUPS_CREATED: MetricDef = MetricDef {
    name: "aggregator.groups.created",
    metric_type: MetricType::Counter,
    description: "Groups created for a previously unseen correlation key",
};

pub const GROUPS_FLUSHED: MetricDef = MetricDef {
    name: "aggregator.groups.flushed",
    metric_type: MetricType::Counter,
    description: "Groups flushed as a combined record on a completion signal",
};

pub const GROUPS_EVICTED: MetricDef = MetricDef {
    name: "aggregator.groups.evicted",
    metric_type: MetricType::Counter,
    description: "Incomplete groups dropped because the buffer was at capacity",
};

pub const GROUPS_SWEPT: MetricDef = MetricDef {
    name: "aggregator.groups.swept",
    metric_type: MetricType::Counter,
    description: "Groups dropped by the staleness sweep",
};

pub const DUPLICATE_COMPLETIONS: MetricDef = MetricDef {
    name: "aggregator.completions.duplicate",
    metric_type: MetricType::Counter,
    description: "Completion signals suppressed because the group had already flushed",
};

pub const LIVE_GROUPS: MetricDef = MetricDef {
    name: "aggregator.groups.live",
    metric_type: MetricType::Gauge,
    description: "Number of currently resident groups",
};

pub const ALL_METRICS: &[MetricDef] = &[
    RECORDS_PASSED_THROUGH,
    GROUPS_CREATED,
    GROUPS_FLUSHED,
    GROUPS_EVICTED,
    GROUPS_SWEPT,
    DUPLICATE_COMPLETIONS,
    LIVE_GROUPS,
];
