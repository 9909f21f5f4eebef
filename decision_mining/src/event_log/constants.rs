/// Common identifying field for event identities (i.e., activities)
///
/// _Note_: While the concept XES extension is the de-facto standard for identifying activity names,
/// some logs might not use `concept:name` or have events without a `concept:name` attribute.
pub const ACTIVITY_NAME: &str = "concept:name";
/// Prefix prepended to attribute keys when flattening event log to events only
pub const TRACE_PREFIX: &str = "case:";
/// Common identifying field for trace identities (i.e., trace IDs)
///
/// See also [`ACTIVITY_NAME`]
pub const TRACE_ID_NAME: &str = "concept:name";
/// Constructed combination of [`TRACE_PREFIX`] and [`TRACE_ID_NAME`]
pub const PREFIXED_TRACE_ID_NAME: &str = "case:concept:name";
/// Common identifying field for the (completion) timestamp of an event
pub const TIMESTAMP_NAME: &str = "time:timestamp";
/// Common identifying field for the start timestamp of an event
pub const START_TIMESTAMP_NAME: &str = "time:start_timestamp";
