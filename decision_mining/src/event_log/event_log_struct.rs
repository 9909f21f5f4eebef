use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::constants::ACTIVITY_NAME;

///
/// Possible attribute values according to the XES Standard
///
/// Tip: If you know the expected `AttributeValue` type, make use of the `try_as_xxx` functions (e.g., [`AttributeValue::try_as_string`])
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "content")]
pub enum AttributeValue {
    /// String values
    String(String),
    #[serde(with = "ts_milliseconds")]
    /// DateTime values
    Date(DateTime<Utc>),
    /// Integer values
    Int(i64),
    /// Float values
    Float(f64),
    /// Boolean values
    Boolean(bool),
    /// Used to represent invalid values (e.g., DateTime which could not be parsed)
    None(),
}

impl AttributeValue {
    ///
    /// Try to get attribute value as String
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::String`] and `None` otherwise
    ///
    pub fn try_as_string(&self) -> Option<&String> {
        match self {
            AttributeValue::String(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get attribute value as date
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::Date`] and `None` otherwise
    ///
    pub fn try_as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            AttributeValue::Date(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get attribute value as int
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::Int`] and `None` otherwise
    ///
    pub fn try_as_int(&self) -> Option<&i64> {
        match self {
            AttributeValue::Int(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get attribute value as float
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::Float`] and `None` otherwise
    ///
    pub fn try_as_float(&self) -> Option<&f64> {
        match self {
            AttributeValue::Float(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get attribute value as bool
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::Boolean`] and `None` otherwise
    ///
    pub fn try_as_bool(&self) -> Option<&bool> {
        match self {
            AttributeValue::Boolean(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
///
/// Attribute made up of the key and value
///
pub struct Attribute {
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: AttributeValue,
}

impl Attribute {
    ///
    /// Helper to create a new attribute
    ///
    pub fn new(key: String, attribute_val: AttributeValue) -> Self {
        Self {
            key,
            value: attribute_val,
        }
    }
}

///
/// Attributes are [`Vec`]s of [`Attribute`]s
///
/// See the [`XESEditableAttribute`] trait for convenient functions to add or look up attributes by key.
///
pub type Attributes = Vec<Attribute>;

///
/// Trait to easily add and look up attributes
///
pub trait XESEditableAttribute {
    ///
    /// Add a new attribute (with key and value)
    ///
    /// Note: Does _not_ check if attribute was already present and does _not_ sort attributes wrt. key.
    ///
    fn add_to_attributes(&mut self, key: String, value: AttributeValue);
    ///
    /// Get an attribute by key
    ///
    /// _Complexity_: Does linear lookup (i.e., in O(n)).
    fn get_by_key(&self, key: &str) -> Option<&Attribute>;
}

impl XESEditableAttribute for Attributes {
    fn add_to_attributes(&mut self, key: String, value: AttributeValue) {
        self.push(Attribute::new(key, value));
    }

    fn get_by_key(&self, key: &str) -> Option<&Attribute> {
        self.iter().find(|attr| attr.key == key)
    }
}

///
/// An event consists of multiple (event) attributes ([`Attributes`])
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Event attributes
    pub attributes: Attributes,
}

impl Event {
    /// Create a new event with the provided activity
    ///
    /// Implicitly assumes usage of the concept XES extension (i.e., uses [`ACTIVITY_NAME`] as key)
    pub fn new(activity: String) -> Self {
        Event {
            attributes: vec![Attribute::new(
                ACTIVITY_NAME.to_string(),
                AttributeValue::String(activity),
            )],
        }
    }

    /// The activity label of this event (the [`ACTIVITY_NAME`] attribute), trimmed of
    /// surrounding whitespace
    ///
    /// Returns `None` if the event carries no string-valued [`ACTIVITY_NAME`] attribute.
    pub fn activity(&self) -> Option<&str> {
        self.attributes
            .get_by_key(ACTIVITY_NAME)
            .and_then(|a| a.value.try_as_string())
            .map(|s| s.trim())
    }
}

///
/// A trace consists of a list of events and trace attributes (See also [`Event`] and [`Attributes`])
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trace {
    /// Trace-level attributes
    pub attributes: Attributes,
    /// Events contained in trace
    pub events: Vec<Event>,
}

///
/// Event log consisting of a list of [`Trace`]s and log [`Attributes`]
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLog {
    /// Top-level attributes
    pub attributes: Attributes,
    /// Traces contained in log
    pub traces: Vec<Trace>,
}

impl EventLog {
    /// Construct an [`EventLog`] from plain activity sequences
    ///
    /// Each inner slice becomes one [`Trace`] of [`Event`]s carrying only an activity label.
    pub fn from_activity_traces<S: AsRef<str>>(traces: &[Vec<S>]) -> Self {
        EventLog {
            attributes: Attributes::new(),
            traces: traces
                .iter()
                .map(|acts| Trace {
                    attributes: Attributes::new(),
                    events: acts
                        .iter()
                        .map(|a| Event::new(a.as_ref().to_string()))
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_activity_is_trimmed() {
        let e = Event::new(" A_Submitted ".to_string());
        assert_eq!(e.activity(), Some("A_Submitted"));

        let no_activity = Event {
            attributes: vec![Attribute::new(
                "org:resource".to_string(),
                AttributeValue::String("clerk".to_string()),
            )],
        };
        assert_eq!(no_activity.activity(), None);
    }

    #[test]
    fn log_from_activity_traces() {
        let log = EventLog::from_activity_traces(&[vec!["A", "B"], vec!["A", "C"]]);
        assert_eq!(log.traces.len(), 2);
        assert_eq!(log.traces[0].events[1].activity(), Some("B"));
        assert_eq!(log.traces[1].events[1].activity(), Some("C"));
    }
}
