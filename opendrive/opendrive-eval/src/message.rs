//! Diagnostic messages of the evaluator and the builders.
//!
//! Every defect found anywhere in the pipeline is reported as a
//! [`DataQualityMessage`] with a stable [`MessageCode`] the test suite and
//! downstream tooling bind to.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational note.
    Info,
    /// Defect that was reported or repaired without data loss concerns.
    Warning,
    /// Defect that lost data during repair.
    Error,
    /// Unrecoverable defect; the input produces no output.
    FatalError,
}

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageCode {
    /// Road without any plan-view geometry.
    NoPlanViewGeometry,
    /// Road without any lane section.
    NoLaneSections,
    /// Required identifier is blank.
    BlankRequiredId,
    /// Required numeric attribute is NaN or infinite.
    NonFiniteRequiredValue,
    /// Lane link carries a sentinel value.
    SentinelLaneLink,
    /// A referenced element does not exist.
    UnresolvedReference,
    /// Declared elevation profile without entries.
    NoElevationProfileElements,
    /// An `s`-keyed list violates strict monotonicity.
    NonStrictlySortedList,
    /// A list is merely out of order (no duplicates).
    NonSortedList,
    /// A value is inconsistent with the rest of the model.
    UnexpectedValue,
    /// A blank or non-finite optional attribute was cleared.
    EmptyValueForOptionalAttribute,
    /// XML could not be parsed at all.
    MalformedXml,
    /// No reader adapter for the declared schema version.
    NoDedicatedReaderAvailable,
    /// No bundled schema for the declared schema version.
    NoDedicatedSchemaAvailable,
    /// Plan-view segments do not butt within tolerance.
    ReferenceLineDiscontinuity,
    /// Linked road endpoints do not meet within tolerance.
    UnclosedLaneBoundary,
    /// Numerical failure during geometry construction.
    NumericalFailure,
    /// The run was cancelled by the host.
    Cancelled,
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Structured identifier of the model element a message refers to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceId {
    segments: Vec<String>,
}

impl SourceId {
    /// An id with no segments (whole dataset).
    #[must_use]
    pub fn dataset() -> Self {
        Self::default()
    }

    /// Start from a road.
    #[must_use]
    pub fn road(id: &str) -> Self {
        Self {
            segments: vec![format!("road {id}")],
        }
    }

    /// Start from a junction.
    #[must_use]
    pub fn junction(id: &str) -> Self {
        Self {
            segments: vec![format!("junction {id}")],
        }
    }

    /// Append a lane-section index.
    #[must_use]
    pub fn lane_section(mut self, index: usize) -> Self {
        self.segments.push(format!("laneSection {index}"));
        self
    }

    /// Append a lane id.
    #[must_use]
    pub fn lane(mut self, id: i32) -> Self {
        self.segments.push(format!("lane {id}"));
        self
    }

    /// Append a free-form element segment.
    #[must_use]
    pub fn element(mut self, name: &str) -> Self {
        self.segments.push(name.to_string());
        self
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "dataset");
        }
        write!(f, "{}", self.segments.join(" / "))
    }
}

/// One diagnostic finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityMessage {
    /// Stable code.
    pub code: MessageCode,
    /// Human-readable description.
    pub description: String,
    /// The element the message refers to.
    pub source_id: SourceId,
    /// Severity.
    pub severity: Severity,
    /// Whether an automatic repair was applied.
    pub was_fixed: bool,
    /// Optional structured context (counts, values).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<BTreeMap<String, String>>,
}

impl DataQualityMessage {
    /// A fatal message (never fixed).
    #[must_use]
    pub fn fatal(code: MessageCode, source_id: SourceId, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            source_id,
            severity: Severity::FatalError,
            was_fixed: false,
            location: None,
        }
    }

    /// A repaired-defect message.
    #[must_use]
    pub fn fixed(
        code: MessageCode,
        source_id: SourceId,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code,
            description: description.into(),
            source_id,
            severity,
            was_fixed: true,
            location: None,
        }
    }

    /// A reported-but-unfixed defect message.
    #[must_use]
    pub fn reported(
        code: MessageCode,
        source_id: SourceId,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code,
            description: description.into(),
            source_id,
            severity,
            was_fixed: false,
            location: None,
        }
    }

    /// Attach a structured context entry.
    #[must_use]
    pub fn with_location(mut self, key: &str, value: impl ToString) -> Self {
        self.location
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }
}

/// An ordered collection of messages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageList {
    messages: Vec<DataQualityMessage>,
}

impl MessageList {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&mut self, message: DataQualityMessage) {
        self.messages.push(message);
    }

    /// Append all messages of another list, preserving order.
    pub fn merge(&mut self, other: MessageList) {
        self.messages.extend(other.messages);
    }

    /// All messages in order.
    #[must_use]
    pub fn messages(&self) -> &[DataQualityMessage] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of fatal messages.
    #[must_use]
    pub fn num_fatal(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::FatalError)
            .count()
    }

    /// Whether any fatal message is present.
    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.num_fatal() > 0
    }

    /// Number of messages carrying a given code.
    #[must_use]
    pub fn count_code(&self, code: MessageCode) -> usize {
        self.messages.iter().filter(|m| m.code == code).count()
    }
}

impl IntoIterator for MessageList {
    type Item = DataQualityMessage;
    type IntoIter = std::vec::IntoIter<DataQualityMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_display() {
        let id = SourceId::road("12").lane_section(0).lane(-1);
        assert_eq!(id.to_string(), "road 12 / laneSection 0 / lane -1");
        assert_eq!(SourceId::dataset().to_string(), "dataset");
    }

    #[test]
    fn test_message_list_counters() {
        let mut list = MessageList::new();
        list.push(DataQualityMessage::fatal(
            MessageCode::NoPlanViewGeometry,
            SourceId::road("1"),
            "road has no plan-view geometry",
        ));
        list.push(DataQualityMessage::fixed(
            MessageCode::NonStrictlySortedList,
            SourceId::road("1").element("elevationProfile"),
            Severity::Warning,
            "dropped 1 entry",
        ));

        assert_eq!(list.len(), 2);
        assert_eq!(list.num_fatal(), 1);
        assert_eq!(list.count_code(MessageCode::NonStrictlySortedList), 1);
        assert!(list.has_fatal());
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut a = MessageList::new();
        a.push(DataQualityMessage::reported(
            MessageCode::UnexpectedValue,
            SourceId::dataset(),
            Severity::Info,
            "first",
        ));
        let mut b = MessageList::new();
        b.push(DataQualityMessage::reported(
            MessageCode::UnexpectedValue,
            SourceId::dataset(),
            Severity::Info,
            "second",
        ));
        a.merge(b);
        assert_eq!(a.messages()[0].description, "first");
        assert_eq!(a.messages()[1].description, "second");
    }

    #[test]
    fn test_serialization_shape() {
        let message = DataQualityMessage::fixed(
            MessageCode::NonSortedList,
            SourceId::road("7"),
            Severity::Warning,
            "sorted lane sections",
        )
        .with_location("count", 3);
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("NonSortedList"));
        assert!(json.contains("\"was_fixed\":true"));
        assert!(json.contains("\"count\":\"3\""));
    }
}
