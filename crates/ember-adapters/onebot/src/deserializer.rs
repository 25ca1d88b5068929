//! Raw-to-typed event conversion.
//!
//! The pipeline never decodes events itself; it asks an [`EventDeserializer`]
//! so that tests and alternative decoders can be swapped in.

use ember_core::{DeserializationError, RawEvent};

use crate::event::TypedEvent;
use crate::taxonomy::LeafTag;

/// Converts a classified raw event into its typed form.
pub trait EventDeserializer: Send + Sync {
    /// Builds the typed event for `leaf` from `raw`.
    ///
    /// # Errors
    ///
    /// [`DeserializationError::Malformed`] when required fields are missing or
    /// mistyped, [`DeserializationError::Unsupported`] for [`LeafTag::Unhandled`].
    fn deserialize(&self, raw: &RawEvent, leaf: LeafTag) -> Result<TypedEvent, DeserializationError>;
}

/// The default deserializer, backed by the serde derives on the event model.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerdeDeserializer;

impl EventDeserializer for SerdeDeserializer {
    fn deserialize(&self, raw: &RawEvent, leaf: LeafTag) -> Result<TypedEvent, DeserializationError> {
        TypedEvent::decode(raw, leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_deserializer_builds_request() {
        let raw = RawEvent::parse(
            r#"{"time":1,"self_id":2,"post_type":"request","request_type":"group",
                "sub_type":"invite","group_id":3,"user_id":4,"flag":"f"}"#,
        )
        .unwrap();

        match SerdeDeserializer.deserialize(&raw, LeafTag::GroupRequest).unwrap() {
            TypedEvent::GroupRequest(event) => {
                assert!(event.is_invite());
                assert_eq!(event.group_id, 3);
                assert_eq!(event.comment, "");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_serde_deserializer_reports_missing_fields() {
        let raw = RawEvent::parse(r#"{"post_type":"message","message_type":"private"}"#).unwrap();
        let err = SerdeDeserializer
            .deserialize(&raw, LeafTag::PrivateMessage)
            .unwrap_err();
        assert_eq!(err.leaf(), "private_message");
    }
}
