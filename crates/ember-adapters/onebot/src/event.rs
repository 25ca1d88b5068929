//! The closed set of typed OneBot events.
//!
//! [`TypedEvent`] has exactly one variant per taxonomy leaf. It implements
//! [`Dispatchable`] for [`OneBotHandler`], selecting the capability that
//! matches its variant, so the framework's single chain walk serves every
//! leaf.

use async_trait::async_trait;
use ember_core::{BotContext, DeserializationError, HandlerOutcome, RawEvent};
use ember_framework::Dispatchable;

use crate::handler::OneBotHandler;
use crate::model::*;
use crate::taxonomy::LeafTag;

macro_rules! typed_events {
    ($( $(#[$doc:meta])* $leaf:ident($ty:ty) => $capability:ident ),+ $(,)?) => {
        /// A deserialized OneBot event, tagged by its taxonomy leaf.
        #[derive(Debug, Clone)]
        pub enum TypedEvent {
            $( $(#[$doc])* $leaf($ty), )+
        }

        impl TypedEvent {
            /// Returns the leaf this event was built for.
            pub fn leaf(&self) -> LeafTag {
                match self {
                    $( TypedEvent::$leaf(_) => LeafTag::$leaf, )+
                }
            }

            /// Returns the header shared by every event.
            pub fn header(&self) -> &EventHeader {
                match self {
                    $( TypedEvent::$leaf(event) => event.header(), )+
                }
            }

            /// Decodes `raw` as the typed shape of `leaf`.
            pub fn decode(raw: &RawEvent, leaf: LeafTag) -> Result<Self, DeserializationError> {
                match leaf {
                    $(
                        LeafTag::$leaf => raw
                            .decode::<$ty>()
                            .map(TypedEvent::$leaf)
                            .map_err(|err| DeserializationError::malformed(leaf.name(), err)),
                    )+
                    LeafTag::Unhandled => Err(DeserializationError::unsupported(leaf.name())),
                }
            }
        }

        impl LeafTag {
            /// Returns the [`OneBotHandler`] method this leaf selects.
            ///
            /// `Unhandled` selects nothing.
            pub fn capability(self) -> Option<&'static str> {
                match self {
                    $( LeafTag::$leaf => Some(stringify!($capability)), )+
                    LeafTag::Unhandled => None,
                }
            }
        }

        #[async_trait]
        impl Dispatchable<dyn OneBotHandler> for TypedEvent {
            fn capability(&self) -> &'static str {
                match self {
                    $( TypedEvent::$leaf(_) => stringify!($capability), )+
                }
            }

            async fn invoke(&self, handler: &dyn OneBotHandler, ctx: &BotContext) -> HandlerOutcome {
                match self {
                    $( TypedEvent::$leaf(event) => handler.$capability(ctx, event).await, )+
                }
            }
        }
    };
}

typed_events! {
    /// A private message.
    PrivateMessage(PrivateMessageEvent) => on_private_message,
    /// A group message.
    GroupMessage(GroupMessageEvent) => on_group_message,
    /// A file uploaded to a group.
    GroupUpload(GroupUploadEvent) => on_group_upload,
    /// A group admin was set or unset.
    GroupAdmin(GroupAdminEvent) => on_group_admin,
    /// A member left or was removed from a group.
    GroupDecrease(GroupDecreaseEvent) => on_group_decrease,
    /// A member joined a group.
    GroupIncrease(GroupIncreaseEvent) => on_group_increase,
    /// A member was muted or unmuted.
    GroupBan(GroupBanEvent) => on_group_ban,
    /// A friend was added.
    FriendAdd(FriendAddEvent) => on_friend_add,
    /// A group message was recalled.
    GroupRecall(GroupRecallEvent) => on_group_recall,
    /// A private message was recalled.
    FriendRecall(FriendRecallEvent) => on_friend_recall,
    /// A member's group card changed.
    GroupCard(GroupCardEvent) => on_group_card,
    /// An offline file was received.
    OfflineFile(OfflineFileEvent) => on_offline_file,
    /// A poke inside a group.
    GroupPoke(PokeEvent) => on_group_poke,
    /// A poke in a private conversation.
    PrivatePoke(PokeEvent) => on_private_poke,
    /// A red packet's lucky king was decided.
    LuckyKing(LuckyKingEvent) => on_lucky_king,
    /// A member's group honor changed.
    Honor(HonorEvent) => on_honor,
    /// Someone asked to become a friend.
    FriendRequest(FriendRequestEvent) => on_friend_request,
    /// Someone asked to join a group, or invited the bot.
    GroupRequest(GroupRequestEvent) => on_group_request,
}

impl TypedEvent {
    /// Returns the sender's user id.
    pub fn user_id(&self) -> i64 {
        match self {
            TypedEvent::PrivateMessage(e) => e.user_id,
            TypedEvent::GroupMessage(e) => e.user_id,
            TypedEvent::GroupUpload(e) => e.user_id,
            TypedEvent::GroupAdmin(e) => e.user_id,
            TypedEvent::GroupDecrease(e) => e.user_id,
            TypedEvent::GroupIncrease(e) => e.user_id,
            TypedEvent::GroupBan(e) => e.user_id,
            TypedEvent::FriendAdd(e) => e.user_id,
            TypedEvent::GroupRecall(e) => e.user_id,
            TypedEvent::FriendRecall(e) => e.user_id,
            TypedEvent::GroupCard(e) => e.user_id,
            TypedEvent::OfflineFile(e) => e.user_id,
            TypedEvent::GroupPoke(e) | TypedEvent::PrivatePoke(e) => e.user_id,
            TypedEvent::LuckyKing(e) => e.user_id,
            TypedEvent::Honor(e) => e.user_id,
            TypedEvent::FriendRequest(e) => e.user_id,
            TypedEvent::GroupRequest(e) => e.user_id,
        }
    }

    /// Returns the group id, if the event happened in a group.
    pub fn group_id(&self) -> Option<i64> {
        match self {
            TypedEvent::GroupMessage(e) => Some(e.group_id),
            TypedEvent::GroupUpload(e) => Some(e.group_id),
            TypedEvent::GroupAdmin(e) => Some(e.group_id),
            TypedEvent::GroupDecrease(e) => Some(e.group_id),
            TypedEvent::GroupIncrease(e) => Some(e.group_id),
            TypedEvent::GroupBan(e) => Some(e.group_id),
            TypedEvent::GroupRecall(e) => Some(e.group_id),
            TypedEvent::GroupCard(e) => Some(e.group_id),
            TypedEvent::GroupPoke(e) => Some(e.group_id),
            TypedEvent::LuckyKing(e) => Some(e.group_id),
            TypedEvent::Honor(e) => Some(e.group_id),
            TypedEvent::GroupRequest(e) => Some(e.group_id),
            TypedEvent::PrivateMessage(_)
            | TypedEvent::FriendAdd(_)
            | TypedEvent::FriendRecall(_)
            | TypedEvent::OfflineFile(_)
            | TypedEvent::PrivatePoke(_)
            | TypedEvent::FriendRequest(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawEvent {
        RawEvent::try_from(value).unwrap()
    }

    #[test]
    fn test_capability_matches_leaf() {
        let event = TypedEvent::decode(
            &raw(json!({"group_id": 5, "user_id": 1, "target_id": 2})),
            LeafTag::GroupPoke,
        )
        .unwrap();

        assert_eq!(event.leaf(), LeafTag::GroupPoke);
        assert_eq!(Some(event.capability()), event.leaf().capability());
        assert_eq!(event.group_id(), Some(5));
        assert_eq!(event.user_id(), 1);
    }

    #[test]
    fn test_same_shape_different_leaves() {
        let payload = raw(json!({"user_id": 1, "target_id": 2}));

        let private = TypedEvent::decode(&payload, LeafTag::PrivatePoke).unwrap();
        assert_eq!(private.capability(), "on_private_poke");
        assert_eq!(private.group_id(), None);

        let group = TypedEvent::decode(&payload, LeafTag::GroupPoke).unwrap();
        assert_eq!(group.capability(), "on_group_poke");
    }

    #[test]
    fn test_decode_malformed_names_leaf() {
        let err = TypedEvent::decode(&raw(json!({"user_id": "x"})), LeafTag::FriendAdd).unwrap_err();
        assert!(matches!(err, DeserializationError::Malformed { leaf: "friend_add", .. }));
    }

    #[test]
    fn test_decode_unhandled_is_unsupported() {
        let err = TypedEvent::decode(&raw(json!({})), LeafTag::Unhandled).unwrap_err();
        assert!(matches!(err, DeserializationError::Unsupported { leaf: "unhandled" }));
    }

    #[test]
    fn test_header_is_shared() {
        let event = TypedEvent::decode(
            &raw(json!({
                "time": 99,
                "self_id": 7,
                "message_id": 1,
                "user_id": 2,
                "message": "hi"
            })),
            LeafTag::PrivateMessage,
        )
        .unwrap();
        assert_eq!(*event.header(), EventHeader { time: 99, self_id: 7 });
    }
}
