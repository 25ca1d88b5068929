//! OneBot v11 typed event model.
//!
//! One struct per taxonomy leaf. All of them embed [`EventHeader`] via
//! `#[serde(flatten)]`, so a whole leaf deserializes from the raw object in a
//! single pass.

pub mod message;
pub mod notice;
pub mod request;
pub mod types;

pub use message::*;
pub use notice::*;
pub use request::*;
pub use types::{Anonymous, EventHeader, Sender};

/// Access to the header every OneBot event carries.
pub trait OneBotEvent {
    /// Returns the event header.
    fn header(&self) -> &EventHeader;

    /// Unix timestamp when the event occurred.
    fn time(&self) -> i64 {
        self.header().time
    }

    /// The receiving bot's account id.
    fn self_id(&self) -> i64 {
        self.header().self_id
    }
}

impl OneBotEvent for MessageEvent {
    fn header(&self) -> &EventHeader {
        &self.header
    }
}

macro_rules! impl_onebot_event {
    (via base: $($ty:ty),+ $(,)?) => {
        $(impl OneBotEvent for $ty {
            fn header(&self) -> &EventHeader {
                &self.base.header
            }
        })+
    };
    ($($ty:ty),+ $(,)?) => {
        $(impl OneBotEvent for $ty {
            fn header(&self) -> &EventHeader {
                &self.header
            }
        })+
    };
}

impl_onebot_event!(via base: PrivateMessageEvent, GroupMessageEvent);
impl_onebot_event!(
    GroupUploadEvent,
    GroupAdminEvent,
    GroupDecreaseEvent,
    GroupIncreaseEvent,
    GroupBanEvent,
    FriendAddEvent,
    GroupRecallEvent,
    FriendRecallEvent,
    GroupCardEvent,
    OfflineFileEvent,
    PokeEvent,
    LuckyKingEvent,
    HonorEvent,
    FriendRequestEvent,
    GroupRequestEvent,
);
