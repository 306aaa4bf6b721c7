//! Alert rendering - titles, body templates, deep-link routing

use herald_domain::{DeepLink, DeviceAlert, NotificationKind, NotificationRecord};

/// Fallback actor name when the server sent none.
const UNKNOWN_ACTOR: &str = "Someone";

/// Renders a notification record into a dispatchable alert.
#[must_use]
pub fn render(record: &NotificationRecord) -> DeviceAlert {
    DeviceAlert {
        title: title_for(record.kind).to_string(),
        body: body_for(record),
        tag: record.dedup_key(),
        deep_link: deep_link_for(record),
    }
}

const fn title_for(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Reply => "New reply",
        NotificationKind::Mention => "New mention",
        NotificationKind::Quote => "New quote",
        NotificationKind::Recast => "New recast",
        NotificationKind::Like => "New like",
        NotificationKind::Follow => "New follower",
        NotificationKind::Other => "New notification",
    }
}

fn body_for(record: &NotificationRecord) -> String {
    let actor = record.actor.as_deref().unwrap_or(UNKNOWN_ACTOR);
    let subject = match record.other_count {
        0 => actor.to_string(),
        1 => format!("{actor} and 1 other"),
        n => format!("{actor} and {n} others"),
    };
    match record.kind {
        NotificationKind::Reply => format!("{subject} replied to your cast"),
        NotificationKind::Mention => format!("{subject} mentioned you"),
        NotificationKind::Quote => format!("{subject} quoted your cast"),
        NotificationKind::Recast => format!("{subject} recasted your cast"),
        NotificationKind::Like => format!("{subject} liked your cast"),
        NotificationKind::Follow => format!("{subject} followed you"),
        NotificationKind::Other => "You have a new notification".to_string(),
    }
}

/// Per-kind routing: reactions and mentions land on the conversation around
/// the cast, follows land on the actor's profile, anything unresolvable
/// falls back to the notification inbox.
fn deep_link_for(record: &NotificationRecord) -> DeepLink {
    match record.kind {
        NotificationKind::Reply
        | NotificationKind::Mention
        | NotificationKind::Quote
        | NotificationKind::Recast
        | NotificationKind::Like => record
            .cast_hash
            .clone()
            .map_or(DeepLink::Inbox, |cast_hash| DeepLink::Conversation { cast_hash }),
        NotificationKind::Follow => {
            record.actor_fid.map_or(DeepLink::Inbox, |fid| DeepLink::Profile { fid })
        }
        NotificationKind::Other => DeepLink::Inbox,
    }
}
