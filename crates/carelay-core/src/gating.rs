use std::collections::{HashMap, HashSet};

use crate::domain::InboundEvent;

/// Which inbound chats a listener reacts to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AllowList {
    /// Every chat is monitored.
    #[default]
    Open,
    /// Flat list of chat ids (Telegram).
    Chats(HashSet<String>),
    /// Server id → channel ids, as a list of groups (Discord).
    ///
    /// An event is allowed if any group maps its server to a list containing
    /// its channel.
    ServerChannels(Vec<HashMap<String, Vec<String>>>),
}

impl AllowList {
    pub fn chats<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllowList::Chats(ids.into_iter().map(Into::into).collect())
    }

    pub fn is_allowed(&self, container_id: Option<&str>, channel_id: &str) -> bool {
        match self {
            AllowList::Open => true,
            AllowList::Chats(ids) => ids.contains(channel_id),
            AllowList::ServerChannels(groups) => {
                let Some(server) = container_id else {
                    return false;
                };
                groups.iter().any(|group| {
                    group
                        .get(server)
                        .is_some_and(|channels| channels.iter().any(|c| c == channel_id))
                })
            }
        }
    }

    pub fn permits(&self, event: &InboundEvent) -> bool {
        self.is_allowed(event.container_id.as_deref(), &event.channel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servers() -> AllowList {
        AllowList::ServerChannels(vec![
            HashMap::from([("100".to_string(), vec!["1".to_string(), "2".to_string()])]),
            HashMap::from([("200".to_string(), vec!["3".to_string()])]),
        ])
    }

    #[test]
    fn open_allows_everything() {
        assert!(AllowList::Open.is_allowed(None, "anything"));
    }

    #[test]
    fn server_channels_require_matching_pair() {
        let al = servers();
        assert!(al.is_allowed(Some("100"), "2"));
        assert!(al.is_allowed(Some("200"), "3"));
        assert!(!al.is_allowed(Some("100"), "3"));
        assert!(!al.is_allowed(Some("300"), "1"));
    }

    #[test]
    fn server_channels_reject_direct_messages() {
        assert!(!servers().is_allowed(None, "1"));
    }

    #[test]
    fn chats_match_channel_id_only() {
        let al = AllowList::chats(["-1001", "-1002"]);
        assert!(al.is_allowed(None, "-1001"));
        assert!(!al.is_allowed(None, "-1003"));
    }

    #[test]
    fn empty_server_list_allows_nothing() {
        assert!(!AllowList::ServerChannels(vec![]).is_allowed(Some("100"), "1"));
    }
}
