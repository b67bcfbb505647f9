//! Aggregate vote results of a room.

use std::collections::{BTreeMap, BTreeSet};

use super::value_object::UserId;

/// Per-room vote/veto standings as reported by the backend.
///
/// Each map goes from a user to the list of game keys that user currently
/// votes for (resp. vetoes). Lists are kept as raw strings because the
/// backend may still send display names or empty entries; matching against
/// games happens in [`Game::handle_user`](super::Game::handle_user).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteResults {
    pub votes: BTreeMap<UserId, Vec<String>>,
    pub vetoes: BTreeMap<UserId, Vec<String>>,
}

impl VoteResults {
    /// All users that appear in either map.
    pub fn users(&self) -> BTreeSet<&UserId> {
        self.votes.keys().chain(self.vetoes.keys()).collect()
    }

    pub fn votes_of(&self, user: &UserId) -> &[String] {
        self.votes.get(user).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn vetoes_of(&self, user: &UserId) -> &[String] {
        self.vetoes.get(user).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_users_is_union_of_both_maps() {
        // テスト項目: 投票と拒否のどちらかにいるユーザーが全て列挙される
        // given (前提条件):
        let mut results = VoteResults::default();
        results.votes.insert(user("alice"), vec!["1".to_string()]);
        results.vetoes.insert(user("bob"), vec!["2".to_string()]);
        results.vetoes.insert(user("alice"), vec![]);

        // when (操作):
        let users: Vec<&str> = results.users().into_iter().map(UserId::as_str).collect();

        // then (期待する結果):
        assert_eq!(users, vec!["alice", "bob"]);
    }

    #[test]
    fn test_missing_user_lists_are_empty() {
        // テスト項目: 存在しないユーザーのリストは空で返される
        let results = VoteResults::default();
        assert!(results.votes_of(&user("carol")).is_empty());
        assert!(results.vetoes_of(&user("carol")).is_empty());
    }
}
