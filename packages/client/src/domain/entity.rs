//! Core domain models for the game/vote reconciliation model.

use std::collections::{BTreeMap, BTreeSet};

use super::{
    error::ValueObjectError,
    value_object::{GameKey, UserId},
    vote::VoteResults,
};

/// Player-count and playtime ranges of a game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameInfo {
    pub min_players: u32,
    pub max_players: u32,
    /// Minutes
    pub min_playtime: u32,
    /// Minutes
    pub max_playtime: u32,
}

impl GameInfo {
    /// Whether the game can be played with `players` people.
    ///
    /// A `max_players` of 0 means the catalog did not report an upper bound.
    pub fn supports_players(&self, players: u32) -> bool {
        players >= self.min_players && (self.max_players == 0 || players <= self.max_players)
    }
}

/// Catalog metadata for a game, as received from the backend.
///
/// Records carry no vote state; a [`Game`] built from one always starts with
/// empty vote and veto sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameRecord {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub info: GameInfo,
    pub tags: Vec<String>,
}

impl GameRecord {
    /// The key this record is deduplicated by
    pub fn key(&self) -> Result<GameKey, ValueObjectError> {
        GameKey::from_id_or_name(&self.id, &self.name)
    }
}

/// A user's standing on one game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Voting,
    Vetoing,
    None,
}

/// One game in a room together with the users voting for and vetoing it
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    key: GameKey,
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub info: GameInfo,
    pub tags: Vec<String>,
    votes: BTreeSet<UserId>,
    vetoes: BTreeSet<UserId>,
}

impl Game {
    /// Create a game with empty vote and veto sets from catalog metadata
    pub fn from_record(record: GameRecord) -> Result<Self, ValueObjectError> {
        let key = record.key()?;
        Ok(Self {
            key,
            id: record.id,
            name: record.name,
            thumbnail: record.thumbnail,
            info: record.info,
            tags: record.tags,
            votes: BTreeSet::new(),
            vetoes: BTreeSet::new(),
        })
    }

    pub fn key(&self) -> &GameKey {
        &self.key
    }

    pub fn votes(&self) -> &BTreeSet<UserId> {
        &self.votes
    }

    pub fn vetoes(&self) -> &BTreeSet<UserId> {
        &self.vetoes
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    pub fn veto_count(&self) -> usize {
        self.vetoes.len()
    }

    /// Whether a key sent by the backend refers to this game.
    ///
    /// Older payloads reference games by display name, newer ones by
    /// catalog id, so both are accepted.
    pub fn matches_key(&self, key: &str) -> bool {
        !key.is_empty() && (key == self.id || key == self.name)
    }

    pub fn add_vote(&mut self, user: &UserId) {
        self.votes.insert(user.clone());
    }

    pub fn remove_vote(&mut self, user: &UserId) {
        self.votes.remove(user);
    }

    pub fn add_veto(&mut self, user: &UserId) {
        self.vetoes.insert(user.clone());
    }

    pub fn remove_veto(&mut self, user: &UserId) {
        self.vetoes.remove(user);
    }

    pub fn reset_votes(&mut self) {
        self.votes.clear();
        self.vetoes.clear();
    }

    /// Vote for this game, withdrawing any veto by the same user first
    pub fn vote(&mut self, user: &UserId) {
        self.remove_veto(user);
        self.add_vote(user);
    }

    /// Veto this game, withdrawing any vote by the same user first
    pub fn veto(&mut self, user: &UserId) {
        self.remove_vote(user);
        self.add_veto(user);
    }

    /// Click on "vote": clears an existing vote, otherwise switches to voting.
    pub fn toggle_vote(&mut self, user: &UserId) -> Standing {
        if self.votes.contains(user) {
            self.remove_vote(user);
        } else {
            self.vote(user);
        }
        self.standing(user)
    }

    /// Click on "veto": clears an existing veto, otherwise switches to vetoing.
    pub fn toggle_veto(&mut self, user: &UserId) -> Standing {
        if self.vetoes.contains(user) {
            self.remove_veto(user);
        } else {
            self.veto(user);
        }
        self.standing(user)
    }

    pub fn standing(&self, user: &UserId) -> Standing {
        if self.votes.contains(user) {
            Standing::Voting
        } else if self.vetoes.contains(user) {
            Standing::Vetoing
        } else {
            Standing::None
        }
    }

    /// Reconcile `user`'s membership with that user's complete vote and veto lists.
    ///
    /// Membership in each set becomes a pure function of whether this game
    /// appears in the corresponding list. The two checks are independent, so a
    /// user listed in both ends up in both sets.
    pub fn handle_user<S: AsRef<str>>(&mut self, user: &UserId, votes: &[S], vetoes: &[S]) {
        let voting = votes.iter().any(|key| self.matches_key(key.as_ref()));
        let vetoing = vetoes.iter().any(|key| self.matches_key(key.as_ref()));
        self.set_membership(user, voting, vetoing);
    }

    /// Put `user` into (or take it out of) each set
    fn set_membership(&mut self, user: &UserId, voting: bool, vetoing: bool) {
        if voting {
            self.add_vote(user);
        } else {
            self.remove_vote(user);
        }

        if vetoing {
            self.add_veto(user);
        } else {
            self.remove_veto(user);
        }
    }
}

/// All games observed in a room, keyed by [`GameKey`]
#[derive(Debug, Clone, Default)]
pub struct GameCollection {
    games: BTreeMap<GameKey, Game>,
    has_games: bool,
}

impl GameCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add games that are not in the collection yet.
    ///
    /// Existing games are skipped (same key, or the same game per
    /// [`GameCollection::find_record`]), so the first record seen keeps its
    /// metadata. Records without any key are dropped.
    ///
    /// # Returns
    ///
    /// The keys that were newly inserted, in input order
    pub fn add_games<I>(&mut self, records: I) -> Vec<GameKey>
    where
        I: IntoIterator<Item = GameRecord>,
    {
        let mut added = Vec::new();
        for record in records {
            let game = match Game::from_record(record) {
                Ok(game) => game,
                Err(e) => {
                    tracing::warn!("Skipping game without a usable key: {}", e);
                    continue;
                }
            };
            if self.games.contains_key(game.key()) || self.find_record_key(&game).is_some() {
                continue;
            }
            added.push(game.key().clone());
            self.games.insert(game.key().clone(), game);
        }

        if !self.games.is_empty() {
            self.has_games = true;
        }
        added
    }

    /// True once any game has been added; never reverts
    pub fn has_games(&self) -> bool {
        self.has_games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn contains(&self, key: &GameKey) -> bool {
        self.games.contains_key(key)
    }

    pub fn get(&self, key: &GameKey) -> Option<&Game> {
        self.games.get(key)
    }

    pub fn get_mut(&mut self, key: &GameKey) -> Option<&mut Game> {
        self.games.get_mut(key)
    }

    /// Resolve a key sent over the wire to exactly one game.
    ///
    /// A catalog id match wins; the display name is only tried when no game
    /// has that id, so a game named "1830" never shadows the game with id 1830.
    pub fn resolve(&self, key: &str) -> Option<&GameKey> {
        if key.is_empty() {
            return None;
        }
        self.games
            .values()
            .find(|game| game.id == key)
            .or_else(|| self.games.values().find(|game| game.name == key))
            .map(Game::key)
    }

    /// Find a game by a key sent over the wire (catalog id, else display name)
    pub fn find(&self, key: &str) -> Option<&Game> {
        let key = self.resolve(key)?;
        self.games.get(key)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut Game> {
        let key = self.resolve(key)?.clone();
        self.games.get_mut(&key)
    }

    /// The game a catalog record describes, if the room has it already.
    ///
    /// Records with an id match that id, or an id-less game of the same name.
    /// Id-less records match by name.
    pub fn find_record(&self, record: &GameRecord) -> Option<&Game> {
        let key = self.find_record_key_of(&record.id, &record.name)?;
        self.games.get(key)
    }

    fn find_record_key(&self, game: &Game) -> Option<&GameKey> {
        self.find_record_key_of(&game.id, &game.name)
    }

    fn find_record_key_of(&self, id: &str, name: &str) -> Option<&GameKey> {
        let found = if id.is_empty() {
            self.games
                .values()
                .find(|game| !name.is_empty() && game.name == name)
        } else {
            self.games
                .values()
                .find(|game| game.id == id || (game.id.is_empty() && game.name == name))
        };
        found.map(Game::key)
    }

    /// Iterate over all games in key order
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.games.values()
    }

    pub fn games_mut(&mut self) -> impl Iterator<Item = &mut Game> {
        self.games.values_mut()
    }

    /// Borrow every game; callers sort the result themselves
    pub fn to_vec(&self) -> Vec<&Game> {
        self.games.values().collect()
    }

    pub fn reset_votes(&mut self) {
        self.games_mut().for_each(Game::reset_votes);
    }

    /// Reconcile `user` with that user's complete lists across the collection.
    ///
    /// Every listed key is resolved to at most one game first, then each
    /// game's membership is set from the resolved keys.
    pub fn handle_user<S: AsRef<str>>(&mut self, user: &UserId, votes: &[S], vetoes: &[S]) {
        let resolve_all = |keys: &[S]| -> BTreeSet<GameKey> {
            keys.iter()
                .filter_map(|key| self.resolve(key.as_ref()).cloned())
                .collect()
        };
        let vote_keys = resolve_all(votes);
        let veto_keys = resolve_all(vetoes);

        for (key, game) in self.games.iter_mut() {
            game.set_membership(user, vote_keys.contains(key), veto_keys.contains(key));
        }
    }

    /// Apply every user's lists from a snapshot
    pub fn hydrate(&mut self, results: &VoteResults) {
        for user in results.users() {
            self.handle_user(user, results.votes_of(user), results.vetoes_of(user));
        }
    }
}
