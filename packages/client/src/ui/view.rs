//! Room view: filtering, sorting and text rendering of the game list.

use std::{cmp::Ordering, fmt::Write};

use bgchooser_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::{Game, GameCollection, Standing, UserId},
    usecase::RoomSession,
};

/// Which games the list shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameFilter {
    /// Keep only games playable with this many people
    pub players: Option<u32>,
    /// Drop games anyone has vetoed
    pub hide_vetoed: bool,
}

impl GameFilter {
    pub fn accepts(&self, game: &Game) -> bool {
        if let Some(players) = self.players {
            if !game.info.supports_players(players) {
                return false;
            }
        }
        !(self.hide_vetoed && game.veto_count() > 0)
    }
}

/// Order of the game list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    /// Most votes first
    Votes,
    /// Fewest vetoes first
    Vetoes,
    /// Shortest first
    Playtime,
    /// Smallest minimum player count first
    Players,
}

impl SortKey {
    fn compare(&self, a: &Game, b: &Game) -> Ordering {
        let primary = match self {
            SortKey::Name => Ordering::Equal,
            SortKey::Votes => b.vote_count().cmp(&a.vote_count()),
            SortKey::Vetoes => a.veto_count().cmp(&b.veto_count()),
            SortKey::Playtime => a.info.min_playtime.cmp(&b.info.min_playtime),
            SortKey::Players => a.info.min_players.cmp(&b.info.min_players),
        };
        primary.then_with(|| by_name(a, b))
    }
}

fn by_name(a: &Game, b: &Game) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.key().cmp(b.key()))
}

/// Games passing `filter`, in `sort` order
pub fn visible_games<'a>(
    collection: &'a GameCollection,
    filter: &GameFilter,
    sort: SortKey,
) -> Vec<&'a Game> {
    let mut games: Vec<&Game> = collection
        .games()
        .filter(|game| filter.accepts(game))
        .collect();
    games.sort_by(|a, b| sort.compare(a, b));
    games
}

fn range(min: u32, max: u32) -> String {
    match (min, max) {
        (0, 0) => "?".to_string(),
        (min, max) if max <= min => min.to_string(),
        (min, max) => format!("{min}-{max}"),
    }
}

fn marker(game: &Game, user: &UserId) -> &'static str {
    match game.standing(user) {
        Standing::Voting => "+",
        Standing::Vetoing => "x",
        Standing::None => " ",
    }
}

/// One line per game: `[marker] name (key) players, minutes, votes/vetoes`
pub fn render_game(game: &Game, user: &UserId) -> String {
    format!(
        "[{}] {} ({})  {}p  {}min  +{} x{}",
        marker(game, user),
        game.name,
        game.key(),
        range(game.info.min_players, game.info.max_players),
        range(game.info.min_playtime, game.info.max_playtime),
        game.vote_count(),
        game.veto_count()
    )
}

/// Banner shown once the push channel is gone
pub fn connection_lost_banner(error: &str) -> String {
    format!("!! Connection lost: {error}. Please restart the client.")
}

/// Render the whole room view
pub fn render(session: &RoomSession, filter: &GameFilter, sort: SortKey) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Room {} as {}", session.room_id(), session.user());

    if let Some(error) = session.fatal_error() {
        let _ = writeln!(out, "{}", connection_lost_banner(error));
    }

    let games = visible_games(session.collection(), filter, sort);
    if !session.collection().has_games() {
        let _ = writeln!(out, "No games yet. Use `import <user>` or `add <id>`.");
    } else if games.is_empty() {
        let _ = writeln!(out, "No games match the current filter.");
    }
    for game in &games {
        let _ = writeln!(out, "{}", render_game(game, session.user()));
    }

    let _ = write!(
        out,
        "{} of {} game(s)",
        games.len(),
        session.collection().len()
    );
    if session.is_saving() {
        out.push_str(", saving...");
    }
    if let Some(error) = session.vote_error() {
        let _ = write!(out, ", votes not saved: {error}");
    }
    if let Some(ts) = session.last_synced_at() {
        let _ = write!(out, ", synced {}", timestamp_to_jst_rfc3339(ts));
    }
    out
}
