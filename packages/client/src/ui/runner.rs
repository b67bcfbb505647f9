//! Room event loop of the terminal client.
//!
//! One task owns the [`RoomSession`] and handles, one at a time, push updates,
//! commands typed at the prompt and completions of vote submissions.

use std::sync::Arc;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    config::ClientConfig,
    domain::{GameRecord, RepositoryError, RoomRepository, RoomUpdate},
    infrastructure::{HttpRoomRepository, ImportProgressStream, PushChannel, PushEvent},
    usecase::{
        AddGameUseCase, CastVoteUseCase, EnterRoomUseCase, ImportCollectionUseCase, ImportError,
        ImportPreview, ResetVotesUseCase, RoomSession, VoteAction,
    },
};

use super::{
    command::{self, Command, HELP},
    error::ClientError,
    view::{self, GameFilter, SortKey},
};

const PROMPT: &str = "> ";

/// Line-editor thread output
enum Input {
    Line(String),
    Eof,
    Failed(String),
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Read lines on a dedicated thread, since the editor blocks
fn spawn_line_reader(lines: mpsc::UnboundedSender<Input>) {
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                let _ = lines.send(Input::Failed(e.to_string()));
                return;
            }
        };
        loop {
            let input = match editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    Input::Line(line)
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => Input::Eof,
                Err(e) => Input::Failed(e.to_string()),
            };
            let done = !matches!(input, Input::Line(_));
            if lines.send(input).is_err() || done {
                return;
            }
        }
    });
}

/// State and use cases of the room event loop
struct RoomLoop {
    session: RoomSession,
    ws_base: String,
    cast_vote: CastVoteUseCase,
    reset_votes: ResetVotesUseCase,
    add_game: AddGameUseCase,
    import: ImportCollectionUseCase,
    filter: GameFilter,
    sort: SortKey,
    saves: mpsc::UnboundedSender<Result<(), RepositoryError>>,
}

impl RoomLoop {
    fn show(&self) {
        println!("{}", view::render(&self.session, &self.filter, self.sort));
    }

    fn on_update(&mut self, update: RoomUpdate) {
        let note = match &update {
            RoomUpdate::GamesAdded { games, .. } => format!("* {} game(s) arrived", games.len()),
            RoomUpdate::UserVoted { user, .. } => format!("* {user} updated their votes"),
            RoomUpdate::VotesReset => "* all votes were reset".to_string(),
        };
        self.session.apply_update(update);
        println!("{note}");
    }

    /// Apply a click locally, then persist the full lists in the background
    fn on_vote(&mut self, action: VoteAction, key: &str) {
        let (standing, submission) = match self.session.toggle(action, key) {
            Ok(result) => result,
            Err(e) => {
                println!("{e}");
                return;
            }
        };
        if let Some(game) = self.session.collection().find(key) {
            println!("{} ({:?})", view::render_game(game, self.session.user()), standing);
        }

        self.session.begin_save();
        let usecase = self.cast_vote.clone();
        let room_id = self.session.room_id().clone();
        let saves = self.saves.clone();
        tokio::spawn(async move {
            let result = usecase.execute(&room_id, &submission).await;
            let _ = saves.send(result);
        });
    }

    async fn on_import(&mut self, catalog_user: &str, commit: bool) -> Result<(), ImportError> {
        println!("Looking up the collection of '{catalog_user}'...");
        let games = match self.import.preview(&self.session, catalog_user).await? {
            ImportPreview::AllPresent { total } => {
                println!("All {total} game(s) of '{catalog_user}' are already in the room.");
                return Ok(());
            }
            ImportPreview::Games(games) => games,
        };

        if !commit {
            print_preview(&games);
            if !games.is_empty() {
                println!("Use `import-all {catalog_user}` to add them.");
            }
            return Ok(());
        }
        if games.is_empty() {
            println!("'{catalog_user}' has no games.");
            return Ok(());
        }
        let added = self.import.commit(&mut self.session, catalog_user, games).await?;
        println!("Added {} game(s).", added.len());
        Ok(())
    }

    async fn on_import_stream(&mut self, catalog_user: &str) -> Result<(), ImportError> {
        let stream =
            ImportProgressStream::connect(&self.ws_base, self.session.room_id(), catalog_user)
                .await
                .map_err(|e| ImportError::Remote(e.to_string()))?;
        let added = self
            .import
            .follow_progress(&mut self.session, stream.into_stream())
            .await?;
        println!("Import finished, {} new game(s).", added.len());
        Ok(())
    }

    fn print_status(&self) {
        let session = &self.session;
        println!("Room:    {}", session.room_id());
        println!("User:    {}", session.user());
        println!("Games:   {}", session.collection().len());
        println!(
            "Votes:   {} vote(s), {} veto(es){}",
            session.my_votes().len(),
            session.my_vetoes().len(),
            if session.is_saving() { ", saving..." } else { "" }
        );
        if let Some(error) = session.vote_error() {
            println!("Last save failed: {error}");
        }
        match session.fatal_error() {
            Some(error) => println!("Updates: lost ({error})"),
            None => println!("Updates: connected"),
        }
    }

    async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(e) => {
                println!("{e}");
                return Flow::Continue;
            }
        };

        match command {
            Command::List { filter, sort } => {
                self.filter = filter;
                self.sort = sort;
                self.show();
            }
            Command::Vote(key) => self.on_vote(VoteAction::Vote, &key),
            Command::Veto(key) => self.on_vote(VoteAction::Veto, &key),
            Command::Import(user) => {
                if let Err(e) = self.on_import(&user, false).await {
                    println!("{e}");
                }
            }
            Command::ImportAll(user) => {
                if let Err(e) = self.on_import(&user, true).await {
                    println!("{e}");
                }
            }
            Command::ImportStream(user) => {
                if let Err(e) = self.on_import_stream(&user).await {
                    println!("{e}");
                }
            }
            Command::Add(game_id) => match self.add_game.execute(&mut self.session, &game_id).await
            {
                Ok(Some(key)) => println!("Added game {key}."),
                Ok(None) => println!("That game is already in the room."),
                Err(e) => println!("{e}"),
            },
            Command::Reset => match self.reset_votes.execute(&mut self.session).await {
                Ok(()) => println!("All votes cleared."),
                Err(e) => println!("Reset failed: {e}"),
            },
            Command::Status => self.print_status(),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }
}

fn print_preview(games: &[GameRecord]) {
    for game in games {
        println!("  {} ({})", game.name, game.id);
    }
    println!("{} game(s) not yet in the room.", games.len());
}

/// Run the terminal client until the user quits or the room connection is lost
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let repository: Arc<dyn RoomRepository> = Arc::new(HttpRoomRepository::new(config.http_base()));

    let session = match EnterRoomUseCase::new(repository.clone())
        .execute(config.room.clone(), config.user.clone())
        .await
    {
        Ok(session) => session,
        Err(e) => {
            println!("!! Could not load the room: {e}");
            return Err(e.into());
        }
    };

    let (push_tx, mut push_rx) = mpsc::unbounded_channel();
    let ws_base = config.ws_base();
    let push = match PushChannel::connect(&ws_base, session.room_id(), push_tx).await {
        Ok(push) => push,
        Err(e) => {
            tracing::error!("Failed to subscribe to room '{}': {}", session.room_id(), e);
            println!("{}", view::connection_lost_banner(&e.to_string()));
            return Err(ClientError::Subscribe(e));
        }
    };

    let (saves_tx, mut saves_rx) = mpsc::unbounded_channel();
    let mut room = RoomLoop {
        session,
        ws_base,
        cast_vote: CastVoteUseCase::new(repository.clone()),
        reset_votes: ResetVotesUseCase::new(repository.clone()),
        add_game: AddGameUseCase::new(repository.clone()),
        import: ImportCollectionUseCase::new(repository, config.retry),
        filter: GameFilter::default(),
        sort: SortKey::default(),
        saves: saves_tx,
    };
    room.show();
    println!("Type `help` for commands.");

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    spawn_line_reader(input_tx);

    let result = loop {
        tokio::select! {
            Some(event) = push_rx.recv() => match event {
                PushEvent::Update(update) => room.on_update(update),
                PushEvent::Failed(e) => {
                    room.session.mark_fatal(e.to_string());
                    room.show();
                    break Err(ClientError::Disconnected(e));
                }
            },
            Some(result) = saves_rx.recv() => room.session.finish_save(result),
            input = input_rx.recv() => match input {
                Some(Input::Line(line)) => {
                    if room.handle_line(&line).await == Flow::Quit {
                        break Ok(());
                    }
                }
                Some(Input::Failed(e)) => break Err(ClientError::Editor(e)),
                Some(Input::Eof) | None => break Ok(()),
            },
        }
    };

    push.close();
    tracing::info!("Left room '{}'", room.session.room_id());
    result
}
