//! Parsing of the commands typed at the room prompt.

use thiserror::Error;

use super::view::{GameFilter, SortKey};

pub const HELP: &str = "\
Commands:
  list [players <n>] [sort name|votes|vetoes|playtime|players] [hide-vetoed]
  vote <game>            toggle your vote (game id or name)
  veto <game>            toggle your veto
  import <user>          preview a catalog user's collection
  import-all <user>      add every game of the previewed collection
  import-stream <user>   import a collection game by game
  add <game id>          add a single game by catalog id
  reset                  clear every vote in the room
  status                 show room and connection state
  help                   show this help
  quit                   leave the room";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List { filter: GameFilter, sort: SortKey },
    Vote(String),
    Veto(String),
    Import(String),
    ImportAll(String),
    ImportStream(String),
    Add(String),
    Reset,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}', type `help` for a list")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("Invalid value '{value}' for `{option}`")]
    InvalidValue { option: &'static str, value: String },
}

impl std::str::FromStr for SortKey {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "votes" => Ok(SortKey::Votes),
            "vetoes" => Ok(SortKey::Vetoes),
            "playtime" => Ok(SortKey::Playtime),
            "players" => Ok(SortKey::Players),
            other => Err(CommandError::InvalidValue {
                option: "sort",
                value: other.to_string(),
            }),
        }
    }
}

/// Rest of the line after the command word, which may contain spaces
fn argument(rest: &str, command: &'static str) -> Result<String, CommandError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    Ok(rest.to_string())
}

fn parse_list(rest: &str) -> Result<Command, CommandError> {
    let mut filter = GameFilter::default();
    let mut sort = SortKey::default();
    let mut words = rest.split_whitespace();

    while let Some(word) = words.next() {
        match word {
            "players" => {
                let value = words.next().ok_or(CommandError::MissingArgument("players"))?;
                let players = value.parse().map_err(|_| CommandError::InvalidValue {
                    option: "players",
                    value: value.to_string(),
                })?;
                filter.players = Some(players);
            }
            "sort" => {
                sort = words
                    .next()
                    .ok_or(CommandError::MissingArgument("sort"))?
                    .parse()?;
            }
            "hide-vetoed" => filter.hide_vetoed = true,
            other => {
                return Err(CommandError::InvalidValue {
                    option: "list",
                    value: other.to_string(),
                });
            }
        }
    }
    Ok(Command::List { filter, sort })
}

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    let command = match word {
        "list" | "ls" => parse_list(rest)?,
        "vote" => Command::Vote(argument(rest, "vote")?),
        "veto" => Command::Veto(argument(rest, "veto")?),
        "import" => Command::Import(argument(rest, "import")?),
        "import-all" => Command::ImportAll(argument(rest, "import-all")?),
        "import-stream" => Command::ImportStream(argument(rest, "import-stream")?),
        "add" => Command::Add(argument(rest, "add")?),
        "reset" => Command::Reset,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_options() {
        // テスト項目: list のオプションがフィルタと並び順に変換される
        let command = parse("list players 4 sort votes hide-vetoed").unwrap();
        assert_eq!(
            command,
            Some(Command::List {
                filter: GameFilter {
                    players: Some(4),
                    hide_vetoed: true
                },
                sort: SortKey::Votes
            })
        );
    }

    #[test]
    fn test_parse_game_name_with_spaces() {
        // テスト項目: スペースを含むゲーム名がそのまま引数になる
        let command = parse("vote  Ticket to Ride ").unwrap();
        assert_eq!(command, Some(Command::Vote("Ticket to Ride".to_string())));
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        // テスト項目: 引数不足・不正な値・未知のコマンドはエラーになる
        assert_eq!(
            parse("veto").unwrap_err(),
            CommandError::MissingArgument("veto")
        );
        assert_eq!(
            parse("list players many").unwrap_err(),
            CommandError::InvalidValue {
                option: "players",
                value: "many".to_string()
            }
        );
        assert_eq!(
            parse("list sort random").unwrap_err(),
            CommandError::InvalidValue {
                option: "sort",
                value: "random".to_string()
            }
        );
        assert_eq!(
            parse("dance").unwrap_err(),
            CommandError::Unknown("dance".to_string())
        );
    }
}
