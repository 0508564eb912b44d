//! Line commands understood by the driver.

use slopes_types::{Action, EngineError, WireAction};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Action),
    Show,
    Help,
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    Usage(&'static str),
    Engine(EngineError),
    Json(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
            ParseError::Unknown(word) => write!(f, "unknown command {:?} (try `help`)", word),
            ParseError::Usage(usage) => write!(f, "usage: {}", usage),
            ParseError::Engine(e) => write!(f, "{}", e),
            ParseError::Json(e) => write!(f, "bad action json: {}", e),
        }
    }
}

impl From<EngineError> for ParseError {
    fn from(e: EngineError) -> Self {
        ParseError::Engine(e)
    }
}

pub const HELP: &str = "\
commands:
  toggle <name>          flip a boolean parameter
  tweak <name> <value>   set a parameter (curves: \"x,y x,y ...\")
  shuffle                randomize everything
  power                  toggle machine power
  undo                   undo the last batch of tweaks
  action <json>          dispatch a raw action, e.g. {\"type\":\"undo\"}
  show                   print the current state
  quit";

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word {
        "" => Err(ParseError::Empty),
        "toggle" => {
            if rest.is_empty() {
                return Err(ParseError::Usage("toggle <name>"));
            }
            Ok(Command::Dispatch(Action::toggle(rest)?))
        }
        "tweak" => {
            let (name, value) = rest
                .split_once(char::is_whitespace)
                .ok_or(ParseError::Usage("tweak <name> <value>"))?;
            Ok(Command::Dispatch(Action::tweak(name, value)?))
        }
        "shuffle" => Ok(Command::Dispatch(Action::Shuffle)),
        "power" => Ok(Command::Dispatch(Action::ToggleMachinePower)),
        "undo" => Ok(Command::Dispatch(Action::Undo)),
        "action" => {
            let wire: WireAction =
                serde_json::from_str(rest).map_err(|e| ParseError::Json(e.to_string()))?;
            Ok(Command::Dispatch(Action::try_from(wire)?))
        }
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}
