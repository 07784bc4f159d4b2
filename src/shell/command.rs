//! Parsing of the lines typed at the shell prompts.

use crate::domain::RecordingId;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("no command given")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("please enter a {0}")]
    MissingArgument(&'static str),

    #[error("not a number: {0}")]
    InvalidNumber(String),
}

/// Which week a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekSelector {
    #[default]
    Current,
    Week(i32),
    YearWeek(i32, i32),
}

impl WeekSelector {
    /// Resolve against the current `(year, week)`.
    pub fn resolve(self, current: (i32, i32)) -> (i32, i32) {
        match self {
            Self::Current => current,
            Self::Week(week) => (current.0, week),
            Self::YearWeek(year, week) => (year, week),
        }
    }

    fn parse(args: &[&str]) -> Result<Self, ParseCommandError> {
        match args {
            [] => Ok(Self::Current),
            [week] => Ok(Self::Week(parse_number(week)?)),
            [year, week] => Ok(Self::YearWeek(parse_number(year)?, parse_number(week)?)),
            _ => Err(ParseCommandError::Unknown(args.join(" "))),
        }
    }
}

/// Commands of the main prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Week(WeekSelector),
    WeekMatrix(WeekSelector),
    List,
    Start { tag: String, name: String },
    Stop { id: Option<RecordingId> },
    Projects,
    NewProject,
    Exit,
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let Some((head, rest)) = words.split_first() else {
            return Err(ParseCommandError::Empty);
        };

        match (head.to_lowercase().as_str(), rest) {
            ("help" | "h" | "?", []) => Ok(Self::Help),
            ("week" | "w", [sub, args @ ..]) if matches!(*sub, "matrix" | "m") => {
                Ok(Self::WeekMatrix(WeekSelector::parse(args)?))
            }
            ("week" | "w", args) => Ok(Self::Week(WeekSelector::parse(args)?)),
            ("list" | "l", []) => Ok(Self::List),
            ("start", []) => Err(ParseCommandError::MissingArgument("tag")),
            ("start", [_]) => Err(ParseCommandError::MissingArgument("name")),
            ("start", [tag, name @ ..]) => Ok(Self::Start {
                tag: tag.to_string(),
                name: name.join(" "),
            }),
            ("stop", []) => Ok(Self::Stop { id: None }),
            ("stop", [id]) => Ok(Self::Stop {
                id: Some(parse_number(id)?),
            }),
            ("project" | "projects" | "p", []) => Ok(Self::Projects),
            ("project" | "projects" | "p", [sub]) if *sub == "list" => Ok(Self::Projects),
            ("project" | "p", [sub]) if *sub == "new" => Ok(Self::NewProject),
            ("exit" | "quit" | "q", []) => Ok(Self::Exit),
            _ => Err(ParseCommandError::Unknown(s.trim().to_string())),
        }
    }
}

/// Commands of the project menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectCommand {
    New,
    Edit(String),
    Delete(String),
    All,
    Active,
    Exit,
}

impl FromStr for ProjectCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let Some((head, rest)) = words.split_first() else {
            return Err(ParseCommandError::Empty);
        };

        match (head.to_lowercase().as_str(), rest) {
            ("new", []) => Ok(Self::New),
            ("edit" | "delete", []) => Err(ParseCommandError::MissingArgument("tag")),
            ("edit", [tag]) => Ok(Self::Edit(tag.to_string())),
            ("delete", [tag]) => Ok(Self::Delete(tag.to_string())),
            ("all", []) => Ok(Self::All),
            ("active", []) => Ok(Self::Active),
            ("exit" | "back" | "q", []) => Ok(Self::Exit),
            _ => Err(ParseCommandError::Unknown(s.trim().to_string())),
        }
    }
}

fn parse_number<T: FromStr>(raw: &str) -> Result<T, ParseCommandError> {
    raw.parse()
        .map_err(|_| ParseCommandError::InvalidNumber(raw.to_string()))
}
