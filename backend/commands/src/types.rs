/// Command table types.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Match mode
// ---------------------------------------------------------------------------

/// How a command token is matched against the trimmed message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Text must equal the token.
    Exact,
    /// Text is the token alone, or the token followed by whitespace and arguments.
    Prefix,
}

// ---------------------------------------------------------------------------
// Arity
// ---------------------------------------------------------------------------

/// Argument shape of a command, with display names for usage strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "arity", rename_all = "lowercase")]
pub enum Arity {
    None,
    /// The whole remainder, spaces included.
    One { name: String },
    /// First word, then the rest of the line.
    Two { first: String, second: String },
}

// ---------------------------------------------------------------------------
// Handler selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Lookup,
    Add,
    Update,
    Delete,
    List,
    Search,
    Random,
    Help,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Lookup => "lookup",
            CommandKind::Add => "add",
            CommandKind::Update => "update",
            CommandKind::Delete => "delete",
            CommandKind::List => "list",
            CommandKind::Search => "search",
            CommandKind::Random => "random",
            CommandKind::Help => "help",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Command definition
// ---------------------------------------------------------------------------

/// One row of the ordered command table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDef {
    pub kind: CommandKind,
    /// Literal token, e.g. `!addword`.
    pub token: String,
    pub mode: MatchMode,
    pub arity: Arity,
    pub description: String,
}

impl CommandDef {
    /// Usage line rendered from the token and argument names.
    pub fn usage(&self) -> String {
        match &self.arity {
            Arity::None => self.token.clone(),
            Arity::One { name } => format!("{} <{}>", self.token, name),
            Arity::Two { first, second } => format!("{} <{}> <{}>", self.token, first, second),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsed invocation
// ---------------------------------------------------------------------------

/// Arguments extracted according to the command's arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandArgs {
    None,
    One(String),
    Two(String, String),
}

impl CommandArgs {
    /// The first argument, which is the keyword for keyed commands.
    pub fn first(&self) -> Option<&str> {
        match self {
            CommandArgs::None => None,
            CommandArgs::One(a) | CommandArgs::Two(a, _) => Some(a),
        }
    }

    pub fn one(&self) -> anyhow::Result<&str> {
        match self {
            CommandArgs::One(a) => Ok(a),
            other => anyhow::bail!("expected one argument, got {:?}", other),
        }
    }

    pub fn two(&self) -> anyhow::Result<(&str, &str)> {
        match self {
            CommandArgs::Two(a, b) => Ok((a, b)),
            other => anyhow::bail!("expected two arguments, got {:?}", other),
        }
    }
}

/// A matched command with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub kind: CommandKind,
    pub args: CommandArgs,
}
