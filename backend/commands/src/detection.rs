/// Command detection: match trimmed text against the ordered table and
/// extract arguments by arity.
use crate::registry::CommandRegistry;
use crate::types::{Arity, CommandArgs, CommandDef, CommandInvocation, MatchMode};

/// Result of matching a line of text against the command table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection<'a> {
    /// A command matched and its arguments are well formed.
    Invocation(CommandInvocation),
    /// A command matched but its arguments do not fit its arity.
    UsageError(&'a CommandDef),
    /// Nothing in the table matched.
    Unknown,
}

/// Detect a command in `text`. The first matching table entry wins.
pub fn detect_command<'a>(text: &str, registry: &'a CommandRegistry) -> Detection<'a> {
    let trimmed = text.trim();

    for def in registry.all() {
        let Some(rest) = match_token(def, trimmed) else {
            continue;
        };
        return match parse_args(rest, &def.arity) {
            Some(args) => Detection::Invocation(CommandInvocation { kind: def.kind, args }),
            None => Detection::UsageError(def),
        };
    }
    Detection::Unknown
}

/// Returns the trimmed remainder after the token if `text` matches `def`.
fn match_token<'t>(def: &CommandDef, text: &'t str) -> Option<&'t str> {
    match def.mode {
        MatchMode::Exact => (text == def.token).then_some(""),
        MatchMode::Prefix => {
            let rest = text.strip_prefix(def.token.as_str())?;
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                Some(rest.trim())
            } else {
                None
            }
        }
    }
}

fn parse_args(rest: &str, arity: &Arity) -> Option<CommandArgs> {
    match arity {
        Arity::None => Some(CommandArgs::None),
        Arity::One { .. } => {
            if rest.is_empty() {
                None
            } else {
                Some(CommandArgs::One(rest.to_string()))
            }
        }
        Arity::Two { .. } => {
            let (first, second) = rest.split_once(' ')?;
            Some(CommandArgs::Two(first.to_string(), second.trim_start().to_string()))
        }
    }
}
