/// The glossary command table.
///
/// Order matters: the first matching entry wins, so a token must come before
/// any shorter token it starts with.
use crate::types::{Arity, CommandDef, CommandKind, MatchMode};

fn none() -> Arity {
    Arity::None
}

fn one(name: &str) -> Arity {
    Arity::One { name: name.to_string() }
}

fn two(first: &str, second: &str) -> Arity {
    Arity::Two { first: first.to_string(), second: second.to_string() }
}

fn def(kind: CommandKind, token: &str, mode: MatchMode, arity: Arity, description: &str) -> CommandDef {
    CommandDef {
        kind,
        token: token.to_string(),
        mode,
        arity,
        description: description.to_string(),
    }
}

/// Build the built-in command table.
pub fn builtin_commands() -> Vec<CommandDef> {
    use CommandKind::*;
    use MatchMode::*;

    vec![
        def(Lookup, "!word", Prefix, one("keyword"), "Look up a keyword."),
        def(Add, "!addword", Prefix, two("keyword", "description"), "Register a keyword."),
        def(Update, "!update", Prefix, two("keyword", "description"), "Replace a keyword's description."),
        def(Delete, "!deleteword", Prefix, one("keyword"), "Delete a keyword."),
        def(List, "!list", Exact, none(), "Show the 10 most recently added keywords."),
        def(Search, "!search", Prefix, one("text"), "Find keywords containing some text."),
        def(Random, "!random", Exact, none(), "Show up to 10 random keywords."),
        def(Help, "!help", Exact, none(), "Show available commands."),
    ]
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: builtin_commands() }
    }

    /// Build a registry from an explicit ordered table.
    pub fn from_defs(commands: Vec<CommandDef>) -> Self {
        Self { commands }
    }

    pub fn all(&self) -> &[CommandDef] {
        &self.commands
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_registered_once() {
        let registry = CommandRegistry::new();
        for kind in [
            CommandKind::Lookup,
            CommandKind::Add,
            CommandKind::Update,
            CommandKind::Delete,
            CommandKind::List,
            CommandKind::Search,
            CommandKind::Random,
            CommandKind::Help,
        ] {
            let count = registry.all().iter().filter(|c| c.kind == kind).count();
            assert_eq!(count, 1, "{kind} registered {count} times");
        }
    }

    #[test]
    fn test_tokens_are_unique() {
        let commands = builtin_commands();
        for (i, earlier) in commands.iter().enumerate() {
            for later in &commands[i + 1..] {
                assert_ne!(earlier.token, later.token, "duplicate token shadows a later command");
            }
        }
    }
}
