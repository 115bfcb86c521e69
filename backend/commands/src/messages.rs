//! Reply text sent back to the channel. Slack mrkdwn and emoji shortcodes
//! render on the platform side.

use crate::types::{CommandArgs, CommandDef, CommandInvocation, CommandKind};

pub const UNKNOWN_KEYWORD: &str = "🤷 I don't know that one yet.";
pub const INVALID_COMMAND: &str = "⚠️ Invalid command. Type `!help` to see what I understand.";
pub const NO_KEYWORDS: &str = "⚠️ No keywords are registered yet.";

pub const LIST_FAILED: &str = "❌ Failed to fetch the keyword list.";
pub const SEARCH_FAILED: &str = "❌ Failed to search keywords.";
pub const RANDOM_FAILED: &str = "❌ Failed to pick random keywords.";

pub fn usage(def: &CommandDef) -> String {
    format!("⚠️ Usage: `{}`", def.usage())
}

pub fn added(keyword: &str) -> String {
    format!("✅ Registered `{keyword}`!")
}

pub fn updated(keyword: &str) -> String {
    format!("🔄 Updated `{keyword}`!")
}

pub fn deleted(keyword: &str) -> String {
    format!("✅ Deleted `{keyword}`.")
}

pub fn no_matches(query: &str) -> String {
    format!("🔍 No keywords match `{query}`.")
}

/// `header` followed by one `- item` line per entry.
pub fn bulleted<I, S>(header: &str, items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = header.to_string();
    for item in items {
        out.push_str("\n- ");
        out.push_str(item.as_ref());
    }
    out
}

/// Reply for a command whose handler returned an error.
pub fn command_failed(inv: &CommandInvocation) -> String {
    let verb = match inv.kind {
        CommandKind::Lookup => "look up",
        CommandKind::Add => "register",
        CommandKind::Update => "update",
        CommandKind::Delete => "delete",
        CommandKind::List => return LIST_FAILED.to_string(),
        CommandKind::Search => return SEARCH_FAILED.to_string(),
        CommandKind::Random => return RANDOM_FAILED.to_string(),
        CommandKind::Help => return "❌ Failed to show help.".to_string(),
    };
    match &inv.args {
        CommandArgs::One(keyword) | CommandArgs::Two(keyword, _) => {
            format!("❌ Failed to {verb} `{keyword}`. Please try again later.")
        }
        CommandArgs::None => format!("❌ Failed to {verb}. Please try again later."),
    }
}
