pub mod detection;
pub mod dispatch;
pub mod handlers;
pub mod messages;
pub mod registry;
pub mod types;
pub mod worker;

use std::sync::Arc;

use glossbot_core::GlossaryStore;

pub use detection::{detect_command, Detection};
pub use dispatch::{CommandContext, CommandDispatcher, CommandHandler};
pub use handlers::{
    AddHandler, DeleteHandler, HelpHandler, ListHandler, LookupHandler, RandomHandler,
    SearchHandler, UpdateHandler, LIST_LIMIT, RANDOM_LIMIT,
};
pub use registry::{builtin_commands, CommandRegistry};
pub use types::{Arity, CommandArgs, CommandDef, CommandInvocation, CommandKind, MatchMode};
pub use worker::CommandWorker;

/// Build a dispatcher pre-wired with every glossary handler over `store`.
pub fn build_default_dispatcher(store: Arc<dyn GlossaryStore>) -> CommandDispatcher {
    let registry = CommandRegistry::new();
    let mut dispatcher = CommandDispatcher::new(registry.clone());

    dispatcher.register(CommandKind::Lookup, Arc::new(LookupHandler { store: store.clone() }));
    dispatcher.register(CommandKind::Add, Arc::new(AddHandler { store: store.clone() }));
    dispatcher.register(CommandKind::Update, Arc::new(UpdateHandler { store: store.clone() }));
    dispatcher.register(CommandKind::Delete, Arc::new(DeleteHandler { store: store.clone() }));
    dispatcher.register(CommandKind::List, Arc::new(ListHandler { store: store.clone() }));
    dispatcher.register(CommandKind::Search, Arc::new(SearchHandler { store: store.clone() }));
    dispatcher.register(CommandKind::Random, Arc::new(RandomHandler { store }));
    dispatcher.register(CommandKind::Help, Arc::new(HelpHandler { registry }));

    dispatcher
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossbot_core::GlossaryEntry;
    use glossbot_store::InMemoryGlossaryStore;

    fn setup() -> (InMemoryGlossaryStore, CommandDispatcher) {
        let store = InMemoryGlossaryStore::new();
        let dispatcher = build_default_dispatcher(Arc::new(store.clone()));
        (store, dispatcher)
    }

    async fn say(dispatcher: &CommandDispatcher, text: &str) -> String {
        dispatcher.respond(&CommandContext::new("C1"), text).await
    }

    #[tokio::test]
    async fn test_unknown_keyword_placeholder() {
        let (_, d) = setup();
        assert_eq!(say(&d, "!word nothing-here").await, messages::UNKNOWN_KEYWORD);
    }

    #[tokio::test]
    async fn test_add_then_lookup() {
        let (_, d) = setup();
        let reply = say(&d, "!addword foo bar baz").await;
        assert!(reply.contains("`foo`"));
        assert_eq!(say(&d, "!word foo").await, "bar baz");
    }

    #[tokio::test]
    async fn test_add_update_lookup() {
        let (store, d) = setup();
        say(&d, "!addword foo first").await;
        let created = store.get("foo").await.unwrap().unwrap().created_at;

        let reply = say(&d, "!update foo second try").await;
        assert!(reply.contains("`foo`"));
        assert_eq!(say(&d, "!word foo").await, "second try");
        assert_eq!(store.get("foo").await.unwrap().unwrap().created_at, created);
    }

    #[tokio::test]
    async fn test_delete_then_lookup() {
        let (_, d) = setup();
        say(&d, "!addword foo bar").await;
        assert!(say(&d, "!deleteword foo").await.contains("`foo`"));
        assert_eq!(say(&d, "!word foo").await, messages::UNKNOWN_KEYWORD);

        // Deleting something that never existed still confirms.
        assert!(say(&d, "!deleteword never").await.contains("`never`"));
        assert_eq!(say(&d, "!word never").await, messages::UNKNOWN_KEYWORD);
    }

    #[tokio::test]
    async fn test_usage_error_leaves_store_untouched() {
        let (store, d) = setup();
        let reply = say(&d, "!word ").await;
        assert_eq!(reply, "⚠️ Usage: `!word <keyword>`");

        let reply = say(&d, "!addword onlykeyword").await;
        assert_eq!(reply, "⚠️ Usage: `!addword <keyword> <description>`");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_command() {
        let (_, d) = setup();
        assert_eq!(say(&d, "!nope").await, messages::INVALID_COMMAND);
        assert_eq!(say(&d, "just chatting").await, messages::INVALID_COMMAND);
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let (store, d) = setup();
        store.put(GlossaryEntry::new("API", "interface")).await.unwrap();
        assert_eq!(say(&d, "!word API").await, "interface");
        assert_eq!(say(&d, "!word api").await, messages::UNKNOWN_KEYWORD);
    }

    #[tokio::test]
    async fn test_help_lists_every_command() {
        let (_, d) = setup();
        let reply = say(&d, "!help").await;
        for def in builtin_commands() {
            assert!(reply.contains(&def.usage()), "help is missing {}", def.token);
        }
    }
}
