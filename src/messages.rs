// src/messages.rs

use crate::models::{ScammerEntry, UserProfile};

pub fn welcome_message(user: &UserProfile) -> String {
    format!(
        "Welcome, {}!\n\
        You are signed in to the registry dashboard.\n\
        Type `help` to see the available commands.",
        user.username
    )
}

pub fn record_added(entry: &ScammerEntry) -> String {
    format!(
        "Record added: {} ({})",
        entry.discord_name, entry.discord_id
    )
}

pub fn record_updated(entry: &ScammerEntry) -> String {
    format!(
        "Record updated: {} ({})",
        entry.discord_name, entry.discord_id
    )
}

pub fn record_deleted() -> String {
    "Record deleted".to_string()
}

pub fn delete_prompt(entry: &ScammerEntry) -> String {
    format!(
        "Delete the record for {} ({})? This cannot be undone. [y/N] ",
        entry.discord_name, entry.discord_id
    )
}

pub fn session_expired_message() -> String {
    "Your session has expired or is no longer valid.\n\
    Please log in again with `registry-console login`."
        .to_string()
}

pub fn login_required_message() -> String {
    "This command requires an admin session.\n\
    Log in first with `registry-console login --username <name>`."
        .to_string()
}

pub fn registered_message(user: &UserProfile) -> String {
    format!(
        "Account '{}' created.\n\
        Log in with `registry-console login --username {}`.",
        user.username, user.username
    )
}

pub fn help_message() -> String {
    "Commands:\n\
    \x20 list                 show the registry\n\
    \x20 search <term>        filter by Discord ID or name\n\
    \x20 clear                remove the search filter\n\
    \x20 view <n|id>          show one record\n\
    \x20 add                  add a record\n\
    \x20 edit <n|id>          edit a record\n\
    \x20 delete <n|id>        delete a record\n\
    \x20 stats                show the counters\n\
    \x20 reload               fetch everything again\n\
    \x20 log                  show recent warnings and errors\n\
    \x20 logout               end the session\n\
    \x20 help                 show this help\n\
    \x20 quit                 leave the dashboard"
        .to_string()
}
