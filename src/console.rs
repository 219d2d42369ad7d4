//! Interactive dashboard shell.
//!
//! Reads one command per line and dispatches it to the `DashboardPage`.
//! Input and output are generic so the shell can be driven from a byte
//! slice in tests and from stdin/stdout in the binary.

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use crate::error::{ConsoleError, Result};
use crate::form::EntryForm;
use crate::logging::SharedLogBuffer;
use crate::messages;
use crate::models::{EntryStatus, ScamMethod, UserProfile};
use crate::pages::{DashboardPage, LoginPage};
use crate::routes::GuardDecision;
use crate::ui::{
    render_detail, render_form_errors, render_header, render_notice, render_table, Notice, Theme,
};

const LOGIN_ATTEMPTS: usize = 3;
const LOG_LINES: usize = 20;

/// Line reader with a prompt
pub struct Prompt<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Print `question` and read one line. `None` on end of input.
    pub async fn ask(&mut self, out: &mut impl Write, question: &str) -> Result<Option<String>> {
        write!(out, "{}", question)?;
        out.flush()?;
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim_end_matches('\r').to_string()))
    }
}

/// Why the shell stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    Quit,
    LoggedOut,
    /// No usable session: never had one, or the server rejected it
    LoginRequired,
    /// A one-shot command did not go through
    Failed,
}

enum Flow {
    Continue,
    Exit(ShellExit),
}

/// Ask for credentials until the login succeeds, the attempts run out or
/// input ends.
pub async fn login_interactive<R, W>(
    prompt: &mut Prompt<R>,
    out: &mut W,
    page: &mut LoginPage,
) -> Result<Option<UserProfile>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    for _ in 0..LOGIN_ATTEMPTS {
        let Some(username) = prompt.ask(out, "Username: ").await? else {
            return Ok(None);
        };
        let Some(password) = prompt.ask(out, "Password: ").await? else {
            return Ok(None);
        };

        if let Some((route, user)) = page.submit(&username, &password).await {
            debug!("Login succeeded, continuing to {}", route);
            return Ok(Some(user));
        }
        if let Some(error) = page.error() {
            writeln!(out, "{}", error)?;
        }
    }
    Ok(None)
}

pub struct Console<R, W> {
    prompt: Prompt<R>,
    out: W,
    page: DashboardPage,
    theme: Theme,
    logs: Option<SharedLogBuffer>,
    confirm_deletes: bool,
    failed: bool,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(prompt: Prompt<R>, out: W, page: DashboardPage, theme: Theme) -> Self {
        Self {
            prompt,
            out,
            page,
            theme,
            logs: None,
            confirm_deletes: true,
            failed: false,
        }
    }

    /// Delete without asking first
    pub fn assume_yes(mut self) -> Self {
        self.confirm_deletes = false;
        self
    }

    /// Make captured warnings available to the `log` command
    pub fn with_logs(mut self, logs: SharedLogBuffer) -> Self {
        self.logs = Some(logs);
        self
    }

    pub async fn run(&mut self) -> Result<ShellExit> {
        if self.page.guard() != GuardDecision::Render {
            writeln!(self.out, "{}", messages::login_required_message())?;
            return Ok(ShellExit::LoginRequired);
        }

        if let Some(user) = self.page.session().user() {
            writeln!(self.out, "{}\n", messages::welcome_message(&user))?;
        }
        if let Flow::Exit(exit) = self.reload().await? {
            return Ok(exit);
        }

        loop {
            let Some(line) = self.prompt.ask(&mut self.out, "registry> ").await? else {
                return Ok(ShellExit::Quit);
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (command, arg) = match line.split_once(char::is_whitespace) {
                Some((command, arg)) => (command.to_string(), arg.trim().to_string()),
                None => (line.to_string(), String::new()),
            };
            debug!("Shell command: {} {}", command, arg);

            if let Flow::Exit(exit) = self.dispatch(&command, &arg).await? {
                return Ok(exit);
            }
        }
    }

    /// Load the dashboard quietly and run a single shell command
    pub async fn run_command(&mut self, command: &str, arg: &str) -> Result<ShellExit> {
        if self.page.guard() != GuardDecision::Render {
            writeln!(self.out, "{}", messages::login_required_message())?;
            return Ok(ShellExit::LoginRequired);
        }

        let flow = match self.page.load().await {
            Ok(()) => self.dispatch(command, arg).await?,
            Err(e) => self.after_error(e)?,
        };
        Ok(match flow {
            Flow::Exit(exit) => exit,
            Flow::Continue if self.failed => ShellExit::Failed,
            Flow::Continue => ShellExit::Quit,
        })
    }

    async fn dispatch(&mut self, command: &str, arg: &str) -> Result<Flow> {
        match command {
            "list" | "ls" => self.print_table(),
            "search" => {
                if arg.is_empty() {
                    writeln!(self.out, "Usage: search <term>")?;
                    return Ok(Flow::Continue);
                }
                self.page.search(arg);
                self.print_table()
            }
            "clear" => {
                self.page.search("");
                self.print_table()
            }
            "view" | "show" => self.view(arg).await,
            "add" => self.submit_form(EntryForm::create()).await,
            "edit" => self.edit(arg).await,
            "delete" | "rm" => self.delete(arg).await,
            "stats" => {
                self.page.refresh_stats().await;
                self.print_header()
            }
            "reload" => self.reload().await,
            "log" => self.print_log(),
            "logout" => {
                self.page.logout();
                writeln!(self.out, "Logged out.")?;
                Ok(Flow::Exit(ShellExit::LoggedOut))
            }
            "help" | "?" => {
                writeln!(self.out, "{}", messages::help_message())?;
                Ok(Flow::Continue)
            }
            "quit" | "exit" => Ok(Flow::Exit(ShellExit::Quit)),
            other => {
                writeln!(self.out, "Unknown command '{}'. Type `help` for a list.", other)?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn reload(&mut self) -> Result<Flow> {
        if let Err(e) = self.page.load().await {
            return self.after_error(e);
        }
        self.print_header()?;
        self.print_table()
    }

    async fn view(&mut self, key: &str) -> Result<Flow> {
        if key.is_empty() {
            writeln!(self.out, "Usage: view <n|id>")?;
            return Ok(Flow::Continue);
        }
        match self.page.view(key).await {
            Ok(entry) => {
                writeln!(self.out, "{}", render_detail(&entry, self.theme))?;
                Ok(Flow::Continue)
            }
            Err(e) => self.after_error(e),
        }
    }

    async fn edit(&mut self, key: &str) -> Result<Flow> {
        if key.is_empty() {
            writeln!(self.out, "Usage: edit <n|id>")?;
            return Ok(Flow::Continue);
        }
        match self.page.view(key).await {
            Ok(entry) => self.submit_form(EntryForm::edit(&entry)).await,
            Err(e) => self.after_error(e),
        }
    }

    async fn delete(&mut self, key: &str) -> Result<Flow> {
        if key.is_empty() {
            writeln!(self.out, "Usage: delete <n|id>")?;
            return Ok(Flow::Continue);
        }
        let entry = match self.page.view(key).await {
            Ok(entry) => entry,
            Err(e) => return self.after_error(e),
        };

        if self.confirm_deletes {
            let answer = self
                .prompt
                .ask(&mut self.out, &messages::delete_prompt(&entry))
                .await?
                .unwrap_or_default();
            if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                writeln!(self.out, "Cancelled.")?;
                return Ok(Flow::Continue);
            }
        }

        match self.page.delete(&entry.id).await {
            Ok(()) => {
                self.print_notice()?;
                self.print_table()
            }
            Err(e) => self.after_error(e),
        }
    }

    /// Fill the form, submit it, and on validation errors show them and ask
    /// again with the entered values as defaults.
    async fn submit_form(&mut self, mut form: EntryForm) -> Result<Flow> {
        loop {
            if !self.fill_form(&mut form).await? {
                writeln!(self.out, "Cancelled.")?;
                self.failed = true;
                return Ok(Flow::Continue);
            }

            match self.page.submit(&mut form).await {
                Ok(_) => {
                    self.print_notice()?;
                    return self.print_table();
                }
                Err(ConsoleError::Validation(_)) => {
                    writeln!(self.out, "{}", render_form_errors(form.errors(), self.theme))?;
                }
                Err(e) => return self.after_error(e),
            }
        }
    }

    /// Returns `false` when input ended part way through
    async fn fill_form(&mut self, form: &mut EntryForm) -> Result<bool> {
        let Some(discord_id) = self.field("Discord ID", &form.discord_id).await? else {
            return Ok(false);
        };
        form.set_discord_id(discord_id);

        let Some(name) = self.field("Discord name", &form.discord_name).await? else {
            return Ok(false);
        };
        form.set_discord_name(name);

        for (i, method) in ScamMethod::ALL.iter().enumerate() {
            writeln!(
                self.out,
                "  {}) {} ({})",
                i + 1,
                method.display_name(),
                method.keyword()
            )?;
        }
        loop {
            let current = form.scam_method.map(|m| m.keyword()).unwrap_or_default();
            let Some(raw) = self.field("Scam method", current).await? else {
                return Ok(false);
            };
            if raw.trim().is_empty() {
                break;
            }
            match parse_method(&raw) {
                Ok(method) => {
                    form.set_scam_method(method);
                    break;
                }
                Err(e) => writeln!(self.out, "{}", e)?,
            }
        }

        let Some(description) = self.field("Description", &form.description).await? else {
            return Ok(false);
        };
        form.set_description(description);

        if form.is_edit() {
            loop {
                let current = form.status().label();
                let Some(raw) = self.field("Status (active/inactive)", current).await? else {
                    return Ok(false);
                };
                match raw.parse::<EntryStatus>() {
                    Ok(status) => {
                        form.set_status(status);
                        break;
                    }
                    Err(e) => writeln!(self.out, "{}", e)?,
                }
            }
        }
        Ok(true)
    }

    /// Prompt for one value; an empty answer keeps `current`
    async fn field(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        let question = if current.is_empty() {
            format!("{}: ", label)
        } else {
            format!("{} [{}]: ", label, current)
        };
        let answer = self.prompt.ask(&mut self.out, &question).await?;
        Ok(answer.map(|a| {
            if a.trim().is_empty() {
                current.to_string()
            } else {
                a
            }
        }))
    }

    /// Show what went wrong. A rejected session ends the shell.
    fn after_error(&mut self, err: ConsoleError) -> Result<Flow> {
        if matches!(self.page.guard(), GuardDecision::Redirect { .. }) {
            writeln!(self.out, "{}", messages::session_expired_message())?;
            return Ok(Flow::Exit(ShellExit::LoginRequired));
        }

        self.failed = true;
        let notice = self
            .page
            .take_notice()
            .unwrap_or_else(|| Notice::Error(err.user_message()));
        writeln!(self.out, "{}", render_notice(&notice, self.theme))?;
        Ok(Flow::Continue)
    }

    fn print_notice(&mut self) -> Result<()> {
        if let Some(notice) = self.page.take_notice() {
            self.failed |= notice.is_error();
            writeln!(self.out, "{}", render_notice(&notice, self.theme))?;
        }
        Ok(())
    }

    fn print_header(&mut self) -> Result<Flow> {
        let header = render_header(
            "Scammer Registry: Admin",
            "Manage flagged Discord accounts",
            self.page.stats(),
            self.theme,
        );
        writeln!(self.out, "{}", header)?;
        Ok(Flow::Continue)
    }

    fn print_table(&mut self) -> Result<Flow> {
        if !self.page.search_term().trim().is_empty() {
            writeln!(self.out, "Filter: \"{}\"", self.page.search_term())?;
        }
        writeln!(self.out, "{}", render_table(self.page.visible(), self.theme))?;
        Ok(Flow::Continue)
    }

    fn print_log(&mut self) -> Result<Flow> {
        let recent = self
            .logs
            .as_ref()
            .map(|logs| logs.get_recent(LOG_LINES))
            .unwrap_or_default();
        if recent.is_empty() {
            writeln!(self.out, "No warnings or errors logged.")?;
        }
        for entry in recent {
            writeln!(self.out, "{}", entry.format())?;
        }
        Ok(Flow::Continue)
    }
}

/// A menu number, a keyword or the stored label
fn parse_method(raw: &str) -> std::result::Result<ScamMethod, String> {
    if let Ok(n) = raw.trim().parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| ScamMethod::ALL.get(i).copied())
            .ok_or_else(|| format!("Pick a number between 1 and {}", ScamMethod::ALL.len()));
    }
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryTokenStorage, SessionStore};
    use crate::test_support::{FakeRegistry, ADMIN_PASSWORD, ADMIN_USER};
    use std::sync::Arc;

    async fn session(api: &Arc<FakeRegistry>, logged_in: bool) -> Arc<SessionStore> {
        let session = Arc::new(SessionStore::new(api.clone(), Box::new(MemoryTokenStorage::new())));
        session.initialize().await;
        if logged_in {
            assert!(session.login(ADMIN_USER, ADMIN_PASSWORD).await.is_success());
        }
        session
    }

    async fn run_shell(api: &Arc<FakeRegistry>, logged_in: bool, input: &str) -> (ShellExit, String) {
        let session = session(api, logged_in).await;
        let page = DashboardPage::new(api.clone(), session, 1000);
        let mut out = Vec::new();
        let exit = {
            let mut console = Console::new(Prompt::new(input.as_bytes()), &mut out, page, Theme::Plain);
            console.run().await.unwrap()
        };
        (exit, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_requires_session() {
        let api = Arc::new(FakeRegistry::new());
        let (exit, out) = run_shell(&api, false, "list\n").await;
        assert_eq!(exit, ShellExit::LoginRequired);
        assert!(out.contains("requires an admin session"));
        assert_eq!(api.calls("list"), 0);
    }

    #[tokio::test]
    async fn test_list_search_and_quit() {
        let api = Arc::new(FakeRegistry::new());
        let (exit, out) = run_shell(&api, true, "search bot\nclear\nquit\n").await;
        assert_eq!(exit, ShellExit::Quit);
        assert!(out.contains("Welcome, admin!"));
        assert!(out.contains("Filter: \"bot\""));
        assert!(out.contains("Registry (1 records)"));
        assert!(out.contains("Registry (3 records)"));
    }

    #[tokio::test]
    async fn test_add_retries_after_validation_error() {
        let api = Arc::new(FakeRegistry::new());
        let input = "add\n123\nFresh\n2\nThreats\n444444444444444444\n\n\n\nquit\n";
        let (exit, out) = run_shell(&api, true, input).await;

        assert_eq!(exit, ShellExit::Quit);
        assert!(out.contains("Discord ID must be exactly 18 digits"));
        assert!(out.contains("[ok] Record added: Fresh (444444444444444444)"));
        assert_eq!(api.calls("create"), 1);
        assert_eq!(api.entry_count(), 4);
    }

    #[tokio::test]
    async fn test_edit_changes_status() {
        let api = Arc::new(FakeRegistry::new());
        let (_, out) = run_shell(&api, true, "edit e1\n\n\n\n\ninactive\nview e1\n").await;
        assert!(out.contains("[ok] Record updated: NitroKing"));
        assert_eq!(api.calls("update"), 1);
        assert!(out.contains("Inactive"));
    }

    #[tokio::test]
    async fn test_delete_asks_for_confirmation() {
        let api = Arc::new(FakeRegistry::new());
        let (_, out) = run_shell(&api, true, "delete 1\nn\ndelete e1\nyes\n").await;
        assert!(out.contains("Cancelled."));
        assert!(out.contains("[ok] Record deleted"));
        assert_eq!(api.calls("delete"), 1);
        assert_eq!(api.entry_count(), 2);
    }

    #[tokio::test]
    async fn test_revoked_token_ends_shell() {
        let api = Arc::new(FakeRegistry::new());
        let session = session(&api, true).await;
        let page = DashboardPage::new(api.clone(), session.clone(), 1000);
        let mut out = Vec::new();

        let mut console = Console::new(
            Prompt::new("reload\nreload\nlist\n".as_bytes()),
            &mut out,
            page,
            Theme::Plain,
        );
        api.revoke_tokens();
        assert_eq!(console.run().await.unwrap(), ShellExit::LoginRequired);
        drop(console);

        assert!(String::from_utf8(out).unwrap().contains("session has expired"));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_unknown_command_and_logout() {
        let api = Arc::new(FakeRegistry::new());
        let (exit, out) = run_shell(&api, true, "frobnicate\nlog\nlogout\n").await;
        assert_eq!(exit, ShellExit::LoggedOut);
        assert!(out.contains("Unknown command 'frobnicate'"));
        assert!(out.contains("No warnings or errors logged."));
    }

    #[tokio::test]
    async fn test_login_interactive_retries() {
        let api = Arc::new(FakeRegistry::new());
        let session = session(&api, false).await;
        let mut page = LoginPage::new(session.clone());
        let input = format!("{}\nwrong\n{}\n{}\n", ADMIN_USER, ADMIN_USER, ADMIN_PASSWORD);
        let mut prompt = Prompt::new(input.as_bytes());
        let mut out = Vec::new();

        let user = login_interactive(&mut prompt, &mut out, &mut page).await.unwrap();
        assert_eq!(user.unwrap().username, ADMIN_USER);
        assert!(String::from_utf8(out).unwrap().contains("Incorrect username or password"));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_run_command_delete_without_prompt() {
        let api = Arc::new(FakeRegistry::new());
        let session = session(&api, true).await;
        let page = DashboardPage::new(api.clone(), session, 1000);
        let mut out = Vec::new();

        let mut console =
            Console::new(Prompt::new("".as_bytes()), &mut out, page, Theme::Plain).assume_yes();
        assert_eq!(console.run_command("delete", "e2").await.unwrap(), ShellExit::Quit);
        assert_eq!(console.run_command("delete", "e404").await.unwrap(), ShellExit::Failed);
        assert_eq!(api.entry_count(), 2);
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("3"), Ok(ScamMethod::CryptoScam));
        assert_eq!(parse_method("giveaway"), Ok(ScamMethod::FakeGiveaway));
        assert!(parse_method("9").is_err());
        assert!(parse_method("teleport").is_err());
    }
}
