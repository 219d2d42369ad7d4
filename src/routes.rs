//! Console views and the guard in front of the admin dashboard

use std::fmt;

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Public listing
    Home,
    AdminLogin,
    AdminDashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::AdminLogin => "/admin/login",
            Route::AdminDashboard => "/admin/dashboard",
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::AdminDashboard)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation history. `replace` swaps the current entry so `back` skips it.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            entries: vec![start],
        }
    }

    pub fn current(&self) -> Route {
        // Never empty: created with one entry and `back` keeps the last one
        self.entries.last().copied().unwrap_or(Route::Home)
    }

    pub fn push(&mut self, route: Route) {
        self.entries.push(route);
    }

    pub fn replace(&mut self, route: Route) {
        self.entries.pop();
        self.entries.push(route);
    }

    /// Go back one entry; returns `None` when already at the first entry.
    #[cfg(test)]
    pub fn back(&mut self) -> Option<Route> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop();
        Some(self.current())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Apply a guard decision to the history
    pub fn apply(&mut self, decision: &GuardDecision) {
        if let GuardDecision::Redirect { to, replace } = decision {
            if *replace {
                self.replace(*to);
            } else {
                self.push(*to);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still being checked: show a placeholder, do not navigate
    Loading,
    Render,
    Redirect { to: Route, replace: bool },
}

/// Decide what a visit to `route` shows given the current session
pub fn guard(route: Route, session: &SessionState) -> GuardDecision {
    if !route.is_protected() {
        return GuardDecision::Render;
    }

    match session {
        SessionState::Initializing => GuardDecision::Loading,
        SessionState::Authenticated { .. } => GuardDecision::Render,
        SessionState::Unauthenticated => GuardDecision::Redirect {
            to: Route::AdminLogin,
            replace: true,
        },
    }
}
