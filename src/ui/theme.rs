use std::fmt;
use std::str::FromStr;

/// Visual style of the console output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Whitespace-aligned columns, ASCII only
    #[default]
    Plain,
    /// Box-drawing borders around tables and panels
    Boxed,
}

impl Theme {
    pub(super) fn horizontal(&self) -> char {
        match self {
            Theme::Plain => '-',
            Theme::Boxed => '─',
        }
    }

    /// Column separator inside a row
    pub(super) fn separator(&self) -> &'static str {
        match self {
            Theme::Plain => "  ",
            Theme::Boxed => " │ ",
        }
    }

    /// Separator used on rule lines between header and body
    pub(super) fn rule_separator(&self) -> &'static str {
        match self {
            Theme::Plain => "  ",
            Theme::Boxed => "─┼─",
        }
    }

    pub(super) fn row_edges(&self) -> (&'static str, &'static str) {
        match self {
            Theme::Plain => ("", ""),
            Theme::Boxed => ("│ ", " │"),
        }
    }

    /// Top and bottom border corners, `None` for themes without a frame
    pub(super) fn frame(&self) -> Option<[&'static str; 4]> {
        match self {
            Theme::Plain => None,
            Theme::Boxed => Some(["┌─", "─┐", "└─", "─┘"]),
        }
    }

    pub(super) fn frame_join(&self, top: bool) -> &'static str {
        match (self, top) {
            (Theme::Plain, _) => "  ",
            (Theme::Boxed, true) => "─┬─",
            (Theme::Boxed, false) => "─┴─",
        }
    }

    pub(super) fn rule_edges(&self) -> (&'static str, &'static str) {
        match self {
            Theme::Plain => ("", ""),
            Theme::Boxed => ("├─", "─┤"),
        }
    }

    pub(super) fn bullet(&self) -> &'static str {
        match self {
            Theme::Plain => "*",
            Theme::Boxed => "•",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Plain => f.write_str("plain"),
            Theme::Boxed => f.write_str("boxed"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Theme::Plain),
            "boxed" => Ok(Theme::Boxed),
            other => Err(format!("unknown theme '{}' (expected plain or boxed)", other)),
        }
    }
}
