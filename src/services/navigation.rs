use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tab {
    Quizzes,
    Profile,
    Home,
}

impl Tab {
    /// Sidebar order: quizzes first, then the teacher profile.
    pub(crate) fn from_sidebar_index(index: usize) -> Self {
        match index {
            0 => Self::Quizzes,
            1 => Self::Profile,
            _ => Self::Home,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Quizzes => "quiz",
            Self::Profile => "profile",
            Self::Home => "home",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quiz" | "quizzes" => Ok(Self::Quizzes),
            "profile" => Ok(Self::Profile),
            "home" | "" => Ok(Self::Home),
            other => Err(format!("unknown tab '{other}'")),
        }
    }
}

/// Which section of a page is visible. Owned by the page it belongs to and
/// dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TabState {
    current: Tab,
}

impl TabState {
    pub(crate) fn new(initial: Tab) -> Self {
        Self { current: initial }
    }

    pub(crate) fn for_classroom() -> Self {
        Self::new(Tab::Quizzes)
    }

    pub(crate) fn for_home() -> Self {
        Self::new(Tab::Home)
    }

    pub(crate) fn current(&self) -> Tab {
        self.current
    }

    pub(crate) fn select(&mut self, tab: Tab) {
        if self.current != tab {
            tracing::debug!(from = %self.current, to = %tab, "Tab changed");
        }
        self.current = tab;
    }
}
