//! Terminal presentation preferences, fixed once per invocation.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::GlobalFlags;

/// Narrower `COLUMNS` values are ignored.
const MIN_TERM_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default)]
pub struct UiPrefs {
    /// Color status cells in table output.
    pub table_color: bool,
    /// Width to fit tables into; `None` leaves them unconstrained.
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let table_color = flags.is_table()
        && !flags.quiet
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    let term_width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|width| *width >= MIN_TERM_WIDTH);

    let _ = UI_PREFS.set(UiPrefs {
        table_color,
        term_width,
    });
}

/// Preferences set by [`init`], or plain defaults when it has not run (tests).
#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}
