//! Terminal logging with colored module prefixes.
//!
//! ```ignore
//! log!("compile"; "rendered {} media references", count);
//! log!("error"; "could not reach bucket: {err}");
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;

/// Display length of `[module] `.
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Falls back to 120 columns if detection fails (e.g. output is piped).
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

// ============================================================================
// Output
// ============================================================================

/// Print one prefixed line, truncated to the terminal width.
///
/// Multiline messages (e.g. an error chain) are printed in full.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    let width = get_terminal_width() as usize;

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();

    if message.contains('\n') {
        writeln!(stdout, "{prefix} {message}").ok();
    } else {
        let max_msg_len = width.saturating_sub(calc_prefix_len(module.len()));
        writeln!(stdout, "{prefix} {}", truncate_str(message, max_msg_len)).ok();
    }

    stdout.flush().ok();
}

#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "storage" => prefix.bright_blue().bold(),
        "compile" | "migrate" => prefix.bright_green().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within `max_len` bytes on a char boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
