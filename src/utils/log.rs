//! Terminal logging with colored module prefixes.
//!
//! Messages are written as `[module] message`, with the prefix color keyed
//! by module name.
//!
//! # Example
//!
//! ```ignore
//! log!("fetch"; "fetched {} readmes", count);
//! ```

use colored::{ColoredString, Colorize};
use std::io::{Write, stdout};

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::log($module, &format!($($arg)*))
    }};
}

/// Write one `[module] message` line to stdout.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);

    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type.
fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "error" | "warn" => prefix.bright_red().bold(),
        "fetch" => prefix.bright_cyan().bold(),
        "init" => prefix.bright_green().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_wraps_module_in_brackets() {
        let prefix = colorize_prefix("fetch");
        assert!(format!("{prefix}").contains("[fetch]"));
    }

    #[test]
    fn test_prefix_handles_mixed_case() {
        let prefix = colorize_prefix("Error");
        assert!(format!("{prefix}").contains("[Error]"));
    }

    #[test]
    fn test_log_does_not_panic_on_empty_message() {
        log("build", "");
    }
}
