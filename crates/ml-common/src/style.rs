//! ANSI terminal styling for diagnostic output.
//!
//! Escape-code wrappers used by the diagnostic renderer. Every helper resets
//! at the end of the wrapped text. Callers decide whether color is wanted;
//! nothing here inspects the terminal.

/// ANSI escape code styling utilities.
pub struct Style;

impl Style {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const RED: &'static str = "\x1b[31m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const BLUE: &'static str = "\x1b[34m";
    pub const CYAN: &'static str = "\x1b[36m";

    pub fn red(s: &str) -> String {
        format!("{}{}{}", Self::RED, s, Self::RESET)
    }

    pub fn yellow(s: &str) -> String {
        format!("{}{}{}", Self::YELLOW, s, Self::RESET)
    }

    pub fn blue(s: &str) -> String {
        format!("{}{}{}", Self::BLUE, s, Self::RESET)
    }

    pub fn cyan(s: &str) -> String {
        format!("{}{}{}", Self::CYAN, s, Self::RESET)
    }

    pub fn bold(s: &str) -> String {
        format!("{}{}{}", Self::BOLD, s, Self::RESET)
    }

    pub fn bold_red(s: &str) -> String {
        format!("{}{}{}{}", Self::BOLD, Self::RED, s, Self::RESET)
    }

    pub fn bold_yellow(s: &str) -> String {
        format!("{}{}{}{}", Self::BOLD, Self::YELLOW, s, Self::RESET)
    }

    pub fn bold_blue(s: &str) -> String {
        format!("{}{}{}{}", Self::BOLD, Self::BLUE, s, Self::RESET)
    }
}
