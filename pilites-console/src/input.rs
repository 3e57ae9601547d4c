//! Operator input: stdin lines to session actions.

/// What a line typed during a session asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// `n`: advance to the next cue.
    Next,
    /// `b`: toggle blackout (live only).
    Blackout,
    /// `s`: stop the session.
    Stop,
    /// `q`: leave the console, the session keeps running.
    Quit,
}

/// Convert one stdin line to an action (if applicable).
pub fn translate_line(line: &str) -> Option<InputAction> {
    match line.trim().to_ascii_lowercase().as_str() {
        "n" | "next" => Some(InputAction::Next),
        "b" | "blackout" => Some(InputAction::Blackout),
        "s" | "stop" => Some(InputAction::Stop),
        "q" | "quit" => Some(InputAction::Quit),
        _ => None,
    }
}

/// Whether an answer to a yes/no prompt accepts it.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub const HELP: &str = "keys: n = next cue, b = blackout, s = stop, q = quit (then Enter)";
