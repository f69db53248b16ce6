//! Event types for the host loop.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// One line typed on stdin
    Input(String),
    /// Stdin reached end of file
    InputClosed,
}

/// What the driver should do after a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Free text routed to an agent as a user request
    Submit(String),
    /// Print every agent's summary
    Summary,
    Quit,
    Ignore,
}

/// Interpret one line of user input.
pub fn parse_input(line: &str) -> InputAction {
    let line = line.trim();
    match line {
        "" => InputAction::Ignore,
        "/quit" | "/exit" => InputAction::Quit,
        "/summary" | "/status" => InputAction::Summary,
        text => InputAction::Submit(text.to_string()),
    }
}
