#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,          // /refresh
    Key(String),      // /key <value>
    ClearKey,         // /clear-key
    Help,             // /help
    Quit,             // /quit or /exit
    Unknown(String),
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Command::Unknown(trimmed.to_string());
    }
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or_default();
    let rest = parts.next().map(str::trim).filter(|s| !s.is_empty());

    match (verb, rest) {
        ("/refresh", _) => Command::Refresh,
        ("/key", Some(key)) => Command::Key(key.to_string()),
        ("/key", None) => Command::Unknown("/key needs a value".to_string()),
        ("/clear-key", _) => Command::ClearKey,
        ("/help", _) => Command::Help,
        ("/quit" | "/exit", _) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}
