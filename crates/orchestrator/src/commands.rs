//! Chat command parsing.

use scheduler::{parse_hhmm, Recurrence, TimeOfDay};

/// Usage for the admin command group.
pub const ADMIN_USAGE: &str =
    "Usage: admin clearhistory | admin setmodel <model> | admin listmodels | admin autoreply <on|off>";

/// Usage for the dailyjoke command.
pub const DAILYJOKE_USAGE: &str = "Usage: dailyjoke <on|off>";

/// Usage for the schedule command.
pub const SCHEDULE_USAGE: &str =
    "Usage: schedule <HH:MM> <message> [daily] (24-hour time, UTC)";

/// An on/off switch argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    /// Parse `on` / `off`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "on" => Some(Toggle::On),
            "off" => Some(Toggle::Off),
            _ => None,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, Toggle::On)
    }
}

/// Administrator-only operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    ClearHistory,
    SetModel(String),
    ListModels,
    Autoreply(Toggle),
    /// Missing or malformed subcommand.
    Invalid,
}

impl AdminCommand {
    pub fn name(&self) -> &'static str {
        match self {
            AdminCommand::ClearHistory => "admin clearhistory",
            AdminCommand::SetModel(_) => "admin setmodel",
            AdminCommand::ListModels => "admin listmodels",
            AdminCommand::Autoreply(_) => "admin autoreply",
            AdminCommand::Invalid => "admin",
        }
    }
}

/// A parsed `schedule` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub time: TimeOfDay,
    pub content: String,
    pub recurrence: Recurrence,
}

/// A recognised chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Admin(AdminCommand),
    DailyJoke(Toggle),
    Schedule(ScheduleRequest),
    /// Known command with bad arguments; reply with the usage text.
    Invalid { usage: &'static str },
    /// Unrecognised command word.
    Unknown(String),
}

impl Command {
    /// Parse a message as a command.
    ///
    /// Returns `None` when the text does not start with `prefix`, i.e. it is
    /// plain chat.
    pub fn parse(text: &str, prefix: &str) -> Option<Command> {
        let body = text.trim().strip_prefix(prefix)?;
        let (word, rest) = split_word(body);

        let command = match word.to_ascii_lowercase().as_str() {
            "help" => Command::Help,
            "admin" => Command::Admin(parse_admin(rest)),
            "dailyjoke" => match Toggle::parse(rest.trim()) {
                Some(toggle) => Command::DailyJoke(toggle),
                None => Command::Invalid {
                    usage: DAILYJOKE_USAGE,
                },
            },
            "schedule" => match parse_schedule(rest) {
                Some(request) => Command::Schedule(request),
                None => Command::Invalid {
                    usage: SCHEDULE_USAGE,
                },
            },
            _ => Command::Unknown(word.to_string()),
        };

        Some(command)
    }

    /// Whether the command requires the administrator capability.
    pub fn is_admin_only(&self) -> bool {
        matches!(self, Command::Admin(_))
    }

    /// Short name used in logs.
    pub fn name(&self) -> &str {
        match self {
            Command::Help => "help",
            Command::Admin(admin) => admin.name(),
            Command::DailyJoke(_) => "dailyjoke",
            Command::Schedule(_) => "schedule",
            Command::Invalid { .. } => "invalid",
            Command::Unknown(_) => "unknown",
        }
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

fn parse_admin(args: &str) -> AdminCommand {
    let (sub, rest) = split_word(args);
    let rest = rest.trim();

    match sub.to_ascii_lowercase().as_str() {
        "clearhistory" => AdminCommand::ClearHistory,
        "listmodels" => AdminCommand::ListModels,
        "setmodel" if !rest.is_empty() && !rest.contains(char::is_whitespace) => {
            AdminCommand::SetModel(rest.to_string())
        }
        "autoreply" => Toggle::parse(rest)
            .map(AdminCommand::Autoreply)
            .unwrap_or(AdminCommand::Invalid),
        _ => AdminCommand::Invalid,
    }
}

fn parse_schedule(args: &str) -> Option<ScheduleRequest> {
    let (time, rest) = split_word(args);
    let time = parse_hhmm(time).ok()?;

    let mut content = rest.trim();
    let mut recurrence = Recurrence::None;

    if content.eq_ignore_ascii_case("daily") {
        return None;
    }
    if let Some((head, last)) = content.rsplit_once(char::is_whitespace) {
        if last.eq_ignore_ascii_case("daily") {
            content = head.trim_end();
            recurrence = Recurrence::Daily;
        }
    }

    if content.is_empty() {
        return None;
    }

    Some(ScheduleRequest {
        time,
        content: content.to_string(),
        recurrence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Command {
        Command::parse(text, "!").unwrap()
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert!(Command::parse("hello there", "!").is_none());
        assert!(Command::parse("what about !help", "!").is_none());
    }

    #[test]
    fn test_help_and_unknown() {
        assert_eq!(parse("!help"), Command::Help);
        assert_eq!(parse("!HELP"), Command::Help);
        assert_eq!(parse("!dance now"), Command::Unknown("dance".to_string()));
        assert_eq!(parse("!"), Command::Unknown(String::new()));
    }

    #[test]
    fn test_admin_subcommands() {
        assert_eq!(parse("!admin clearhistory"), Command::Admin(AdminCommand::ClearHistory));
        assert_eq!(
            parse("!admin setmodel gpt-x"),
            Command::Admin(AdminCommand::SetModel("gpt-x".to_string()))
        );
        assert_eq!(parse("!admin listmodels"), Command::Admin(AdminCommand::ListModels));
        assert_eq!(
            parse("!admin autoreply OFF"),
            Command::Admin(AdminCommand::Autoreply(Toggle::Off))
        );
    }

    #[test]
    fn test_admin_invalid_is_still_admin_only() {
        for text in ["!admin", "!admin setmodel", "!admin autoreply maybe", "!admin reboot"] {
            let command = parse(text);
            assert_eq!(command, Command::Admin(AdminCommand::Invalid), "{text}");
            assert!(command.is_admin_only());
        }
    }

    #[test]
    fn test_dailyjoke() {
        assert_eq!(parse("!dailyjoke on"), Command::DailyJoke(Toggle::On));
        assert_eq!(parse("!dailyjoke off"), Command::DailyJoke(Toggle::Off));
        assert_eq!(parse("!dailyjoke"), Command::Invalid { usage: DAILYJOKE_USAGE });
        assert_eq!(parse("!dailyjoke yes"), Command::Invalid { usage: DAILYJOKE_USAGE });
        assert!(!parse("!dailyjoke on").is_admin_only());
    }

    #[test]
    fn test_schedule_once() {
        let Command::Schedule(request) = parse("!schedule 09:00 Stand-up in five") else {
            panic!("expected schedule");
        };
        assert_eq!(request.time.to_string(), "09:00");
        assert_eq!(request.content, "Stand-up in five");
        assert_eq!(request.recurrence, Recurrence::None);
    }

    #[test]
    fn test_schedule_daily() {
        let Command::Schedule(request) = parse("!schedule 18:30 Go home!  DAILY") else {
            panic!("expected schedule");
        };
        assert_eq!(request.content, "Go home!");
        assert_eq!(request.recurrence, Recurrence::Daily);
    }

    #[test]
    fn test_schedule_invalid() {
        for text in [
            "!schedule",
            "!schedule 25:00 hi",
            "!schedule 9am hi",
            "!schedule 09:00",
            "!schedule 09:00 daily",
        ] {
            assert_eq!(parse(text), Command::Invalid { usage: SCHEDULE_USAGE }, "{text}");
        }
    }

    #[test]
    fn test_custom_prefix() {
        assert_eq!(Command::parse("?help", "?"), Some(Command::Help));
        assert!(Command::parse("!help", "?").is_none());
    }
}
