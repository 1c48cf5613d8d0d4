//! Script line parsing.
//!
//! A script line is a tab-separated list of fields. The first field selects
//! the command family and later fields select sub-commands. Both are matched
//! by substring containment rather than equality: a ROBOT line whose second
//! field merely contains `STORY_INTRO` still plays a story intro. The matcher
//! tables below are checked in order and the first hit wins.

use crate::Setting;
use fabler_core::ResponseBank;
use fabler_error::{ScriptError, ScriptErrorKind};
use std::fmt;
use std::time::Duration;

/// Command families recognized in the first field of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CommandFamily {
    /// Push the next personalized story
    #[display("STORY")]
    Story,
    /// Forward to the robot
    #[display("ROBOT")]
    Robot,
    /// Forward to the tablet game
    #[display("OPAL")]
    Opal,
    /// Sleep
    #[display("PAUSE")]
    Pause,
    /// Populate a response bank
    #[display("ADD")]
    Add,
    /// Change a session setting
    #[display("SET")]
    Set,
    /// Wait for a user response
    #[display("WAIT")]
    Wait,
    /// Push a repeating script
    #[display("REPEAT")]
    Repeat,
}

/// Families available to lines with two or more fields, with the minimum
/// field count each needs. A one-field line can only be STORY.
const FAMILY_MATCHERS: &[(&str, CommandFamily, usize)] = &[
    ("ROBOT", CommandFamily::Robot, 2),
    ("OPAL", CommandFamily::Opal, 2),
    ("PAUSE", CommandFamily::Pause, 2),
    ("ADD", CommandFamily::Add, 3),
    ("SET", CommandFamily::Set, 3),
    ("WAIT", CommandFamily::Wait, 3),
    ("REPEAT", CommandFamily::Repeat, 3),
];

/// Robot sub-commands that draw a phrase from a bank instead of forwarding.
const ROBOT_MATCHERS: &[(&str, RobotAction)] = &[
    ("STORY_INTRO", RobotAction::StoryIntro),
    ("STORY_CLOSING", RobotAction::StoryClosing),
];

#[derive(Debug, Clone, Copy)]
enum OpalMatch {
    LoadAll,
    LoadStory,
    LoadAnswers,
}

/// Tablet sub-commands handled by the engine, with their minimum field count.
const OPAL_MATCHERS: &[(&str, OpalMatch, usize)] = &[
    ("LOAD_ALL", OpalMatch::LoadAll, 3),
    ("LOAD_STORY", OpalMatch::LoadStory, 2),
    ("LOAD_ANSWERS", OpalMatch::LoadAnswers, 3),
];

/// Session settings in match order. `MAX_STORIES` must come last since the
/// other keys are more specific.
const SETTING_MATCHERS: &[(&str, SettingKey)] = &[
    ("MAX_INCORRECT_RESPONSES", SettingKey::MaxIncorrectResponses),
    ("MAX_GAME_TIME", SettingKey::MaxGameTime),
    ("MAX_STORIES", SettingKey::MaxStories),
];

#[derive(Debug, Clone, Copy)]
enum SettingKey {
    MaxIncorrectResponses,
    MaxGameTime,
    MaxStories,
}

/// Alias accepted by REPEAT in place of a literal count.
const MAX_STORIES_ALIAS: &str = "MAX_STORIES";

/// What the robot should say or do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotAction {
    /// Random phrase from `STORY_INTROS`
    StoryIntro,
    /// Random phrase from `STORY_CLOSINGS`
    StoryClosing,
    /// Literal command and properties
    Send {
        /// Robot command
        command: String,
        /// Command properties, empty when the line had none
        properties: String,
    },
}

/// What the tablet should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpalAction {
    /// Load every object descriptor listed in a file
    LoadAll {
        /// Session-relative descriptor file
        file: String,
    },
    /// Set up the scene for the next story
    LoadStory,
    /// Load answer options in random order
    LoadAnswers {
        /// Comma-separated answer names
        answers: String,
    },
    /// Literal command and optional properties
    Send {
        /// Tablet command
        command: String,
        /// Command properties
        properties: Option<String>,
    },
}

/// How many passes a REPEAT makes over its script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    /// Literal pass count
    Times(u32),
    /// Copy the session's `MAX_STORIES`
    MaxStories,
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Push the next personalized story
    Story,
    /// Robot command
    Robot(RobotAction),
    /// Tablet command
    Opal(OpalAction),
    /// Block for a fixed duration
    Pause(Duration),
    /// Replace a bank's phrases with the lines of a file
    Add {
        /// Bank to fill
        bank: ResponseBank,
        /// Session-relative phrase file
        file: String,
    },
    /// Change a session setting
    Set(Setting),
    /// Run the response-wait protocol
    Wait {
        /// Requested response kind, matched by substring
        kind: String,
        /// Per-attempt timeout
        timeout: Duration,
    },
    /// Push a repeating script
    Repeat {
        /// Number of passes
        count: RepeatCount,
        /// Session-relative script file
        file: String,
    },
}

impl Command {
    /// Parse a raw script line.
    ///
    /// Returns `Ok(None)` for lines that carry no command: blank lines,
    /// unknown families, too few fields, unknown banks or setting keys.
    /// Returns `Err` when a recognized command has an argument that cannot
    /// be interpreted.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabler_script::{Command, RobotAction};
    ///
    /// let cmd = Command::parse("ROBOT\tDO\tHello there!").unwrap().unwrap();
    /// assert_eq!(
    ///     cmd,
    ///     Command::Robot(RobotAction::Send {
    ///         command: "DO".to_string(),
    ///         properties: "Hello there!".to_string(),
    ///     })
    /// );
    ///
    /// assert!(Command::parse("").unwrap().is_none());
    /// assert!(Command::parse("PAUSE\tsoon").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Option<Self>, ScriptError> {
        let fields = split_fields(line);
        match fields.len() {
            0 => Ok(None),
            1 => Ok(fields[0].contains("STORY").then_some(Command::Story)),
            _ => match family_of(&fields) {
                Some(family) => parse_family(family, &fields),
                None => Ok(None),
            },
        }
    }

    /// Family this command belongs to.
    pub fn family(&self) -> CommandFamily {
        match self {
            Command::Story => CommandFamily::Story,
            Command::Robot(_) => CommandFamily::Robot,
            Command::Opal(_) => CommandFamily::Opal,
            Command::Pause(_) => CommandFamily::Pause,
            Command::Add { .. } => CommandFamily::Add,
            Command::Set(_) => CommandFamily::Set,
            Command::Wait { .. } => CommandFamily::Wait,
            Command::Repeat { .. } => CommandFamily::Repeat,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Story => write!(f, "STORY"),
            Command::Robot(RobotAction::StoryIntro) => write!(f, "ROBOT story intro"),
            Command::Robot(RobotAction::StoryClosing) => write!(f, "ROBOT story closing"),
            Command::Robot(RobotAction::Send { command, properties }) => {
                write!(f, "ROBOT {} {:?}", command, properties)
            }
            Command::Opal(OpalAction::LoadAll { file }) => write!(f, "OPAL load all from {}", file),
            Command::Opal(OpalAction::LoadStory) => write!(f, "OPAL load next story"),
            Command::Opal(OpalAction::LoadAnswers { answers }) => {
                write!(f, "OPAL load answers [{}]", answers)
            }
            Command::Opal(OpalAction::Send { command, properties }) => match properties {
                Some(properties) => write!(f, "OPAL {} {:?}", command, properties),
                None => write!(f, "OPAL {}", command),
            },
            Command::Pause(duration) => write!(f, "PAUSE {}s", duration.as_secs()),
            Command::Add { bank, file } => write!(f, "ADD {} from {}", bank, file),
            Command::Set(setting) => write!(f, "SET {}", setting),
            Command::Wait { kind, timeout } => {
                write!(f, "WAIT {} for {}s", kind, timeout.as_secs())
            }
            Command::Repeat { count, file } => match count {
                RepeatCount::Times(n) => write!(f, "REPEAT {} x{}", file, n),
                RepeatCount::MaxStories => write!(f, "REPEAT {} x MAX_STORIES", file),
            },
        }
    }
}

/// Split a line into trimmed, tab-separated fields. A blank line has no fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    let line = line.trim_end();
    if line.trim().is_empty() {
        return Vec::new();
    }
    line.split('\t').map(str::trim).collect()
}

fn family_of(fields: &[&str]) -> Option<CommandFamily> {
    FAMILY_MATCHERS
        .iter()
        .find(|(token, _, min_fields)| fields[0].contains(token) && fields.len() >= *min_fields)
        .map(|(_, family, _)| *family)
}

fn parse_family(family: CommandFamily, fields: &[&str]) -> Result<Option<Command>, ScriptError> {
    let command = match family {
        CommandFamily::Story => Command::Story,
        CommandFamily::Robot => Command::Robot(parse_robot(fields)),
        CommandFamily::Opal => Command::Opal(parse_opal(fields)),
        CommandFamily::Pause => Command::Pause(Duration::from_secs(parse_int(
            family, "whole seconds", fields[1],
        )?)),
        CommandFamily::Add => match ResponseBank::find_in(fields[1]) {
            Some(bank) => Command::Add {
                bank,
                file: fields[2].to_string(),
            },
            None => return Ok(None),
        },
        CommandFamily::Set => match parse_setting(fields[1], fields[2])? {
            Some(setting) => Command::Set(setting),
            None => return Ok(None),
        },
        CommandFamily::Wait => Command::Wait {
            kind: fields[1].to_string(),
            timeout: Duration::from_secs(parse_int(family, "whole seconds", fields[2])?),
        },
        CommandFamily::Repeat => {
            let count = if fields[1].contains(MAX_STORIES_ALIAS) {
                RepeatCount::MaxStories
            } else {
                RepeatCount::Times(parse_int(family, "a repetition count", fields[1])?)
            };
            Command::Repeat {
                count,
                file: fields[2].to_string(),
            }
        }
    };
    Ok(Some(command))
}

fn parse_robot(fields: &[&str]) -> RobotAction {
    if let Some((_, action)) = ROBOT_MATCHERS
        .iter()
        .find(|(token, _)| fields[1].contains(token))
    {
        return action.clone();
    }
    RobotAction::Send {
        command: fields[1].to_string(),
        properties: fields.get(2).map(|p| p.to_string()).unwrap_or_default(),
    }
}

fn parse_opal(fields: &[&str]) -> OpalAction {
    let matched = OPAL_MATCHERS
        .iter()
        .find(|(token, _, min_fields)| fields[1].contains(token) && fields.len() >= *min_fields)
        .map(|(_, matched, _)| *matched);

    match matched {
        Some(OpalMatch::LoadAll) => OpalAction::LoadAll {
            file: fields[2].to_string(),
        },
        Some(OpalMatch::LoadStory) => OpalAction::LoadStory,
        Some(OpalMatch::LoadAnswers) => OpalAction::LoadAnswers {
            answers: fields[2].to_string(),
        },
        None => OpalAction::Send {
            command: fields[1].to_string(),
            properties: fields.get(2).map(|p| p.to_string()),
        },
    }
}

fn parse_setting(key: &str, value: &str) -> Result<Option<Setting>, ScriptError> {
    let Some((_, matched)) = SETTING_MATCHERS.iter().find(|(token, _)| key.contains(token)) else {
        return Ok(None);
    };

    let setting = match matched {
        SettingKey::MaxIncorrectResponses => {
            Setting::MaxIncorrectResponses(parse_int(CommandFamily::Set, "an attempt count", value)?)
        }
        SettingKey::MaxGameTime => Setting::MaxGameTime(Duration::from_secs(
            parse_int::<u64>(CommandFamily::Set, "whole minutes", value)?.saturating_mul(60),
        )),
        SettingKey::MaxStories => {
            Setting::MaxStories(parse_int(CommandFamily::Set, "a story count", value)?)
        }
    };
    Ok(Some(setting))
}

fn parse_int<T: std::str::FromStr>(
    family: CommandFamily,
    expected: &str,
    value: &str,
) -> Result<T, ScriptError> {
    value.parse().map_err(|_| {
        ScriptError::new(ScriptErrorKind::InvalidArgument {
            command: family.to_string(),
            expected: expected.to_string(),
            value: value.to_string(),
        })
    })
}
