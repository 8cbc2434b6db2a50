//! Operator command vocabulary.
//!
//! Matching is a pure lookup from line to command kind; the side effects
//! live in the monitor's dispatch, not here.

/// A recognized operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Clean shutdown: stop the heartbeat loop after the current step.
    Shutdown,
    /// Write a status summary to the outgoing ledger.
    Status,
    /// Write the active configuration to the outgoing ledger.
    Config,
    /// Terminate the currently executing job, if any.
    KillJob,
    /// Write the usage guide to the outgoing ledger.
    Help,
}

impl Command {
    /// Every command, in the order listed in the usage guide.
    pub const ALL: [Command; 5] = [
        Command::Shutdown,
        Command::Status,
        Command::Config,
        Command::KillJob,
        Command::Help,
    ];

    /// Case-sensitive match of a consumed line against the vocabulary.
    pub fn parse(line: &str) -> Option<Command> {
        match line {
            "SHUTDOWN" => Some(Command::Shutdown),
            "STATUS" => Some(Command::Status),
            "CONFIG" => Some(Command::Config),
            "KILL JOB" => Some(Command::KillJob),
            "HELP" => Some(Command::Help),
            _ => None,
        }
    }

    /// The command's wire name.
    pub fn name(self) -> &'static str {
        match self {
            Command::Shutdown => "SHUTDOWN",
            Command::Status => "STATUS",
            Command::Config => "CONFIG",
            Command::KillJob => "KILL JOB",
            Command::Help => "HELP",
        }
    }

    /// One-line description shown in the usage guide.
    pub fn description(self) -> &'static str {
        match self {
            Command::Shutdown => "Monitor performs clean shutdown and stops.",
            Command::Status => "Monitor writes status to outgoing message file.",
            Command::Config => "Monitor writes current config to outgoing message file.",
            Command::KillJob => "Monitor stops current job if/when possible.",
            Command::Help => "Monitor writes this HOWTO to outgoing message file.",
        }
    }
}

/// Renders the usage guide written into a fresh incoming file and
/// emitted in response to `HELP`.
///
/// The command list is generated from [`Command::ALL`] so the guide can
/// never drift from what the monitor actually understands, and repeated
/// renderings are byte-identical.
pub fn howto() -> String {
    let mut text = String::from(
        "# MESSAGES FOR MONITOR HOWTO:\n\
         #  1. One message per line.\n\
         #  2. Empty lines are ignored.\n\
         #  3. Lines beginning with \"#\" are comments.\n\
         #  4. No inline comments: a \"#\" that is not at line start does not begin a comment.\n\
         #  5. Append your message to the end of the file.\n\
         #  6. Monitor will delete non-comment messages after reading them.\n\
         #  7. Monitor will write responses and status messages to the outgoing message file.\n\
         #  8. Monitor will not write to this file, except to set up this HOWTO.\n\
         #  9. If you send a bad or unrecognized message, check the outgoing message file.\n\
         # 10. Do not delete this HOWTO. If you do, see HELP.\n\
         # 11. These are the messages Monitor understands. YES, THEY ARE CASE-SENSITIVE.\n",
    );
    for command in Command::ALL {
        text.push_str(&format!(
            "#       {:<16}({})\n",
            command.name(),
            command.description()
        ));
    }
    text
}
