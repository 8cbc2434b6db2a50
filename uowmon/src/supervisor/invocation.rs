//! Job invocation parsing.

/// A parsed job invocation: program plus arguments.
///
/// The invocation line is split on whitespace with no shell
/// interpretation; jobs needing pipes or redirection wrap themselves in
/// an explicit `sh -c '...'` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The program to execute, as written (may be a bare name or path).
    pub program: String,
    /// Arguments following the program.
    pub args: Vec<String>,
}

impl Invocation {
    /// Parses an invocation line. Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Key used for timeout-table lookups: the program's basename.
    pub fn timeout_key(&self) -> &str {
        self.program.rsplit('/').next().unwrap_or(&self.program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_whitespace() {
        let inv = Invocation::parse("rsync  -a   src dst").unwrap();
        assert_eq!(inv.program, "rsync");
        assert_eq!(inv.args, ["-a", "src", "dst"]);
    }

    #[test]
    fn parse_rejects_blank_line() {
        assert_eq!(Invocation::parse(""), None);
        assert_eq!(Invocation::parse("   "), None);
    }

    #[test]
    fn timeout_key_is_program_basename() {
        let inv = Invocation::parse("/usr/bin/ansible-playbook deploy.yml").unwrap();
        assert_eq!(inv.timeout_key(), "ansible-playbook");

        let bare = Invocation::parse("rsync -a").unwrap();
        assert_eq!(bare.timeout_key(), "rsync");
    }
}
