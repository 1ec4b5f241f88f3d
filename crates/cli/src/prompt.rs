// FILE: crates/cli/src/prompt.rs

use console::{style, Term};
use scrobblecast_sinks::CredentialPrompt;

/// Reads the login from the controlling terminal, password hidden
pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialPrompt for TerminalPrompt {
    fn ask(&self, instance: &str) -> std::io::Result<(String, String)> {
        self.term
            .write_line(&format!("Logging into {}...", style(instance).bold()))?;
        self.term.write_str("E-mail address: ")?;
        let username = self.term.read_line()?;
        self.term.write_str("Password: ")?;
        let password = self.term.read_secure_line()?;
        Ok((username.trim().to_string(), password))
    }
}
