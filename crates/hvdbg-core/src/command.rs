//! # Command
//!
//! A single normalized input line.

/// One tokenized input line
///
/// Tokens are lowercased and split on whitespace; runs of separators never
/// produce empty tokens. The first token selects the handler.
///
/// ## Example
///
/// ```rust
/// use hvdbg_core::command::Command;
///
/// let command = Command::parse("  DB   FFFF ").unwrap();
/// assert_eq!(command.name(), "db");
/// assert_eq!(command.args(), ["ffff"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command
{
    tokens: Vec<String>,
}

impl Command
{
    /// Normalize `line` into a command, or `None` if it holds no tokens
    pub fn parse(line: &str) -> Option<Self>
    {
        let tokens = tokenize(line);
        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    /// The command name (first token)
    pub fn name(&self) -> &str
    {
        &self.tokens[0]
    }

    /// Tokens after the command name
    pub fn args(&self) -> &[String]
    {
        &self.tokens[1..]
    }

    /// Every token, command name included
    pub fn tokens(&self) -> &[String]
    {
        &self.tokens
    }
}

/// Lowercase `line` and split it into non-empty whitespace-separated tokens
pub fn tokenize(line: &str) -> Vec<String>
{
    line.split_whitespace().map(str::to_lowercase).collect()
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_tokenize_collapses_whitespace()
    {
        assert_eq!(tokenize("  DB   FFFF "), vec!["db", "ffff"]);
        assert_eq!(tokenize("rdmsr\tC0000082  core 2"), vec!["rdmsr", "c0000082", "core", "2"]);
    }

    #[test]
    fn test_empty_line_has_no_command()
    {
        assert!(tokenize("").is_empty());
        assert_eq!(Command::parse("   \t "), None);
    }

    #[test]
    fn test_command_splits_name_and_args()
    {
        let command = Command::parse(".CONNECT Local").unwrap();
        assert_eq!(command.name(), ".connect");
        assert_eq!(command.args(), ["local"]);
        assert_eq!(command.tokens().len(), 2);
    }
}
