//! Structured IRC messages.
//!
//! The session layer works on owned, already-split messages. The trailing
//! argument is not stored separately: it is the last element of `params`,
//! which is how both the RFC 1459 grammar and the shape checks in the
//! tracker see it.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0, space1},
    combinator::{opt, rest},
    multi::many0,
    sequence::preceded,
};
use thiserror::Error;

use super::prefix::Prefix;

/// Errors from the lenient line parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageParseError {
    #[error("empty message")]
    Empty,
    #[error("message has no command")]
    MissingCommand,
    #[error("unexpected input at byte {position}")]
    Unexpected { position: usize },
}

/// An owned IRC message.
///
/// ```
/// use slirc_client::Message;
///
/// let msg: Message = ":alice!a@host JOIN :#rust".parse().unwrap();
/// assert_eq!(msg.command, "JOIN");
/// assert_eq!(msg.source_nickname(), Some("alice"));
/// assert_eq!(msg.trailing(), Some("#rust"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    /// Source of the message, if any.
    pub prefix: Option<Prefix>,
    /// Command name or three-digit numeric.
    pub command: String,
    /// Parameters in order; the trailing argument is the last entry.
    pub params: Vec<String>,
}

impl Message {
    /// Create a message with no prefix.
    pub fn new<I, S>(command: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix: None,
            command: command.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Attach a source prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<Prefix>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Parameter at `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// The trailing argument (last parameter), if any.
    pub fn trailing(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }

    /// Nickname (or server name) of the sender, if the message has a source.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().map(|p| p.name.as_str())
    }

    /// `NICK :<nick>`
    pub fn nick(nick: impl Into<String>) -> Self {
        Self::new("NICK", [nick.into()])
    }

    /// `PRIVMSG <target> :<text>`
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new("PRIVMSG", [target.into(), text.into()])
    }

    /// `CAP <subcommand> [:<arg>]`
    pub fn cap(subcommand: &str, arg: Option<&str>) -> Self {
        let mut params = vec![subcommand.to_string()];
        if let Some(arg) = arg {
            params.push(arg.to_string());
        }
        Self::new("CAP", params)
    }
}

/// `@tags` up to the first space.
fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_until(" "))(input)
}

/// `:source` up to the first space.
fn parse_source(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c: char| c != ' '))(input)
}

/// Command word or three-digit numeric.
fn parse_command(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric())(input)
}

/// One parameter and the spaces before it. A `:` parameter runs to the end
/// of the line.
fn parse_param(input: &str) -> IResult<&str, &str> {
    preceded(
        space1,
        alt((
            preceded(char(':'), rest),
            take_while1(|c: char| c != ' '),
        )),
    )(input)
}

/// `[@tags] [:source] <command> [params...] [:trailing]`
fn parse_message(input: &str) -> IResult<&str, (Option<&str>, &str, Vec<&str>)> {
    let (input, _) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;
    let (input, source) = opt(parse_source)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    let (input, params) = many0(parse_param)(input)?;
    let (input, _) = space0(input)?;
    Ok((input, (source, command, params)))
}

impl FromStr for Message {
    type Err = MessageParseError;

    /// Parse a single line, with or without the trailing CRLF.
    ///
    /// IRCv3 tags are skipped; they carry nothing the session layer reads.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        if line.is_empty() {
            return Err(MessageParseError::Empty);
        }

        let (remaining, (source, command, params)) =
            parse_message(line).map_err(|_| MessageParseError::MissingCommand)?;
        if !remaining.is_empty() {
            return Err(MessageParseError::Unexpected {
                position: line.len() - remaining.len(),
            });
        }

        Ok(Self {
            prefix: source.map(Prefix::parse),
            command: command.to_ascii_uppercase(),
            params: params.into_iter().map(str::to_string).collect(),
        })
    }
}

/// Serializes without the line terminator; framing belongs to the transport.
impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(ref prefix) = self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        f.write_str(&self.command)?;

        let Some((last, middle)) = self.params.split_last() else {
            return Ok(());
        };
        for param in middle {
            write!(f, " {}", param)?;
        }
        if last.is_empty() || last.contains(' ') || last.starts_with(':') {
            write!(f, " :{}", last)
        } else {
            write!(f, " {}", last)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_prefix_and_trailing() {
        let msg: Message = ":irc.example.org 332 bot #rust :Rust talk\r\n".parse().unwrap();
        assert_eq!(msg.prefix, Some(Prefix::parse("irc.example.org")));
        assert_eq!(msg.command, "332");
        assert_eq!(msg.params, vec!["bot", "#rust", "Rust talk"]);
        assert_eq!(msg.trailing(), Some("Rust talk"));
    }

    #[test]
    fn test_parse_without_prefix() {
        let msg: Message = "PING :tick".parse().unwrap();
        assert!(msg.prefix.is_none());
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.params, vec!["tick"]);
    }

    #[test]
    fn test_parse_skips_tags() {
        let msg: Message = "@time=2024-01-01T00:00:00Z :a!b@c QUIT :bye".parse().unwrap();
        assert_eq!(msg.source_nickname(), Some("a"));
        assert_eq!(msg.command, "QUIT");
        assert_eq!(msg.params, vec!["bye"]);
    }

    #[test]
    fn test_parse_empty_trailing_is_a_param() {
        let msg: Message = ":server CAP * LS :".parse().unwrap();
        assert_eq!(msg.params, vec!["*", "LS", ""]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Message>(), Err(MessageParseError::Empty));
        assert_eq!("\r\n".parse::<Message>(), Err(MessageParseError::Empty));
        assert_eq!(
            ":lonely.prefix".parse::<Message>(),
            Err(MessageParseError::MissingCommand)
        );
        assert_eq!(
            "@tags-without-message".parse::<Message>(),
            Err(MessageParseError::MissingCommand)
        );
        assert_eq!(
            "PING! :x".parse::<Message>(),
            Err(MessageParseError::Unexpected { position: 4 })
        );
    }

    #[test]
    fn test_parse_spacing() {
        let msg: Message = "  :a!b@c   privmsg  #rust   hello  ".parse().unwrap();
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#rust", "hello"]);

        let msg: Message = "USER bot 0 * :Real  Name ".parse().unwrap();
        assert_eq!(msg.params, vec!["bot", "0", "*", "Real  Name "]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Message::cap("END", None).to_string(), "CAP END");
        assert_eq!(Message::cap("REQ", Some("sasl")).to_string(), "CAP REQ sasl");
        assert_eq!(
            Message::privmsg("NickServ", "IDENTIFY hunter2").to_string(),
            "PRIVMSG NickServ :IDENTIFY hunter2"
        );
        assert_eq!(Message::nick("bot_").to_string(), "NICK bot_");
        assert_eq!(Message::new("PONG", [""]).to_string(), "PONG :");
    }
}
