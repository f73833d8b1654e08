//! Line parser for operator commands.
//!
//! A command line is a verb optionally followed by one argument, e.g.
//! `start` or `select five`. Verbs and sequence tags are matched without
//! regard to ASCII case. `winnow` splits the line; verb dispatch happens on
//! the resulting slices so error messages can name the offending word.

use core::fmt;

use winnow::ascii::{space0, space1};
use winnow::combinator::{eof, opt, preceded};
use winnow::error::ErrMode;
use winnow::prelude::*;
use winnow::token::take_while;

use crate::schedule::{ScheduleTable, sequence_by_name};

/// Parsed operator command.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Silence,
    Status,
    List,
    Help,
    /// Bind a specific built-in sequence.
    Select(&'static ScheduleTable),
    /// Bind the sequence after the current one.
    Next,
}

/// Reasons a command line could not be parsed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParseError<'a> {
    /// The line holds only whitespace.
    Empty,
    /// The line does not have the `verb [argument]` shape.
    Malformed,
    UnknownCommand(&'a str),
    UnknownSequence(&'a str),
    MissingArgument(&'static str),
    UnexpectedArgument(&'a str),
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => f.write_str("empty command"),
            ParseError::Malformed => f.write_str("expected `<command> [argument]`"),
            ParseError::UnknownCommand(verb) => write!(f, "unknown command `{verb}`"),
            ParseError::UnknownSequence(tag) => write!(f, "unknown sequence `{tag}`"),
            ParseError::MissingArgument(expected) => write!(f, "missing {expected}"),
            ParseError::UnexpectedArgument(argument) => {
                write!(f, "unexpected argument `{argument}`")
            }
        }
    }
}

type Split<'s> = (&'s str, Option<&'s str>);

fn split_line<'s>(input: &mut &'s str) -> Result<Split<'s>, ErrMode<()>> {
    space0.parse_next(input)?;
    let verb = take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)?;
    let argument = opt(preceded(
        space1,
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-'),
    ))
    .parse_next(input)?;
    (space0, eof).parse_next(input)?;
    Ok((verb, argument))
}

/// Parses one command line.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found.
pub fn parse_command(line: &str) -> Result<ConsoleCommand, ParseError<'_>> {
    let mut input = line.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }

    let (verb, argument) = split_line(&mut input).map_err(|_| ParseError::Malformed)?;

    let bare = |command: ConsoleCommand| match argument {
        Some(extra) => Err(ParseError::UnexpectedArgument(extra)),
        None => Ok(command),
    };

    if verb.eq_ignore_ascii_case("start") {
        bare(ConsoleCommand::Start)
    } else if verb.eq_ignore_ascii_case("stop") {
        bare(ConsoleCommand::Stop)
    } else if verb.eq_ignore_ascii_case("silence") {
        bare(ConsoleCommand::Silence)
    } else if verb.eq_ignore_ascii_case("status") {
        bare(ConsoleCommand::Status)
    } else if verb.eq_ignore_ascii_case("list") {
        bare(ConsoleCommand::List)
    } else if verb.eq_ignore_ascii_case("help") {
        bare(ConsoleCommand::Help)
    } else if verb.eq_ignore_ascii_case("next") {
        bare(ConsoleCommand::Next)
    } else if verb.eq_ignore_ascii_case("select") {
        let tag = argument.ok_or(ParseError::MissingArgument("sequence tag"))?;
        sequence_by_name(tag)
            .map(ConsoleCommand::Select)
            .ok_or(ParseError::UnknownSequence(tag))
    } else {
        Err(ParseError::UnknownCommand(verb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{FIVE_MINUTE, QUICK_TEST};

    #[test]
    fn parses_bare_verbs_case_insensitively() {
        assert_eq!(parse_command("start"), Ok(ConsoleCommand::Start));
        assert_eq!(parse_command("  STOP  "), Ok(ConsoleCommand::Stop));
        assert_eq!(parse_command("Status\r\n"), Ok(ConsoleCommand::Status));
        assert_eq!(parse_command("next"), Ok(ConsoleCommand::Next));
    }

    #[test]
    fn select_resolves_sequence_tags() {
        match parse_command("select Five") {
            Ok(ConsoleCommand::Select(table)) => assert_eq!(*table, FIVE_MINUTE),
            other => panic!("unexpected parse result: {other:?}"),
        }
        match parse_command("select test") {
            Ok(ConsoleCommand::Select(table)) => assert_eq!(table.title, QUICK_TEST.title),
            other => panic!("unexpected parse result: {other:?}"),
        }
    }

    #[test]
    fn reports_argument_problems() {
        assert_eq!(
            parse_command("select"),
            Err(ParseError::MissingArgument("sequence tag"))
        );
        assert_eq!(
            parse_command("select ten"),
            Err(ParseError::UnknownSequence("ten"))
        );
        assert_eq!(
            parse_command("start now"),
            Err(ParseError::UnexpectedArgument("now"))
        );
    }

    #[test]
    fn rejects_unknown_and_malformed_lines() {
        assert_eq!(parse_command(""), Err(ParseError::Empty));
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
        assert_eq!(parse_command("launch"), Err(ParseError::UnknownCommand("launch")));
        assert_eq!(parse_command("select five three"), Err(ParseError::Malformed));
        assert_eq!(parse_command("42"), Err(ParseError::Malformed));
    }
}
