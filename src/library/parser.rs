//! Line-oriented command language for the lending tracker.
//!
//! ## Grammar
//!
//! One command per line, whitespace-separated tokens:
//!
//! | Line | Meaning |
//! |------|---------|
//! | `+ NAME ID` | add a subscriber |
//! | `- NAME ID` | remove a subscriber |
//! | `NAME ID BOOK +` | NAME (id ID) borrows BOOK |
//! | `NAME ID BOOK -` | NAME (id ID) returns BOOK |
//! | `? BOOK` | who holds BOOK (query starts with a letter) |
//! | `? ID` | which books does ID hold (query starts with a digit) |
//! | `? !` | who holds the most books |
//! | `quit` | exit |
//!
//! Blank lines parse to nothing. Anything else is a [`ParseError`], never a
//! panic.
//!
//! Parsing and execution are split: [`parse`] produces a typed [`Command`],
//! [`execute`] applies it to a [`Library`] and renders the response line.
//! The split keeps the grammar testable without a tracker and the tracker
//! testable without text.

use thiserror::Error;

use crate::library::lending::Library;

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddSubscriber { name: String, id: u32 },
    RemoveSubscriber { id: u32 },
    Borrow { id: u32, book: String },
    Return { id: u32, book: String },
    WhoHolds { book: String },
    ListBooks { id: u32 },
    MostBorrowed,
    Quit,
}

/// Errors from command parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("command not recognized!")]
    UnknownCommand,

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid subscriber id: {0}")]
    InvalidId(String),
}

fn parse_id(token: &str) -> Result<u32, ParseError> {
    token
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidId(token.to_string()))
}

/// Parse one input line into a [`Command`].
///
/// Returns `Ok(None)` for blank lines. The command kind is decided by the
/// first character of the line, or by the last character for the borrow and
/// return forms.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if line == "quit" {
        return Ok(Some(Command::Quit));
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let cmd = match line.chars().next().expect("line is non-empty") {
        '+' => {
            let name = tokens
                .get(1)
                .ok_or(ParseError::MissingArgument("subscriber name"))?;
            let id = parse_id(
                tokens
                    .get(2)
                    .ok_or(ParseError::MissingArgument("subscriber id"))?,
            )?;
            Command::AddSubscriber {
                name: name.to_string(),
                id,
            }
        }
        '-' => {
            let id = parse_id(
                tokens
                    .get(2)
                    .ok_or(ParseError::MissingArgument("subscriber id"))?,
            )?;
            Command::RemoveSubscriber { id }
        }
        '?' => {
            let query = tokens.get(1).ok_or(ParseError::MissingArgument("query"))?;
            let first = query.chars().next().expect("tokens are non-empty");
            if first == '!' {
                Command::MostBorrowed
            } else if first.is_ascii_digit() {
                Command::ListBooks {
                    id: parse_id(query)?,
                }
            } else if first.is_alphabetic() {
                Command::WhoHolds {
                    book: query.to_string(),
                }
            } else {
                return Err(ParseError::UnknownCommand);
            }
        }
        _ => {
            // borrow/return: the trailing token decides
            let trailing = line.chars().last().expect("line is non-empty");
            if trailing != '+' && trailing != '-' {
                return Err(ParseError::UnknownCommand);
            }
            let id = parse_id(
                tokens
                    .get(1)
                    .ok_or(ParseError::MissingArgument("subscriber id"))?,
            )?;
            let book = tokens
                .get(2)
                .ok_or(ParseError::MissingArgument("book id"))?
                .to_string();
            if trailing == '+' {
                Command::Borrow { id, book }
            } else {
                Command::Return { id, book }
            }
        }
    };
    Ok(Some(cmd))
}

/// Apply a command to the tracker and render the response line.
///
/// Lending errors are part of the conversation, not failures: their display
/// text becomes the response.
pub fn execute(lib: &mut Library, cmd: Command) -> String {
    match cmd {
        Command::Quit => "Byebye!".to_string(),

        Command::AddSubscriber { name, id } => match lib.add_subscriber(&name, id) {
            Ok(()) => format!("Added subscriber {name} {id}"),
            Err(e) => e.to_string(),
        },

        Command::RemoveSubscriber { id } => match lib.remove_subscriber(id) {
            Ok(()) => format!("removed subscriber {id}"),
            Err(e) => e.to_string(),
        },

        Command::Borrow { id, book } => match lib.borrow_book(id, &book) {
            Ok(()) => {
                let name = &lib.subscriber(id).expect("borrow succeeded").name;
                format!("{name} borrowed the book {book}")
            }
            Err(e) => e.to_string(),
        },

        Command::Return { id, book } => match lib.return_book(id, &book) {
            Ok(()) => {
                let name = &lib.subscriber(id).expect("return succeeded").name;
                format!("{name} returned the book {book}")
            }
            Err(e) => e.to_string(),
        },

        Command::WhoHolds { book } => match lib.who_holds(&book) {
            Some(sub) => format!("{} has the book {book}", sub.name),
            None => "No subscriber is holding that book".to_string(),
        },

        Command::ListBooks { id } => match lib.subscriber(id) {
            Some(sub) => {
                let mut out = format!("Subscriber {} {} has these books:", sub.name, sub.id);
                for book in sub.books() {
                    out.push_str("\n\t");
                    out.push_str(book);
                }
                out
            }
            None => format!("No such subscriber exists {id}"),
        },

        Command::MostBorrowed => match lib.most_borrowed() {
            Some(most) => {
                // any member of the top bucket holds the same number of
                // books; the root entry is as good as any
                let leader = *most.first_entry();
                let count = lib
                    .subscriber(leader)
                    .map(|s| s.book_count())
                    .unwrap_or(0);

                let mut names = Vec::new();
                most.for_each(|&id| {
                    if let Some(sub) = lib.subscriber(id) {
                        names.push(sub.name.clone());
                    }
                });

                let mut out = format!("the following subscribers hold the most ({count}) books:");
                for name in names {
                    out.push_str("\n\t");
                    out.push_str(&name);
                }
                out
            }
            None => "no one has any books!".to_string(),
        },
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_subscriber() {
        assert_eq!(
            parse("+ Alice 7").unwrap(),
            Some(Command::AddSubscriber {
                name: "Alice".to_string(),
                id: 7
            })
        );
    }

    #[test]
    fn test_parse_remove_subscriber() {
        assert_eq!(
            parse("- Alice 7").unwrap(),
            Some(Command::RemoveSubscriber { id: 7 })
        );
    }

    #[test]
    fn test_parse_borrow_and_return() {
        assert_eq!(
            parse("Alice 7 dune +").unwrap(),
            Some(Command::Borrow {
                id: 7,
                book: "dune".to_string()
            })
        );
        assert_eq!(
            parse("Alice 7 dune -").unwrap(),
            Some(Command::Return {
                id: 7,
                book: "dune".to_string()
            })
        );
    }

    #[test]
    fn test_parse_queries() {
        assert_eq!(
            parse("? dune").unwrap(),
            Some(Command::WhoHolds {
                book: "dune".to_string()
            })
        );
        assert_eq!(parse("? 7").unwrap(), Some(Command::ListBooks { id: 7 }));
        assert_eq!(parse("? !").unwrap(), Some(Command::MostBorrowed));
    }

    #[test]
    fn test_parse_quit_and_blank() {
        assert_eq!(parse("quit").unwrap(), Some(Command::Quit));
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   \t ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("+ Alice").unwrap_err(), ParseError::MissingArgument("subscriber id"));
        assert_eq!(
            parse("+ Alice seven").unwrap_err(),
            ParseError::InvalidId("seven".to_string())
        );
        assert_eq!(parse("hello there").unwrap_err(), ParseError::UnknownCommand);
        assert_eq!(parse("? #").unwrap_err(), ParseError::UnknownCommand);
    }

    #[test]
    fn test_execute_session() {
        let mut lib = Library::new();

        let mut run = |line: &str| {
            let cmd = parse(line).unwrap().unwrap();
            execute(&mut lib, cmd)
        };

        assert_eq!(run("+ Alice 1"), "Added subscriber Alice 1");
        assert_eq!(run("+ Bob 2"), "Added subscriber Bob 2");
        assert_eq!(run("+ Alice 1"), "subscriber Alice 1 already exists");

        assert_eq!(run("Alice 1 dune +"), "Alice borrowed the book dune");
        assert_eq!(
            run("Bob 2 dune +"),
            "another subscriber (1) already took this book"
        );
        assert_eq!(run("? dune"), "Alice has the book dune");
        assert_eq!(run("? 1"), "Subscriber Alice 1 has these books:\n\tdune");
        assert_eq!(
            run("? !"),
            "the following subscribers hold the most (1) books:\n\tAlice"
        );

        assert_eq!(run("Bob 2 dune -"), "another subscriber holds this book! (1)");
        assert_eq!(run("Alice 1 dune -"), "Alice returned the book dune");
        assert_eq!(run("? dune"), "No subscriber is holding that book");
        assert_eq!(run("? !"), "no one has any books!");

        assert_eq!(run("- Bob 2"), "removed subscriber 2");
        assert_eq!(run("? 2"), "No such subscriber exists 2");
    }
}
