//! Lending-tracker module: subscribers, lending state, and the command
//! language.
//!
//! ## Components
//!
//! - [`Subscriber`]: one registered reader and their borrowed books
//! - [`Library`]: the tracker - three ordered maps composed into one
//!   consistent view of who holds what
//! - [`parser`]: the line command language and its executor
//!
//! Everything here consumes [`OrderedMap`](crate::rbtree::OrderedMap)
//! strictly through its public contract; no tree internals leak into this
//! layer.
//!
//! ## Example
//!
//! ```
//! use libris::library::{execute, parse, Library};
//!
//! let mut lib = Library::new();
//!
//! let cmd = parse("+ Alice 1").unwrap().unwrap();
//! assert_eq!(execute(&mut lib, cmd), "Added subscriber Alice 1");
//!
//! let cmd = parse("Alice 1 dune +").unwrap().unwrap();
//! assert_eq!(execute(&mut lib, cmd), "Alice borrowed the book dune");
//! ```

pub mod lending;
pub mod parser;
pub mod subscriber;

pub use lending::{Library, LibraryError};
pub use parser::{execute, parse, Command, ParseError};
pub use subscriber::{Subscriber, MAX_BOOKS};
