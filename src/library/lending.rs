//! Lending tracker built from three ordered-map instances.
//!
//! ## Architecture
//!
//! The tracker composes independent [`OrderedMap`] instances and keeps them
//! mutually consistent; the maps themselves enforce nothing across
//! instances:
//!
//! - `subs`: subscriber id -> subscriber record (integer order)
//! - `holders`: book id -> holder's subscriber id (case-insensitive order)
//! - `most_books`: array of borrow-count buckets; bucket `i` holds the ids
//!   of subscribers currently borrowing `i + 1` books
//!
//! Secondary indexes store subscriber *ids*, never copies of the record -
//! the record itself lives in `subs` alone. Every lending operation updates
//! all affected indexes before returning, so between public calls an id
//! found in any index always resolves to a live record.
//!
//! Complexity notes below write `n` for subscribers and `m` for lent books.

use std::cmp::Ordering;

use thiserror::Error;

use crate::library::subscriber::{Subscriber, MAX_BOOKS};
use crate::rbtree::OrderedMap;

/// Errors from lending operations.
///
/// Display text doubles as the user-facing response line in the command
/// interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("subscriber {name} {id} already exists")]
    SubscriberExists { name: String, id: u32 },

    #[error("subscriber {id} does not exist")]
    UnknownSubscriber { id: u32 },

    #[error("subscriber {name} {id} book limit reached")]
    BorrowLimitReached { name: String, id: u32 },

    #[error("another subscriber ({holder}) already took this book")]
    AlreadyLent { book: String, holder: u32 },

    #[error("no one holds this book")]
    NotLent { book: String },

    #[error("another subscriber holds this book! ({holder})")]
    HeldByAnother { book: String, holder: u32 },
}

/// Total order for subscriber ids.
fn id_order(a: &u32, b: &u32) -> Ordering {
    a.cmp(b)
}

/// Total order for book ids: case-insensitive, so "Dune" and "dune" are the
/// same book.
fn book_order(a: &String, b: &String) -> Ordering {
    a.chars()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.chars().map(|c| c.to_ascii_lowercase()))
}

/// The lending tracker.
#[derive(Debug)]
pub struct Library {
    /// Subscriber id -> record
    subs: OrderedMap<u32, Subscriber>,

    /// Book id -> holder's subscriber id
    holders: OrderedMap<String, u32>,

    /// Borrow-count buckets; bucket `i` holds ids of subscribers with
    /// `i + 1` borrowed books
    most_books: [OrderedMap<u32, u32>; MAX_BOOKS],
}

impl Library {
    /// Create a tracker with no subscribers and no lent books.
    pub fn new() -> Self {
        Self {
            subs: OrderedMap::empty(id_order),
            holders: OrderedMap::empty(book_order),
            most_books: std::array::from_fn(|_| {
                OrderedMap::empty(id_order as fn(&u32, &u32) -> Ordering)
            }),
        }
    }

    // ========================================================================
    // Subscribers
    // ========================================================================

    /// Register a subscriber. O(log n).
    pub fn add_subscriber(&mut self, name: &str, id: u32) -> Result<(), LibraryError> {
        if let Some(existing) = self.subs.get(&id) {
            return Err(LibraryError::SubscriberExists {
                name: existing.name.clone(),
                id,
            });
        }
        self.subs.put(id, Subscriber::new(id, name));
        Ok(())
    }

    /// Remove a subscriber, returning all their borrowed books first.
    /// O(log n + k·log m) for k borrowed books.
    pub fn remove_subscriber(&mut self, id: u32) -> Result<(), LibraryError> {
        let books: Vec<String> = self
            .subs
            .get(&id)
            .ok_or(LibraryError::UnknownSubscriber { id })?
            .books()
            .to_vec();

        for book in &books {
            self.return_book(id, book)?;
        }
        self.subs.remove(&id);
        Ok(())
    }

    /// Look up a subscriber by id. O(log n).
    pub fn subscriber(&self, id: u32) -> Option<&Subscriber> {
        self.subs.get(&id)
    }

    /// Number of registered subscribers. O(1).
    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.subs.len()
    }

    // ========================================================================
    // Lending
    // ========================================================================

    /// Lend `book_id` to subscriber `sub_id`. O(log n + log m).
    ///
    /// Updates the holder index, the subscriber's book list, and the
    /// borrow-count buckets together.
    pub fn borrow_book(&mut self, sub_id: u32, book_id: &str) -> Result<(), LibraryError> {
        let count = {
            let sub = self
                .subs
                .get(&sub_id)
                .ok_or(LibraryError::UnknownSubscriber { id: sub_id })?;
            if sub.at_limit() {
                return Err(LibraryError::BorrowLimitReached {
                    name: sub.name.clone(),
                    id: sub_id,
                });
            }
            sub.book_count()
        };

        let book = book_id.to_string();
        if let Some(&holder) = self.holders.get(&book) {
            return Err(LibraryError::AlreadyLent { book, holder });
        }

        self.holders.put(book.clone(), sub_id);
        let sub = self.subs.get_mut(&sub_id).expect("subscriber checked above");
        sub.add_book(book);

        if count > 0 {
            self.most_books[count - 1].remove(&sub_id);
        }
        self.most_books[count].put(sub_id, sub_id);
        Ok(())
    }

    /// Take `book_id` back from subscriber `sub_id`. O(log n + log m).
    pub fn return_book(&mut self, sub_id: u32, book_id: &str) -> Result<(), LibraryError> {
        if !self.subs.contains_key(&sub_id) {
            return Err(LibraryError::UnknownSubscriber { id: sub_id });
        }

        let book = book_id.to_string();
        let holder = *self
            .holders
            .get(&book)
            .ok_or_else(|| LibraryError::NotLent { book: book.clone() })?;
        if holder != sub_id {
            return Err(LibraryError::HeldByAnother { book, holder });
        }

        self.holders.remove(&book);
        let sub = self.subs.get_mut(&sub_id).expect("subscriber checked above");
        let count_before = sub.book_count();
        if sub.take_book(&book) {
            self.most_books[count_before - 1].remove(&sub_id);
            if count_before > 1 {
                self.most_books[count_before - 2].put(sub_id, sub_id);
            }
        }
        Ok(())
    }

    /// Who currently holds `book_id`? O(log m + log n).
    pub fn who_holds(&self, book_id: &str) -> Option<&Subscriber> {
        let id = *self.holders.get(&book_id.to_string())?;
        self.subs.get(&id)
    }

    /// Number of currently lent books. O(1).
    #[inline]
    pub fn lent_count(&self) -> usize {
        self.holders.len()
    }

    // ========================================================================
    // Borrow-count buckets
    // ========================================================================

    /// The bucket holding every subscriber who currently borrows the most
    /// books: the highest non-empty bucket, scanned top-down. O(1) with
    /// respect to subscriber count; None when no books are lent at all.
    pub fn most_borrowed(&self) -> Option<&OrderedMap<u32, u32>> {
        self.most_books.iter().rev().find(|b| b.is_not_empty())
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
