//! The people, their hobbies, and the timed streams built from them.

use core::time::Duration;

use futures_core::Stream;
use futures_lite::StreamExt;

use crate::time::Clock;

/// Someone whose hobby fans out into a list of options.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Person {
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Name of the person's hobby, looked up in [`Catalog::hobbies`].
    pub hobby: String,
}

impl Person {
    /// Create a new person.
    pub fn new(name: impl Into<String>, age: u32, hobby: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            hobby: hobby.into(),
        }
    }
}

/// A hobby and the ordered options it offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hobby {
    /// Name people refer to the hobby by.
    pub name: String,
    /// Options, in the order they are emitted.
    pub options: Vec<String>,
}

impl Hobby {
    /// Create a new hobby.
    pub fn new<I>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            name: name.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// The static tables every stream reads from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// People, in the order the outer stream emits them.
    pub people: Vec<Person>,
    /// Hobbies and their options.
    pub hobbies: Vec<Hobby>,
}

impl Catalog {
    /// Create a catalog from its two tables.
    pub fn new(people: Vec<Person>, hobbies: Vec<Hobby>) -> Self {
        Self { people, hobbies }
    }

    /// The reference scenario: four people, three hobbies, and one person
    /// (Fer) whose hobby has no options.
    pub fn reference() -> Self {
        Self::new(
            vec![
                Person::new("Antonio", 42, "Lectura"),
                Person::new("Patri", 43, "Senderismo"),
                Person::new("Fer", 47, "Escalada"),
                Person::new("Maria", 46, "Musica"),
            ],
            vec![
                Hobby::new("Lectura", ["It", "Tierra", "22/11/63"]),
                Hobby::new("Senderismo", ["Las Cabrillas", "Cerro Larda"]),
                Hobby::new("Musica", ["ColdPlay", "Clásica"]),
            ],
        )
    }

    /// Returns the options for `hobby`, or an empty slice if no hobby by
    /// that name exists. If the name is listed more than once, the last
    /// entry wins.
    pub fn options_for(&self, hobby: &str) -> &[String] {
        self.hobbies
            .iter()
            .rev()
            .find(|h| h.name == hobby)
            .map(|h| h.options.as_slice())
            .unwrap_or(&[])
    }
}

/// The outer stream: one person every `period`.
///
/// Emits the first `count` people, or every person if the catalog holds
/// fewer. Each call starts an independent schedule from the clock's current
/// time.
pub fn people(
    clock: &Clock,
    catalog: &Catalog,
    period: Duration,
    count: usize,
) -> impl Stream<Item = Person> {
    let people: Vec<Person> = catalog.people.iter().take(count).cloned().collect();
    clock
        .interval(period)
        .take(people.len())
        .map(move |tick| people[tick as usize].clone())
}

/// The inner stream: one option of `hobby` every `period`.
///
/// A hobby with no options yields an empty stream which completes as soon
/// as it is polled.
pub fn options(
    clock: &Clock,
    catalog: &Catalog,
    hobby: &str,
    period: Duration,
) -> impl Stream<Item = String> {
    let options = catalog.options_for(hobby).to_vec();
    clock
        .interval(period)
        .take(options.len())
        .map(move |tick| options[tick as usize].clone())
}
