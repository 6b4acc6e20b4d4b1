//! Fixture names, fixture values and fixture factories.
//!
//! A [`FixtureSet`] is what a test declares it needs. A [`FixtureProvider`]
//! knows how to build every fixture the runner offers, and turns a set of
//! names into the concrete [`Fixtures`] handed to step bodies.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use derive_more::Deref;
use indexmap::{IndexMap, IndexSet};

use crate::error::HarnessError;

/// Ordered set of distinct fixture names.
///
/// Insertion order is preserved so the same inputs always produce the same
/// runner wiring. Equality follows set semantics; compare
/// [`names`](Self::names) when order matters.
///
/// # Examples
///
/// ```
/// use gherkin_wire_harness::FixtureSet;
///
/// let set: FixtureSet = ["browser", "page", "browser"].into_iter().collect();
/// assert_eq!(set.names().collect::<Vec<_>>(), ["browser", "page"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deref)]
pub struct FixtureSet(IndexSet<String>);

impl FixtureSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name, returning `false` when it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    /// Append every name of `other` not yet present, keeping first-seen order.
    pub fn extend_from(&mut self, other: &Self) {
        for name in other.names() {
            if !self.0.contains(name) {
                self.0.insert(name.to_owned());
            }
        }
    }

    /// Union of several sets, in first-seen order.
    ///
    /// # Examples
    ///
    /// ```
    /// use gherkin_wire_harness::FixtureSet;
    ///
    /// let a = FixtureSet::from_iter(["browser"]);
    /// let b = FixtureSet::from_iter(["page"]);
    /// let c = FixtureSet::from_iter(["browser", "context"]);
    /// let union = FixtureSet::union([&a, &b, &c]);
    /// assert_eq!(union.names().collect::<Vec<_>>(), ["browser", "page", "context"]);
    /// ```
    #[must_use]
    pub fn union<'a>(sets: impl IntoIterator<Item = &'a Self>) -> Self {
        let mut out = Self::new();
        for set in sets {
            out.extend_from(set);
        }
        out
    }

    /// Iterate over the names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FixtureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for FixtureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, name) in self.names().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        f.write_str("}")
    }
}

/// Fixture values materialised for one test.
///
/// Values are stored by name and retrieved by name and type.
#[derive(Default)]
pub struct Fixtures {
    values: IndexMap<String, Box<dyn Any + Send>>,
}

impl Fixtures {
    /// Create an empty fixture map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fixture value, replacing any previous value of the same name.
    pub fn insert<T: Any + Send>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Box::new(value));
    }

    pub(crate) fn insert_boxed(&mut self, name: String, value: Box<dyn Any + Send>) {
        self.values.insert(name, value);
    }

    /// Borrow a fixture by name and type.
    #[must_use]
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name)?.downcast_ref::<T>()
    }

    /// Mutably borrow a fixture by name and type.
    #[must_use]
    pub fn get_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.values.get_mut(name)?.downcast_mut::<T>()
    }

    /// Borrow a fixture, explaining why it is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MissingFixture`] when no fixture of that name
    /// was materialised, or [`HarnessError::FixtureType`] when it holds a
    /// value of another type.
    pub fn require<T: Any>(&self, name: &str) -> Result<&T, HarnessError> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| HarnessError::MissingFixture {
                name: name.to_owned(),
            })?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| HarnessError::FixtureType {
                name: name.to_owned(),
                expected: type_name::<T>(),
            })
    }

    /// Mutable counterpart of [`require`](Self::require).
    ///
    /// # Errors
    ///
    /// Same conditions as [`require`](Self::require).
    pub fn require_mut<T: Any>(&mut self, name: &str) -> Result<&mut T, HarnessError> {
        let value = self
            .values
            .get_mut(name)
            .ok_or_else(|| HarnessError::MissingFixture {
                name: name.to_owned(),
            })?;
        value
            .downcast_mut::<T>()
            .ok_or_else(|| HarnessError::FixtureType {
                name: name.to_owned(),
                expected: type_name::<T>(),
            })
    }

    /// Whether a fixture with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names of the materialised fixtures, in materialisation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of materialised fixtures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no fixture was materialised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Fixtures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

type FixtureFactory = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

/// Named fixture factories offered by a runner.
///
/// # Examples
///
/// ```
/// use gherkin_wire_harness::{FixtureProvider, FixtureSet};
///
/// let provider = FixtureProvider::new()
///     .with("answer", || 42_u32)
///     .with("greeting", || String::from("hi"));
/// let fixtures = provider
///     .materialize(&FixtureSet::from_iter(["answer"]), true)
///     .unwrap();
/// assert_eq!(fixtures.get::<u32>("answer"), Some(&42));
/// assert!(!fixtures.contains("greeting"));
/// ```
#[derive(Clone, Default)]
pub struct FixtureProvider {
    factories: IndexMap<String, FixtureFactory>,
}

impl FixtureProvider {
    /// Create a provider without any fixtures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with<T, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Register a factory; a later registration of the same name replaces
    /// the earlier one.
    pub fn register<T, F>(&mut self, name: impl Into<String>, factory: F)
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.factories
            .insert(name.into(), Arc::new(move || Box::new(factory())));
    }

    /// Names of all fixtures this provider can build.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build exactly the requested fixtures.
    ///
    /// Unknown names are an error when `strict` is set and are skipped with a
    /// warning otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnknownFixture`] for the first unknown name in
    /// strict mode.
    pub fn materialize(
        &self,
        requested: &FixtureSet,
        strict: bool,
    ) -> Result<Fixtures, HarnessError> {
        let mut fixtures = Fixtures::new();
        for name in requested.names() {
            let Some(factory) = self.factories.get(name) else {
                if strict {
                    return Err(HarnessError::UnknownFixture {
                        name: name.to_owned(),
                        available: self.names().collect::<Vec<_>>().join(", "),
                    });
                }
                log::warn!("fixture '{name}' requested but not provided; continuing without it");
                continue;
            };
            fixtures.insert_boxed(name.to_owned(), factory());
        }
        Ok(fixtures)
    }
}

impl fmt::Debug for FixtureProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureProvider")
            .field("fixtures", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
