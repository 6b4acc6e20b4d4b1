//! Fixture dependencies declared by step handlers.
//!
//! Every handler carries a [`Signature`] describing which named fixtures it
//! reads. The descriptor is either an explicit list or the handler's declared
//! parameter-list text, whose first parameter is analysed as a destructuring
//! pattern. The [`SignatureAnalyzer`] computes and memoises the resulting
//! [`FixtureSet`] once per registered handler.

mod source;

use std::sync::OnceLock;

use gherkin_wire_harness::FixtureSet;

use crate::registry::HandlerId;

/// Statically inspectable description of the fixtures a handler needs.
///
/// # Examples
///
/// ```
/// use gherkin_wire::Signature;
///
/// let declared = Signature::fixtures(["browser", "page", "browser"]);
/// assert_eq!(declared.analyze().names().collect::<Vec<_>>(), ["browser", "page"]);
///
/// let parsed = Signature::source("|{ browser, page }: Ctx, extra|");
/// assert_eq!(parsed.analyze().names().collect::<Vec<_>>(), ["browser", "page"]);
///
/// assert!(Signature::source("({ a, ...rest }) => {}").analyze().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Signature {
    /// The handler needs no named fixtures.
    #[default]
    None,
    /// Explicit list of fixture names.
    Fixtures(FixtureSet),
    /// Declared parameter-list text, analysed on demand.
    Source(String),
}

impl Signature {
    /// Descriptor for a handler without fixtures.
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Descriptor listing fixture names explicitly; duplicates are dropped.
    #[must_use]
    pub fn fixtures<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fixtures(names.into_iter().collect())
    }

    /// Descriptor analysed from declared signature text.
    #[must_use]
    pub fn source(text: impl Into<String>) -> Self {
        Self::Source(text.into())
    }

    /// Compute the fixture set without memoisation.
    #[must_use]
    pub fn analyze(&self) -> FixtureSet {
        match self {
            Self::None => FixtureSet::new(),
            Self::Fixtures(set) => set.clone(),
            Self::Source(text) => source::fixtures_from_source(text),
        }
    }
}

/// Memoising analyser owned by a [`HandlerRegistry`](crate::HandlerRegistry).
///
/// Holds one write-once cell per registered handler, so each signature is
/// analysed at most once for the lifetime of the registry. Concurrent first
/// lookups may both compute the set; only one result is stored and both are
/// identical.
///
/// Only a registry can create one, since only a registry can reserve slots.
#[derive(Debug)]
pub struct SignatureAnalyzer {
    cells: Vec<OnceLock<FixtureSet>>,
}

impl SignatureAnalyzer {
    pub(crate) fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Reserve the slot for a newly registered handler.
    pub(crate) fn track(&mut self, id: HandlerId) {
        if self.cells.len() <= id.index() {
            self.cells.resize_with(id.index() + 1, OnceLock::new);
        }
    }

    /// Fixture set for the handler `id`, computed on first use.
    ///
    /// Handlers without a slot are analysed without caching.
    #[must_use]
    pub fn fixtures(&self, id: HandlerId, signature: &Signature) -> FixtureSet {
        let Some(cell) = self.cells.get(id.index()) else {
            return signature.analyze();
        };
        cell.get_or_init(|| {
            let set = signature.analyze();
            log::debug!("analysed signature of handler {id}: {set}");
            set
        })
        .clone()
    }

    /// Whether the handler's fixture set has already been computed.
    #[must_use]
    pub fn is_cached(&self, id: HandlerId) -> bool {
        self.cells
            .get(id.index())
            .is_some_and(|cell| cell.get().is_some())
    }
}
