//! Step handler registration and lookup.
//!
//! A [`HandlerRegistry`] maps a primary keyword and a [`StepPattern`] to a
//! [`Handler`]. Lookup prefers a pattern whose text equals the step text
//! exactly; otherwise the most specific matching pattern wins, and among
//! equally specific patterns the one registered first.

mod global;
#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use gherkin_wire_harness::{FixtureSet, Fixtures};

use crate::args::StepArgs;
use crate::error::{RegistryError, StepError};
use crate::keyword::StepKeyword;
use crate::pattern::StepPattern;
use crate::signature::{Signature, SignatureAnalyzer};

pub use global::{StaticSignature, StepDefinition};

/// Type-erased step handler body.
pub type StepFn =
    Arc<dyn Fn(&mut Fixtures, &StepArgs<'_>) -> Result<(), StepError> + Send + Sync>;

/// Identity of a handler within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(usize);

impl HandlerId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Registration index of the handler.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered step handler.
pub struct Handler {
    id: HandlerId,
    keyword: StepKeyword,
    pattern: StepPattern,
    signature: Signature,
    run: StepFn,
    location: Option<String>,
}

impl Handler {
    /// Identity within the owning registry.
    #[must_use]
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Primary keyword the handler was registered under.
    #[must_use]
    pub fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// Pattern matched against step text.
    #[must_use]
    pub fn pattern(&self) -> &StepPattern {
        &self.pattern
    }

    /// Declared fixture dependencies.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Source location (`file:line`) for handlers registered with
    /// [`step!`](crate::step).
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Run the handler body.
    ///
    /// # Errors
    ///
    /// Returns whatever the body returns.
    pub fn invoke(&self, fixtures: &mut Fixtures, args: &StepArgs<'_>) -> Result<(), StepError> {
        (self.run)(fixtures, args)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("id", &self.id)
            .field("keyword", &self.keyword)
            .field("pattern", &self.pattern.as_str())
            .field("signature", &self.signature)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// A handler matched against a concrete step text.
#[derive(Debug, Clone)]
pub struct ResolvedHandler {
    handler: Arc<Handler>,
    captures: Vec<String>,
}

impl ResolvedHandler {
    /// Pair a handler with the values its pattern captured.
    #[must_use]
    pub fn new(handler: Arc<Handler>, captures: Vec<String>) -> Self {
        Self { handler, captures }
    }

    /// The matched handler.
    #[must_use]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Placeholder values in pattern order.
    #[must_use]
    pub fn captures(&self) -> &[String] {
        &self.captures
    }
}

/// Lookup operations the translator needs from a handler registry.
pub trait StepLookup {
    /// Find the handler for a primary keyword and step text.
    fn resolve(&self, keyword: StepKeyword, text: &str) -> Option<ResolvedHandler>;

    /// Fixtures the handler declares.
    fn fixtures(&self, handler: &Handler) -> FixtureSet;
}

/// Registry of step handlers.
///
/// # Examples
///
/// ```
/// use gherkin_wire::{HandlerRegistry, Signature, StepKeyword, StepLookup};
///
/// let mut registry = HandlerRegistry::new();
/// registry
///     .given("I have {count} cats", Signature::fixtures(["home"]), |_, args| {
///         let _count: u32 = args.arg(0)?;
///         Ok(())
///     })
///     .unwrap();
///
/// let resolved = registry.resolve(StepKeyword::Given, "I have 3 cats").unwrap();
/// assert_eq!(resolved.captures(), ["3"]);
/// let fixtures = registry.fixtures(resolved.handler());
/// assert_eq!(fixtures.names().collect::<Vec<_>>(), ["home"]);
/// ```
pub struct HandlerRegistry {
    handlers: Vec<Arc<Handler>>,
    by_pattern: HashMap<(StepKeyword, String), HandlerId>,
    analyzer: SignatureAnalyzer,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            by_pattern: HashMap::new(),
            analyzer: SignatureAnalyzer::new(),
        }
    }

    /// Register a context (`Given`) handler.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn given<F>(
        &mut self,
        pattern: &str,
        signature: Signature,
        run: F,
    ) -> Result<HandlerId, RegistryError>
    where
        F: Fn(&mut Fixtures, &StepArgs<'_>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.register(StepKeyword::Given, pattern, signature, run)
    }

    /// Register an action (`When`) handler.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn when<F>(
        &mut self,
        pattern: &str,
        signature: Signature,
        run: F,
    ) -> Result<HandlerId, RegistryError>
    where
        F: Fn(&mut Fixtures, &StepArgs<'_>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.register(StepKeyword::When, pattern, signature, run)
    }

    /// Register an outcome (`Then`) handler.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn then<F>(
        &mut self,
        pattern: &str,
        signature: Signature,
        run: F,
    ) -> Result<HandlerId, RegistryError>
    where
        F: Fn(&mut Fixtures, &StepArgs<'_>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.register(StepKeyword::Then, pattern, signature, run)
    }

    /// Register a handler under a primary keyword.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Conjunction`] for `And` or `But`.
    /// - [`RegistryError::InvalidPattern`] when the pattern does not compile.
    /// - [`RegistryError::Duplicate`] when the keyword and pattern are taken.
    pub fn register<F>(
        &mut self,
        keyword: StepKeyword,
        pattern: &str,
        signature: Signature,
        run: F,
    ) -> Result<HandlerId, RegistryError>
    where
        F: Fn(&mut Fixtures, &StepArgs<'_>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.insert(keyword, pattern, signature, Arc::new(run), None)
    }

    fn insert(
        &mut self,
        keyword: StepKeyword,
        pattern: &str,
        signature: Signature,
        run: StepFn,
        location: Option<String>,
    ) -> Result<HandlerId, RegistryError> {
        if keyword.is_conjunction() {
            return Err(RegistryError::Conjunction {
                keyword,
                pattern: pattern.to_owned(),
            });
        }
        let key = (keyword, pattern.to_owned());
        if self.by_pattern.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                keyword,
                pattern: pattern.to_owned(),
            });
        }
        let compiled =
            StepPattern::compile(pattern).map_err(|source| RegistryError::InvalidPattern {
                pattern: pattern.to_owned(),
                source,
            })?;

        let id = HandlerId::new(self.handlers.len());
        self.handlers.push(Arc::new(Handler {
            id,
            keyword,
            pattern: compiled,
            signature,
            run,
            location,
        }));
        self.by_pattern.insert(key, id);
        self.analyzer.track(id);
        log::debug!("registered {keyword} handler {id} for '{pattern}'");
        Ok(id)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Look up a handler by id.
    #[must_use]
    pub fn get(&self, id: HandlerId) -> Option<&Handler> {
        self.handlers.get(id.index()).map(AsRef::as_ref)
    }

    /// All handlers in registration order.
    pub fn handlers(&self) -> impl Iterator<Item = &Handler> {
        self.handlers.iter().map(AsRef::as_ref)
    }

    /// The memoising signature analyser owned by this registry.
    #[must_use]
    pub fn analyzer(&self) -> &SignatureAnalyzer {
        &self.analyzer
    }

    fn owns(&self, handler: &Handler) -> bool {
        self.handlers
            .get(handler.id.index())
            .is_some_and(|own| std::ptr::eq(own.as_ref(), handler))
    }
}

impl StepLookup for HandlerRegistry {
    fn resolve(&self, keyword: StepKeyword, text: &str) -> Option<ResolvedHandler> {
        // Escaped braces make the raw pattern differ from the text it matches.
        let exact = self
            .by_pattern
            .get(&(keyword, text.to_owned()))
            .and_then(|id| self.handlers.get(id.index()))
            .and_then(|handler| handler.pattern.captures(text).map(|c| (handler, c)));
        if let Some((handler, captures)) = exact {
            return Some(ResolvedHandler::new(Arc::clone(handler), captures));
        }

        let mut best: Option<(&Arc<Handler>, Vec<String>)> = None;
        for handler in self.handlers.iter().filter(|h| h.keyword == keyword) {
            let Some(captures) = handler.pattern.captures(text) else {
                continue;
            };
            let more_specific = best.as_ref().is_none_or(|(current, _)| {
                handler.pattern.specificity() > current.pattern.specificity()
            });
            if more_specific {
                best = Some((handler, captures));
            }
        }
        best.map(|(handler, captures)| ResolvedHandler::new(Arc::clone(handler), captures))
    }

    fn fixtures(&self, handler: &Handler) -> FixtureSet {
        if self.owns(handler) {
            self.analyzer.fixtures(handler.id, &handler.signature)
        } else {
            handler.signature.analyze()
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}
