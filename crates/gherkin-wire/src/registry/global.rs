//! Process-wide registry populated through [`step!`](crate::step).

use std::sync::{Arc, LazyLock};

use gherkin_wire_harness::Fixtures;

use super::HandlerRegistry;
use crate::args::StepArgs;
use crate::error::StepError;
use crate::keyword::StepKeyword;
use crate::signature::Signature;

/// Const-constructible form of [`Signature`] used by [`step!`](crate::step).
#[derive(Debug, Clone, Copy)]
pub enum StaticSignature {
    /// No named fixtures.
    None,
    /// Explicit list of fixture names.
    Fixtures(&'static [&'static str]),
    /// Declared parameter-list text.
    Source(&'static str),
}

impl From<StaticSignature> for Signature {
    fn from(value: StaticSignature) -> Self {
        match value {
            StaticSignature::None => Self::None,
            StaticSignature::Fixtures(names) => Self::fixtures(names.iter().copied()),
            StaticSignature::Source(text) => Self::source(text),
        }
    }
}

/// A step definition submitted to the global registry.
#[derive(Debug)]
pub struct StepDefinition {
    /// Primary keyword.
    pub keyword: StepKeyword,
    /// Pattern text.
    pub pattern: &'static str,
    /// Declared fixture dependencies.
    pub signature: StaticSignature,
    /// Handler body.
    pub run: fn(&mut Fixtures, &StepArgs<'_>) -> Result<(), StepError>,
    /// Source file of the definition.
    pub file: &'static str,
    /// Line of the definition.
    pub line: u32,
}

inventory::collect!(StepDefinition);

/// Register a function as a step handler in the global registry.
///
/// # Forms
///
/// ```ignore
/// step!(StepKeyword::Given, "a browser", open_browser);
/// step!(StepKeyword::Given, "a page", open_page, fixtures = ["browser", "page"]);
/// step!(StepKeyword::When, "I click {id}", click, signature = "fn click({ page }: Ctx)");
/// ```
///
/// Definitions whose pattern is invalid or already taken are skipped with an
/// error log when the global registry is first built.
#[macro_export]
macro_rules! step {
    (@submit $keyword:expr, $pattern:expr, $handler:path, $signature:expr) => {
        $crate::submit! {
            $crate::StepDefinition {
                keyword: $keyword,
                pattern: $pattern,
                signature: $signature,
                run: $handler,
                file: file!(),
                line: line!(),
            }
        }
    };
    ($keyword:expr, $pattern:expr, $handler:path, fixtures = [$($fixture:expr),* $(,)?] $(,)?) => {
        $crate::step!(
            @submit $keyword,
            $pattern,
            $handler,
            $crate::StaticSignature::Fixtures(&[$($fixture),*])
        );
    };
    ($keyword:expr, $pattern:expr, $handler:path, signature = $source:expr $(,)?) => {
        $crate::step!(
            @submit $keyword,
            $pattern,
            $handler,
            $crate::StaticSignature::Source($source)
        );
    };
    ($keyword:expr, $pattern:expr, $handler:path $(,)?) => {
        $crate::step!(@submit $keyword, $pattern, $handler, $crate::StaticSignature::None);
    };
}

static GLOBAL: LazyLock<HandlerRegistry> = LazyLock::new(|| {
    let mut registry = HandlerRegistry::new();
    for def in inventory::iter::<StepDefinition> {
        let location = format!("{}:{}", def.file, def.line);
        if let Err(err) = registry.insert(
            def.keyword,
            def.pattern,
            def.signature.into(),
            Arc::new(def.run),
            Some(location.clone()),
        ) {
            log::error!("skipping step defined at {location}: {err}");
        }
    }
    log::debug!("global registry holds {} step handler(s)", registry.len());
    registry
});

impl HandlerRegistry {
    /// The registry of every handler submitted with [`step!`](crate::step).
    ///
    /// Built on first use and shared for the rest of the process.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }
}
