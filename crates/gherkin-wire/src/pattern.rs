//! Step patterns with `{name}` placeholders.
//!
//! A pattern is literal text in which `{name}` matches any non-empty run of
//! characters. `{{` and `}}` stand for literal braces. Patterns compile to
//! anchored regular expressions; when several patterns match the same text
//! the most specific one wins (see [`Specificity`]).

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;

use crate::error::PatternError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Placeholder(String),
}

fn lex(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' if chars.next_if(|&(_, c)| c == '{').is_some() => literal.push('{'),
            '}' if chars.next_if(|&(_, c)| c == '}').is_some() => literal.push('}'),
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(PatternError::Placeholder {
                        message: "unclosed placeholder",
                        position: pos,
                    });
                }
                if !is_identifier(&name) {
                    return Err(PatternError::Placeholder {
                        message: "invalid placeholder name",
                        position: pos,
                    });
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Placeholder(name));
            }
            '}' => {
                return Err(PatternError::Placeholder {
                    message: "unmatched closing brace",
                    position: pos,
                });
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Ranking used to pick between several matching patterns.
///
/// More literal characters rank higher; on a tie, fewer placeholders rank
/// higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Specificity {
    /// Number of literal characters.
    pub literal_chars: usize,
    /// Number of placeholders.
    pub placeholders: usize,
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literal_chars
            .cmp(&other.literal_chars)
            .then_with(|| other.placeholders.cmp(&self.placeholders))
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A compiled step pattern.
///
/// # Examples
///
/// ```
/// use gherkin_wire::StepPattern;
///
/// let pattern = StepPattern::compile("I have {count} cats").unwrap();
/// assert_eq!(pattern.captures("I have 3 cats"), Some(vec!["3".to_owned()]));
/// assert_eq!(pattern.captures("I have cats"), None);
/// ```
#[derive(Debug, Clone)]
pub struct StepPattern {
    text: String,
    regex: Regex,
    placeholders: Vec<String>,
    specificity: Specificity,
}

impl StepPattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when a placeholder is malformed or the
    /// generated expression fails to compile.
    pub fn compile(text: &str) -> Result<Self, PatternError> {
        let tokens = lex(text)?;
        let mut source = String::from("^");
        let mut placeholders = Vec::new();
        let mut specificity = Specificity::default();
        for token in tokens {
            match token {
                Token::Literal(lit) => {
                    specificity.literal_chars += lit.chars().count();
                    source.push_str(&regex::escape(&lit));
                }
                Token::Placeholder(name) => {
                    specificity.placeholders += 1;
                    source.push_str("(.+?)");
                    placeholders.push(name);
                }
            }
        }
        source.push('$');
        Ok(Self {
            text: text.to_owned(),
            regex: Regex::new(&source)?,
            placeholders,
            specificity,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Placeholder names in order of appearance.
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Ranking of this pattern against other matching patterns.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// Whether the pattern has no placeholders.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Match `text`, returning the captured placeholder values in order.
    #[must_use]
    pub fn captures(&self, text: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(text)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map_or_else(String::new, |m| m.as_str().to_owned()))
                .collect(),
        )
    }
}

impl PartialEq for StepPattern {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for StepPattern {}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
