//! Fixture names from declared parameter-list text.
//!
//! Accepted heads: `fn name(..)`, `async fn name(..)`, `function name(..)`,
//! arrow style `(..) =>` and closure style `|..|`. Only the first parameter is
//! inspected, and only when it is a braced destructuring pattern such as
//! `{ browser, page }` or `Fixtures { browser, page }: Fixtures`.

use gherkin_wire_harness::FixtureSet;

#[derive(Clone, Copy, PartialEq, Eq)]
enum CommentState {
    None,
    Line,
    Block,
}

/// Remove `//` and `/* */` comments in one linear pass.
pub(crate) fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut state = CommentState::None;
    let mut chars = source.chars().peekable();
    while let Some(ch) = chars.next() {
        match state {
            CommentState::Line => {
                if ch == '\n' {
                    out.push('\n');
                    state = CommentState::None;
                }
            }
            CommentState::Block => {
                if ch == '*' && chars.next_if_eq(&'/').is_some() {
                    out.push(' ');
                    state = CommentState::None;
                }
            }
            CommentState::None => match (ch, chars.peek()) {
                ('/', Some('/')) => {
                    chars.next();
                    state = CommentState::Line;
                }
                ('/', Some('*')) => {
                    chars.next();
                    state = CommentState::Block;
                }
                _ => out.push(ch),
            },
        }
    }
    out
}

fn closing(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '{' => Some('}'),
        '[' => Some(']'),
        '<' => Some('>'),
        _ => None,
    }
}

/// Split on commas outside any bracket pair.
///
/// `->` and `=>` are not treated as closing angle brackets.
pub(crate) fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut start = 0;
    let mut previous = '\0';
    for (pos, ch) in text.char_indices() {
        if let Some(close) = closing(ch) {
            stack.push(close);
        } else if stack.last() == Some(&ch) && !(ch == '>' && matches!(previous, '-' | '=')) {
            stack.pop();
        } else if ch == ',' && stack.is_empty() {
            push_trimmed(&mut parts, text.get(start..pos));
            start = pos + ch.len_utf8();
        }
        previous = ch;
    }
    push_trimmed(&mut parts, text.get(start..));
    parts
}

fn push_trimmed<'a>(parts: &mut Vec<&'a str>, part: Option<&'a str>) {
    if let Some(token) = part.map(str::trim).filter(|t| !t.is_empty()) {
        parts.push(token);
    }
}

/// Byte offset just past the bracket matching the one at `open_at`.
fn matching_end(text: &str, open_at: usize) -> Option<usize> {
    let mut stack: Vec<char> = Vec::new();
    for (pos, ch) in text.get(open_at..)?.char_indices() {
        if let Some(close) = closing(ch).filter(|_| ch != '<') {
            stack.push(close);
        } else if stack.last() == Some(&ch) {
            stack.pop();
            if stack.is_empty() {
                return Some(open_at + pos + ch.len_utf8());
            }
        }
    }
    None
}

/// The text between the parameter list delimiters.
fn parameter_list(head: &str) -> Option<&str> {
    let open = head.find(['(', '|'])?;
    let rest = head.get(open + 1..)?;
    if head.get(open..=open) == Some("|") {
        let mut depth = 0_usize;
        for (pos, ch) in rest.char_indices() {
            match ch {
                '(' | '{' | '[' => depth += 1,
                ')' | '}' | ']' => depth = depth.saturating_sub(1),
                '|' if depth == 0 => return rest.get(..pos),
                _ => {}
            }
        }
        return None;
    }
    let end = matching_end(head, open)?;
    head.get(open + 1..end - 1)
}

/// The braced destructuring pattern of a parameter, if it has one.
///
/// A struct path prefix (`Fixtures { .. }`) and a trailing type ascription or
/// default value are accepted and ignored.
fn destructured(param: &str) -> Option<&str> {
    let open = param.find('{')?;
    let prefix = param.get(..open)?.trim();
    let path_like = prefix
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | ' ' | '<' | '>'));
    if !path_like {
        return None;
    }
    let end = matching_end(param, open)?;
    let trailer = param.get(end..)?.trim_start();
    if !(trailer.is_empty() || trailer.starts_with(':') || trailer.starts_with('=')) {
        return None;
    }
    param.get(open + 1..end - 1)
}

/// Name an entry binds from the context, or `None` for a rest capture.
fn source_name(entry: &str) -> Option<&str> {
    if entry.starts_with("..") {
        return None;
    }
    let left = entry
        .split_once([':', '='])
        .map_or(entry, |(left, _)| left)
        .trim();
    let left = left.strip_prefix("ref ").unwrap_or(left).trim_start();
    Some(left.strip_prefix("mut ").unwrap_or(left).trim_start())
}

/// Analyse declared signature text, returning the fixtures its first
/// parameter destructures.
///
/// A rest capture anywhere in the pattern yields the empty set.
pub(crate) fn fixtures_from_source(source: &str) -> FixtureSet {
    let cleaned = strip_comments(source);
    let Some(params) = parameter_list(&cleaned) else {
        return FixtureSet::new();
    };
    let Some(first) = split_top_level(params).into_iter().next() else {
        return FixtureSet::new();
    };
    let Some(body) = destructured(first) else {
        return FixtureSet::new();
    };
    let mut names = FixtureSet::new();
    for entry in split_top_level(body) {
        let Some(name) = source_name(entry) else {
            log::debug!("rest capture in signature; requesting no named fixtures");
            return FixtureSet::new();
        };
        if !name.is_empty() {
            names.insert(name);
        }
    }
    names
}
