//! core::pattern
//!
//! Identifier patterns: glob strings and regular expressions.
//!
//! # Glob syntax
//!
//! Globs match against full identifier strings:
//!
//! - `*` matches any run of characters within one path segment
//! - `**` matches across path segments; `**/` spans zero or more whole
//!   directories
//! - `?` matches a single non-`/` character
//! - `{a,b}` matches either alternative
//! - `[abc]` matches a character class (`[!abc]` negates)
//!
//! Globs are anchored: the whole identifier must match.
//!
//! # Example
//!
//! ```
//! use stonework::core::pattern::Pattern;
//! use stonework::core::types::Identifier;
//!
//! let p = Pattern::from_glob("/*.css").unwrap();
//! assert!(p.matches(&Identifier::new("/style.css").unwrap()));
//! assert!(!p.matches(&Identifier::new("/css/style.css").unwrap()));
//!
//! let p = Pattern::from_glob("/**/*.css").unwrap();
//! assert!(p.matches(&Identifier::new("/css/deep/style.css").unwrap()));
//! ```

use regex::Regex;
use thiserror::Error;

use crate::core::types::Identifier;

/// Errors from pattern construction.
///
/// Malformed pattern syntax is rejected at construction time; a pattern
/// never silently matches nothing.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A `{` alternation was opened but never closed.
    #[error("unclosed '{{' in glob pattern '{0}'")]
    UnclosedBrace(String),

    /// A `}` appeared without a matching `{`.
    #[error("unmatched '}}' in glob pattern '{0}'")]
    UnmatchedBrace(String),

    /// A `[` character class was opened but never closed.
    #[error("unclosed '[' in glob pattern '{0}'")]
    UnclosedBracket(String),

    /// The translated glob failed to compile.
    #[error("glob pattern '{pattern}' is invalid: {message}")]
    Invalid { pattern: String, message: String },
}

/// A pattern over identifiers: either a glob string or a regex.
///
/// Matching is always evaluated against the identifier's full string form.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// A glob pattern, kept with its source form for diagnostics.
    Glob { source: String, regex: Regex },
    /// A regular expression, used as-is (unanchored).
    Regex(Regex),
}

impl Pattern {
    /// Compile a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] describing the malformed construct.
    ///
    /// # Example
    ///
    /// ```
    /// use stonework::core::pattern::Pattern;
    ///
    /// assert!(Pattern::from_glob("/projects/*.md").is_ok());
    /// assert!(Pattern::from_glob("/{a,b").is_err());
    /// ```
    pub fn from_glob(glob: &str) -> Result<Self, PatternError> {
        let translated = translate_glob(glob)?;
        let regex = Regex::new(&translated).map_err(|e| PatternError::Invalid {
            pattern: glob.to_string(),
            message: e.to_string(),
        })?;
        Ok(Pattern::Glob {
            source: glob.to_string(),
            regex,
        })
    }

    /// Wrap an already-compiled regular expression.
    pub fn from_regex(regex: Regex) -> Self {
        Pattern::Regex(regex)
    }

    /// Check whether the pattern matches an identifier.
    pub fn matches(&self, identifier: &Identifier) -> bool {
        match self {
            Pattern::Glob { regex, .. } => regex.is_match(identifier.as_str()),
            Pattern::Regex(regex) => regex.is_match(identifier.as_str()),
        }
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern::from_regex(regex)
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Glob { source, .. } => write!(f, "{}", source),
            Pattern::Regex(regex) => write!(f, "{}", regex.as_str()),
        }
    }
}

/// Translate a glob into an anchored regex string.
///
/// `**` must be handled before `*`: a double star crosses `/` boundaries,
/// a single star does not.
fn translate_glob(glob: &str) -> Result<String, PatternError> {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');

    let mut chars = glob.chars().peekable();
    let mut brace_depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        // `**/` spans zero or more whole directories, so
                        // `/**/*.md` also matches top-level `/page.md`.
                        chars.next();
                        out.push_str("(?:.*/)?");
                    } else {
                        out.push_str(".*");
                    }
                } else {
                    out.push_str("[^/]*");
                }
            }
            '?' => out.push_str("[^/]"),
            '{' => {
                brace_depth += 1;
                out.push_str("(?:");
            }
            '}' => {
                if brace_depth == 0 {
                    return Err(PatternError::UnmatchedBrace(glob.to_string()));
                }
                brace_depth -= 1;
                out.push(')');
            }
            ',' if brace_depth > 0 => out.push('|'),
            '[' => {
                out.push('[');
                match chars.peek() {
                    Some('!') => {
                        chars.next();
                        out.push('^');
                    }
                    Some(_) | None => {}
                }
                let mut closed = false;
                for cc in chars.by_ref() {
                    if cc == ']' {
                        closed = true;
                        break;
                    }
                    if regex_syntax_char(cc) && cc != '-' {
                        out.push('\\');
                    }
                    out.push(cc);
                }
                if !closed {
                    return Err(PatternError::UnclosedBracket(glob.to_string()));
                }
                out.push(']');
            }
            other => {
                if regex_syntax_char(other) {
                    out.push('\\');
                }
                out.push(other);
            }
        }
    }

    if brace_depth > 0 {
        return Err(PatternError::UnclosedBrace(glob.to_string()));
    }

    out.push('$');
    Ok(out)
}

/// Characters that carry meaning in regex syntax and need escaping.
fn regex_syntax_char(c: char) -> bool {
    matches!(
        c,
        '.' | '+' | '(' | ')' | '|' | '^' | '$' | '\\' | '[' | ']' | '{' | '}' | '*' | '?' | '-'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    mod glob {
        use super::*;

        #[test]
        fn star_stays_within_segment() {
            let p = Pattern::from_glob("/*.css").unwrap();
            assert!(p.matches(&id("/about.css")));
            assert!(p.matches(&id("/style.css")));
            assert!(!p.matches(&id("/about.md")));
            assert!(!p.matches(&id("/css/style.css")));
        }

        #[test]
        fn double_star_crosses_segments() {
            let p = Pattern::from_glob("/**/*.css").unwrap();
            assert!(p.matches(&id("/css/style.css")));
            assert!(p.matches(&id("/a/b/c/style.css")));
            assert!(!p.matches(&id("/style.md")));
        }

        #[test]
        fn double_star_spans_zero_directories() {
            let p = Pattern::from_glob("/**/*.css").unwrap();
            assert!(p.matches(&id("/style.css")));
        }

        #[test]
        fn question_mark_matches_one_char() {
            let p = Pattern::from_glob("/page?.md").unwrap();
            assert!(p.matches(&id("/page1.md")));
            assert!(p.matches(&id("/pageX.md")));
            assert!(!p.matches(&id("/page10.md")));
            assert!(!p.matches(&id("/page/.md")));
        }

        #[test]
        fn braces_match_alternatives() {
            let p = Pattern::from_glob("/index.{md,html}").unwrap();
            assert!(p.matches(&id("/index.md")));
            assert!(p.matches(&id("/index.html")));
            assert!(!p.matches(&id("/index.txt")));
        }

        #[test]
        fn character_class() {
            let p = Pattern::from_glob("/page[12].md").unwrap();
            assert!(p.matches(&id("/page1.md")));
            assert!(p.matches(&id("/page2.md")));
            assert!(!p.matches(&id("/page3.md")));
        }

        #[test]
        fn negated_character_class() {
            let p = Pattern::from_glob("/page[!1].md").unwrap();
            assert!(!p.matches(&id("/page1.md")));
            assert!(p.matches(&id("/page2.md")));
        }

        #[test]
        fn match_is_anchored() {
            let p = Pattern::from_glob("/about").unwrap();
            assert!(p.matches(&id("/about")));
            assert!(!p.matches(&id("/about.md")));
            assert!(!p.matches(&id("/x/about")));
        }

        #[test]
        fn literal_dots_not_wildcards() {
            let p = Pattern::from_glob("/a.md").unwrap();
            assert!(!p.matches(&id("/aXmd")));
        }

        #[test]
        fn unclosed_brace_rejected() {
            let err = Pattern::from_glob("/{a,b").unwrap_err();
            assert!(err.to_string().contains("unclosed '{'"));
        }

        #[test]
        fn unmatched_brace_rejected() {
            let err = Pattern::from_glob("/a}b").unwrap_err();
            assert!(err.to_string().contains("unmatched '}'"));
        }

        #[test]
        fn unclosed_bracket_rejected() {
            let err = Pattern::from_glob("/a[bc").unwrap_err();
            assert!(err.to_string().contains("unclosed '['"));
        }

        #[test]
        fn display_shows_source_form() {
            let p = Pattern::from_glob("/*.css").unwrap();
            assert_eq!(p.to_string(), "/*.css");
        }
    }

    mod regex {
        use super::*;

        #[test]
        fn regex_is_unanchored() {
            let p = Pattern::from_regex(Regex::new(r"\.css$").unwrap());
            assert!(p.matches(&id("/about.css")));
            assert!(p.matches(&id("/css/style.css")));
            assert!(!p.matches(&id("/about.md")));
        }

        #[test]
        fn from_impl() {
            let p: Pattern = Regex::new(r"^/projects/").unwrap().into();
            assert!(p.matches(&id("/projects/one.md")));
            assert!(!p.matches(&id("/about.md")));
        }
    }
}
