//! Glob pattern compiler for section selectors.
//!
//! A selector glob is translated into an anchored regular expression:
//! - `*` matches any run of characters except `/`, `**` also crosses `/`
//! - `?` matches one character except `/`
//! - `[abc]`, `[a-d]`, `[!abc]`/`[^abc]` are character classes; a class body
//!   holding an unescaped `/` is not a class and the `[` stays literal
//! - `{a,b,c}` is an alternation whose alternatives may nest further braces;
//!   a group with no comma at any depth is literal, e.g. `{single}`
//! - `{m..n}` matches every integer from `m` to `n`
//! - `/**/` matches `/` or any run of directories between two slashes
//! - `\x` matches `x` literally
//!
//! Compilation never fails. Constructs that do not parse (unbalanced braces,
//! unterminated classes, inverted class ranges, malformed ranges) are matched
//! literally.

use regex::{Regex, RegexBuilder};

/// Largest number of integers a `{m..n}` range expands to.
const MAX_RANGE_SPAN: u64 = 10_000;

/// Compiled size limit for a single selector.
const REGEX_SIZE_LIMIT: usize = 1 << 25;

/// A compiled selector glob.
#[derive(Debug, Clone)]
pub struct Pattern {
    glob: String,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Regex(Regex),
    /// Used when the translated expression is rejected by the regex engine.
    Literal(String),
}

impl Pattern {
    /// Compile `glob` into a matcher over whole strings.
    pub fn new(glob: &str) -> Self {
        let source = format!("^{}$", translate(glob));
        let matcher = match RegexBuilder::new(&source)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
        {
            Ok(regex) => Matcher::Regex(regex),
            Err(err) => {
                tracing::debug!("matching {glob:?} literally: {err}");
                Matcher::Literal(glob.to_string())
            }
        };

        Self {
            glob: glob.to_string(),
            matcher,
        }
    }

    /// The glob this pattern was compiled from.
    pub fn glob(&self) -> &str {
        &self.glob
    }

    /// Whether the whole of `path` matches.
    pub fn is_match(&self, path: &str) -> bool {
        match &self.matcher {
            Matcher::Regex(regex) => regex.is_match(path),
            Matcher::Literal(glob) => glob == path,
        }
    }
}

/// Translate a glob into regular expression source, without anchors.
pub fn translate(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2);
    translate_into(&chars, &mut out);
    out
}

fn translate_into(chars: &[char], out: &mut String) {
    let braces = braces_balanced(chars);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;

        match c {
            '\\' => match chars.get(i) {
                Some(&escaped) => {
                    push_literal(out, escaped);
                    i += 1;
                }
                None => push_literal(out, '\\'),
            },
            '*' => {
                if chars.get(i) == Some(&'*') {
                    out.push_str(".*");
                    i += 1;
                } else {
                    out.push_str("[^/]*");
                }
            }
            '/' => {
                if chars[i..].starts_with(&['*', '*', '/']) {
                    out.push_str("(?:/|/.*/)");
                    i += 3;
                } else {
                    out.push('/');
                }
            }
            '?' => out.push_str("[^/]"),
            '[' => match parse_class(chars, i) {
                Some((class, next)) => {
                    out.push_str(&class);
                    i = next;
                }
                None => out.push_str(r"\["),
            },
            '{' if braces => match group_end(chars, i) {
                Some(end) => {
                    translate_group(&chars[i..end], out);
                    i = end + 1;
                }
                None => out.push_str(r"\{"),
            },
            _ => push_literal(out, c),
        }
    }
}

/// Translate the body of a `{...}` group (braces excluded).
fn translate_group(body: &[char], out: &mut String) {
    let alternatives = split_alternatives(body);

    if alternatives.len() == 1 {
        let inner: String = body.iter().collect();
        if let Some((low, high)) = numeric_range(&inner) {
            out.push_str("(?:");
            for (n, value) in (low..=high).enumerate() {
                if n > 0 {
                    out.push('|');
                }
                out.push_str(&regex::escape(&value.to_string()));
            }
            out.push(')');
            return;
        }

        // `{a{b,c}}` still alternates through its nested group.
        if !has_comma(body) {
            out.push_str(r"\{");
            translate_into(body, out);
            out.push_str(r"\}");
            return;
        }
    }

    out.push_str("(?:");
    for (n, alternative) in alternatives.iter().enumerate() {
        if n > 0 {
            out.push('|');
        }
        translate_into(alternative, out);
    }
    out.push(')');
}

/// Whether unescaped `{` and `}` occur the same number of times.
fn braces_balanced(chars: &[char]) -> bool {
    let mut open = 0usize;
    let mut close = 0usize;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '{' => open += 1,
            '}' => close += 1,
            _ => {}
        }
        i += 1;
    }

    open == close
}

/// Index of the `}` closing a group whose body starts at `start`.
fn group_end(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = start;

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Split a group body on the commas that are neither escaped nor nested.
fn split_alternatives(body: &[char]) -> Vec<&[char]> {
    let mut alternatives = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < body.len() {
        match body[i] {
            '\\' => i += 1,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                alternatives.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    alternatives.push(&body[start..]);
    alternatives
}

/// Whether an unescaped comma occurs anywhere in `body`, nested or not.
fn has_comma(body: &[char]) -> bool {
    let mut i = 0;

    while i < body.len() {
        match body[i] {
            '\\' => i += 1,
            ',' => return true,
            _ => {}
        }
        i += 1;
    }

    false
}

/// Parse `m..n` with optionally signed integer bounds and `m <= n`.
fn numeric_range(inner: &str) -> Option<(i64, i64)> {
    let (low, high) = inner.split_once("..")?;
    let low = parse_integer(low)?;
    let high = parse_integer(high)?;

    if low > high || high.abs_diff(low) >= MAX_RANGE_SPAN {
        return None;
    }
    Some((low, high))
}

fn parse_integer(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parse a character class whose body starts at `start` (just past the `[`).
///
/// Returns the regex class and the index following the closing `]`, or
/// `None` when the `[` has to be matched literally: the class is unterminated,
/// holds a `/`, or has a range whose bounds are inverted.
fn parse_class(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start;
    let mut class = String::from("[");

    if matches!(chars.get(i), Some('!') | Some('^')) {
        class.push('^');
        i += 1;
    }

    let body_start = i;
    let mut previous = None;
    loop {
        let c = *chars.get(i)?;
        match c {
            // A `]` right after the opening bracket is a member.
            ']' if i > body_start => {
                class.push(']');
                return Some((class, i + 1));
            }
            '/' => return None,
            '\\' => {
                let escaped = *chars.get(i + 1)?;
                push_literal(&mut class, escaped);
                previous = Some(escaped);
                i += 2;
            }
            '-' if i > body_start && chars.get(i + 1).is_some_and(|&next| next != ']') => {
                let high = match chars[i + 1] {
                    '\\' => *chars.get(i + 2)?,
                    next => next,
                };
                if previous.is_some_and(|low: char| low > high) {
                    return None;
                }
                class.push('-');
                previous = None;
                i += 1;
            }
            _ => {
                push_literal(&mut class, c);
                previous = Some(c);
                i += 1;
            }
        }
    }
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a*e.c", r"a[^/]*e\.c")]
    #[case("a**z.c", r"a.*z\.c")]
    #[case("d/**/z.c", r"d(?:/|/.*/)z\.c")]
    #[case("som?.c", r"som[^/]\.c")]
    #[case(r"[\]ab].g", r"[\]ab]\.g")]
    #[case("[ab]].g", r"[ab]\]\.g")]
    #[case("ab[/c", r"ab\[/c")]
    #[case("*.{py,js,html}", r"[^/]*\.(?:py|js|html)")]
    #[case("{single}.b", r"\{single\}\.b")]
    #[case("{{,b,c{d}.i", r"\{\{,b,c\{d\}\.i")]
    #[case(r"{a\,b,cd}", "(?:a,b|cd)")]
    #[case(r"{e,\},f}", r"(?:e|\}|f)")]
    #[case("a{1..3}.go", r"a(?:1|2|3)\.go")]
    #[case("{a{b,c}}.x", r"(?:a(?:b|c))\.x")]
    #[case("[z-a].txt", r"\[z\-a\]\.txt")]
    fn test_translate(#[case] glob: &str, #[case] expected: &str) {
        assert_eq!(translate(glob), expected);
    }

    #[rstest]
    // wildcards
    #[case("*.go", "main.go", true)]
    #[case("*.go", "cmd/main.go", false)]
    #[case("**.go", "cmd/main.go", true)]
    #[case("som?.c", "some.c", true)]
    #[case("som?.c", "som/.c", false)]
    #[case("som?.c", "so.c", false)]
    // path-aware `**`
    #[case("a/**/z.c", "a/z.c", true)]
    #[case("a/**/z.c", "a/b/z.c", true)]
    #[case("a/**/z.c", "a/b/c/d/z.c", true)]
    #[case("a/**/z.c", "a/bz.c", false)]
    #[case("a/**", "a/b/c", true)]
    // character classes
    #[case("[ab].g", "a.g", true)]
    #[case("[ab].g", "c.g", false)]
    #[case("[a-d].g", "c.g", true)]
    #[case("[a-d].g", "e.g", false)]
    #[case("[!ab].g", "c.g", true)]
    #[case("[!ab].g", "a.g", false)]
    #[case("[^ab].g", "a.g", false)]
    #[case("[]a].g", "].g", true)]
    #[case("[!]a].g", "].g", false)]
    #[case("[!]a].g", "b.g", true)]
    #[case("[-a].g", "-.g", true)]
    #[case("[a-].g", "-.g", true)]
    #[case("[&&].g", "&.g", true)]
    #[case("ab[/c", "ab[/c", true)]
    #[case("ab[e/]cd.i", "ab[e/]cd.i", true)]
    #[case("ab[e/]cd.i", "abecd.i", false)]
    #[case("ab[c", "ab[c", true)]
    #[case("ab[c", "abc", false)]
    #[case("[z-a].txt", "[z-a].txt", true)]
    #[case("[z-a].txt", "b.txt", false)]
    #[case(r"[b-\a]", "[b-a]", true)]
    // alternation
    #[case("*.{js,css,less,htm,html}", "style.css", true)]
    #[case("*.{js,css,less,htm,html}", "main.go", false)]
    #[case("{word,{also},this}.g", "{also}.g", true)]
    #[case("{word,{also},this}.g", "word.g", true)]
    #[case("{word,{also},this}.g", "also.g", false)]
    #[case("{a,{b,c}}.x", "c.x", true)]
    #[case("{a{b,c}}.x", "ab.x", true)]
    #[case("{a{b,c}}.x", "ac.x", true)]
    #[case("{a{b,c}}.x", "{ab}.x", false)]
    #[case("{a{b}}.x", "{a{b}}.x", true)]
    #[case("{a,,b}.x", ".x", true)]
    #[case("{a,,b}.x", "b.x", true)]
    #[case("{single}.b", "{single}.b", true)]
    #[case("{single}.b", "single.b", false)]
    #[case("{}", "{}", true)]
    #[case("{{,b,c{d}.i", "{{,b,c{d}.i", true)]
    #[case("{{,b,c{d}.i", "b.i", false)]
    #[case("a}b{", "a}b{", true)]
    #[case(r"{a\,b,cd}", "a,b", true)]
    #[case(r"{e,\},f}", "}", true)]
    // numeric ranges
    #[case("a{1..3}.go", "a2.go", true)]
    #[case("a{1..3}.go", "a4.go", false)]
    #[case("a{1..3}.go", "a02.go", false)]
    #[case("{-3..-1}", "-2", true)]
    #[case("{-3..-1}", "2", false)]
    #[case("{+1..2}", "1", true)]
    #[case("{3..}", "{3..}", true)]
    #[case("{3..}", "3", false)]
    #[case("{a..c}", "{a..c}", true)]
    #[case("{a..c}", "b", false)]
    #[case("{5..1}", "{5..1}", true)]
    #[case("{5..1}", "3", false)]
    #[case(
        "{-9223372036854775807..9223372036854775807}",
        "{-9223372036854775807..9223372036854775807}",
        true
    )]
    #[case("{-9223372036854775808..9223372036854775807}", "0", false)]
    // escaping
    #[case(r"\*.go", "*.go", true)]
    #[case(r"\*.go", "a.go", false)]
    #[case(r"a\?", "a?", true)]
    #[case(r"\[ab]", "[ab]", true)]
    #[case("trailing\\", "trailing\\", true)]
    // regex metacharacters are literal
    #[case("a+b(c)|d$.^", "a+b(c)|d$.^", true)]
    #[case("a.c", "abc", false)]
    fn test_is_match(#[case] glob: &str, #[case] path: &str, #[case] expected: bool) {
        assert_eq!(
            Pattern::new(glob).is_match(path),
            expected,
            "{glob:?} against {path:?} (regex: {})",
            translate(glob)
        );
    }

    #[test]
    fn test_compile_is_deterministic() {
        for glob in ["*.{a,b{c,d}}", "[!x-z]?/**/{1..4}", "{3..}", "ab[/c"] {
            assert_eq!(translate(glob), translate(glob));
            let first = Pattern::new(glob);
            let second = Pattern::new(glob);
            for path in ["a.bd", "q1/x/y/3", "{3..}", "ab[/c", "zz"] {
                assert_eq!(first.is_match(path), second.is_match(path));
            }
        }
    }

    #[test]
    fn test_oversized_range_is_literal() {
        let pattern = Pattern::new("{0..99999999}");
        assert!(pattern.is_match("{0..99999999}"));
        assert!(!pattern.is_match("5"));
    }

    #[test]
    fn test_glob_is_kept() {
        assert_eq!(Pattern::new("*.rs").glob(), "*.rs");
    }
}
