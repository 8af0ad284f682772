// src/i18n/parser.rs  —  Raw resource text → flat key/value table
//
// Two strategies, tried in order:
//   1. structural: every  "key" : "value"  pair that opens an object member
//   2. line heuristic: `key: value` per line, only if (1) found nothing
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

pub type StringTable = HashMap<String, String>;

/// Quoted string, optional whitespace, colon, optional whitespace, quoted string.
/// The key must follow `{`, `,` or the start of a line, so a closing quote
/// inside an array is never read as the opening quote of a key.
/// Backslash escapes inside either string are kept intact for `unescape`.
fn pair_pattern() -> &'static Regex {
    static PAIR: OnceLock<Regex> = OnceLock::new();
    PAIR.get_or_init(|| {
        Regex::new(r#"(?:(?m:^)|[{,])\s*"((?:[^"\\]|\\.)*)"\s*:\s*"((?:[^"\\]|\\.)*)""#)
            .expect("pair pattern is a valid regex")
    })
}

/// Parse a resource file. Never fails: malformed input yields whatever
/// pairs could be extracted, possibly none.
pub fn parse(raw: &str) -> StringTable {
    let table = parse_structural(raw);
    if !table.is_empty() {
        return table;
    }
    let table = parse_lines(raw);
    log::trace!("[parser] structural scan found nothing, line heuristic found {} pairs", table.len());
    table
}

/// Strategy 1: scan for quoted-string/colon/quoted-string pairs, ignoring
/// nesting, whitespace and trailing commas. Arrays contribute nothing.
pub fn parse_structural(raw: &str) -> StringTable {
    let mut table = StringTable::new();
    for caps in pair_pattern().captures_iter(raw) {
        let key = &caps[1];
        if key.is_empty() {
            continue;
        }
        // later occurrences overwrite earlier ones
        table.insert(key.to_string(), unescape(&caps[2]));
    }
    table
}

/// Strategy 2: one `key: value` pair per line, split on the first colon.
/// One trailing comma is dropped from the value before its quotes are.
pub fn parse_lines(raw: &str) -> StringTable {
    let mut table = StringTable::new();
    for line in raw.lines() {
        let Some((k, v)) = line.split_once(':') else {
            if !line.trim().is_empty() {
                log::trace!("[parser] skipping line without colon: {line:?}");
            }
            continue;
        };
        let key = strip_quotes(k.trim());
        if key.is_empty() || key.starts_with(['{', '}']) {
            log::trace!("[parser] skipping line with unusable key: {line:?}");
            continue;
        }
        let value = v.trim();
        let value = value.strip_suffix(',').map_or(value, str::trim_end);
        let value = strip_quotes(value);
        table.insert(key.to_string(), unescape(value));
    }
    table
}

/// Remove exactly one pair of surrounding double quotes, if present.
fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Resolve `\n`, `\"` and `\\`. Any other backslash sequence is left as written.
pub fn unescape(s: &str) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('n')  => { out.push('\n'); chars.next(); }
            Some('"')  => { out.push('"');  chars.next(); }
            Some('\\') => { out.push('\\'); chars.next(); }
            _          => out.push('\\'),
        }
    }
    out
}
