//! Command tokenization and unambiguous-prefix matching.
//!
//! Every processor declares its command words once; a received token
//! resolves against them with the shortest-unique-prefix rule real vendor
//! CLIs use: an exact match always wins, a prefix that matches exactly one
//! word selects it, and a prefix shared by several words is ambiguous.
//! `no` is an ordinary first-class word in the tables, so `no vlan 5`
//! resolves through the same machinery as `vlan 5`.

/// Outcome of resolving one token against a command table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The token selected exactly one command word.
    Match(&'static str),
    /// The token is a prefix of several command words.
    Ambiguous(Vec<&'static str>),
    /// The token matched nothing.
    None,
}

/// Resolve `token` against `words` case-insensitively.
pub fn resolve(words: &[&'static str], token: &str) -> Resolution {
    let token = token.to_ascii_lowercase();

    let mut candidates = Vec::new();
    for word in words {
        let lower = word.to_ascii_lowercase();
        if lower == token {
            return Resolution::Match(word);
        }
        if lower.starts_with(&token) {
            candidates.push(*word);
        }
    }

    match candidates.len() {
        0 => Resolution::None,
        1 => Resolution::Match(candidates[0]),
        _ => Resolution::Ambiguous(candidates),
    }
}

/// A tokenized command line that can still hand back the raw tail of the
/// line, for arguments like descriptions that keep their spacing.
#[derive(Debug, Clone)]
pub struct Args<'a> {
    line: &'a str,
    /// (byte offset, token) pairs.
    tokens: Vec<(usize, &'a str)>,
}

impl<'a> Args<'a> {
    /// Tokenize a line on whitespace.
    pub fn parse(line: &'a str) -> Self {
        let mut tokens = Vec::new();
        let mut offset = 0;
        for token in line.split_whitespace() {
            // split_whitespace yields tokens in order; find each one after
            // the previous to recover its byte offset.
            let start = line[offset..].find(token).unwrap() + offset;
            tokens.push((start, token));
            offset = start + token.len();
        }
        Self { line, tokens }
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the line held no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token by index.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).map(|(_, t)| *t)
    }

    /// The raw line from token `index` to the end, original spacing kept.
    pub fn rest_from(&self, index: usize) -> Option<&'a str> {
        self.tokens
            .get(index)
            .map(|(start, _)| self.line[*start..].trim_end())
    }

    /// Byte offset of token `index` within the line. Used for the Cisco
    /// caret placement under the offending token.
    pub fn offset(&self, index: usize) -> Option<usize> {
        self.tokens.get(index).map(|(start, _)| *start)
    }

    /// Parse token `index` as an integer.
    pub fn int(&self, index: usize) -> Option<i64> {
        self.get(index).and_then(|t| t.parse().ok())
    }

    /// The full line.
    pub fn line(&self) -> &'a str {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &[&str] = &["enable", "exit", "show", "shutdown", "switchport"];

    #[test]
    fn test_exact_match_wins() {
        assert_eq!(resolve(WORDS, "exit"), Resolution::Match("exit"));
        // "show" is exact even though "shutdown"/"switchport" share 's'.
        assert_eq!(resolve(WORDS, "show"), Resolution::Match("show"));
    }

    #[test]
    fn test_unique_prefix() {
        assert_eq!(resolve(WORDS, "en"), Resolution::Match("enable"));
        assert_eq!(resolve(WORDS, "sho"), Resolution::Match("show"));
        assert_eq!(resolve(WORDS, "EN"), Resolution::Match("enable"));
    }

    #[test]
    fn test_ambiguous_prefix() {
        match resolve(WORDS, "s") {
            Resolution::Ambiguous(candidates) => {
                assert_eq!(candidates, vec!["show", "shutdown", "switchport"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
        match resolve(WORDS, "e") {
            Resolution::Ambiguous(candidates) => {
                assert_eq!(candidates, vec!["enable", "exit"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_no_match() {
        assert_eq!(resolve(WORDS, "bogus"), Resolution::None);
    }

    #[test]
    fn test_args_rest_and_offsets() {
        let args = Args::parse("description  Uplink  to Core");
        assert_eq!(args.len(), 4);
        assert_eq!(args.get(0), Some("description"));
        assert_eq!(args.rest_from(1), Some("Uplink  to Core"));
        assert_eq!(args.offset(1), Some(13));
    }

    #[test]
    fn test_args_int() {
        let args = Args::parse("vlan 123");
        assert_eq!(args.int(1), Some(123));
        let args = Args::parse("vlan -1");
        assert_eq!(args.int(1), Some(-1));
        let args = Args::parse("vlan abc");
        assert_eq!(args.int(1), None);
    }
}
