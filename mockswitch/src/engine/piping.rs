//! Output pipe filters: `| begin`, `| include`, `| exclude`.

/// A post-filter applied to one command's captured output lines. The
/// pattern is a literal substring, matching the default behavior of the
/// vendor `inc`/`beg` filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipeFilter {
    /// Drop lines until the first one containing the pattern.
    Begin(String),
    /// Keep only lines containing the pattern.
    Include(String),
    /// Drop lines containing the pattern.
    Exclude(String),
}

/// Filter words recognized after the pipe, prefix-matched like commands.
const FILTER_WORDS: &[&str] = &["begin", "include", "exclude"];

/// Split a command line into the command proper and an optional trailing
/// pipe filter. An unrecognized filter word leaves the line untouched so
/// the processor reports it as invalid input.
pub fn split_pipe(line: &str) -> (&str, Option<PipeFilter>) {
    let Some(bar) = line.find('|') else {
        return (line, None);
    };

    let command = line[..bar].trim_end();
    let filter_spec = line[bar + 1..].trim();

    let mut words = filter_spec.splitn(2, char::is_whitespace);
    let keyword = words.next().unwrap_or("");
    let pattern = words.next().unwrap_or("").trim().to_string();

    let filter = match super::resolve(FILTER_WORDS, keyword) {
        super::Resolution::Match("begin") => PipeFilter::Begin(pattern),
        super::Resolution::Match("include") => PipeFilter::Include(pattern),
        super::Resolution::Match("exclude") => PipeFilter::Exclude(pattern),
        _ => return (line, None),
    };

    (command, Some(filter))
}

impl PipeFilter {
    /// Apply the filter to captured output lines.
    pub fn apply(&self, lines: Vec<String>) -> Vec<String> {
        match self {
            PipeFilter::Begin(pattern) => {
                let start = lines.iter().position(|l| l.contains(pattern.as_str()));
                match start {
                    Some(start) => lines[start..].to_vec(),
                    None => Vec::new(),
                }
            }
            PipeFilter::Include(pattern) => lines
                .into_iter()
                .filter(|l| l.contains(pattern.as_str()))
                .collect(),
            PipeFilter::Exclude(pattern) => lines
                .into_iter()
                .filter(|l| !l.contains(pattern.as_str()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_pipe() {
        let (cmd, filter) = split_pipe("show running-config | include vlan");
        assert_eq!(cmd, "show running-config");
        assert_eq!(filter, Some(PipeFilter::Include("vlan".to_string())));

        let (cmd, filter) = split_pipe("show running-config");
        assert_eq!(cmd, "show running-config");
        assert_eq!(filter, None);

        // Prefix-matched filter word.
        let (_, filter) = split_pipe("show run | beg interface");
        assert_eq!(filter, Some(PipeFilter::Begin("interface".to_string())));
    }

    #[test]
    fn test_begin_drops_until_match() {
        let filter = PipeFilter::Begin("interface".to_string());
        let output = filter.apply(lines(&["vlan 5", "!", "interface Fa0/1", " shutdown"]));
        assert_eq!(output, lines(&["interface Fa0/1", " shutdown"]));

        let filter = PipeFilter::Begin("nothing".to_string());
        assert!(filter.apply(lines(&["a", "b"])).is_empty());
    }

    #[test]
    fn test_include_and_exclude() {
        let input = lines(&["vlan 5", "interface Fa0/1", "vlan 6"]);

        let include = PipeFilter::Include("vlan".to_string());
        assert_eq!(include.apply(input.clone()), lines(&["vlan 5", "vlan 6"]));

        let exclude = PipeFilter::Exclude("vlan".to_string());
        assert_eq!(exclude.apply(input), lines(&["interface Fa0/1"]));
    }

    #[test]
    fn test_pattern_is_literal() {
        let include = PipeFilter::Include("1.2".to_string());
        // A regex would also match "102"; the literal filter must not.
        let output = include.apply(lines(&["ip 1.2.3.4", "ip 10283"]));
        assert_eq!(output, lines(&["ip 1.2.3.4"]));
    }
}
