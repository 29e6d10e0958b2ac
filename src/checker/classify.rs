/// Tells package lines apart from the other lines an upgrade check prints.
pub trait LineClassifier {
    /// `line` has already been trimmed and is never empty.
    fn is_package_line(&self, line: &str) -> bool;
}

/// Counts every line except those starting with a known header or footer
/// prefix.
///
/// This relies on the checker printing exactly one line per package; a
/// change to the tool's output format silently skews the count.
#[derive(Debug, Clone)]
pub struct PrefixClassifier {
    ignored: Vec<String>,
}

impl PrefixClassifier {
    pub fn new<I, S>(ignored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored: ignored.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for PrefixClassifier {
    /// dnf's metadata-freshness and obsoleting-package announcements.
    fn default() -> Self {
        Self::new(["Last metadata", "Obsoleting package"])
    }
}

impl LineClassifier for PrefixClassifier {
    fn is_package_line(&self, line: &str) -> bool {
        !self.ignored.iter().any(|prefix| line.starts_with(prefix.as_str()))
    }
}

impl<F> LineClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_package_line(&self, line: &str) -> bool {
        self(line)
    }
}

/// Number of pending-update lines in the checker's standard output.
pub fn count_pending<C>(stdout: &str, classifier: &C) -> u32
where
    C: LineClassifier + ?Sized,
{
    let count = stdout
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && classifier.is_package_line(line))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
