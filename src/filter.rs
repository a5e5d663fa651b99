//! Column include/exclude filtering with wildcard patterns

/// Predicate over column names built from include and exclude pattern lists.
///
/// Patterns are matched case-insensitively. `*x` matches any name ending in
/// `x`, `x*` any name starting with `x`, anything else only the exact name.
/// A non-empty include list takes precedence: only columns matching an
/// include pattern are kept and the exclude list is ignored. With both lists
/// empty every column is kept.
#[derive(Debug, Clone, Default)]
pub struct ColumnFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl ColumnFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Self {
        Self {
            include: normalize(include),
            exclude: normalize(exclude),
        }
    }

    /// Filter that only drops columns matching the given patterns.
    pub fn excluding(patterns: &[String]) -> Self {
        Self::new(&[], patterns)
    }

    /// Should a column with this name be kept?
    pub fn keep(&self, column: &str) -> bool {
        let name = column.to_lowercase();
        if !self.include.is_empty() {
            return self.include.iter().any(|p| matches(p, &name));
        }
        if !self.exclude.is_empty() {
            return !self.exclude.iter().any(|p| matches(p, &name));
        }
        true
    }
}

fn normalize(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Match a lowercased name against a lowercased pattern.
fn matches(pattern: &str, name: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        return name.ends_with(suffix);
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return name.starts_with(prefix);
    }
    pattern == name
}
