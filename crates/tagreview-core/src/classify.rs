//! Keyword classification of commit summary lines.
//!
//! Each line is tested for every keyword independently with a case-sensitive
//! substring match, so one line can count towards several categories.

use serde::Serialize;

/// A commit category and the keyword that selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// `fix`
    Fix,
    /// `feat`
    Feature,
    /// `refactor`
    Refactor,
    /// `test`
    Test,
    /// `style`
    Style,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Self; 5] = [
        Self::Fix,
        Self::Feature,
        Self::Refactor,
        Self::Test,
        Self::Style,
    ];

    /// The substring that places a commit line in this category.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Fix => "fix",
            Self::Feature => "feat",
            Self::Refactor => "refactor",
            Self::Test => "test",
            Self::Style => "style",
        }
    }

    /// Column heading used in the summary table.
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Fix => "Fixes",
            Self::Feature => "Features",
            Self::Refactor => "Refactors",
            Self::Test => "Tests",
            Self::Style => "Style",
        }
    }

    /// Whether `line` belongs to this category.
    pub fn matches(self, line: &str) -> bool {
        line.contains(self.keyword())
    }
}

/// Per-category commit counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitCounts {
    /// Lines containing `fix`.
    pub fixes: u64,
    /// Lines containing `feat`.
    pub features: u64,
    /// Lines containing `refactor`.
    pub refactors: u64,
    /// Lines containing `test`.
    pub tests: u64,
    /// Lines containing `style`.
    pub style: u64,
}

impl CommitCounts {
    /// The counter for a category.
    pub const fn get(&self, category: Category) -> u64 {
        match category {
            Category::Fix => self.fixes,
            Category::Feature => self.features,
            Category::Refactor => self.refactors,
            Category::Test => self.tests,
            Category::Style => self.style,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut u64 {
        match category {
            Category::Fix => &mut self.fixes,
            Category::Feature => &mut self.features,
            Category::Refactor => &mut self.refactors,
            Category::Test => &mut self.tests,
            Category::Style => &mut self.style,
        }
    }

    /// Count one commit line.
    pub fn record(&mut self, line: &str) {
        for category in Category::ALL {
            if category.matches(line) {
                *self.get_mut(category) += 1;
            }
        }
    }
}

/// Classify a sequence of commit lines.
pub fn classify<I, S>(lines: I) -> CommitCounts
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts = CommitCounts::default();
    for line in lines {
        counts.record(line.as_ref());
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_keyword() {
        let counts = classify(["fix: a", "feat: b", "feat: c"]);
        assert_eq!(
            counts,
            CommitCounts {
                fixes: 1,
                features: 2,
                refactors: 0,
                tests: 0,
                style: 0,
            }
        );
    }

    #[test]
    fn one_line_can_match_several_categories() {
        let counts = classify(["fix style test"]);
        assert_eq!(counts.fixes, 1);
        assert_eq!(counts.style, 1);
        assert_eq!(counts.tests, 1);
        assert_eq!(counts.features, 0);
        assert_eq!(counts.refactors, 0);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let counts = classify(["Fix: upper", "FEAT: shout", "Refactor it"]);
        assert_eq!(counts, CommitCounts::default());
    }

    #[test]
    fn matching_is_substring_anywhere() {
        let counts = classify([
            "0123abcd prefix fix",
            "0123abcd hotfixes and features",
            "0123abcd contestant",
        ]);
        assert_eq!(counts.fixes, 2);
        assert_eq!(counts.features, 1);
        assert_eq!(counts.tests, 1);
    }

    #[test]
    fn repeated_keyword_counts_line_once() {
        let counts = classify(["fix fix fix"]);
        assert_eq!(counts.fixes, 1);
    }

    #[test]
    fn empty_range_counts_nothing() {
        let counts = classify(Vec::<String>::new());
        assert_eq!(counts, CommitCounts::default());
    }

    #[test]
    fn counter_equals_lines_containing_keyword() {
        let lines = [
            "feat(api): x",
            "fix: y",
            "refactor: z",
            "test: add test",
            "style: fmt",
            "chore: nothing",
            "feat: and fix",
        ];
        let counts = classify(lines);
        for category in Category::ALL {
            let expected = lines.iter().filter(|l| l.contains(category.keyword())).count();
            assert_eq!(counts.get(category), expected as u64, "{category:?}");
        }
    }

    #[test]
    fn headings_follow_report_order() {
        let headings: Vec<_> = Category::ALL.iter().map(|c| c.heading()).collect();
        assert_eq!(
            headings,
            ["Fixes", "Features", "Refactors", "Tests", "Style"]
        );
    }
}
