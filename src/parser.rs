//! Parser for the structured AI response
//!
//! The service answers full-mode requests with a loosely formatted blob:
//!
//! ```text
//! ERROR_REASON: list index out of range
//! PROBLEM_LINE: print(items[3])
//! EXPLANATION: The list only has three elements.
//! FIXED_CODE:
//! print(items[2])
//! EXAMPLE:
//! items[len(items) - 1]
//! ```
//!
//! Parsing is best effort and never fails. Anything before the first known
//! prefix is dropped; unknown lines are appended to the current section.

/// Glyph shown for a section with no content
pub const PLACEHOLDER: &str = "—";

/// One of the five fixed fields of a full-mode response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    ErrorReason,
    ProblemLine,
    Explanation,
    FixedCode,
    Example,
}

impl Section {
    pub fn all() -> &'static [Section] {
        &[
            Section::ErrorReason,
            Section::ProblemLine,
            Section::Explanation,
            Section::FixedCode,
            Section::Example,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            Section::ErrorReason => 0,
            Section::ProblemLine => 1,
            Section::Explanation => 2,
            Section::FixedCode => 3,
            Section::Example => 4,
        }
    }

    /// Wire key as it appears in the response and in copied output
    pub fn key(&self) -> &'static str {
        match self {
            Section::ErrorReason => "ERROR_REASON",
            Section::ProblemLine => "PROBLEM_LINE",
            Section::Explanation => "EXPLANATION",
            Section::FixedCode => "FIXED_CODE",
            Section::Example => "EXAMPLE",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Section::ErrorReason => "ERROR_REASON:",
            Section::ProblemLine => "PROBLEM_LINE:",
            Section::Explanation => "EXPLANATION:",
            Section::FixedCode => "FIXED_CODE:",
            Section::Example => "EXAMPLE:",
        }
    }

    /// Whether the rest of the prefix line becomes the section's content.
    /// FIXED_CODE and EXAMPLE start on the following line.
    pub fn seeds_inline(&self) -> bool {
        matches!(
            self,
            Section::ErrorReason | Section::ProblemLine | Section::Explanation
        )
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::ErrorReason => "Error Reason",
            Section::ProblemLine => "Problem Line",
            Section::Explanation => "Explanation",
            Section::FixedCode => "Fixed Code",
            Section::Example => "Example",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Section::ErrorReason => "🐞",
            Section::ProblemLine => "📍",
            Section::Explanation => "📋",
            Section::FixedCode => "✅",
            Section::Example => "💡",
        }
    }

    fn match_line(line: &str) -> Option<(Section, &str)> {
        Section::all()
            .iter()
            .find_map(|s| line.strip_prefix(s.prefix()).map(|rest| (*s, rest)))
    }
}

/// Raw parse result: all five sections, empty when never populated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSections {
    values: [String; 5],
}

impl ParsedSections {
    pub fn get(&self, section: Section) -> &str {
        &self.values[section.index()]
    }

    /// Value as rendered: the placeholder when the section is empty
    pub fn display(&self, section: Section) -> &str {
        let value = self.get(section);
        if value.is_empty() {
            PLACEHOLDER
        } else {
            value
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.is_empty())
    }
}

/// Split a response blob into its five sections.
pub fn parse(raw: &str) -> ParsedSections {
    let mut sections = ParsedSections::default();
    let mut current: Option<Section> = None;

    for line in raw.split('\n') {
        let trimmed = line.trim();

        if let Some((section, rest)) = Section::match_line(trimmed) {
            current = Some(section);
            if section.seeds_inline() {
                sections.values[section.index()] = rest.trim().to_string();
            }
        } else if let Some(section) = current {
            let value = &mut sections.values[section.index()];
            value.push('\n');
            value.push_str(trimmed);
        }
    }

    sections
}
