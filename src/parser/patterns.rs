//! Compiled regular expressions for headings, date ranges and contact fields.

use regex::Regex;

use crate::model::{DateRange, SectionTag};

/// Month token: abbreviated or full English month name, optional trailing period.
const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

/// Year token: 19xx/20xx, or a two-digit year with an optional apostrophe.
const YEAR: &str = r"(?:(?:19|20)\d{2}|'?\d{2})";

const EMAIL: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

const PHONE: &str = r"\+?\d{1,3}[-.\s]?\d{1,3}[-.\s]?\d{1,4}[-.\s]?\d{1,4}";

/// Most words a heading may carry besides its section keyword ("Relevant Work Experience").
const MAX_HEADING_EXTRA_WORDS: usize = 3;

/// Lowercase words allowed around a section keyword in a heading.
const HEADING_CONNECTORS: &[&str] = &["and", "of", "&"];

/// Characters stripped from a subsection title once the date is cut out.
const TITLE_SEPARATORS: &[char] = &['|', ',', '-', '–', '—', '·', '•', ':', '(', ')'];

/// A date range found inside a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub range: DateRange,
    /// Byte offsets of the match in the searched text
    pub start: usize,
    pub end: usize,
}

impl DateMatch {
    /// The searched text with the date cut out and separators trimmed.
    ///
    /// Returns `None` when nothing but the date was present.
    pub fn remainder(&self, text: &str) -> Option<String> {
        let before = &text[..self.start];
        let after = &text[self.end..];
        let joined = format!("{} {}", clean_title(before), clean_title(after));
        let title = joined.trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }
}

fn is_heading_remainder(text: &str, start: usize, end: usize) -> bool {
    let words: Vec<&str> = text[..start]
        .split_whitespace()
        .chain(text[end..].split_whitespace())
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '&'))
        .filter(|w| !w.is_empty())
        .collect();
    words.len() <= MAX_HEADING_EXTRA_WORDS
        && words.iter().all(|w| {
            HEADING_CONNECTORS.contains(&w.to_lowercase().as_str())
                || !w.starts_with(|c: char| c.is_lowercase())
        })
}

fn clean_title(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || TITLE_SEPARATORS.contains(&c))
}

/// The fixed pattern taxonomy, compiled once per engine.
///
/// Owned by value rather than shared through a global so that every page
/// worker carries its own copy of the matching context.
#[derive(Debug, Clone)]
pub struct Patterns {
    sections: Vec<(SectionTag, Regex)>,
    date_range: Regex,
    email: Regex,
    phone: Regex,
}

impl Patterns {
    /// Compile the section taxonomy and the date and contact patterns.
    pub fn new() -> Self {
        let sections = SectionTag::ALL
            .iter()
            .filter_map(|tag| tag.pattern().map(|p| (*tag, p)))
            .map(|(tag, p)| (tag, Regex::new(p).expect("section pattern is valid")))
            .collect();

        let date_range = Regex::new(&format!(
            r"(?i)\b(?P<start>{month}\s*{year})\s*(?:-|–|—|\bto\b)\s*(?P<end>{month}\s*{year}|present)\b",
            month = MONTH,
            year = YEAR
        ))
        .expect("date range pattern is valid");

        Self {
            sections,
            date_range,
            email: Regex::new(EMAIL).expect("email pattern is valid"),
            phone: Regex::new(PHONE).expect("phone pattern is valid"),
        }
    }

    /// First tag, in taxonomy order, whose pattern occurs in `text`.
    pub fn match_section(&self, text: &str) -> Option<SectionTag> {
        self.sections
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(tag, _)| *tag)
    }

    /// Section tag of `text` when the fragment reads as a heading.
    ///
    /// The keyword must carry at most a few extra words, each capitalized or a
    /// connector, so body sentences that mention a keyword stay content:
    /// "Technical Skills:" is a heading, "Gained experience in Rust" is not.
    /// A fragment holding a date range is an entry, never a heading.
    pub fn match_heading(&self, text: &str) -> Option<SectionTag> {
        self.match_heading_any([text])
    }

    /// First tag, in taxonomy order, matched as a heading by any of `texts`.
    pub fn match_heading_any<'a, I>(&self, texts: I) -> Option<SectionTag>
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        self.sections
            .iter()
            .find(|(_, re)| texts.clone().into_iter().any(|t| self.is_heading(re, t)))
            .map(|(tag, _)| *tag)
    }

    fn is_heading(&self, keyword: &Regex, text: &str) -> bool {
        match keyword.find(text) {
            Some(m) => {
                is_heading_remainder(text, m.start(), m.end()) && !self.date_range.is_match(text)
            }
            None => false,
        }
    }

    /// First date range in `text`.
    pub fn find_date_range(&self, text: &str) -> Option<DateMatch> {
        let caps = self.date_range.captures(text)?;
        let whole = caps.get(0)?;
        let start = caps.name("start")?.as_str().trim().to_string();
        let end_raw = caps.name("end")?.as_str().trim();
        let end = if end_raw.eq_ignore_ascii_case(DateRange::PRESENT) {
            DateRange::PRESENT.to_string()
        } else {
            end_raw.to_string()
        };

        Some(DateMatch {
            range: DateRange {
                text: whole.as_str().to_string(),
                start,
                end,
            },
            start: whole.start(),
            end: whole.end(),
        })
    }

    /// First email address in `text`.
    pub fn find_email<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.email.find(text).map(|m| m.as_str())
    }

    /// First phone number in `text`, ignoring digits that belong to an email address.
    pub fn find_phone(&self, text: &str) -> Option<String> {
        let without_email = self.email.replace_all(text, " ");
        self.phone
            .find(&without_email)
            .map(|m| m.as_str().trim().to_string())
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_match_is_case_insensitive_substring() {
        let p = Patterns::new();
        assert_eq!(p.match_section("EDUCATION"), Some(SectionTag::Education));
        assert_eq!(
            p.match_section("Professional Experience"),
            Some(SectionTag::Experience)
        );
        assert_eq!(
            p.match_section("Volunteering"),
            Some(SectionTag::VolunteerWork)
        );
        assert_eq!(p.match_section("Proficient in Python and Go"), None);
    }

    #[test]
    fn test_section_match_prefers_taxonomy_order() {
        let p = Patterns::new();
        // "skills" is declared before "technical_skills"
        assert_eq!(
            p.match_section("Technical Skills"),
            Some(SectionTag::Skills)
        );
        assert_eq!(
            p.match_section("Employment History"),
            Some(SectionTag::WorkHistory)
        );
        assert_eq!(
            p.match_heading_any(["Projects", "Education"]),
            Some(SectionTag::Education)
        );
    }

    #[test]
    fn test_heading_needs_heading_shape() {
        let p = Patterns::new();
        assert_eq!(p.match_heading("Skills:"), Some(SectionTag::Skills));
        assert_eq!(p.match_heading("EXPERIENCE"), Some(SectionTag::Experience));
        assert_eq!(
            p.match_heading("Relevant Work Experience"),
            Some(SectionTag::Experience)
        );
        assert_eq!(
            p.match_heading("Skills & Interests"),
            Some(SectionTag::Skills)
        );
        assert_eq!(p.match_heading("Compiler built to gain experience with LLVM"), None);
        assert_eq!(p.match_heading("Gained experience in Rust"), None);
        assert_eq!(p.match_heading("Rust, Go, Python"), None);
        assert_eq!(p.match_heading("Experience Jan 2020 - Present"), None);
        assert_eq!(
            p.match_heading_any(["Led a team", "Projects"]),
            Some(SectionTag::Projects)
        );
    }

    #[test]
    fn test_date_range_present() {
        let p = Patterns::new();
        let m = p.find_date_range("Jan 2020 - Present").unwrap();
        assert_eq!(m.range.text, "Jan 2020 - Present");
        assert_eq!(m.range.start, "Jan 2020");
        assert!(m.range.is_ongoing());
        assert_eq!(m.remainder("Jan 2020 - Present"), None);
    }

    #[test]
    fn test_date_range_variants() {
        let p = Patterns::new();
        let m = p.find_date_range("September 2018 to May 2020").unwrap();
        assert_eq!(m.range.start, "September 2018");
        assert_eq!(m.range.end, "May 2020");

        let m = p.find_date_range("aug 2019 – dec 2019").unwrap();
        assert_eq!(m.range.end, "dec 2019");

        let m = p.find_date_range("Jun '21 - PRESENT").unwrap();
        assert!(m.range.is_ongoing());

        assert!(p.find_date_range("Sep 2018 to May 2020").is_some());
        assert!(p.find_date_range("2019 - 2020").is_none());
        assert!(p.find_date_range("Jan 2020").is_none());
    }

    #[test]
    fn test_date_remainder_becomes_title() {
        let p = Patterns::new();
        let text = "Software Engineer, Acme | Mar 2019 - Jan 2021";
        let m = p.find_date_range(text).unwrap();
        assert_eq!(
            m.remainder(text).as_deref(),
            Some("Software Engineer, Acme")
        );
    }

    #[test]
    fn test_contact_patterns() {
        let p = Patterns::new();
        let line = "jane@x.com | 555-123-4567";
        assert_eq!(p.find_email(line), Some("jane@x.com"));
        assert_eq!(p.find_phone(line).as_deref(), Some("555-123-4567"));
        assert_eq!(
            p.find_phone("+1 555 123 4567").as_deref(),
            Some("+1 555 123 4567")
        );
        assert_eq!(p.find_email("github.com/jane"), None);
        assert_eq!(p.find_phone("jane2024@x.com"), None);
    }
}
