//! The closed taxonomy of section names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical name of a document section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionTag {
    Education,
    Skills,
    Experience,
    Projects,
    Awards,
    Certifications,
    Publications,
    VolunteerWork,
    Languages,
    Interests,
    References,
    Achievements,
    ProfessionalSummary,
    Objective,
    Courses,
    WorkHistory,
    PersonalInformation,
    TechnicalSkills,
    SoftSkills,
    /// Content that appears before any recognized heading
    #[serde(rename = "default")]
    Unlabeled,
}

impl SectionTag {
    /// Matchable tags in declaration order. Earlier entries win ties.
    pub const ALL: [SectionTag; 19] = [
        SectionTag::Education,
        SectionTag::Skills,
        SectionTag::Experience,
        SectionTag::Projects,
        SectionTag::Awards,
        SectionTag::Certifications,
        SectionTag::Publications,
        SectionTag::VolunteerWork,
        SectionTag::Languages,
        SectionTag::Interests,
        SectionTag::References,
        SectionTag::Achievements,
        SectionTag::ProfessionalSummary,
        SectionTag::Objective,
        SectionTag::Courses,
        SectionTag::WorkHistory,
        SectionTag::PersonalInformation,
        SectionTag::TechnicalSkills,
        SectionTag::SoftSkills,
    ];

    /// Serialized name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionTag::Education => "education",
            SectionTag::Skills => "skills",
            SectionTag::Experience => "experience",
            SectionTag::Projects => "projects",
            SectionTag::Awards => "awards",
            SectionTag::Certifications => "certifications",
            SectionTag::Publications => "publications",
            SectionTag::VolunteerWork => "volunteer_work",
            SectionTag::Languages => "languages",
            SectionTag::Interests => "interests",
            SectionTag::References => "references",
            SectionTag::Achievements => "achievements",
            SectionTag::ProfessionalSummary => "professional_summary",
            SectionTag::Objective => "objective",
            SectionTag::Courses => "courses",
            SectionTag::WorkHistory => "work_history",
            SectionTag::PersonalInformation => "personal_information",
            SectionTag::TechnicalSkills => "technical_skills",
            SectionTag::SoftSkills => "soft_skills",
            SectionTag::Unlabeled => "default",
        }
    }

    /// Case-insensitive regex recognizing a heading for this tag.
    ///
    /// `Unlabeled` has no pattern; it is never matched from text.
    pub fn pattern(&self) -> Option<&'static str> {
        let pattern = match self {
            SectionTag::Education => r"(?i)education",
            SectionTag::Skills => r"(?i)skills",
            SectionTag::Experience => r"(?i)(professional\s*experience|experience)",
            SectionTag::Projects => r"(?i)projects",
            SectionTag::Awards => r"(?i)awards",
            SectionTag::Certifications => r"(?i)certifications",
            SectionTag::Publications => r"(?i)publications",
            SectionTag::VolunteerWork => r"(?i)(volunteer\s*work|volunteering)",
            SectionTag::Languages => r"(?i)languages",
            SectionTag::Interests => r"(?i)interests",
            SectionTag::References => r"(?i)references",
            SectionTag::Achievements => r"(?i)achievements",
            SectionTag::ProfessionalSummary => r"(?i)(professional\s*summary|summary)",
            SectionTag::Objective => r"(?i)objective",
            SectionTag::Courses => r"(?i)courses",
            SectionTag::WorkHistory => r"(?i)(work\s*history|employment\s*history)",
            SectionTag::PersonalInformation => {
                r"(?i)(personal\s*information|contact\s*information)"
            }
            SectionTag::TechnicalSkills => r"(?i)technical\s*skills",
            SectionTag::SoftSkills => r"(?i)soft\s*skills",
            SectionTag::Unlabeled => return None,
        };
        Some(pattern)
    }

    /// Look up a tag by its serialized name.
    pub fn from_name(name: &str) -> Option<SectionTag> {
        if name.eq_ignore_ascii_case("default") {
            return Some(SectionTag::Unlabeled);
        }
        SectionTag::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
