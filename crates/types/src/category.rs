use serde::{Deserialize, Serialize};

/// Outcome category of a viability analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Positive,
    Moderate,
    Negative,
    InadequateUse,
    ExcessiveUse,
}

/// Visual weight a category renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Caution,
    Danger,
    Neutral,
}

/// Static presentation profile for a [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryProfile {
    pub category: Category,
    pub title: &'static str,
    pub description: &'static str,
    pub details: &'static [&'static str],
    pub recommendations: &'static [&'static str],
    pub tone: Tone,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Positive,
        Category::Moderate,
        Category::Negative,
        Category::InadequateUse,
        Category::ExcessiveUse,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Positive => "positive",
            Category::Moderate => "moderate",
            Category::Negative => "negative",
            Category::InadequateUse => "inadequate_use",
            Category::ExcessiveUse => "excessive_use",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Category> {
        match value {
            "positive" => Some(Category::Positive),
            "moderate" => Some(Category::Moderate),
            "negative" => Some(Category::Negative),
            "inadequate_use" => Some(Category::InadequateUse),
            "excessive_use" => Some(Category::ExcessiveUse),
            _ => None,
        }
    }

    /// Category a stored 0-100 score maps to: 60 and above is positive,
    /// 50-59 moderate, everything below negative.
    #[must_use]
    pub const fn from_score(score: u8) -> Category {
        if score >= 60 {
            Category::Positive
        } else if score >= 50 {
            Category::Moderate
        } else {
            Category::Negative
        }
    }

    #[must_use]
    pub const fn profile(self) -> &'static CategoryProfile {
        match self {
            Category::Positive => &POSITIVE,
            Category::Moderate => &MODERATE,
            Category::Negative => &NEGATIVE,
            Category::InadequateUse => &INADEQUATE_USE,
            Category::ExcessiveUse => &EXCESSIVE_USE,
        }
    }
}

const POSITIVE: CategoryProfile = CategoryProfile {
    category: Category::Positive,
    title: "High viability",
    description: "The declared capital, region and activity point to strong \
                  conditions for opening this business at the chosen location.",
    details: &[
        "Declared capital covers the typical opening costs for the activity",
        "The region shows healthy demand for this line of business",
        "The activity code sits in a segment with steady local turnover",
    ],
    recommendations: &[
        "Move ahead with the registration plan",
        "Check commercial rent against the projected revenue",
        "Confirm municipal licensing requirements for the CNAE",
    ],
    tone: Tone::Success,
};

const MODERATE: CategoryProfile = CategoryProfile {
    category: Category::Moderate,
    title: "Moderate viability",
    description: "The location can sustain the business, but one or more \
                  factors narrow the margin for error.",
    details: &[
        "The capital or the region scored below the comfortable range",
        "Comparable businesses in the area operate on thin margins",
    ],
    recommendations: &[
        "Revisit the declared opening capital",
        "Compare nearby neighborhoods before committing to the address",
        "Consider a leaner service mix for the first year",
    ],
    tone: Tone::Caution,
};

const NEGATIVE: CategoryProfile = CategoryProfile {
    category: Category::Negative,
    title: "Low viability",
    description: "The combination of capital, region and activity scored \
                  below the acceptance line for this location.",
    details: &[
        "The declared capital falls short for the chosen activity",
        "The region shows weak demand signals for this segment",
        "Similar openings in the area have a low survival rate",
    ],
    recommendations: &[
        "Reassess the business model before registering",
        "Evaluate a different region or activity code",
        "Seek local market data to validate demand",
    ],
    tone: Tone::Danger,
};

const INADEQUATE_USE: CategoryProfile = CategoryProfile {
    category: Category::InadequateUse,
    title: "Analysis unavailable",
    description: "The submitted data could not be evaluated, so no verdict \
                  was produced for this attempt.",
    details: &[
        "The evaluation rejected the submission before scoring",
        "No score was recorded for this attempt",
    ],
    recommendations: &[
        "Review the form for incomplete or inconsistent fields",
        "Run the analysis again with the corrected data",
    ],
    tone: Tone::Neutral,
};

const EXCESSIVE_USE: CategoryProfile = CategoryProfile {
    category: Category::ExcessiveUse,
    title: "Analysis limit reached",
    description: "This session already used every free analysis available.",
    details: &[
        "Each session includes a fixed number of free analyses",
        "No further submissions are scored until the session is reset",
    ],
    recommendations: &[
        "Reset the session to start over with new data",
        "Contact support to unlock additional analyses",
    ],
    tone: Tone::Neutral,
};
