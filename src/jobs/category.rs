use serde::{Deserialize, Serialize};

/// The fixed set of listing categories. Listings are stored with the
/// canonical name as plain text; filtering compares that text exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Plumbing,
    Cleaning,
    Repair,
    #[serde(rename = "Digital Skill")]
    DigitalSkill,
    #[serde(rename = "Tech support")]
    TechSupport,
    Farming,
    #[serde(rename = "Building & construction")]
    BuildingConstruction,
    #[serde(rename = "Teaching & Tutoring")]
    TeachingTutoring,
}

pub const ALL: [Category; 8] = [
    Category::Plumbing,
    Category::Cleaning,
    Category::Repair,
    Category::DigitalSkill,
    Category::TechSupport,
    Category::Farming,
    Category::BuildingConstruction,
    Category::TeachingTutoring,
];

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Plumbing => "Plumbing",
            Category::Cleaning => "Cleaning",
            Category::Repair => "Repair",
            Category::DigitalSkill => "Digital Skill",
            Category::TechSupport => "Tech support",
            Category::Farming => "Farming",
            Category::BuildingConstruction => "Building & construction",
            Category::TeachingTutoring => "Teaching & Tutoring",
        }
    }

    /// Exact, case-sensitive lookup against the canonical names.
    pub fn from_name(name: &str) -> Option<Category> {
        ALL.into_iter().find(|c| c.as_str() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for category in ALL {
            assert_eq!(Category::from_name(category.as_str()), Some(category));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(Category::from_name("Plumbing"), Some(Category::Plumbing));
        assert_eq!(Category::from_name("plumbing"), None);
        assert_eq!(Category::from_name("PLUMBING"), None);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(Category::from_name("Gardening"), None);
        assert_eq!(Category::from_name(""), None);
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&Category::TechSupport).unwrap();
        assert_eq!(json, "\"Tech support\"");
        let back: Category = serde_json::from_str("\"Building & construction\"").unwrap();
        assert_eq!(back, Category::BuildingConstruction);
    }
}
