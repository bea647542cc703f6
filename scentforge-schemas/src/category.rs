use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// IFRA product categories (Amendment 51 numbering).
///
/// Catalog files and requests name categories by their short identifier
/// (`cat4`, `cat5a`, ...). Anything outside this set is rejected at parse time
/// instead of being silently looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfraCategory {
    Cat1,
    Cat2,
    Cat3,
    Cat4,
    Cat5a,
    Cat5b,
    Cat5c,
    Cat5d,
    Cat6,
    Cat7a,
    Cat7b,
    Cat8,
    Cat9,
    Cat10a,
    Cat10b,
    Cat11a,
    Cat11b,
    Cat12,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown IFRA category '{0}'")]
pub struct UnknownCategory(pub String);

impl IfraCategory {
    pub const ALL: [IfraCategory; 18] = [
        IfraCategory::Cat1,
        IfraCategory::Cat2,
        IfraCategory::Cat3,
        IfraCategory::Cat4,
        IfraCategory::Cat5a,
        IfraCategory::Cat5b,
        IfraCategory::Cat5c,
        IfraCategory::Cat5d,
        IfraCategory::Cat6,
        IfraCategory::Cat7a,
        IfraCategory::Cat7b,
        IfraCategory::Cat8,
        IfraCategory::Cat9,
        IfraCategory::Cat10a,
        IfraCategory::Cat10b,
        IfraCategory::Cat11a,
        IfraCategory::Cat11b,
        IfraCategory::Cat12,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            IfraCategory::Cat1 => "cat1",
            IfraCategory::Cat2 => "cat2",
            IfraCategory::Cat3 => "cat3",
            IfraCategory::Cat4 => "cat4",
            IfraCategory::Cat5a => "cat5a",
            IfraCategory::Cat5b => "cat5b",
            IfraCategory::Cat5c => "cat5c",
            IfraCategory::Cat5d => "cat5d",
            IfraCategory::Cat6 => "cat6",
            IfraCategory::Cat7a => "cat7a",
            IfraCategory::Cat7b => "cat7b",
            IfraCategory::Cat8 => "cat8",
            IfraCategory::Cat9 => "cat9",
            IfraCategory::Cat10a => "cat10a",
            IfraCategory::Cat10b => "cat10b",
            IfraCategory::Cat11a => "cat11a",
            IfraCategory::Cat11b => "cat11b",
            IfraCategory::Cat12 => "cat12",
        }
    }

    /// Short product description shown next to the category id.
    pub fn label(&self) -> &'static str {
        match self {
            IfraCategory::Cat1 => "Lip Products",
            IfraCategory::Cat2 => "Deodorant & Antiperspirant",
            IfraCategory::Cat3 => "Eye Products & Men's Facial Creams",
            IfraCategory::Cat4 => "Fine Fragrance",
            IfraCategory::Cat5a => "Body Lotion",
            IfraCategory::Cat5b => "Face Moisturizer",
            IfraCategory::Cat5c => "Hand Cream",
            IfraCategory::Cat5d => "Baby Creams & Oils",
            IfraCategory::Cat6 => "Mouthwash & Toothpaste",
            IfraCategory::Cat7a => "Rinse-off Hair Products",
            IfraCategory::Cat7b => "Leave-on Hair Products",
            IfraCategory::Cat8 => "Intimate Wipes & Baby Wipes",
            IfraCategory::Cat9 => "Rinse-off Body Products",
            IfraCategory::Cat10a => "Household Care",
            IfraCategory::Cat10b => "Aerosol Air Fresheners",
            IfraCategory::Cat11a => "Non-skin Contact",
            IfraCategory::Cat11b => "Non-skin Incidental Contact",
            IfraCategory::Cat12 => "No Skin Contact",
        }
    }
}

impl Default for IfraCategory {
    fn default() -> Self {
        IfraCategory::Cat4
    }
}

impl fmt::Display for IfraCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for IfraCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        IfraCategory::ALL
            .iter()
            .copied()
            .find(|c| c.id() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_case_insensitively() {
        assert_eq!("cat4".parse::<IfraCategory>(), Ok(IfraCategory::Cat4));
        assert_eq!(" CAT5A ".parse::<IfraCategory>(), Ok(IfraCategory::Cat5a));
    }

    #[test]
    fn rejects_unknown_ids() {
        let err = "ifraLimit".parse::<IfraCategory>().unwrap_err();
        assert_eq!(err, UnknownCategory("ifraLimit".to_string()));
    }

    #[test]
    fn serde_uses_short_ids() {
        let json = serde_json::to_string(&IfraCategory::Cat10b).unwrap();
        assert_eq!(json, "\"cat10b\"");
        let back: IfraCategory = serde_json::from_str("\"cat11a\"").unwrap();
        assert_eq!(back, IfraCategory::Cat11a);
    }
}
