use std::fmt;

use crate::{errors::Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Injured,
    Uninjured,
    Mixed,
}

impl Category {
    /// Order matches `CategoryWeights::as_array`.
    pub const ALL: [Category; 3] = [Category::Injured, Category::Uninjured, Category::Mixed];

    pub fn label(self) -> &'static str {
        match self {
            Category::Injured => "injured",
            Category::Uninjured => "uninjured",
            Category::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Relative odds of each category being drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryWeights {
    pub injured: u32,
    pub uninjured: u32,
    pub mixed: u32,
}

impl Default for CategoryWeights {
    /// 1:2:2 (injured:uninjured:mixed).
    fn default() -> Self {
        Self {
            injured: 1,
            uninjured: 2,
            mixed: 2,
        }
    }
}

impl CategoryWeights {
    pub fn uniform() -> Self {
        Self {
            injured: 1,
            uninjured: 1,
            mixed: 1,
        }
    }

    pub fn as_array(&self) -> [u32; 3] {
        [self.injured, self.uninjured, self.mixed]
    }

    pub fn total(&self) -> u64 {
        self.as_array().iter().map(|w| u64::from(*w)).sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.total() == 0 {
            return Err(Error::Config(
                "prompt category weights must not all be zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Expected share of `category` in the long run.
    pub fn share(&self, category: Category) -> f64 {
        let w = match category {
            Category::Injured => self.injured,
            Category::Uninjured => self.uninjured,
            Category::Mixed => self.mixed,
        };
        f64::from(w) / self.total() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_lowercase() {
        let labels: Vec<_> = Category::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, ["injured", "uninjured", "mixed"]);
    }

    #[test]
    fn default_shares() {
        let w = CategoryWeights::default();
        assert!((w.share(Category::Injured) - 0.2).abs() < 1e-9);
        assert!((w.share(Category::Uninjured) - 0.4).abs() < 1e-9);
        assert!((w.share(Category::Mixed) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let w = CategoryWeights {
            injured: 0,
            uninjured: 0,
            mixed: 0,
        };
        assert!(w.validate().is_err());
        assert!(CategoryWeights::uniform().validate().is_ok());
    }
}
