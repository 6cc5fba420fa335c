use serde::{Deserialize, Serialize};
use std::fmt;

/// Which list a diagnostic finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Problem,
    Recommendation,
    Observation,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Problem => "problems",
            Category::Recommendation => "recommendations",
            Category::Observation => "observations",
        };
        f.write_str(label)
    }
}

/// A single human-readable finding tagged with its category.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub category: Category,
    pub text: String,
}

impl Finding {
    pub fn problem(text: impl Into<String>) -> Self {
        Self { category: Category::Problem, text: text.into() }
    }

    pub fn recommendation(text: impl Into<String>) -> Self {
        Self { category: Category::Recommendation, text: text.into() }
    }

    pub fn observation(text: impl Into<String>) -> Self {
        Self { category: Category::Observation, text: text.into() }
    }
}

/// Categorized diagnostic output for one result record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub problems: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub observations: Vec<String>,
}

impl Analysis {
    pub fn push(&mut self, finding: Finding) {
        let list = match finding.category {
            Category::Problem => &mut self.problems,
            Category::Recommendation => &mut self.recommendations,
            Category::Observation => &mut self.observations,
        };
        list.push(finding.text);
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty() && self.recommendations.is_empty() && self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len() + self.recommendations.len() + self.observations.len()
    }
}

impl Extend<Finding> for Analysis {
    fn extend<I: IntoIterator<Item = Finding>>(&mut self, iter: I) {
        for finding in iter {
            self.push(finding);
        }
    }
}
