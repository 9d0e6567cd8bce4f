//! Offline persona distinctiveness check.
//!
//! Judges that share most of their charter collude by construction. The
//! check compares every pair of charters by word-shingle overlap.

use crate::error::PersonaError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use verdict_forensics::similarity;

pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonaCharter {
    pub id: String,
    pub charter: String,
}

/// `[[personas]]` tables of `id` + `charter`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonaSet {
    pub personas: Vec<PersonaCharter>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PersonaPair {
    pub first: String,
    pub second: String,
    pub similarity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PersonaReport {
    pub threshold: f64,
    /// Every pair, most similar first.
    pub pairs: Vec<PersonaPair>,
}

impl PersonaReport {
    /// Pairs whose overlap exceeds the threshold.
    pub fn violations(&self) -> impl Iterator<Item = &PersonaPair> {
        self.pairs.iter().filter(|p| p.similarity > self.threshold)
    }

    pub fn is_distinct(&self) -> bool {
        self.violations().next().is_none()
    }
}

impl PersonaSet {
    pub fn from_toml(text: &str) -> Result<Self, PersonaError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, PersonaError> {
        let text = std::fs::read_to_string(path).map_err(|e| PersonaError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    pub fn check(&self, threshold: f64) -> Result<PersonaReport, PersonaError> {
        if self.personas.len() < 2 {
            return Err(PersonaError::TooFew(self.personas.len()));
        }
        let texts: Vec<&str> = self.personas.iter().map(|p| p.charter.as_str()).collect();
        let mut pairs: Vec<PersonaPair> = similarity::pairwise(&texts)
            .into_iter()
            .map(|(i, j, s)| PersonaPair {
                first: self.personas[i].id.clone(),
                second: self.personas[j].id.clone(),
                similarity: s,
            })
            .collect();
        pairs.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Ok(PersonaReport { threshold, pairs })
    }
}
