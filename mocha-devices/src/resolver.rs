use std::collections::BTreeMap;

use crate::{partial_ratio, ResolveError};

pub const DEFAULT_THRESHOLD: f64 = 60.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub identifier: String,
    pub display_name: String,
}

impl<I, N> From<(I, N)> for CatalogEntry
where
    I: Into<String>,
    N: Into<String>,
{
    fn from((identifier, display_name): (I, N)) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    pub identifier: String,
    pub score: f64,
}

/// Resolves loose descriptions ("bedroom lights") to device identifiers.
///
/// Each entry is scored with [`partial_ratio`] against both its identifier and
/// its display name, case-insensitively, keeping the better of the two.
/// Entries scoring at least the threshold are returned best first; equal
/// scores keep corpus order, so repeated searches are deterministic.
#[derive(Clone, Debug)]
pub struct FuzzyResolver {
    corpus: Option<Vec<CatalogEntry>>,
    threshold: f64,
}

impl Default for FuzzyResolver {
    fn default() -> Self {
        Self {
            corpus: None,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl FuzzyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn set_corpus<E>(&mut self, entries: impl IntoIterator<Item = E>)
    where
        E: Into<CatalogEntry>,
    {
        self.corpus = Some(entries.into_iter().map(Into::into).collect());
    }

    /// Replaces the corpus with an identifier to display name snapshot.
    pub fn set_devices(&mut self, devices: &BTreeMap<String, String>) {
        self.set_corpus(devices.iter().map(|(id, name)| (id.as_str(), name.as_str())));
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn display_name(&self, identifier: &str) -> Option<&str> {
        self.corpus
            .as_ref()?
            .iter()
            .find(|entry| entry.identifier == identifier)
            .map(|entry| entry.display_name.as_str())
    }

    pub fn is_ready(&self) -> bool {
        self.corpus.is_some()
    }

    pub fn search_scored(&self, query: &str) -> Result<Vec<MatchResult>, ResolveError> {
        let corpus = self.corpus.as_ref().ok_or(ResolveError::CorpusNotSet)?;
        let query = query.trim().to_lowercase();

        let mut results: Vec<MatchResult> = corpus
            .iter()
            .filter_map(|entry| {
                let by_id = partial_ratio(&query, &entry.identifier.to_lowercase());
                let by_name = partial_ratio(&query, &entry.display_name.to_lowercase());
                let score = by_id.max(by_name);
                (score >= self.threshold).then(|| MatchResult {
                    identifier: entry.identifier.clone(),
                    score,
                })
            })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(results)
    }

    pub fn search(&self, query: &str) -> Result<Vec<String>, ResolveError> {
        Ok(self
            .search_scored(query)?
            .into_iter()
            .map(|result| result.identifier)
            .collect())
    }
}
