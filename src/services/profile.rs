/// Profile & Ranking Engine
///
/// Builds a TF-IDF vector space from the watched items' genre + overview
/// text, derives the user's taste vector as a watch-count-weighted centroid,
/// and ranks candidates by cosine similarity.
///
/// The vector space is fit exclusively on watched items; candidates are
/// embedded with the fitted vocabulary and never influence the weights.
use std::collections::{HashMap, HashSet};

use crate::{
    error::{AppError, AppResult},
    models::{CandidateItem, RankedResult, ResolvedItem},
};

pub const DEFAULT_TOP_K: usize = 5;

/// Vocabulary cap: only the most frequent terms across the fit corpus
const MAX_FEATURES: usize = 5000;

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Derived text for vectorization: genres space-joined, then the overview
pub fn profile_text(genres: &[String], overview: Option<&str>) -> String {
    let genres = genres.join(" ");
    format!("{} {}", genres.trim(), overview.unwrap_or("").trim())
        .trim()
        .to_string()
}

/// Lowercase alphanumeric tokens of length >= 2, stopwords removed
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2 && !ENGLISH_STOPWORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// Sparse term index -> weight pairs, l2-normalized
type SparseVector = Vec<(usize, f32)>;

/// Inverse-document-frequency weighted bag-of-words model
///
/// Smoothed idf (`ln((1+n)/(1+df)) + 1`) keeps every fitted term's weight
/// positive, so cosine scores against the non-negative user vector stay in
/// [0, 1].
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fits vocabulary and idf weights on the given documents
    fn fit(documents: &[String]) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        let mut corpus_frequency: HashMap<&str, usize> = HashMap::new();

        for tokens in &tokenized {
            let mut seen: HashSet<&str> = HashSet::new();
            for token in tokens {
                *corpus_frequency.entry(token).or_insert(0) += 1;
                if seen.insert(token) {
                    *document_frequency.entry(token).or_insert(0) += 1;
                }
            }
        }

        // Cap the vocabulary to the most frequent terms; ties break
        // alphabetically so fitting is deterministic.
        let mut terms: Vec<(&str, usize)> = corpus_frequency.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        terms.truncate(MAX_FEATURES);

        let n_documents = documents.len() as f32;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());

        for (index, (term, _)) in terms.into_iter().enumerate() {
            let df = document_frequency[term] as f32;
            vocabulary.insert(term.to_string(), index);
            idf.push(((1.0 + n_documents) / (1.0 + df)).ln() + 1.0);
        }

        Self { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Embeds a document into the fitted space; no refitting occurs
    fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();
        vector.sort_by_key(|(index, _)| *index);

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }

        vector
    }
}

/// The user's fitted taste model
///
/// Immutable once built; `user_vector` is the watch-count-weighted centroid
/// of the fitted watched item vectors, indexed by vocabulary position.
pub struct UserProfile {
    vectorizer: TfidfVectorizer,
    user_vector: Vec<f32>,
    user_norm: f32,
}

/// Fits the vector space on resolvable watched items and builds the taste
/// vector
///
/// Items that are unresolved, lack an id, or have empty derived text are
/// excluded from fitting. Weight per item is watch_count over the summed
/// watch counts of all fitted items, so binge-watched series pull the
/// centroid harder.
pub fn build_profile(watched: &[ResolvedItem]) -> AppResult<UserProfile> {
    let fitted: Vec<(&ResolvedItem, String)> = watched
        .iter()
        .filter(|item| item.is_resolved() && item.tmdb_id.is_some())
        .map(|item| (item, profile_text(&item.genres, item.overview.as_deref())))
        .filter(|(_, text)| !text.is_empty())
        .collect();

    if fitted.is_empty() {
        return Err(AppError::InsufficientProfile);
    }

    let documents: Vec<String> = fitted.iter().map(|(_, text)| text.clone()).collect();
    let vectorizer = TfidfVectorizer::fit(&documents);

    if vectorizer.vocabulary_len() == 0 {
        return Err(AppError::InsufficientProfile);
    }

    let total_watches: f32 = fitted.iter().map(|(item, _)| item.watch_count as f32).sum();

    let mut user_vector = vec![0.0f32; vectorizer.vocabulary_len()];
    for (item, text) in &fitted {
        let weight = item.watch_count as f32 / total_watches;
        for (index, value) in vectorizer.transform(text) {
            user_vector[index] += weight * value;
        }
    }

    let user_norm = user_vector.iter().map(|w| w * w).sum::<f32>().sqrt();

    tracing::info!(
        fitted_items = fitted.len(),
        vocabulary = vectorizer.vocabulary_len(),
        "User profile built"
    );

    Ok(UserProfile {
        vectorizer,
        user_vector,
        user_norm,
    })
}

/// Scores and ranks candidates against the profile
///
/// Candidates in `excluded_ids` or with empty derived text are skipped.
/// Sorting is stable descending by score, so equal scores keep candidate
/// input order; output is truncated to `top_k`.
pub fn rank(
    profile: &UserProfile,
    candidates: &[CandidateItem],
    excluded_ids: &HashSet<u64>,
    top_k: usize,
) -> Vec<RankedResult> {
    let mut results: Vec<RankedResult> = candidates
        .iter()
        .filter(|candidate| !excluded_ids.contains(&candidate.tmdb_id))
        .filter_map(|candidate| {
            let text = profile_text(&candidate.genres, candidate.overview.as_deref());
            if text.is_empty() {
                return None;
            }

            let vector = profile.vectorizer.transform(&text);
            Some(RankedResult {
                tmdb_id: candidate.tmdb_id,
                name: candidate.name.clone(),
                genres: candidate.genres.clone(),
                score: cosine_score(profile, &vector),
                available_on: None,
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(top_k);
    results
}

/// Cosine similarity between the user vector and a candidate vector
///
/// Candidate vectors are unit-length after transform; the user vector norm
/// is divided out here. Non-negative weights keep the result in [0, 1].
fn cosine_score(profile: &UserProfile, candidate: &SparseVector) -> f32 {
    if profile.user_norm == 0.0 {
        return 0.0;
    }

    let dot: f32 = candidate
        .iter()
        .map(|(index, value)| profile.user_vector[*index] * value)
        .sum();

    (dot / profile.user_norm).clamp(0.0, 1.0)
}
