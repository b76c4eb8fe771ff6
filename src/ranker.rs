use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Result, SearchEngineError};
use crate::store::Store;
use crate::text;

const TOP_K: usize = 10;
const SNIPPET_RADIUS: usize = 60;
const SNIPPET_FALLBACK_LEN: usize = 150;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub score: f64,
    pub pagerank: f64,
}

struct Candidate {
    url: String,
    title: String,
    pagerank: f64,
    text: String,
}

// Empty tokenized query or empty corpus returns an empty vector, not an
// error: "no results" is a normal outcome here.
pub fn search(
    store: &Store,
    query: &str,
    use_stemming: bool,
    tfidf_weight: f64,
    pagerank_weight: f64,
) -> Result<Vec<SearchHit>> {
    let tokens = text::process(query, use_stemming);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let n = store.document_count()?;
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut scores: HashMap<i64, f64> = HashMap::new();
    let mut candidates: HashMap<i64, Candidate> = HashMap::new();

    for term in &tokens {
        let df = store.doc_frequency(term)?;
        if df == 0 {
            continue;
        }
        let idf = (n as f64 / df as f64).ln();

        for posting in store.posting_list(term)? {
            let contribution = posting.term_frequency as f64 * idf * tfidf_weight;
            *scores.entry(posting.doc_id).or_insert(0.0) += contribution;

            candidates.entry(posting.doc_id).or_insert_with(|| Candidate {
                url: posting.url,
                title: posting.title.unwrap_or_default(),
                pagerank: posting.pagerank,
                text: posting.cleaned_text.unwrap_or_default(),
            });
        }
    }

    let mut results: Vec<SearchHit> = scores
        .into_iter()
        .filter_map(|(doc_id, score)| {
            let candidate = candidates.remove(&doc_id)?;
            let final_score = score + candidate.pagerank * pagerank_weight;
            let snippet = snippet(&candidate.text, &tokens);
            Some(SearchHit {
                url: candidate.url,
                title: candidate.title,
                snippet,
                score: final_score,
                pagerank: candidate.pagerank,
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(TOP_K);
    Ok(results)
}

pub fn validated_search(
    store: &Store,
    query: &str,
    use_stemming: bool,
    tfidf_weight: f64,
    pagerank_weight: f64,
) -> Result<Vec<SearchHit>> {
    if query.trim().is_empty() {
        return Err(SearchEngineError::Validation(
            "query parameter 'q' is required".to_string(),
        ));
    }
    search(store, query, use_stemming, tfidf_weight, pagerank_weight)
}

// Works in char positions throughout, never byte offsets: text[start..end]
// on raw byte indices can split a multibyte char and panic, and matching a
// byte offset found in a lowercased copy against the original string is
// unsound whenever lowercasing changes a char's byte length.
fn snippet(text: &str, tokens: &[String]) -> String {
    if text.is_empty() {
        return String::new();
    }
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let lower: Vec<char> = chars
        .iter()
        .map(|&(_, c)| c.to_lowercase().next().unwrap_or(c))
        .collect();

    let found_char_idx = tokens.iter().find_map(|token| {
        let token_chars: Vec<char> = token.chars().collect();
        if token_chars.is_empty() || token_chars.len() > lower.len() {
            return None;
        }
        lower
            .windows(token_chars.len())
            .position(|window| window == token_chars.as_slice())
    });

    let Some(char_idx) = found_char_idx else {
        let end = chars
            .get(SNIPPET_FALLBACK_LEN)
            .map(|&(byte, _)| byte)
            .unwrap_or(text.len());
        return format!("{}...", &text[..end]);
    };

    let start_char = char_idx.saturating_sub(SNIPPET_RADIUS);
    let end_char = (char_idx + SNIPPET_RADIUS).min(chars.len());

    let start_byte = chars[start_char].0;
    let end_byte = chars.get(end_char).map(|&(byte, _)| byte).unwrap_or(text.len());

    let mut out = String::new();
    if start_char > 0 {
        out.push_str("...");
    }
    out.push_str(&text[start_byte..end_byte]);
    if end_char < chars.len() {
        out.push_str("...");
    }
    out
}
