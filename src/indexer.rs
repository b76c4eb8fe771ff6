use std::collections::HashMap;

use crate::error::Result;
use crate::store::Store;
use crate::text;

pub fn build_index(store: &Store, use_stemming: bool) -> Result<()> {
    let pages = store.list_pages()?;
    tracing::info!(count = pages.len(), "building inverted index");

    for (doc_id, _url) in pages {
        let Some(text) = store.get_cleaned_text(doc_id)? else {
            continue;
        };
        if text.is_empty() {
            continue;
        }

        let tokens = text::process(&text, use_stemming);
        if tokens.is_empty() {
            continue;
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
        store.save_postings(doc_id, &counts)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_pages_with_text_and_skips_empty() {
        let store = Store::open(":memory:").unwrap();
        let a = store
            .upsert_page("https://a.com", Some("A"), Some("<html>"), Some("foo foo bar"))
            .unwrap();
        let _b = store
            .upsert_page("https://b.com", Some("B"), Some("<html>"), Some(""))
            .unwrap();

        build_index(&store, false).unwrap();

        let postings = store.posting_list("foo").unwrap();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].doc_id, a);
        assert_eq!(postings[0].term_frequency, 2);

        assert!(store.posting_list("bar").unwrap().len() == 1);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let store = Store::open(":memory:").unwrap();
        store
            .upsert_page("https://a.com", Some("A"), Some("<html>"), Some("foo bar foo"))
            .unwrap();

        build_index(&store, false).unwrap();
        let first = store.posting_list("foo").unwrap();
        build_index(&store, false).unwrap();
        let second = store.posting_list("foo").unwrap();
        assert_eq!(first, second);
    }
}
