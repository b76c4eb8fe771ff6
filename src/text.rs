const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "is", "are", "was", "were", "in", "on", "at", "to",
    "for", "with", "by", "from", "of", "that", "this", "it", "as", "be", "not", "have", "has",
    "had", "do", "does", "did", "will", "would", "shall", "should", "can", "could", "may",
    "might", "must",
];

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

// Strips a single suffix in the order ing > ed > s (but not ss).
fn stem(word: &str) -> &str {
    if let Some(stripped) = word.strip_suffix("ing") {
        if !stripped.is_empty() {
            return stripped;
        }
    }
    if let Some(stripped) = word.strip_suffix("ed") {
        if !stripped.is_empty() {
            return stripped;
        }
    }
    if word.ends_with('s') && !word.ends_with("ss") {
        let stripped = &word[..word.len() - 1];
        if !stripped.is_empty() {
            return stripped;
        }
    }
    word
}

pub fn process(text: &str, use_stemming: bool) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    stripped
        .split_whitespace()
        .filter(|token| token.chars().count() > 1 && !is_stopword(token))
        .map(|token| {
            if use_stemming {
                stem(token).to_string()
            } else {
                token.to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        let tokens = process("Hello, World! Crawlers are great.", false);
        assert_eq!(tokens, vec!["hello", "world", "crawlers", "great"]);
    }

    #[test]
    fn drops_stopwords_and_short_tokens() {
        let tokens = process("the a cat is on it", false);
        assert_eq!(tokens, vec!["cat"]);
    }

    #[test]
    fn stems_once_in_priority_order() {
        assert_eq!(stem("crawling"), "crawl");
        assert_eq!(stem("crawled"), "crawl");
        assert_eq!(stem("crawlers"), "crawler");
        assert_eq!(stem("grass"), "grass");
        assert_eq!(stem("class"), "class");
    }

    #[test]
    fn stemming_is_idempotent() {
        for word in ["crawling", "crawled", "crawlers", "grass", "boss", "runs"] {
            let once = stem(word);
            let twice = stem(once);
            assert_eq!(once, twice, "stem({word}) should be idempotent");
        }
    }

    #[test]
    fn deterministic_on_repeat_calls() {
        let input = "Python is great for web crawlers, crawlers!";
        assert_eq!(process(input, true), process(input, true));
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(process("", true).is_empty());
    }
}
