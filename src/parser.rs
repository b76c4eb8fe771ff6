//! HTML → title, cleaned text, absolute/normalized outlink set.

use std::collections::HashSet;

use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

/// The result of parsing one fetched page.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub title: String,
    pub cleaned_text: String,
    pub links: Vec<String>,
    pub raw_content: String,
}

/// Parses `html` relative to `base_url`. Never fails: malformed HTML simply
/// produces an empty-ish result, matching the "parser returns empty data"
/// contract for parse errors.
pub fn parse(html: &str, base_url: &str) -> ParsedPage {
    let document = Html::parse_document(html);
    let base = reqwest::Url::parse(base_url).ok();

    let title = extract_title(&document).unwrap_or_else(|| "No Title".to_string());
    let cleaned_text = extract_cleaned_text(&document);
    let links = base
        .map(|base| extract_links(&document, &base))
        .unwrap_or_default();

    ParsedPage {
        title,
        cleaned_text,
        links,
        raw_content: document.html(),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Renders text after removing `<script>`/`<style>` subtrees: strip each
/// line, split each line on a literal double space, strip each piece, and
/// rejoin the non-empty pieces with newlines.
fn extract_cleaned_text(document: &Html) -> String {
    let Ok(skip_selector) = Selector::parse("script, style") else {
        return String::new();
    };
    let skip_ids: HashSet<_> = document.select(&skip_selector).map(|el| el.id()).collect();

    let mut raw_text = String::new();
    collect_text(document.tree.root(), &skip_ids, &mut raw_text);

    raw_text
        .lines()
        .map(|line| line.trim())
        .flat_map(|line| line.split("  "))
        .map(|chunk| chunk.trim())
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(node: NodeRef<Node>, skip_ids: &HashSet<ego_tree::NodeId>, out: &mut String) {
    if skip_ids.contains(&node.id()) {
        return;
    }
    if let Node::Text(text) = node.value() {
        out.push_str(text);
    }
    for child in node.children() {
        collect_text(child, skip_ids, out);
    }
}

/// Resolves every `<a href>` against `base`, strips the fragment, and keeps
/// only `http`-scheme URLs. Duplicates within the page are coalesced.
fn extract_links(document: &Html, base: &reqwest::Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("a") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        resolved.set_fragment(None);
        if !resolved.scheme().starts_with("http") {
            continue;
        }
        let url = resolved.to_string();
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }
    links
}
