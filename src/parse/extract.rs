//! Shared extraction passes: boilerplate removal, verse blocks, labeled
//! sections. These encode observed facts about the five known corpora, not
//! general markdown rules; the pattern lists are the contract.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Noise passages left behind by the mstn.org scrapes. Each pattern runs from
/// a known anchor phrase to a known terminator and occurs at most once per
/// entry. Stripping is idempotent.
const BOILERPLATE_PATTERNS: [&str; 5] = [
    r"本堂代為佛前供花[\s\S]*?。\n",
    r"求籤解籤必讀[\s\S]*?受天譴\n",
    r"您的瀏覽器不支援[\s\S]*?\n",
    r"請加本堂LINE[\s\S]*?\n",
    r"1\. 抽到不好的籤詩[\s\S]*?潛水\n",
];

static BOILERPLATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BOILERPLATE_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("boilerplate pattern"))
        .collect()
});

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\n?([\s\S]*?)\n?```").expect("fenced block pattern"));

static BRACKET_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[〖【]\s*(.+?)\s*[〗】]\n").expect("bracket label pattern"));

/// Marker introducing an inline verse block.
const INLINE_POEM_LABEL: &str = "詩曰:\n";

/// Anchors that follow an inline verse block; the poem runs up to the
/// earliest of these.
const INLINE_POEM_STOPS: [&str; 3] = ["\n本堂", "\n請加", "\n1."];

/// Heading label that duplicates the verse; never emitted as a section.
const RESERVED_POEM_HEADING: &str = "籤詩原文";

/// Sentence-final marks stripped once from the tail of each verse line.
const TRAILING_PUNCTUATION: [char; 8] = ['，', '。', '、', '；', '！', '？', ',', '.'];

/// Remove the known scrape boilerplate. A no-op on already-clean text.
pub fn strip_boilerplate(text: &str) -> String {
    let mut result = text.to_string();
    for pattern in BOILERPLATE.iter() {
        result = pattern.replace_all(&result, "").into_owned();
    }
    result
}

/// Verse lines from the first fenced literal block, or empty when the entry
/// has none.
pub fn poem_from_fenced(text: &str) -> Vec<String> {
    match FENCED_BLOCK.captures(text) {
        Some(caps) => split_verse_lines(&caps[1]),
        None => Vec::new(),
    }
}

/// Verse lines from an inline `詩曰:` block, running up to the nearest
/// follower anchor. Empty when the label or every anchor is missing.
pub fn poem_from_inline(text: &str) -> Vec<String> {
    let Some(label_at) = text.find(INLINE_POEM_LABEL) else {
        return Vec::new();
    };
    let body = &text[label_at + INLINE_POEM_LABEL.len()..];
    let Some(end) = INLINE_POEM_STOPS.iter().filter_map(|s| body.find(s)).min() else {
        return Vec::new();
    };
    split_verse_lines(&body[..end])
}

fn split_verse_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .map(strip_trailing_punctuation)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip exactly one sentence-final mark, full-width or ASCII.
fn strip_trailing_punctuation(line: &str) -> &str {
    for mark in TRAILING_PUNCTUATION {
        if let Some(rest) = line.strip_suffix(mark) {
            return rest;
        }
    }
    line
}

/// Sections labeled `【..】` / `〖..〗`, each body running to the next label
/// or the end of the entry. Duplicate labels: last write wins.
pub fn sections_from_brackets(text: &str) -> HashMap<String, String> {
    let labels: Vec<(usize, usize, String)> = BRACKET_LABEL
        .captures_iter(text)
        .map(|caps| {
            let whole = caps.get(0).expect("match");
            (whole.start(), whole.end(), caps[1].trim().to_string())
        })
        .collect();

    let mut sections = HashMap::new();
    for (i, (_, body_start, label)) in labels.iter().enumerate() {
        let body_end = labels
            .get(i + 1)
            .map(|&(next_start, _, _)| next_start)
            .unwrap_or(text.len());
        let body = text[*body_start..body_end].trim();
        sections.insert(label.clone(), body.to_string());
    }
    sections
}

/// Sections introduced by `### ` heading lines, each body running to the next
/// heading, a `---` separator line, or the end of the entry. The reserved
/// verse heading is excluded. Duplicate labels: last write wins.
pub fn sections_from_headings(text: &str) -> HashMap<String, String> {
    let mut sections = HashMap::new();
    let mut label: Option<String> = None;
    let mut body: Vec<&str> = Vec::new();

    let mut flush = |label: &mut Option<String>, body: &mut Vec<&str>, out: &mut HashMap<String, String>| {
        if let Some(name) = label.take() {
            if name != RESERVED_POEM_HEADING {
                out.insert(name, body.join("\n").trim().to_string());
            }
        }
        body.clear();
    };

    for line in text.lines() {
        if let Some(heading) = line.strip_prefix("### ") {
            flush(&mut label, &mut body, &mut sections);
            label = Some(heading.trim().to_string());
        } else if line.trim() == "---" {
            flush(&mut label, &mut body, &mut sections);
        } else if label.is_some() {
            body.push(line);
        }
    }
    flush(&mut label, &mut body, &mut sections);

    sections
}
