//! Per-corpus recognizers. Each one walks the horizontal-rule-delimited
//! entries, matches its header convention, and assembles a record from the
//! shared extraction passes plus dialect-specific metadata rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::system::FortuneSystem;

use super::extract::{
    poem_from_fenced, poem_from_inline, sections_from_brackets, sections_from_headings,
    strip_boilerplate,
};
use super::numeral::chinese_number;
use super::FortuneRecord;

const ENTRY_SEPARATOR: &str = "\n---\n";

static JIAZI_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## 第(.+?)籤\s+(.+)").expect("jiazi header pattern"));

static HUNDRED_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## 第\s*(\d+)\s*籤").expect("hundred header pattern"));

static LVZU_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## 第(\d+)\s*籤").expect("lvzu header pattern"));

/// Standalone classical-numeral heading line inside an entry body; the lines
/// after it carry narrative and rank for the hundred-verse corpora.
static NUMERAL_HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^第[一二三四五六七八九十百]+籤$").expect("numeral heading pattern"));

static GUANYIN_RANK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[上中下][上中下]?$").expect("guanyin rank pattern"));

static GUANDI_RANK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(大吉|上吉|中吉|中平|下吉|下下|上上|中|下)\s*[甲乙丙丁戊己庚辛壬癸]")
        .expect("guandi rank pattern")
});

static EMPHASIS_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("emphasis pattern"));

static LVZU_STORY_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*典故\*\*[：:]\s*(.+)").expect("lvzu story pattern"));

/// Section label holding the 呂祖 narrative prose when the `**典故**` field
/// is absent.
const LVZU_STORY_SECTION: &str = "典故說明";

fn entries(corpus: &str) -> impl Iterator<Item = &str> {
    corpus.split(ENTRY_SEPARATOR)
}

/// 六十甲子 dialect, serving both `liushijiazi` and its `mazu` alias. The
/// header carries the ordinal (classical numeral or decimal) and the
/// sexagenary term; the term doubles as the narrative.
pub fn parse_jiazi(system: FortuneSystem, corpus: &str, number: u32) -> Option<FortuneRecord> {
    for entry in entries(corpus) {
        let Some(caps) = JIAZI_HEADER.captures(entry) else {
            continue;
        };
        let token = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        if chinese_number(token) != Some(number) {
            continue;
        }
        let term = caps[2].trim().to_string();

        let attribute = EMPHASIS_SPAN
            .captures(entry)
            .map(|c| c[1].trim().to_string());

        return Some(FortuneRecord {
            system,
            number,
            display_label: format!("第{}籤 {}", token.trim(), term),
            rank: None,
            verse_lines: poem_from_fenced(entry),
            narrative: Some(term),
            narrative_body: None,
            attribute,
            sections: sections_from_headings(entry),
        });
    }
    None
}

/// 觀音靈籤: decimal header, scraped-site boilerplate, narrative on the line
/// after the numeral heading, grade on the line after that.
pub fn parse_guanyin(corpus: &str, number: u32) -> Option<FortuneRecord> {
    for entry in entries(corpus) {
        let Some(num) = hundred_header_number(entry) else {
            continue;
        };
        if num != number {
            continue;
        }
        let cleaned = strip_boilerplate(entry);
        let lines: Vec<&str> = cleaned.lines().collect();

        let mut narrative = None;
        let mut rank = None;
        if let Some(heading) = numeral_heading_index(&lines) {
            narrative = nonempty_line(&lines, heading + 1);
            if let Some(candidate) = nonempty_line(&lines, heading + 2) {
                if GUANYIN_RANK.is_match(&candidate) {
                    rank = Some(candidate);
                }
            }
        }

        return Some(FortuneRecord {
            system: FortuneSystem::Guanyin,
            number: num,
            display_label: format!("第{num}籤"),
            rank,
            verse_lines: poem_from_inline(&cleaned),
            narrative,
            narrative_body: None,
            attribute: None,
            sections: sections_from_brackets(&cleaned),
        });
    }
    None
}

/// 關帝靈籤: like 觀音 but the line after the numeral heading carries the
/// grade (a fixed vocabulary followed by a heavenly stem), pushing the
/// narrative one line down.
pub fn parse_guandi(corpus: &str, number: u32) -> Option<FortuneRecord> {
    for entry in entries(corpus) {
        let Some(num) = hundred_header_number(entry) else {
            continue;
        };
        if num != number {
            continue;
        }
        let cleaned = strip_boilerplate(entry);
        let lines: Vec<&str> = cleaned.lines().collect();

        let mut narrative = None;
        let mut rank = None;
        if let Some(heading) = numeral_heading_index(&lines) {
            if let Some(next) = lines.get(heading + 1) {
                if let Some(caps) = GUANDI_RANK.captures(next.trim()) {
                    rank = Some(caps[1].to_string());
                }
            }
            if let Some(candidate) = nonempty_line(&lines, heading + 2) {
                if !candidate.starts_with("關聖") && !candidate.starts_with("詩曰") {
                    narrative = Some(candidate);
                }
            }
        }

        return Some(FortuneRecord {
            system: FortuneSystem::Guandi,
            number: num,
            display_label: format!("第{num}籤"),
            rank,
            verse_lines: poem_from_inline(&cleaned),
            narrative,
            narrative_body: None,
            attribute: None,
            sections: sections_from_brackets(&cleaned),
        });
    }
    None
}

/// 呂祖靈籤: decimal header with optional trailing sexagenary term, fenced
/// verse, heading sections. The narrative prefers the `**典故**` field and
/// falls back to the 典故說明 section.
pub fn parse_lvzu(corpus: &str, number: u32) -> Option<FortuneRecord> {
    for entry in entries(corpus) {
        let Some(caps) = LVZU_HEADER.captures(entry) else {
            continue;
        };
        let Ok(num) = caps[1].parse::<u32>() else {
            continue;
        };
        if num != number {
            continue;
        }
        let cleaned = strip_boilerplate(entry);

        let sections = sections_from_headings(&cleaned);
        let narrative = LVZU_STORY_FIELD
            .captures(&cleaned)
            .map(|c| c[1].trim().to_string())
            .or_else(|| sections.get(LVZU_STORY_SECTION).cloned());

        return Some(FortuneRecord {
            system: FortuneSystem::Lvzu,
            number: num,
            display_label: format!("第{num}籤"),
            rank: None,
            verse_lines: poem_from_fenced(&cleaned),
            narrative,
            narrative_body: None,
            attribute: None,
            sections,
        });
    }
    None
}

fn hundred_header_number(entry: &str) -> Option<u32> {
    let caps = HUNDRED_HEADER.captures(entry)?;
    caps[1].parse::<u32>().ok()
}

fn numeral_heading_index(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .position(|l| NUMERAL_HEADING_LINE.is_match(l.trim()))
}

fn nonempty_line(lines: &[&str], index: usize) -> Option<String> {
    let trimmed = lines.get(index)?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
