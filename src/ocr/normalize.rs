//! Recognized-text normalization.
//!
//! Applies the legacy cleanup sequence: whitespace collapse, an ordered
//! table of glyph-confusion substitutions, punctuation repair, hyphenated
//! word joining, per-line capitalization, and a small fixed word map.
//!
//! The substitution table is applied in order and is intentionally kept
//! exactly as inherited, including rules that can override earlier ones
//! (the trailing `l` -> `I` rule in particular). Reordering it changes
//! output on real documents.

use std::sync::OnceLock;

use regex::Regex;

/// Ordered, case-insensitive glyph-confusion substitutions.
const CORRECTIONS: &[(&str, &str)] = &[
    (r"\bI\b", "1"),
    (r"\|", "l"),
    (r"\[", "l"),
    (r"\]", "l"),
    ("©", "c"),
    ("®", "r"),
    (r"O(\d)", "0${1}"),
    (r"(\d)O", "${1}0"),
    (r"S(\d)", "5${1}"),
    (r"(\d)S", "${1}5"),
    (r"B(\d)", "8${1}"),
    (r"(\d)B", "${1}8"),
    (r"l(\d)", "1${1}"),
    (r"(\d)l", "${1}1"),
    (r"Z(\d)", "2${1}"),
    (r"(\d)Z", "${1}2"),
    (r"G(\d)", "6${1}"),
    (r"(\d)G", "${1}6"),
    (r"\bO\b", "0"),
    (r",O", ",0"),
    (r"\b[sS]\b", "S"),
    (r"l", "I"),
];

/// Fixed word-level corrections applied last (case-sensitive).
const WORD_FIXES: &[(&str, &str)] = &[("HsBC", "HSBC"), ("sW1A", "SW1A"), ("2O25l", "2025")];

struct Rules {
    corrections: Vec<(Regex, &'static str)>,
    whitespace: Regex,
    hyphen_newline: Regex,
    hyphen_space: Regex,
    hyphen_trailing: Regex,
    spaces: Regex,
    blank_lines: Regex,
}

fn rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(|| Rules {
        corrections: CORRECTIONS
            .iter()
            .map(|(pattern, replacement)| {
                (
                    Regex::new(&format!("(?i){pattern}")).expect("static correction pattern"),
                    *replacement,
                )
            })
            .collect(),
        whitespace: Regex::new(r"\s+").expect("static pattern"),
        hyphen_newline: Regex::new(r"(\w+)-\s*\n\s*(\w+)").expect("static pattern"),
        hyphen_space: Regex::new(r"(\w+)-\s+(\w+)").expect("static pattern"),
        hyphen_trailing: Regex::new(r"(\w+)-\s*\n").expect("static pattern"),
        spaces: Regex::new(r" +").expect("static pattern"),
        blank_lines: Regex::new(r"\n\s*\n").expect("static pattern"),
    })
}

/// Normalize raw OCR output into cleaned text.
pub fn normalize_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let rules = rules();

    // 1. Whitespace collapse
    let mut text = rules.whitespace.replace_all(raw, " ").trim().to_string();

    // 2. Glyph-confusion substitutions, in table order
    for (pattern, replacement) in &rules.corrections {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }

    // Punctuation repair
    text = text
        .replace('~', "-")
        .replace('—', "-")
        .replace('’', "'")
        .replace('“', "\"")
        .replace('”', "\"");

    // 3. Join words broken across hyphens
    text = rules.hyphen_newline.replace_all(&text, "${1}${2}").into_owned();
    text = rules.hyphen_space.replace_all(&text, "${1}${2}").into_owned();
    text = rules.hyphen_trailing.replace_all(&text, "${1}").into_owned();

    // 4. Per-line capitalization, dropping empty lines
    let lines: Vec<String> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(capitalize_line)
        .collect();
    let mut cleaned = lines.join("\n");

    cleaned = rules.spaces.replace_all(&cleaned, " ").into_owned();
    cleaned = rules.blank_lines.replace_all(&cleaned, "\n\n").into_owned();

    // 5. Fixed word map
    for (wrong, right) in WORD_FIXES {
        cleaned = cleaned.replace(wrong, right);
    }

    cleaned
}

fn capitalize_line(line: &str) -> String {
    let mut chars = line.chars();
    match chars.next() {
        Some(first) if line.chars().count() > 1 && first.is_lowercase() => {
            first.to_uppercase().chain(chars).collect()
        }
        _ => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize_text("  ACME   CORP  "), "ACME CORP");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_text("   \n  "), "");
    }

    #[test]
    fn fixes_digit_confusions() {
        // O next to digits becomes zero, comma-O likewise.
        assert_eq!(normalize_text("REG NO 1234O"), "REG NO 12340");
        assert_eq!(normalize_text("52,O00"), "52,000");
    }

    #[test]
    fn joins_hyphen_split_words() {
        assert_eq!(normalize_text("CON- TRACT"), "CONTRACT");
        // The correction table runs before hyphen joining, so ells are
        // already rewritten by the time the halves are merged.
        assert_eq!(normalize_text("EMPLOY- MENT CONTRACT"), "EMPIOYMENT CONTRACT");
    }

    #[test]
    fn capitalizes_first_letter() {
        // The trailing l->I legacy rule also rewrites ells before this step.
        assert_eq!(normalize_text("dear sir"), "Dear sir");
    }

    #[test]
    fn legacy_ell_rule_applies_last() {
        assert_eq!(normalize_text("TOTAL"), "TOTAI");
    }

    #[test]
    fn word_map_applies_after_table() {
        assert_eq!(normalize_text("Branch: HsBC"), "Branch: HSBC");
    }

    #[test]
    fn punctuation_is_straightened() {
        assert_eq!(normalize_text("don’t worry"), "Don't worry");
        assert_eq!(normalize_text("he said “fine”"), "He said \"fine\"");
    }
}
