//! Language utilities for language tag handling
//!
//! Configuration and voices use tags such as `en`, `pt-BR` or `zh-Hant-TW`.
//! Only the primary subtag is checked against ISO 639; later subtags are
//! checked for shape and kept as given.

use anyhow::{Result, anyhow};
use isolang::Language;

/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Primary language subtag of a tag (`pt` for `pt-BR`, `en` for `en_US`)
pub fn primary_subtag(tag: &str) -> &str {
    tag.trim().split(['-', '_']).next().unwrap_or("")
}

/// Normalize the primary subtag of a tag to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(tag: &str) -> Result<String> {
    let code = primary_subtag(tag).to_lowercase();

    match code.len() {
        2 => Language::from_639_1(&code).map(|lang| lang.to_639_3().to_string()),
        3 => Language::from_639_3(&code)
            .map(|_| code.clone())
            .or_else(|| {
                BIBLIOGRAPHIC_CODES
                    .iter()
                    .find(|(bibliographic, _)| *bibliographic == code)
                    .map(|(_, terminological)| terminological.to_string())
            }),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Invalid language code: {}", tag))
}

/// Validate a language tag: a known primary subtag followed by optional
/// alphanumeric subtags of 2 to 8 characters
pub fn validate_language_tag(tag: &str) -> Result<()> {
    normalize_to_part2t(tag)?;

    let malformed = tag
        .trim()
        .split(['-', '_'])
        .skip(1)
        .find(|subtag| !(2..=8).contains(&subtag.len()) || !subtag.chars().all(|c| c.is_ascii_alphanumeric()));

    match malformed {
        Some(subtag) => Err(anyhow!("Invalid subtag '{}' in language tag: {}", subtag, tag)),
        None => Ok(()),
    }
}

/// Check if two tags name the same language, ignoring region and script
pub fn language_codes_match(tag1: &str, tag2: &str) -> bool {
    match (normalize_to_part2t(tag1), normalize_to_part2t(tag2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name for a tag
pub fn get_language_name(tag: &str) -> Result<String> {
    let normalized = normalize_to_part2t(tag)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
