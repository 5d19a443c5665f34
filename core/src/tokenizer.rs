use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}](?:[\p{L}\p{N}_'-]*[\p{L}\p{N}_])?").expect("valid regex");
}

/// Tokenize text into terms using NFKC normalization, lowercase and Unicode word
/// boundaries. Terms are taken as-is; no stemming or stopword removal.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}
