use unicode_normalization::UnicodeNormalization;

/// Formats a DOI string by removing resolver URL prefixes and [doi] suffixes
///
/// # Arguments
///
/// * `doi_str` - The DOI string to format
pub fn format_doi(doi_str: &str) -> Option<String> {
    if doi_str.is_empty() {
        return None;
    }
    let doi = doi_str
        .trim()
        .trim_end_matches("[doi]")
        .trim()
        .replace(|c: char| c.is_whitespace(), "")
        .to_lowercase();

    // A DOI always starts with the "10." directory indicator, which also
    // skips any https://doi.org/ prefix.
    let pos = doi.find("10.")?;
    Some(doi[pos..].to_string())
}

/// Formats an ISSN as `NNNN-NNNC`, dropping `(Print)`-style qualifiers.
///
/// Returns `None` when the input does not hold exactly eight ISSN digits.
pub fn format_issn(issn_str: &str) -> Option<String> {
    let clean_issn = issn_str
        .trim()
        .to_uppercase()
        .replace("(ELECTRONIC)", "")
        .replace("(LINKING)", "")
        .replace("(PRINT)", "")
        .replace(|c: char| !c.is_ascii_digit() && c != '-' && c != 'X', "");

    let digits: String = clean_issn
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X')
        .collect();

    match (clean_issn.len(), digits.len()) {
        (9, 8) if clean_issn.chars().nth(4) == Some('-') => Some(clean_issn),
        (8, 8) => Some(format!("{}-{}", &digits[..4], &digits[4..])),
        _ => None,
    }
}

/// Lower-cases free text, strips accents and keeps ASCII letters and digits
/// separated by single spaces.
///
/// Returns `None` when nothing is left.
pub fn normalize_text(text: &str) -> Option<String> {
    let folded: String = text
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    let normalized = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
