use crate::error::{Result, SearchError};

/// Sentinel language tag meaning "no language restriction".
pub const LANG_ALL: &str = "all";

/// Checks a language tag before any query is built.
///
/// Accepts the [`LANG_ALL`] sentinel or an ISO-style tag: a primary subtag
/// of 2-3 lowercase ASCII letters, optionally followed by `-`-separated
/// subtags of 2-8 lowercase alphanumerics (`en`, `en-gb`, `zh-hans`).
pub fn validate_lang(lang: &str) -> Result<()> {
    if lang == LANG_ALL {
        return Ok(());
    }

    let mut subtags = lang.split('-');
    let primary = subtags.next().unwrap_or_default();
    if !(2..=3).contains(&primary.len()) || !primary.bytes().all(|b| b.is_ascii_lowercase()) {
        return Err(invalid_lang(lang));
    }
    for subtag in subtags {
        if !(2..=8).contains(&subtag.len())
            || !subtag
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return Err(invalid_lang(lang));
        }
    }
    Ok(())
}

/// Checks an ontology identifier: non-empty, starts with a lowercase letter,
/// remainder lowercase alphanumerics, `-` or `_`.
pub fn validate_ontology_id(ontology_id: &str) -> Result<()> {
    let mut bytes = ontology_id.bytes();
    let Some(first) = bytes.next() else {
        return Err(SearchError::InvalidParameter(
            "ontology id must not be empty".to_string(),
        ));
    };
    if !first.is_ascii_lowercase() {
        return Err(invalid_ontology_id(ontology_id));
    }
    if !bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_') {
        return Err(invalid_ontology_id(ontology_id));
    }
    Ok(())
}

fn invalid_lang(lang: &str) -> SearchError {
    SearchError::InvalidParameter(format!(
        "invalid language tag '{lang}' (expected e.g. 'en', 'en-gb' or '{LANG_ALL}')"
    ))
}

fn invalid_ontology_id(ontology_id: &str) -> SearchError {
    SearchError::InvalidParameter(format!(
        "invalid ontology id '{ontology_id}' (expected lowercase short name, e.g. 'go')"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_lang_accepts_iso_style_tags_and_sentinel() {
        for lang in ["en", "fr", "eng", "en-gb", "zh-hans", "de-at-1996", LANG_ALL] {
            validate_lang(lang).expect(lang);
        }
    }

    #[test]
    fn validate_lang_rejects_malformed_tags() {
        for lang in ["", "e", "EN", "en_GB", "english", "en-", "en-G B", "-gb"] {
            let err = validate_lang(lang).expect_err(lang);
            assert!(matches!(err, SearchError::InvalidParameter(_)), "{lang}");
        }
    }

    #[test]
    fn validate_lang_is_idempotent() {
        validate_lang("en").expect("first");
        validate_lang("en").expect("second");
    }

    #[test]
    fn validate_ontology_id_accepts_lowercase_short_names() {
        for id in ["go", "efo", "ncbitaxon", "chebi-2", "mondo_patterns"] {
            validate_ontology_id(id).expect(id);
        }
    }

    #[test]
    fn validate_ontology_id_rejects_empty_and_malformed_names() {
        for id in ["", "GO", "2go", "-go", "go ontology", "go/2"] {
            let err = validate_ontology_id(id).expect_err(id);
            assert!(matches!(err, SearchError::InvalidParameter(_)), "{id}");
        }
    }
}
