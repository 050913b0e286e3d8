//! Trade-name cleanup shared by both pipelines.
//!
//! Registration reports decorate business names with boilerplate: a leading
//! `M/S` ("Messrs") and trailing settlement or office designations such as
//! `IGST STLMT`, `CTI` and `STO`. [`normalize_name`] strips them in a fixed
//! order and repeats until the text stops changing, so normalizing an
//! already-normalized name is a no-op.

use std::sync::LazyLock;

use regex::Regex;

static MESSRS_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^M/S(\.\s*|\s+|$)").expect("valid regex"));

static IGST_SETTLEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+IGST\s+STLMT$").expect("valid regex"));

static CTI_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+CTI$").expect("valid regex"));

static STO_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+STO$").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strips honorific and designation boilerplate from a raw name fragment.
///
/// Internal whitespace runs collapse to a single space and the result is
/// trimmed. Returns an empty string if nothing but boilerplate was present.
///
/// ```
/// use gst_contacts_extract::normalize::normalize_name;
///
/// assert_eq!(normalize_name("M/S. ACME  TRADERS IGST STLMT"), "ACME TRADERS");
/// assert_eq!(normalize_name("m/s Bharat Steel sto"), "Bharat Steel");
/// ```
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let mut current = WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned();

    loop {
        let next = strip_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

/// One pass over the boilerplate patterns, in order.
fn strip_once(name: &str) -> String {
    let name = MESSRS_PREFIX_RE.replace(name, "");
    let name = IGST_SETTLEMENT_RE.replace(&name, "");
    let name = CTI_SUFFIX_RE.replace(&name, "");
    let name = STO_SUFFIX_RE.replace(&name, "");
    name.trim().to_owned()
}
