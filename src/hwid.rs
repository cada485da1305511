//! Picks which hardware ID a signed driver is bound to, and which one to show.
//!
//! Two passes, each an ordered list of rules tried until one returns a hit:
//!
//! * raw match: the ID the OS most likely used to bind the driver, anchored
//!   on the signed-driver record's hardware ID
//! * display match: the most readable ID the device itself reports
//!
//! Neither pass fails. Missing data degrades to the best available ID or an
//! empty string.

use crate::utils::{eq_trimmed_ignore_case, starts_with_ignore_case};
use regex::Regex;
use std::sync::LazyLock;

/// `ACPI\VEN_XXX&DEV_YYYY`, which ACPI devices usually also report as `ACPI\XXXYYYY`
static ACPI_VEN_DEV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^ACPI\\VEN_([A-Z0-9]{3})&DEV_([0-9A-F]{4})$")
        .expect("ACPI pattern is valid")
});

/// Hardware and compatible IDs of one device plus its signed-driver ID
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HardwareIdSet {
    pub signed_id: String,
    pub hardware_ids: Vec<String>,
    pub compatible_ids: Vec<String>,
}

impl HardwareIdSet {
    /// Captures the IDs, dropping blank entries and case-insensitive duplicates.
    pub fn new(
        signed_id: impl Into<String>,
        hardware_ids: impl IntoIterator<Item = String>,
        compatible_ids: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            signed_id: signed_id.into(),
            hardware_ids: distinct_ids(hardware_ids),
            compatible_ids: distinct_ids(compatible_ids),
        }
    }

    pub fn resolve(&self) -> ResolvedIdentifiers {
        let raw_matched = pick_raw_match(&self.signed_id, &self.hardware_ids);
        let display_matched = pick_display_match(&raw_matched, &self.hardware_ids);
        ResolvedIdentifiers {
            raw_matched,
            display_matched,
        }
    }
}

/// Output of [`HardwareIdSet::resolve`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIdentifiers {
    pub raw_matched: String,
    pub display_matched: String,
}

type Rule = for<'a> fn(&str, &'a [String]) -> Option<&'a str>;

const RAW_RULES: &[Rule] = &[exact_match, extended_match, longest_truncated_match];

const DISPLAY_RULES: &[Rule] = &[compact_acpi_match, plain_id_match, exact_match];

/// Returns the hardware ID the signed-driver ID actually refers to.
pub fn pick_raw_match(signed_id: &str, hardware_ids: &[String]) -> String {
    let signed_id = signed_id.trim();
    if signed_id.is_empty() {
        log::debug!("No signed hardware ID; using first reported hardware ID");
        return first_non_blank(hardware_ids).unwrap_or_default().to_string();
    }

    RAW_RULES
        .iter()
        .find_map(|rule| rule(signed_id, hardware_ids))
        .unwrap_or(signed_id)
        .to_string()
}

/// Returns the most human-readable ID for a device, given its raw match.
pub fn pick_display_match(raw_matched: &str, hardware_ids: &[String]) -> String {
    let raw_matched = raw_matched.trim();
    if raw_matched.is_empty() {
        return first_non_blank(hardware_ids).unwrap_or_default().to_string();
    }

    DISPLAY_RULES
        .iter()
        .find_map(|rule| rule(raw_matched, hardware_ids))
        .unwrap_or(raw_matched)
        .to_string()
}

/// Whether `candidate` is the ID to highlight in a device's ID list.
///
/// The display match wins; the raw match is only used when no display match exists.
pub fn is_display_hit(candidate: &str, display_matched: &str, raw_matched: &str) -> bool {
    let display = display_matched.trim();
    let raw = raw_matched.trim();

    if !display.is_empty() {
        return eq_trimmed_ignore_case(candidate, display);
    }
    !raw.is_empty() && eq_trimmed_ignore_case(candidate, raw)
}

fn exact_match<'a>(id: &str, hardware_ids: &'a [String]) -> Option<&'a str> {
    hardware_ids
        .iter()
        .find(|h| eq_trimmed_ignore_case(h, id))
        .map(String::as_str)
}

/// First entry that extends `id`
fn extended_match<'a>(id: &str, hardware_ids: &'a [String]) -> Option<&'a str> {
    hardware_ids
        .iter()
        .find(|h| !h.trim().is_empty() && starts_with_ignore_case(h, id))
        .map(String::as_str)
}

/// Longest entry that `id` extends. Equal lengths keep list order.
fn longest_truncated_match<'a>(id: &str, hardware_ids: &'a [String]) -> Option<&'a str> {
    let mut candidates: Vec<&'a String> = hardware_ids
        .iter()
        .filter(|h| !h.trim().is_empty())
        .collect();
    candidates.sort_by_key(|h| std::cmp::Reverse(h.len()));
    candidates
        .into_iter()
        .find(|h| starts_with_ignore_case(id, h))
        .map(String::as_str)
}

fn compact_acpi_match<'a>(id: &str, hardware_ids: &'a [String]) -> Option<&'a str> {
    let caps = ACPI_VEN_DEV.captures(id)?;
    let preferred = format!(
        "ACPI\\{}{}",
        caps[1].to_uppercase(),
        caps[2].to_uppercase()
    );
    exact_match(&preferred, hardware_ids)
}

/// First entry with no `&` and no leading wildcard
fn plain_id_match<'a>(_id: &str, hardware_ids: &'a [String]) -> Option<&'a str> {
    hardware_ids
        .iter()
        .find(|h| {
            let trimmed = h.trim();
            !trimmed.is_empty() && !h.contains('&') && !trimmed.starts_with('*')
        })
        .map(String::as_str)
}

fn first_non_blank(ids: &[String]) -> Option<&str> {
    ids.iter().find(|h| !h.trim().is_empty()).map(String::as_str)
}

fn distinct_ids(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter()
        .filter(|id| !id.trim().is_empty())
        .filter(|id| seen.insert(id.to_uppercase()))
        .collect()
}
