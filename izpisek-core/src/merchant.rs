//! Merchant-key normalization for category auto-matching.
//!
//! The same derivation runs when applying stored merchant categories and
//! when persisting a newly chosen one, so similarly-worded transactions
//! keep matching after card numbers and reference digits change.

/// Normalize a description into its merchant key: uppercase, drop digits,
/// collapse whitespace. Returns `None` when nothing usable remains.
pub fn merchant_key(description: &str) -> Option<String> {
    let upper = description.trim().to_uppercase();
    let no_digits: String = upper.chars().filter(|c| !c.is_ascii_digit()).collect();
    let key = no_digits.split_whitespace().collect::<Vec<_>>().join(" ");
    if key.is_empty() { None } else { Some(key) }
}
