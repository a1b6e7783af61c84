//! Table signatures for response-cache validation.
//!
//! The signature is the JVM `String.hashCode` of the table's compact JSON
//! (values only, no formatted overrides), widened to 64 bits and made
//! non-negative. Clients compare it with the `sig` they already hold to
//! decide whether a table changed, so the hash must match existing servers
//! bit for bit.

use crate::data::Table;
use crate::output::json::render_data_table;

/// Compute the signature of a table as a decimal string.
pub fn signature(table: &Table) -> String {
    let serialized = render_data_table(table, false);
    let hash = java_string_hash(&serialized);
    i64::from(hash).abs().to_string()
}

/// `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code units with 32-bit
/// wrapping arithmetic.
fn java_string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
}
