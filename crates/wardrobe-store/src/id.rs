//! Entity id generation.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

const RANDOM_LEN: usize = 8;

/// Generate a new entity id: 8 random lowercase alphanumerics followed by the
/// current time in base 36.
///
/// Uniqueness is probabilistic. Fine for a single local writer, not for
/// multiple writers sharing a key space.
pub fn new_id() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    format!("{}{}", random, to_base36(millis))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
