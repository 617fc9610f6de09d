// src/store/ticket.rs

use chrono::Utc;
use rand::Rng;

const PREFIX: &str = "CMP";

/// Ticket ids look like `CMP-493021-807`: the last six digits of the epoch
/// millisecond clock plus a three-digit random suffix. Not collision-free
/// under sustained load; the store re-rolls on the rare collision.
pub fn generate_ticket_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let random: u32 = rand::thread_rng().gen_range(0..1000);
    format!("{}-{:06}-{:03}", PREFIX, millis % 1_000_000, random)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_id_matches_fixed_format() {
        let id = generate_ticket_id();
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "CMP");
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2].len(), 3);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }
}
