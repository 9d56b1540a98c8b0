//! Fixed seat inventory, seeded once at boot (spec.md §6: "Tier prices and
//! the row→tier mapping are seeded at initialization and treated as
//! constants at runtime").

use seatguard_core::{Seat, SeatId, Tier};

const SEATS_PER_ROW: u32 = 10;

fn tier_for_row(row: char) -> Tier {
    match row {
        'A' | 'B' => Tier::Vip,
        'C' | 'D' => Tier::Premium,
        _ => Tier::Standard,
    }
}

fn price_for_tier(tier: Tier) -> u64 {
    match tier {
        Tier::Vip => 15_000,
        Tier::Premium => 9_000,
        Tier::Standard => 5_000,
    }
}

/// The venue layout: rows A through J, 10 seats each.
#[must_use]
pub fn fixed_layout() -> Vec<Seat> {
    ('A'..='J')
        .flat_map(|row| {
            let tier = tier_for_row(row);
            (1..=SEATS_PER_ROW).map(move |number| Seat {
                seat_id: SeatId::from(format!("{row}{number}")),
                row: row.to_string(),
                number,
                tier,
                price: price_for_tier(tier),
            })
        })
        .collect()
}
