use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// `1234.0` → `"$1,234 "` (the trailing space mirrors the public export).
fn format_price(price: f64) -> String {
    let whole = price.round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped} ")
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // (name, centre lat, centre long, price multiplier)
    let neighbourhoods = [
        ("Manhattan", 40.776, -73.971, 1.6),
        ("Brooklyn", 40.678, -73.944, 1.1),
        ("Queens", 40.728, -73.794, 0.9),
        ("Bronx", 40.845, -73.865, 0.7),
        ("Staten Island", 40.579, -74.151, 0.8),
    ];
    let room_types = [
        ("Entire home/apt", 180.0),
        ("Private room", 90.0),
        ("Shared room", 45.0),
        ("Hotel room", 220.0),
    ];
    let hosts = ["Alice", "Bob", "Chen", "Dana", "Emeka", "Farah"];

    let output_path = "sample_listings.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "id",
        "NAME",
        "host name",
        "neighbourhood group",
        "lat",
        "long",
        "room type",
        "price",
        "number of reviews",
    ])?;

    let n_rows = 500;
    for id in 0..n_rows {
        let &(hood, lat0, long0, multiplier) = rng.pick(&neighbourhoods);
        let &(room_type, base_price) = rng.pick(&room_types);
        let host = rng.pick(&hosts);

        // A few rows exercise the cleaning rules: unreadable prices, missing
        // room types and missing coordinates.
        let roll = rng.next_f64();
        let price = if roll < 0.03 {
            String::new()
        } else if roll < 0.05 {
            "N/A".to_string()
        } else {
            format_price(base_price * multiplier * rng.range(0.5, 2.5))
        };
        let room_type = if rng.next_f64() < 0.02 { "" } else { room_type };
        let (lat, long) = if rng.next_f64() < 0.04 {
            (String::new(), String::new())
        } else {
            (
                format!("{:.5}", lat0 + rng.range(-0.04, 0.04)),
                format!("{:.5}", long0 + rng.range(-0.05, 0.05)),
            )
        };
        let reviews = (rng.next_f64() * 300.0) as u32;

        writer.write_record([
            (1_000_000 + id).to_string(),
            format!("{room_type} in {hood}"),
            host.to_string(),
            hood.to_string(),
            lat,
            long,
            room_type.to_string(),
            price,
            reviews.to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {n_rows} listings to {output_path}");
    Ok(())
}
