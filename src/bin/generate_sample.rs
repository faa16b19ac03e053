use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo)
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let staff = ["Avery Cole", "Blake Nguyen", "Carmen Ortiz", "Dana Whitfield", "Elliot Marsh"];
    let dss = ["Yes", "No", "No", "No", ""]; // blanks exercise the (missing) bucket
    let statements = [
        "Working on my thesis introduction",
        "Research proposal feedback",
        "Final paper draft review",
        "MSW capstone writing support",
        "Literature review structure",
        "Dissertation proposal outline",
        "Help with academic writing style",
        "Conference paper revisions",
        "",
    ];
    let levels = ["Masters", "Doctoral"];

    // Spring semester, weekdays only.
    let term_start = NaiveDate::from_ymd_opt(2024, 1, 8).context("valid term start")?;
    let term_days = 120i64;

    let mut rows: Vec<(NaiveDate, u32, u32, String, String, String, String)> = Vec::new();
    for _ in 0..600 {
        let mut date = term_start + Duration::days(rng.range(0, term_days as u64) as i64);
        while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            date += Duration::days(1);
        }
        let hour = rng.range(9, 17) as u32;
        let minute = *rng.pick(&[0u32, 15, 30, 45]);

        rows.push((
            date,
            hour,
            minute,
            rng.pick(&staff).to_string(),
            rng.pick(&dss).to_string(),
            rng.pick(&statements).to_string(),
            rng.pick(&levels).to_string(),
        ));
    }
    rows.sort_by_key(|r| (r.0, r.1, r.2));

    let output_path = "sample_appointments.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer
        .write_record([
            "Date Time",
            "Staff Name",
            "DSS_Response",
            "Statement_of_Purpose",
            "Student Level",
        ])
        .context("writing header")?;

    for (date, hour, minute, staff, dss, statement, level) in &rows {
        writer
            .write_record([
                format!("{date} {hour:02}:{minute:02}:00"),
                staff.clone(),
                dss.clone(),
                statement.clone(),
                level.clone(),
            ])
            .context("writing row")?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {} appointments to {output_path}", rows.len());
    Ok(())
}
