//! Synthetic user and sensor record generation
//!
//! All randomness flows from one `StdRng` seeded from the configuration, so a
//! given [`GeneratorConfig`] always produces the same [`Dataset`].

use chrono::{NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::Instant;

use super::model::{Dataset, Gender, SensorRecord, UserRecord};
use crate::config::{GeneratorConfig, ValueRange};
use crate::constants::generation;
use crate::error::{AppError, Result};

const MALE_FIRST_NAMES: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph", "Thomas",
    "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Paul", "Andrew", "Joshua",
    "Kevin", "Brian", "George", "Edward", "Ronald", "Timothy", "Jason", "Jeffrey", "Ryan",
    "Jacob", "Gary", "Nicholas", "Eric", "Jonathan", "Larry", "Justin", "Scott", "Brandon",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan", "Jessica",
    "Sarah", "Karen", "Lisa", "Nancy", "Betty", "Sandra", "Margaret", "Ashley", "Kimberly",
    "Emily", "Donna", "Michelle", "Carol", "Amanda", "Melissa", "Deborah", "Stephanie",
    "Rebecca", "Laura", "Sharon", "Cynthia", "Kathleen", "Amy", "Angela", "Anna", "Brenda",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores", "Green", "Adams", "Nelson", "Baker",
    "Hall", "Rivera", "Campbell", "Mitchell", "Carter", "Roberts",
];

const STREET_NAMES: &[&str] = &[
    "Oak", "Maple", "Cedar", "Pine", "Elm", "Washington", "Lake", "Hill", "Park", "Sunset",
    "River", "Highland", "Church", "Willow", "Meadow", "Forest", "Spring", "Ridge", "Mill",
    "Lincoln",
];

const STREET_SUFFIXES: &[&str] = &[
    "Street", "Avenue", "Road", "Lane", "Drive", "Court", "Boulevard", "Way", "Place",
];

const CITIES: &[(&str, &str)] = &[
    ("Springfield", "IL"),
    ("Riverside", "CA"),
    ("Franklin", "TN"),
    ("Greenville", "SC"),
    ("Bristol", "CT"),
    ("Clinton", "IA"),
    ("Fairview", "OR"),
    ("Salem", "MA"),
    ("Madison", "WI"),
    ("Georgetown", "TX"),
    ("Arlington", "VA"),
    ("Ashland", "KY"),
    ("Dover", "DE"),
    ("Milton", "FL"),
    ("Newport", "RI"),
    ("Oxford", "MS"),
    ("Burlington", "VT"),
    ("Manchester", "NH"),
    ("Auburn", "AL"),
    ("Lexington", "NE"),
];

const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "example.org",
];

/// Generate a complete dataset from `config`
pub fn generate(config: &GeneratorConfig) -> Result<Dataset> {
    profiling::scope!("generate");
    config.validate()?;
    let interval = schedule_interval(config)?;
    let start = Instant::now();

    let mut synth = Synthesizer::new(config);
    let dataset = synth.run(interval);

    tracing::info!(
        users = dataset.users().len(),
        sensors = dataset.sensors().len(),
        seed = config.seed,
        "Generated dataset in {:?}",
        start.elapsed()
    );
    Ok(dataset)
}

/// Spacing actually used between samples
///
/// The requested interval is kept when the whole schedule fits before
/// `end_date`; otherwise it shrinks to `(end - start) / (samples - 1)` whole
/// seconds.
pub fn schedule_interval(config: &GeneratorConfig) -> Result<TimeDelta> {
    let steps = config.samples_per_user.saturating_sub(1) as i128;
    let requested = config.sample_interval_secs as i128;
    if steps == 0 {
        return config.interval();
    }

    let span = (config.end_date - config.start_datetime()).num_seconds() as i128;
    if requested * steps <= span {
        return config.interval();
    }

    let clamped = span / steps;
    if clamped == 0 {
        return Err(AppError::config(format!(
            "{} samples do not fit between {} and {}",
            config.samples_per_user, config.start_date, config.end_date
        )));
    }
    tracing::warn!(
        requested_secs = config.sample_interval_secs,
        clamped_secs = clamped as i64,
        "Sample interval shortened to fit the date range"
    );
    Ok(TimeDelta::seconds(clamped as i64))
}

struct Synthesizer<'a> {
    config: &'a GeneratorConfig,
    rng: StdRng,
    usernames: HashSet<String>,
}

impl<'a> Synthesizer<'a> {
    fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(config.seed),
            usernames: HashSet::with_capacity(config.user_count),
        }
    }

    fn run(&mut self, interval: TimeDelta) -> Dataset {
        let mut users = Vec::with_capacity(self.config.user_count);
        let mut sensors = Vec::with_capacity(self.config.total_samples());

        for user_id in 0..self.config.user_count {
            users.push(self.user());

            let mut timestamp = self.config.start_datetime();
            for sample in 0..self.config.samples_per_user {
                if sample > 0 {
                    timestamp += interval;
                }
                sensors.push(self.reading(user_id, timestamp));
            }
        }

        Dataset::new(users, sensors)
    }

    fn user(&mut self) -> UserRecord {
        let gender = if self.rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        let first_pool = match gender {
            Gender::Male => MALE_FIRST_NAMES,
            Gender::Female => FEMALE_FIRST_NAMES,
        };
        let first_name = self.pick(first_pool).to_string();
        let last_name = self.pick(LAST_NAMES).to_string();
        let age = self.rng.gen_range(generation::MIN_AGE..=generation::MAX_AGE);
        let username = self.username(&first_name, &last_name);
        let address = self.address();
        let email = format!(
            "{}.{}@{}",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            self.pick(EMAIL_DOMAINS)
        );

        UserRecord {
            first_name,
            last_name,
            age,
            gender,
            username,
            address,
            email,
        }
    }

    fn username(&mut self, first: &str, last: &str) -> String {
        let first = first.to_lowercase();
        let last = last.to_lowercase();
        let base = match self.rng.gen_range(0..3) {
            0 => format!("{}{}", first, last),
            1 => format!("{}.{}", first, last),
            _ => format!("{}{}{}", &first[..1], last, self.rng.gen_range(10..100)),
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while self.usernames.contains(&candidate) {
            candidate = format!("{}{}", base, suffix);
            suffix += 1;
        }
        self.usernames.insert(candidate.clone());
        candidate
    }

    fn address(&mut self) -> String {
        let number = self.rng.gen_range(1..10_000);
        let street = self.pick(STREET_NAMES);
        let suffix = self.pick(STREET_SUFFIXES);
        let (city, state) = CITIES.choose(&mut self.rng).copied().unwrap_or(CITIES[0]);
        let zip = self.rng.gen_range(1_000..100_000);
        format!("{} {} {}, {}, {} {:05}", number, street, suffix, city, state, zip)
    }

    fn reading(&mut self, user_id: usize, timestamp: NaiveDateTime) -> SensorRecord {
        let ranges = self.config.field_ranges;
        let outside_temperature = self.uniform(ranges.outside_temperature);
        let room_temperature = outside_temperature - self.uniform(ranges.room_temperature_drop);
        let outside_humidity = self.uniform(ranges.outside_humidity);
        let room_humidity = outside_humidity - self.uniform(ranges.room_humidity_drop);

        let (lo, hi) = generation::HUMIDITY_BOUNDS;
        SensorRecord {
            user_id,
            timestamp,
            outside_temperature: round2(outside_temperature),
            outside_humidity: round2(outside_humidity).clamp(lo, hi),
            room_temperature: round2(room_temperature),
            room_humidity: round2(room_humidity).clamp(lo, hi),
        }
    }

    fn uniform(&mut self, range: ValueRange) -> f64 {
        self.rng.gen_range(range.min..=range.max)
    }

    fn pick(&mut self, pool: &[&'static str]) -> &'static str {
        pool.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
