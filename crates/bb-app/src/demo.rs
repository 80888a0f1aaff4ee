//! Synthetic trips for exploring the dashboard without a data file

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use bb_core::TripSource;
use bb_data::{TripBatchBuilder, TripRecord};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

const STATIONS: &[(&str, f64, f64)] = &[
    ("Central Square at Mass Ave / Essex St", 42.365070, -71.103100),
    ("Charles Circle - Charles St at Cambridge St", 42.360793, -71.071190),
    ("MIT at Mass Ave / Amherst St", 42.358100, -71.093198),
    ("Christian Science Plaza - Massachusetts Ave at Westland Ave", 42.343666, -71.085824),
    ("Cross St at Hanover St", 42.362811, -71.056067),
    ("Nashua Street at Red Auerbach Way", 42.365673, -71.064263),
    ("South Station - 700 Atlantic Ave", 42.352175, -71.055547),
    ("Harvard Square at Mass Ave / Dunster", 42.373268, -71.118579),
    ("Kendall T", 42.362428, -71.084955),
    ("Boston Public Library - 700 Boylston St", 42.349673, -71.077303),
];

const POSTAL_CODES: &[&str] = &["02139", "02215", "02116", "02138", "02118", "02114", "02142"];

/// Relative trip volume per month, low in winter
const MONTH_WEIGHTS: [u32; 12] = [4, 4, 3, 1, 3, 6, 8, 10, 10, 7, 5, 3];

/// Relative trip volume per hour, peaking at the commutes
const HOUR_WEIGHTS: [u32; 24] = [1, 1, 1, 1, 1, 2, 4, 9, 12, 8, 5, 5, 6, 6, 5, 6, 8, 12, 10, 7, 5, 4, 3, 2];

pub struct DemoTripSource {
    trips: usize,
    seed: u64,
}

impl DemoTripSource {
    pub fn new(trips: usize, seed: u64) -> Self {
        Self { trips, seed }
    }

    /// Deterministic for a given seed
    pub fn generate(&self) -> Vec<TripRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..self.trips).map(|_| random_trip(&mut rng)).collect()
    }
}

impl Default for DemoTripSource {
    fn default() -> Self {
        Self::new(5_000, 2020)
    }
}

#[async_trait]
impl TripSource for DemoTripSource {
    async fn load_batch(&self) -> anyhow::Result<RecordBatch> {
        let builder: TripBatchBuilder = self.generate().into_iter().collect();
        let batch = builder.finish()?;
        info!("Generated {} demo trips", batch.num_rows());
        Ok(batch)
    }

    fn source_name(&self) -> &str {
        "demo"
    }
}

fn random_trip(rng: &mut StdRng) -> TripRecord {
    let month = weighted(rng, &MONTH_WEIGHTS) as u32 + 1;
    let day = rng.gen_range(1..=28);
    let hour = weighted(rng, &HOUR_WEIGHTS) as u32;
    let start_time = NaiveDate::from_ymd_opt(2020, month, day)
        .and_then(|d| d.and_hms_opt(hour, rng.gen_range(0..60), rng.gen_range(0..60)))
        .unwrap_or_default();

    // Exponential tail gives the right skew of real durations
    let duration = (120.0 - 480.0 * (1.0 - rng.gen::<f64>()).ln()).round();

    let start = STATIONS[rng.gen_range(0..STATIONS.len())];
    let mut end = STATIONS[rng.gen_range(0..STATIONS.len())];
    if end.0 == start.0 {
        end = STATIONS[rng.gen_range(0..STATIONS.len())];
    }

    let user_type = if rng.gen_bool(0.72) { "Subscriber" } else { "Customer" };

    TripRecord {
        start_time,
        stop_time: start_time + Duration::seconds(duration as i64),
        duration: Some(duration),
        start_station: start.0.to_string(),
        start_latitude: Some(start.1),
        start_longitude: Some(start.2),
        end_station: end.0.to_string(),
        end_latitude: Some(end.1),
        end_longitude: Some(end.2),
        user_type: Some(user_type.to_string()),
        postal_code: rng
            .gen_bool(0.9)
            .then(|| POSTAL_CODES[rng.gen_range(0..POSTAL_CODES.len())].to_string()),
    }
}

fn weighted(rng: &mut StdRng, weights: &[u32]) -> usize {
    let total: u32 = weights.iter().sum();
    let mut pick = rng.gen_range(0..total);
    for (i, w) in weights.iter().enumerate() {
        if pick < *w {
            return i;
        }
        pick -= w;
    }
    weights.len() - 1
}
