//! Trip fixtures shared by the unit tests

use bb_data::TripRecord;
use chrono::{NaiveDate, NaiveDateTime};

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
}

/// Station coordinates derived from the name so repeated names agree
pub fn coords(name: &str) -> (f64, f64) {
    let seed = name.bytes().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    (42.30 + (seed % 100) as f64 / 1000.0, -71.10 + (seed / 100 % 100) as f64 / 1000.0)
}

#[derive(Clone)]
pub struct TripFixture(TripRecord);

pub fn trip(start: &str, end: &str) -> TripFixture {
    let when = at(2020, 6, 1, 12);
    let (start_lat, start_lon) = coords(start);
    let (end_lat, end_lon) = coords(end);
    TripFixture(TripRecord {
        start_time: when,
        stop_time: when + chrono::Duration::minutes(10),
        duration: Some(600.0),
        start_station: start.to_string(),
        start_latitude: Some(start_lat),
        start_longitude: Some(start_lon),
        end_station: end.to_string(),
        end_latitude: Some(end_lat),
        end_longitude: Some(end_lon),
        user_type: None,
        postal_code: None,
    })
}

impl TripFixture {
    pub fn at(mut self, when: NaiveDateTime) -> Self {
        self.0.start_time = when;
        self.0.stop_time = when + chrono::Duration::minutes(10);
        self
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.0.duration = Some(seconds);
        self
    }

    pub fn user(mut self, user_type: &str) -> Self {
        self.0.user_type = Some(user_type.to_string());
        self
    }

    pub fn postal(mut self, code: &str) -> Self {
        self.0.postal_code = Some(code.to_string());
        self
    }

    pub fn no_end_point(mut self) -> Self {
        self.0.end_latitude = None;
        self.0.end_longitude = None;
        self
    }

    pub fn into_record(self) -> TripRecord {
        self.0
    }
}
