//! Control events and the outputs they invalidate

use chrono::NaiveDate;

use crate::selection::{Selection, VisualizationKind};

/// The four dashboard outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Text,
    Chart,
    DateBounds,
    Map,
}

/// A change to one of the four input controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    VisualizationChanged(VisualizationKind),
    StationChanged(String),
    StartDateChanged(Option<NaiveDate>),
    EndDateChanged(Option<NaiveDate>),
}

impl ControlEvent {
    /// Outputs that must be recomputed after this event
    pub fn affected_outputs(&self) -> &'static [OutputKind] {
        match self {
            ControlEvent::VisualizationChanged(_) => &[OutputKind::Text, OutputKind::Chart],
            ControlEvent::StationChanged(_) => &[OutputKind::DateBounds, OutputKind::Map],
            ControlEvent::StartDateChanged(_) | ControlEvent::EndDateChanged(_) => &[OutputKind::Map],
        }
    }

    /// Write the event into the session selection
    pub fn apply_to(&self, selection: &mut Selection) {
        match self {
            ControlEvent::VisualizationChanged(kind) => selection.kind = *kind,
            ControlEvent::StationChanged(station) => selection.station = Some(station.clone()),
            ControlEvent::StartDateChanged(date) => selection.start_date = *date,
            ControlEvent::EndDateChanged(date) => selection.end_date = *date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_change_does_not_reset_dates() {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1);
        let mut selection = Selection {
            start_date: start,
            ..Default::default()
        };

        ControlEvent::StationChanged("Central Square".to_string()).apply_to(&mut selection);

        assert_eq!(selection.station.as_deref(), Some("Central Square"));
        assert_eq!(selection.start_date, start);
    }

    #[test]
    fn test_outputs_per_event() {
        let kind = ControlEvent::VisualizationChanged(VisualizationKind::PostalCode);
        assert_eq!(kind.affected_outputs(), &[OutputKind::Text, OutputKind::Chart]);

        let end = ControlEvent::EndDateChanged(None);
        assert_eq!(end.affected_outputs(), &[OutputKind::Map]);
    }
}
