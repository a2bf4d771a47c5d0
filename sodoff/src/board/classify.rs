//! Service status classification.

use std::fmt;

use crossterm::style::Color;

use crate::domain::{CANCELLED, TrainService};

/// The status shown in a board row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Cancelled,
    Delayed,
    OnTime,
}

impl Status {
    /// Display color for the status cells of a row.
    pub fn color(self) -> Color {
        match self {
            Status::Cancelled => Color::Red,
            Status::Delayed => Color::Yellow,
            Status::OnTime => Color::Green,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Cancelled => "Cancelled",
            Status::Delayed => "Delayed",
            Status::OnTime => "On time",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a service. First match wins:
///
/// 1. `Cancelled` if the STD, ETD or ETA is the literal `"Cancelled"`
/// 2. `Delayed` if Darwin gave a delay reason
/// 3. `OnTime` otherwise
pub fn classify(service: &TrainService) -> Status {
    let cancelled = service.scheduled_departure == CANCELLED
        || service.estimated_departure == CANCELLED
        || service.estimated_arrival.as_deref() == Some(CANCELLED);

    if cancelled {
        Status::Cancelled
    } else if service.delay_reason.is_some() {
        Status::Delayed
    } else {
        Status::OnTime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Crs, Station};

    fn service(std: &str) -> TrainService {
        TrainService::new(
            std,
            Station::new(Crs::parse("KGX").unwrap(), "London Kings Cross"),
            Station::new(Crs::parse("EDB").unwrap(), "Edinburgh"),
        )
    }

    #[test]
    fn plain_service_is_on_time_and_green() {
        let status = classify(&service("10:00"));
        assert_eq!(status, Status::OnTime);
        assert_eq!(status.color(), Color::Green);
        assert_eq!(status.to_string(), "On time");
    }

    #[test]
    fn cancelled_token_in_any_time_field() {
        assert_eq!(classify(&service("Cancelled")), Status::Cancelled);

        let mut etd = service("10:00");
        etd.estimated_departure = "Cancelled".to_string();
        assert_eq!(classify(&etd), Status::Cancelled);

        let mut eta = service("10:00");
        eta.estimated_arrival = Some("Cancelled".to_string());
        assert_eq!(classify(&eta), Status::Cancelled);
    }

    #[test]
    fn cancellation_beats_delay_reason() {
        let mut s = service("Cancelled");
        s.delay_reason = Some("A fault with the signalling system".to_string());

        let status = classify(&s);
        assert_eq!(status, Status::Cancelled);
        assert_eq!(status.color(), Color::Red);
    }

    #[test]
    fn delay_reason_means_delayed() {
        let mut s = service("10:00");
        s.estimated_departure = "10:12".to_string();
        s.delay_reason = Some("Late running of a previous service".to_string());

        let status = classify(&s);
        assert_eq!(status, Status::Delayed);
        assert_eq!(status.color(), Color::Yellow);
    }

    #[test]
    fn late_estimate_without_reason_is_on_time() {
        let mut s = service("10:00");
        s.estimated_departure = "10:12".to_string();
        assert_eq!(classify(&s), Status::OnTime);
    }

    #[test]
    fn scheduled_arrival_token_is_ignored() {
        let mut s = service("10:00");
        s.scheduled_arrival = Some("Cancelled".to_string());
        assert_eq!(classify(&s), Status::OnTime);
    }
}
