//! Journey highlighting: does a service still pass through a station of
//! interest, and what does its whole route look like?

use crossterm::style::Color;

use crate::domain::{Crs, TrainService};

use super::output::{Line, Style, StyledText};

/// Placeholder for a time Darwin didn't send.
pub const NOT_AVAILABLE: &str = "N/A";

/// True if `a` or `b` is among the service's subsequent calling points.
///
/// Stations the train has already called at don't count.
pub fn is_highlighted(service: &TrainService, a: &Crs, b: &Crs) -> bool {
    service
        .subsequent_calling_points
        .iter()
        .any(|cp| cp.code == *a || cp.code == *b)
}

/// Render the full route of a service: origin, previous calling points with
/// actual times (blue), subsequent calling points with estimates, then the
/// destination. Calling-point order is kept exactly.
pub fn format_journey(service: &TrainService) -> StyledText {
    let origin = &service.origin.name;
    let destination = &service.destination.name;

    let mut text = StyledText::new();
    text.push(Line::plain(""));
    text.push(Line::plain(format!(
        "🚆 {} Journey ‣ {origin} to {destination}:",
        headline_time(service)
    )));
    text.push(Line::plain(format!("  ┌─── [Origin: {origin}]")));

    for cp in &service.previous_calling_points {
        let time = cp.actual_time.as_deref().unwrap_or(NOT_AVAILABLE);
        text.push(Line::styled(
            format!("  │   {} - {time}", cp.name),
            Style::fg(Color::Blue),
        ));
    }

    for cp in &service.subsequent_calling_points {
        let time = cp.estimated_time.as_deref().unwrap_or(NOT_AVAILABLE);
        text.push(Line::plain(format!("  │   {} - {time}", cp.name)));
    }

    text.push(Line::plain(format!("  └─── [Destination: {destination}]")));
    text
}

/// STD, or STA for services that terminate at the board station.
fn headline_time(service: &TrainService) -> &str {
    if !service.scheduled_departure.is_empty() {
        &service.scheduled_departure
    } else {
        service
            .scheduled_arrival
            .as_deref()
            .unwrap_or(NOT_AVAILABLE)
    }
}
