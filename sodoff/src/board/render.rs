//! Board rendering.
//!
//! `BoardRenderer::render` turns a `Board` into a `BoardTable`: fixed-width
//! rows tagged with their status and highlight, plus the trailing reasons
//! and journeys blocks. `BoardTable::to_styled` lays that out as
//! `StyledText`. Neither step touches the terminal or mutates the board.

use crossterm::style::Color;

use crate::domain::{Board, Crs, Direction, TrainService};
use crate::stations::StationRegistry;

use super::classify::{Status, classify};
use super::journey::{NOT_AVAILABLE, format_journey, is_highlighted};
use super::output::{Line, Span, Style, StyledText};

/// Column widths: time, place, platform, status, other-end time, operator.
pub const COLUMN_WIDTHS: [usize; 6] = [10, 30, 10, 10, 20, 40];

/// Width of a full row: the columns plus the single spaces between them.
const RULE_WIDTH: usize = 10 + 30 + 10 + 10 + 20 + 40 + 5;

const DEPARTURE_HEADERS: [&str; 6] = [
    "STD",
    "Destination",
    "Platform",
    "Status",
    "ETD",
    "Operator",
];
const ARRIVAL_HEADERS: [&str; 6] = ["STA", "Origin", "Platform", "Status", "ETA", "Operator"];

const HIGHLIGHT: Color = Color::Blue;

/// One service row, cells already truncated and padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub cells: [String; 6],
    pub status: Status,
    pub highlighted: bool,
}

/// A rendered board, ready to lay out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTable {
    /// "{title} - {station name} [{code}]"
    pub banner: String,
    pub header: [String; 6],
    /// One per service, in board order.
    pub rows: Vec<BoardRow>,
    /// Delay reason lines, in board order.
    pub reasons: Vec<String>,
    /// Route diagrams of highlighted services, when enabled.
    pub journeys: Vec<StyledText>,
}

/// Renders boards against a station registry.
#[derive(Debug, Clone, Copy)]
pub struct BoardRenderer<'a> {
    registry: &'a StationRegistry,
    show_journeys: bool,
}

impl<'a> BoardRenderer<'a> {
    pub fn new(registry: &'a StationRegistry, show_journeys: bool) -> Self {
        Self {
            registry,
            show_journeys,
        }
    }

    /// Render `board`, highlighting services that still call at the board's
    /// own station or at `counterpart`.
    pub fn render(&self, board: &Board, counterpart: &Crs, title: &str) -> BoardTable {
        let station_name = self.registry.display_name(&board.station);
        let headers = match board.direction {
            Direction::Departures => DEPARTURE_HEADERS,
            Direction::Arrivals => ARRIVAL_HEADERS,
        };

        let mut rows = Vec::with_capacity(board.services.len());
        let mut reasons = Vec::new();
        let mut journeys = Vec::new();

        for service in &board.services {
            let highlighted = is_highlighted(service, &board.station, counterpart);
            rows.push(build_row(service, board.direction, highlighted));

            if highlighted && self.show_journeys {
                journeys.push(format_journey(service));
            }

            if let Some(reason) = &service.delay_reason {
                let (from, to) = match board.direction {
                    Direction::Departures => {
                        (station_name.as_str(), service.destination.name.as_str())
                    }
                    Direction::Arrivals => (service.origin.name.as_str(), station_name.as_str()),
                };
                reasons.push(format!("\t‣ {from} to {to} - {reason}"));
            }
        }

        BoardTable {
            banner: format!("{title} - {station_name} [{}]", board.station),
            header: headers.map(String::from),
            rows,
            reasons,
            journeys,
        }
    }
}

fn build_row(service: &TrainService, direction: Direction, highlighted: bool) -> BoardRow {
    let status = classify(service);
    let (time, place, other_time) = match direction {
        Direction::Departures => (
            service.scheduled_departure.as_str(),
            service.destination.name.as_str(),
            or_not_available(Some(service.estimated_departure.as_str())),
        ),
        Direction::Arrivals => (
            or_not_available(service.scheduled_arrival.as_deref()),
            service.origin.name.as_str(),
            or_not_available(service.estimated_arrival.as_deref()),
        ),
    };
    let platform = service.platform.as_deref().unwrap_or("");

    let values = [
        time,
        place,
        platform,
        status.label(),
        other_time,
        service.operator.as_str(),
    ];
    let mut widths = COLUMN_WIDTHS.iter();
    let cells = values.map(|value| fit(value, widths.next().copied().unwrap_or_default()));

    BoardRow {
        cells,
        status,
        highlighted,
    }
}

/// Absent or empty times show as "N/A".
fn or_not_available(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

/// Truncate or pad `value` to exactly `width` characters.
fn fit(value: &str, width: usize) -> String {
    let truncated: String = value.chars().take(width).collect();
    format!("{truncated:<width$}")
}

impl BoardTable {
    /// Lay the table out as styled lines.
    pub fn to_styled(&self) -> StyledText {
        let heavy_rule = "=".repeat(RULE_WIDTH);
        let light_rule = "-".repeat(RULE_WIDTH);

        let mut text = banner(&self.banner);
        text.push(Line::plain(heavy_rule.as_str()));
        text.push(Line::plain(self.header_line()));
        text.push(Line::plain(light_rule));

        for row in &self.rows {
            text.push(row.to_line());
        }
        text.push(Line::plain(heavy_rule.as_str()));

        if !self.reasons.is_empty() {
            text.push(Line::plain("Reasons for delays/cancellations:"));
            for reason in &self.reasons {
                text.push(Line::plain(reason.as_str()));
            }
            text.push(Line::plain(heavy_rule.as_str()));
        }

        if !self.journeys.is_empty() {
            text.push(Line::plain("Highlighted Journeys:"));
            for journey in &self.journeys {
                text.append(journey.clone());
            }
            text.push(Line::plain(heavy_rule.as_str()));
        }

        text
    }

    fn header_line(&self) -> String {
        let mut widths = COLUMN_WIDTHS.iter();
        let cells: Vec<String> = self
            .header
            .iter()
            .map(|h| fit(h, widths.next().copied().unwrap_or_default()))
            .collect();
        cells.join(" ")
    }
}

impl BoardRow {
    /// The row as two spans: time/place/platform (blue background when
    /// highlighted) and status/time/operator in the status color.
    pub fn to_line(&self) -> Line {
        let [time, place, platform, status, other_time, operator] = &self.cells;

        let lead_style = if self.highlighted {
            Style::PLAIN.on(HIGHLIGHT)
        } else {
            Style::PLAIN
        };

        Line::new(vec![
            Span::new(format!("{time} {place} {platform} "), lead_style),
            Span::new(
                format!("{status} {other_time} {operator}"),
                Style::fg(self.status.color()),
            ),
        ])
    }
}

/// A framed, bold green title.
fn banner(title: &str) -> StyledText {
    let style = Style::fg(Color::Green).bold();
    let bar = "═".repeat(title.chars().count() + 4);

    let mut text = StyledText::new();
    text.push(Line::styled(format!("╔{bar}╗"), style));
    text.push(Line::styled(format!("║  {title}  ║"), style));
    text.push(Line::styled(format!("╚{bar}╝"), style));
    text
}
