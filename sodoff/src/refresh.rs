//! The refresh loop: fetch both boards, render them, repeat.

use std::io;

use chrono::Local;
use crossterm::style::Color;
use thiserror::Error;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::board::{BoardQuery, BoardRenderer, BoardSource, Emit, Line, Style, StyledText};
use crate::darwin::DarwinError;
use crate::domain::{Board, Crs, Direction};
use crate::stations::StationRegistry;

const DEPARTURES_TITLE: &str = "Departure Board";
const ARRIVALS_TITLE: &str = "Arrivals Board";

#[derive(Debug, Error)]
pub enum RefreshError {
    /// A board could not be fetched. The cycle stops; the loop carries on.
    #[error("failed to fetch {direction} board for {station}: {source}")]
    Fetch {
        station: Crs,
        direction: Direction,
        #[source]
        source: DarwinError,
    },

    /// Output could not be written. Ends the loop.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Drives fetch and render cycles for a query.
pub struct Refresher<'a, S: BoardSource, E: Emit> {
    source: &'a S,
    registry: &'a StationRegistry,
    out: &'a mut E,
}

impl<'a, S: BoardSource, E: Emit> Refresher<'a, S, E> {
    pub fn new(source: &'a S, registry: &'a StationRegistry, out: &'a mut E) -> Self {
        Self {
            source,
            registry,
            out,
        }
    }

    /// Run one cycle, or in continuous mode one per interval until `cancel`
    /// fires. The first cycle runs immediately. A cycle in progress always
    /// finishes.
    ///
    /// Fetch failures are logged and skip the rest of their cycle. Only an
    /// output failure is returned.
    pub async fn run(
        &mut self,
        query: &BoardQuery,
        cancel: CancellationToken,
    ) -> Result<(), RefreshError> {
        if !query.continuous {
            return self.tick(query).await;
        }

        let mut interval = time::interval(query.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("refresh loop cancelled");
                    return Ok(());
                }
                _ = interval.tick() => {}
            }

            self.tick(query).await?;
            self.out.emit(&last_updated())?;
        }
    }

    /// One cycle with fetch failures logged rather than returned.
    async fn tick(&mut self, query: &BoardQuery) -> Result<(), RefreshError> {
        match self.cycle(query).await {
            Err(RefreshError::Fetch {
                station,
                direction,
                source,
            }) => {
                error!(%station, %direction, error = %source, "error fetching station board");
                Ok(())
            }
            other => other,
        }
    }

    /// Show the departures board at the departure station, highlighting the
    /// destination, then the arrivals board at the destination, highlighting
    /// the departure station.
    pub async fn cycle(&mut self, query: &BoardQuery) -> Result<(), RefreshError> {
        let renderer = BoardRenderer::new(self.registry, query.show_journeys);

        let departures = self
            .fetch(&query.departure, Direction::Departures, query)
            .await?;
        self.show(&renderer, &departures, &query.destination, DEPARTURES_TITLE)?;

        let arrivals = self
            .fetch(&query.destination, Direction::Arrivals, query)
            .await?;
        self.show(&renderer, &arrivals, &query.departure, ARRIVALS_TITLE)?;

        Ok(())
    }

    async fn fetch(
        &self,
        station: &Crs,
        direction: Direction,
        query: &BoardQuery,
    ) -> Result<Board, RefreshError> {
        debug!(
            %station,
            %direction,
            rows = query.rows,
            time_window_mins = query.time_window_mins,
            "fetching board"
        );

        let board = self
            .source
            .fetch_board(station, query.rows, query.time_window_mins, direction)
            .await
            .map_err(|source| RefreshError::Fetch {
                station: *station,
                direction,
                source,
            })?;

        debug!(%station, %direction, services = board.services.len(), "fetched board");
        Ok(board)
    }

    fn show(
        &mut self,
        renderer: &BoardRenderer<'_>,
        board: &Board,
        counterpart: &Crs,
        title: &str,
    ) -> io::Result<()> {
        if board.is_empty() {
            let name = self.registry.display_name(&board.station);
            self.out.emit(&StyledText::from(Line::plain(format!(
                "No train services found for station: {name}"
            ))))?;
        }

        let table = renderer.render(board, counterpart, title);
        self.out.emit(&table.to_styled())
    }
}

fn last_updated() -> StyledText {
    StyledText::from(Line::styled(
        format!("Last updated {}", Local::now().format("%H:%M:%S")),
        Style::fg(Color::DarkGrey),
    ))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::domain::{CallingPoint, Station, TrainService};

    fn crs(s: &str) -> Crs {
        Crs::parse(s).unwrap()
    }

    /// Serves canned boards and records what was asked for.
    #[derive(Default)]
    struct FakeSource {
        boards: HashMap<(Crs, Direction), Board>,
        calls: RefCell<Vec<(Crs, Direction)>>,
        /// Cancel this token once this many fetches have been made.
        cancel_after: Option<(usize, CancellationToken)>,
    }

    impl FakeSource {
        fn with_board(mut self, board: Board) -> Self {
            self.boards.insert((board.station, board.direction), board);
            self
        }
    }

    impl BoardSource for FakeSource {
        async fn fetch_board(
            &self,
            station: &Crs,
            _rows: u8,
            _time_window_mins: u16,
            direction: Direction,
        ) -> Result<Board, DarwinError> {
            let calls = {
                let mut calls = self.calls.borrow_mut();
                calls.push((*station, direction));
                calls.len()
            };
            if let Some((limit, token)) = &self.cancel_after {
                if calls >= *limit {
                    token.cancel();
                }
            }

            self.boards
                .get(&(*station, direction))
                .cloned()
                .ok_or(DarwinError::RateLimited)
        }
    }

    #[derive(Default)]
    struct Recorder {
        emitted: Vec<String>,
    }

    impl Emit for Recorder {
        fn emit(&mut self, text: &StyledText) -> io::Result<()> {
            self.emitted.push(text.to_plain());
            Ok(())
        }
    }

    fn registry() -> StationRegistry {
        [
            (crs("EDB"), "Edinburgh".to_string()),
            (crs("KGX"), "London Kings Cross".to_string()),
        ]
        .into_iter()
        .collect()
    }

    fn departures_at_kgx() -> Board {
        let mut service = TrainService::new(
            "10:00",
            Station::new(crs("KGX"), "London Kings Cross"),
            Station::new(crs("EDB"), "Edinburgh"),
        );
        service.estimated_departure = "On time".to_string();
        service.subsequent_calling_points = vec![CallingPoint::new(crs("EDB"), "Edinburgh")];
        Board::new(crs("KGX"), Direction::Departures, vec![service])
    }

    fn arrivals_at_edb() -> Board {
        let mut service = TrainService::new(
            "",
            Station::new(crs("KGX"), "London Kings Cross"),
            Station::new(crs("EDB"), "Edinburgh"),
        );
        service.scheduled_arrival = Some("14:20".to_string());
        service.estimated_arrival = Some("On time".to_string());
        Board::new(crs("EDB"), Direction::Arrivals, vec![service])
    }

    fn query() -> BoardQuery {
        BoardQuery::new(crs("KGX"), crs("EDB"))
    }

    #[tokio::test]
    async fn single_shot_shows_departures_then_arrivals() {
        let source = FakeSource::default()
            .with_board(departures_at_kgx())
            .with_board(arrivals_at_edb());
        let registry = registry();
        let mut out = Recorder::default();

        Refresher::new(&source, &registry, &mut out)
            .run(&query(), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            *source.calls.borrow(),
            [
                (crs("KGX"), Direction::Departures),
                (crs("EDB"), Direction::Arrivals)
            ]
        );
        assert_eq!(out.emitted.len(), 2);
        assert!(out.emitted[0].contains("Departure Board - London Kings Cross [KGX]"));
        assert!(out.emitted[1].contains("Arrivals Board - Edinburgh [EDB]"));
        assert!(!out.emitted.iter().any(|t| t.contains("Last updated")));
    }

    #[tokio::test]
    async fn departures_failure_skips_rest_of_cycle() {
        let source = FakeSource::default().with_board(arrivals_at_edb());
        let registry = registry();
        let mut out = Recorder::default();

        Refresher::new(&source, &registry, &mut out)
            .run(&query(), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(source.calls.borrow().len(), 1);
        assert!(out.emitted.is_empty());
    }

    #[tokio::test]
    async fn cycle_reports_fetch_failure() {
        let source = FakeSource::default().with_board(departures_at_kgx());
        let registry = registry();
        let mut out = Recorder::default();

        let result = Refresher::new(&source, &registry, &mut out)
            .cycle(&query())
            .await;

        assert!(matches!(
            result,
            Err(RefreshError::Fetch {
                direction: Direction::Arrivals,
                ..
            })
        ));
        assert_eq!(out.emitted.len(), 1);
    }

    #[tokio::test]
    async fn empty_board_prints_notice_and_table() {
        let source = FakeSource::default()
            .with_board(Board::new(crs("KGX"), Direction::Departures, Vec::new()))
            .with_board(arrivals_at_edb());
        let registry = registry();
        let mut out = Recorder::default();

        Refresher::new(&source, &registry, &mut out)
            .cycle(&query())
            .await
            .unwrap();

        assert_eq!(
            out.emitted[0],
            "No train services found for station: London Kings Cross\n"
        );
        assert!(out.emitted[1].contains("Departure Board"));
        assert_eq!(out.emitted.len(), 3);
    }

    #[tokio::test]
    async fn journeys_follow_the_query() {
        let source = FakeSource::default()
            .with_board(departures_at_kgx())
            .with_board(arrivals_at_edb());
        let registry = registry();
        let mut out = Recorder::default();
        let query = BoardQuery {
            show_journeys: true,
            ..query()
        };

        Refresher::new(&source, &registry, &mut out)
            .cycle(&query)
            .await
            .unwrap();

        assert!(out.emitted[0].contains("Highlighted Journeys:"));
        assert!(!out.emitted[1].contains("Highlighted Journeys:"));
    }

    #[tokio::test(start_paused = true)]
    async fn continuous_runs_until_cancelled() {
        let cancel = CancellationToken::new();
        let source = FakeSource {
            cancel_after: Some((4, cancel.clone())),
            ..FakeSource::default()
        }
        .with_board(departures_at_kgx())
        .with_board(arrivals_at_edb());
        let registry = registry();
        let mut out = Recorder::default();
        let query = BoardQuery {
            continuous: true,
            ..query()
        };

        Refresher::new(&source, &registry, &mut out)
            .run(&query, cancel)
            .await
            .unwrap();

        // Two cycles, each finished before the cancellation was seen.
        assert_eq!(source.calls.borrow().len(), 4);
        assert_eq!(out.emitted.len(), 6);
        assert!(out.emitted[2].starts_with("Last updated "));
        assert!(out.emitted[5].starts_with("Last updated "));
    }

    #[tokio::test(start_paused = true)]
    async fn continuous_survives_fetch_failures() {
        let cancel = CancellationToken::new();
        let source = FakeSource {
            cancel_after: Some((3, cancel.clone())),
            ..FakeSource::default()
        };
        let registry = registry();
        let mut out = Recorder::default();
        let query = BoardQuery {
            continuous: true,
            ..query()
        };

        Refresher::new(&source, &registry, &mut out)
            .run(&query, cancel)
            .await
            .unwrap();

        assert_eq!(source.calls.borrow().len(), 3);
        assert_eq!(out.emitted.len(), 3);
        assert!(out.emitted.iter().all(|t| t.starts_with("Last updated ")));
    }
}
