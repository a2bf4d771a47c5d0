//! Conversion from Darwin DTOs to board types.

use tracing::warn;

use crate::domain::{Board, CallingPoint, Crs, Direction, Station, TrainService};

use super::types::{
    ArrayOfCallingPoints, ServiceItemWithCallingPoints, ServiceLocation, StationBoardWithDetails,
};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a CRS code
    #[error("invalid CRS code: {0:?}")]
    InvalidCrs(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Convert a Darwin board response into a `Board`.
///
/// Services that fail to convert are logged and skipped rather than failing
/// the whole board. Service order is preserved.
pub fn convert_station_board(
    board: &StationBoardWithDetails,
    direction: Direction,
) -> Result<Board, ConversionError> {
    let station = parse_crs(&board.crs)?;
    let items = board.train_services.as_deref().unwrap_or(&[]);

    let mut services = Vec::with_capacity(items.len());
    for item in items {
        match convert_service_item(item) {
            Ok(service) => services.push(service),
            Err(e) => warn!(
                station = %station,
                service_id = item.service_id.as_deref().unwrap_or("unknown"),
                error = %e,
                "skipping malformed service"
            ),
        }
    }

    Ok(Board::new(station, direction, services))
}

/// Convert a single service item.
pub fn convert_service_item(
    item: &ServiceItemWithCallingPoints,
) -> Result<TrainService, ConversionError> {
    Ok(TrainService {
        scheduled_departure: item.std.clone().unwrap_or_default(),
        scheduled_arrival: item.sta.clone(),
        estimated_departure: item.etd.clone().unwrap_or_default(),
        estimated_arrival: item.eta.clone(),
        origin: parse_endpoint(item.origin.as_deref(), "origin")?,
        destination: parse_endpoint(item.destination.as_deref(), "destination")?,
        platform: item.platform.clone(),
        operator: item.operator.clone().unwrap_or_default(),
        delay_reason: item.delay_reason.clone(),
        previous_calling_points: convert_calling_points(item.previous_calling_points.as_deref())?,
        subsequent_calling_points: convert_calling_points(
            item.subsequent_calling_points.as_deref(),
        )?,
    })
}

fn parse_crs(s: &str) -> Result<Crs, ConversionError> {
    Crs::normalize(s).map_err(|_| ConversionError::InvalidCrs(s.to_string()))
}

/// Build the origin or destination station.
///
/// Split and joined services list several locations; the names are joined
/// with " & " and the first location supplies the code.
fn parse_endpoint(
    locations: Option<&[ServiceLocation]>,
    field: &'static str,
) -> Result<Station, ConversionError> {
    let locations = locations.unwrap_or(&[]);
    let first = locations.first().ok_or(ConversionError::MissingField(field))?;

    let name = locations
        .iter()
        .map(|l| l.location_name.as_str())
        .collect::<Vec<_>>()
        .join(" & ");

    Ok(Station::new(parse_crs(&first.crs)?, name))
}

/// Convert the main portion (first array) of a calling-point list, keeping
/// route order.
fn convert_calling_points(
    arrays: Option<&[ArrayOfCallingPoints]>,
) -> Result<Vec<CallingPoint>, ConversionError> {
    let Some(main) = arrays.and_then(|a| a.first()) else {
        return Ok(Vec::new());
    };

    main.calling_point
        .iter()
        .map(|cp| {
            Ok(CallingPoint {
                name: cp.location_name.clone(),
                code: parse_crs(&cp.crs)?,
                actual_time: cp.at.clone(),
                estimated_time: cp.et.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::darwin::types::CallingPoint as CallingPointDto;

    fn location(name: &str, crs: &str) -> ServiceLocation {
        ServiceLocation {
            location_name: name.to_string(),
            crs: crs.to_string(),
        }
    }

    fn calling_point(name: &str, crs: &str, et: Option<&str>, at: Option<&str>) -> CallingPointDto {
        CallingPointDto {
            location_name: name.to_string(),
            crs: crs.to_string(),
            st: None,
            et: et.map(str::to_string),
            at: at.map(str::to_string),
        }
    }

    fn make_service_item(std: &str) -> ServiceItemWithCallingPoints {
        ServiceItemWithCallingPoints {
            service_id: Some("svc1".to_string()),
            sta: None,
            eta: None,
            std: Some(std.to_string()),
            etd: Some("On time".to_string()),
            platform: Some("4".to_string()),
            operator: Some("LNER".to_string()),
            origin: Some(vec![location("London Kings Cross", "KGX")]),
            destination: Some(vec![location("Edinburgh", "EDB")]),
            previous_calling_points: None,
            subsequent_calling_points: None,
            delay_reason: None,
        }
    }

    fn make_board(items: Vec<ServiceItemWithCallingPoints>) -> StationBoardWithDetails {
        StationBoardWithDetails {
            generated_at: None,
            location_name: "London Kings Cross".to_string(),
            crs: "KGX".to_string(),
            train_services: Some(items),
            are_services_available: Some(true),
        }
    }

    #[test]
    fn convert_simple_service() {
        let service = convert_service_item(&make_service_item("10:00")).unwrap();

        assert_eq!(service.scheduled_departure, "10:00");
        assert_eq!(service.estimated_departure, "On time");
        assert_eq!(service.origin.code.as_str(), "KGX");
        assert_eq!(service.destination.name, "Edinburgh");
        assert_eq!(service.platform.as_deref(), Some("4"));
        assert_eq!(service.operator, "LNER");
        assert!(service.subsequent_calling_points.is_empty());
    }

    #[test]
    fn missing_departure_fields_become_empty() {
        let mut item = make_service_item("10:00");
        item.std = None;
        item.etd = None;
        item.sta = Some("14:20".to_string());

        let service = convert_service_item(&item).unwrap();

        assert!(service.scheduled_departure.is_empty());
        assert!(service.estimated_departure.is_empty());
        assert_eq!(service.scheduled_arrival.as_deref(), Some("14:20"));
    }

    #[test]
    fn calling_points_keep_route_order_and_times() {
        let mut item = make_service_item("10:00");
        item.previous_calling_points = Some(vec![ArrayOfCallingPoints {
            calling_point: vec![calling_point("Stevenage", "SVG", None, Some("09:20"))],
        }]);
        item.subsequent_calling_points = Some(vec![ArrayOfCallingPoints {
            calling_point: vec![
                calling_point("Peterborough", "PBO", Some("On time"), None),
                calling_point("York", "YRK", Some("11:55"), None),
                calling_point("Newcastle", "NCL", Some("12:58"), None),
            ],
        }]);

        let service = convert_service_item(&item).unwrap();

        let prev = &service.previous_calling_points;
        assert_eq!(prev.len(), 1);
        assert_eq!(prev[0].actual_time.as_deref(), Some("09:20"));
        assert!(prev[0].estimated_time.is_none());

        let names: Vec<&str> = service
            .subsequent_calling_points
            .iter()
            .map(|cp| cp.name.as_str())
            .collect();
        assert_eq!(names, ["Peterborough", "York", "Newcastle"]);
        assert_eq!(
            service.subsequent_calling_points[1].estimated_time.as_deref(),
            Some("11:55")
        );
    }

    #[test]
    fn only_main_portion_of_split_service_is_used() {
        let mut item = make_service_item("10:00");
        item.subsequent_calling_points = Some(vec![
            ArrayOfCallingPoints {
                calling_point: vec![calling_point("York", "YRK", None, None)],
            },
            ArrayOfCallingPoints {
                calling_point: vec![calling_point("Harrogate", "HGT", None, None)],
            },
        ]);

        let service = convert_service_item(&item).unwrap();
        assert_eq!(service.subsequent_calling_points.len(), 1);
        assert_eq!(service.subsequent_calling_points[0].code.as_str(), "YRK");
    }

    #[test]
    fn multiple_destinations_are_joined() {
        let mut item = make_service_item("10:00");
        item.destination = Some(vec![
            location("Aberdeen", "ABD"),
            location("Inverness", "INV"),
        ]);

        let service = convert_service_item(&item).unwrap();
        assert_eq!(service.destination.name, "Aberdeen & Inverness");
        assert_eq!(service.destination.code.as_str(), "ABD");
    }

    #[test]
    fn missing_origin_is_an_error() {
        let mut item = make_service_item("10:00");
        item.origin = None;

        assert_eq!(
            convert_service_item(&item),
            Err(ConversionError::MissingField("origin"))
        );
    }

    #[test]
    fn board_skips_malformed_services_and_keeps_order() {
        let mut bad = make_service_item("10:15");
        bad.destination = Some(vec![location("Nowhere", "??")]);

        let board = make_board(vec![
            make_service_item("10:00"),
            bad,
            make_service_item("10:30"),
        ]);

        let board = convert_station_board(&board, Direction::Departures).unwrap();

        assert_eq!(board.station.as_str(), "KGX");
        assert_eq!(board.direction, Direction::Departures);
        let times: Vec<&str> = board
            .services
            .iter()
            .map(|s| s.scheduled_departure.as_str())
            .collect();
        assert_eq!(times, ["10:00", "10:30"]);
    }

    #[test]
    fn board_without_services_is_empty() {
        let mut board = make_board(Vec::new());
        board.train_services = None;

        let board = convert_station_board(&board, Direction::Arrivals).unwrap();
        assert!(board.is_empty());
    }

    #[test]
    fn invalid_board_crs_is_an_error() {
        let mut board = make_board(Vec::new());
        board.crs = "XX".to_string();

        assert_eq!(
            convert_station_board(&board, Direction::Departures),
            Err(ConversionError::InvalidCrs("XX".to_string()))
        );
    }
}
