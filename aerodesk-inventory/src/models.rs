use aerodesk_core::validation::{self, check_positive_id, check_text};
use aerodesk_core::{CoreResult, FieldErrors};
use aerodesk_shared::schedule::{self, parse_timestamp};
use aerodesk_shared::{Airplane, Currency, Route, SeatStatus};
use serde::Deserialize;

/// Largest airplane the store will lay out seats for.
pub const MAX_CAPACITY: i64 = 1_000;

/// Body of `POST /add_airplane`. Ids and counts arrive signed so that
/// negative values get a field message instead of a parse error.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AirplaneSpec {
    pub airplane_id: i64,
    pub model: String,
    pub manufacturer: String,
    pub year: i64,
    pub capacity: i64,
}

impl AirplaneSpec {
    pub fn validate(&self) -> CoreResult<Airplane> {
        let mut errors = FieldErrors::new();
        let airplane_id = check_positive_id(&mut errors, "airplane_id", self.airplane_id);
        let airplane = validate_details(
            &mut errors,
            airplane_id.unwrap_or_default(),
            &self.model,
            &self.manufacturer,
            self.year,
            self.capacity,
        );
        errors.into_result("invalid airplane")?;
        Ok(airplane)
    }
}

/// Body of `PUT /update_airplane/{id}`. The id comes from the path.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AirplaneUpdate {
    pub model: String,
    pub manufacturer: String,
    pub year: i64,
    pub capacity: i64,
}

impl AirplaneUpdate {
    pub fn validate(&self, airplane_id: u32) -> CoreResult<Airplane> {
        let mut errors = FieldErrors::new();
        let airplane = validate_details(
            &mut errors,
            airplane_id,
            &self.model,
            &self.manufacturer,
            self.year,
            self.capacity,
        );
        errors.into_result("invalid airplane")?;
        Ok(airplane)
    }
}

fn validate_details(
    errors: &mut FieldErrors,
    airplane_id: u32,
    model: &str,
    manufacturer: &str,
    year: i64,
    capacity: i64,
) -> Airplane {
    check_text(errors, "model", model);
    check_text(errors, "manufacturer", manufacturer);
    let year = check_positive_id(errors, "year", year).unwrap_or_default();
    if !(1..=MAX_CAPACITY).contains(&capacity) {
        errors.add("capacity", format!("capacity must be between 1 and {}", MAX_CAPACITY));
    }

    Airplane {
        airplane_id,
        model: model.trim().to_string(),
        manufacturer: manufacturer.trim().to_string(),
        year,
        capacity: u32::try_from(capacity).unwrap_or_default(),
    }
}

/// Body of `PUT /update_seat_status/{id}/seats/{seat}`.
///
/// `expected` turns the write into a compare-and-set: it is applied only if
/// the seat currently holds that status.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeatStatusChange {
    pub status: SeatStatus,
    #[serde(default)]
    pub expected: Option<SeatStatus>,
}

impl SeatStatusChange {
    pub fn to(status: SeatStatus) -> Self {
        Self { status, expected: None }
    }

    pub fn from_to(expected: SeatStatus, status: SeatStatus) -> Self {
        Self { status, expected: Some(expected) }
    }
}

/// Body of route create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    pub airplane_route_id: i64,
    pub flight_number: String,
    pub departure: String,
    pub departure_time: String,
    pub arrival: String,
    pub arrival_time: String,
    pub price: i64,
    pub currency: Currency,
    pub airplane_id: i64,
    /// Derived from the schedule; a supplied value is ignored.
    #[serde(default)]
    pub flight_time: Option<String>,
}

impl RouteSpec {
    pub fn validate(&self) -> CoreResult<Route> {
        let mut errors = FieldErrors::new();

        let route_id = check_positive_id(&mut errors, "airplane_route_id", self.airplane_route_id);
        let airplane_id = check_positive_id(&mut errors, "airplane_id", self.airplane_id);
        let price = check_positive_id(&mut errors, "price", self.price);

        let flight_number = self.flight_number.trim();
        if !validation::is_flight_number(flight_number) {
            errors.add("flight_number", "flight_number must look like AA-1234");
        }
        check_text(&mut errors, "departure", &self.departure);
        check_text(&mut errors, "arrival", &self.arrival);

        let departure_time = parse_timestamp(&self.departure_time)
            .map_err(|e| errors.add("departure_time", e.to_string()))
            .ok();
        let arrival_time = parse_timestamp(&self.arrival_time)
            .map_err(|e| errors.add("arrival_time", e.to_string()))
            .ok();

        if let (Some(departure), Some(arrival)) = (departure_time, arrival_time) {
            if arrival <= departure {
                errors.add("arrival_time", "arrival_time must be after departure_time");
            }
        }

        errors.into_result("invalid route")?;

        // Every Option below is Some once no field errors were recorded.
        let (Some(departure_time), Some(arrival_time)) = (departure_time, arrival_time) else {
            return Err(aerodesk_core::CoreError::Internal("route schedule missing".into()));
        };

        Ok(Route {
            airplane_route_id: route_id.unwrap_or_default(),
            flight_number: flight_number.to_string(),
            departure: self.departure.trim().to_string(),
            departure_time,
            arrival: self.arrival.trim().to_string(),
            arrival_time,
            flight_time: schedule::flight_time(&departure_time, &arrival_time),
            price: price.unwrap_or_default(),
            currency: self.currency,
            airplane_id: airplane_id.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerodesk_core::CoreError;

    fn route_spec() -> RouteSpec {
        RouteSpec {
            airplane_route_id: 1,
            flight_number: "AV-1234".into(),
            departure: "San José".into(),
            departure_time: "Marzo 30, 2025 - 16:46:19".into(),
            arrival: "Panamá".into(),
            arrival_time: "Marzo 30, 2025 - 19:25:19".into(),
            price: 250,
            currency: Currency::USD,
            airplane_id: 1,
            flight_time: None,
        }
    }

    #[test]
    fn test_route_spec_derives_flight_time() {
        let route = route_spec().validate().unwrap();
        assert_eq!(route.flight_time, "2 hours 39 minutes");
        assert_eq!(route.price, 250);
    }

    #[test]
    fn test_route_spec_collects_every_problem() {
        let mut spec = route_spec();
        spec.flight_number = "av1234".into();
        spec.price = 0;
        spec.arrival_time = spec.departure_time.clone();

        match spec.validate() {
            Err(CoreError::Validation { errors, .. }) => {
                assert!(errors.contains("flight_number"));
                assert!(errors.contains("price"));
                assert!(errors.contains("arrival_time"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_airplane_spec_rejects_unknown_fields() {
        let body = r#"{"airplane_id":1,"model":"A320","manufacturer":"Airbus","year":2019,"capacity":12,"color":"red"}"#;
        assert!(serde_json::from_str::<AirplaneSpec>(body).is_err());

        let missing = r#"{"airplane_id":1,"model":"A320","manufacturer":"Airbus","year":2019}"#;
        assert!(serde_json::from_str::<AirplaneSpec>(missing).is_err());
    }

    #[test]
    fn test_airplane_spec_bounds() {
        let spec = AirplaneSpec {
            airplane_id: 3,
            model: "A320".into(),
            manufacturer: "Airbus".into(),
            year: 0,
            capacity: -4,
        };
        match spec.validate() {
            Err(CoreError::Validation { errors, .. }) => {
                assert!(errors.contains("year"));
                assert!(errors.contains("capacity"));
                assert!(!errors.contains("airplane_id"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
