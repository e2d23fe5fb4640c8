use aerodesk_core::validation::{self, check_positive_id, check_text};
use aerodesk_core::{CoreError, CoreResult, FieldErrors};
use aerodesk_shared::schedule::parse_timestamp;
use aerodesk_shared::{Currency, Masked, PaymentMethod, Reservation, ReservationStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ============================================================================
// Reservations
// ============================================================================

/// Body of `POST /add_reservation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewReservation {
    pub passport_number: Masked<String>,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub airplane_id: i64,
    pub airplane_route_id: i64,
    pub seat_number: String,
    pub status: ReservationStatus,
}

/// Where a validated reservation request wants to sit.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatRequest {
    pub airplane_id: u32,
    pub airplane_route_id: u32,
    pub seat_number: String,
}

impl NewReservation {
    pub fn validate(&self) -> CoreResult<SeatRequest> {
        let mut errors = FieldErrors::new();

        check_text(&mut errors, "passport_number", self.passport_number.expose());
        check_text(&mut errors, "full_name", &self.full_name);
        check_contact(&mut errors, &self.email, &self.phone_number);
        check_text(&mut errors, "emergency_contact_name", &self.emergency_contact_name);
        check_text(&mut errors, "emergency_contact_phone", &self.emergency_contact_phone);

        let airplane_id = check_positive_id(&mut errors, "airplane_id", self.airplane_id);
        let airplane_route_id =
            check_positive_id(&mut errors, "airplane_route_id", self.airplane_route_id);
        let seat_number = validation::normalize_seat_number(&self.seat_number)
            .map_err(|msg| errors.add("seat_number", msg))
            .ok();

        if self.status != ReservationStatus::Reserved {
            errors.add("status", "new reservations must have status Reserved");
        }

        errors.into_result("invalid reservation")?;
        match (airplane_id, airplane_route_id, seat_number) {
            (Some(airplane_id), Some(airplane_route_id), Some(seat_number)) => Ok(SeatRequest {
                airplane_id,
                airplane_route_id,
                seat_number,
            }),
            _ => Err(CoreError::Internal("reservation validation incomplete".into())),
        }
    }
}

/// Body of `PUT /reservations/{code}`. All five fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReservationEdit {
    pub seat_number: String,
    pub email: String,
    pub phone_number: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
}

impl ReservationEdit {
    /// Checks every field and returns a copy with the seat number normalised.
    pub fn validate(&self) -> CoreResult<ReservationEdit> {
        let mut errors = FieldErrors::new();
        let seat_number = validation::normalize_seat_number(&self.seat_number)
            .map_err(|msg| errors.add("seat_number", msg))
            .unwrap_or_default();
        check_contact(&mut errors, &self.email, &self.phone_number);
        check_text(&mut errors, "emergency_contact_name", &self.emergency_contact_name);
        check_text(&mut errors, "emergency_contact_phone", &self.emergency_contact_phone);
        errors.into_result("invalid reservation update")?;

        Ok(ReservationEdit {
            seat_number,
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            emergency_contact_name: self.emergency_contact_name.trim().to_string(),
            emergency_contact_phone: self.emergency_contact_phone.trim().to_string(),
        })
    }

    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.seat_number == reservation.seat_number
            && self.email == reservation.email
            && self.phone_number == reservation.phone_number
            && self.emergency_contact_name == reservation.emergency_contact_name
            && self.emergency_contact_phone == reservation.emergency_contact_phone
    }

    pub fn apply(&self, reservation: &mut Reservation) {
        reservation.seat_number = self.seat_number.clone();
        reservation.email = self.email.clone();
        reservation.phone_number = self.phone_number.clone();
        reservation.emergency_contact_name = self.emergency_contact_name.clone();
        reservation.emergency_contact_phone = self.emergency_contact_phone.clone();
    }
}

fn check_contact(errors: &mut FieldErrors, email: &str, phone_number: &str) {
    if !validation::is_email(email.trim()) {
        errors.add("email", "email must be a valid address");
    }
    check_text(errors, "phone_number", phone_number);
}

// ============================================================================
// Payments
// ============================================================================

fn default_currency() -> Currency {
    Currency::USD
}

/// Body of `POST /create_payment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPayment {
    pub reservation_id: i64,
    pub payment_method: PaymentMethod,
    #[serde(default = "default_currency")]
    pub currency: Currency,
}

impl NewPayment {
    /// Returns the reservation id being paid for.
    pub fn validate(&self) -> CoreResult<u64> {
        let mut errors = FieldErrors::new();
        if self.reservation_id <= 0 {
            errors.add("reservation_id", "reservation_id must be a positive integer");
        }
        if !self.payment_method.accepted_at_checkout() {
            errors.add("payment_method", "payment_method must be Card, PayPal or Transfer");
        }
        if !matches!(self.currency, Currency::USD | Currency::CRC) {
            errors.add("currency", "currency must be USD or CRC");
        }
        errors.into_result("invalid payment")?;
        Ok(self.reservation_id as u64)
    }
}

/// Body of `PUT /edit_payment/{payment_id}`. At least one field is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentCorrection {
    pub payment_method: Option<PaymentMethod>,
    pub payment_date: Option<NaiveDateTime>,
    pub transaction_reference: Option<String>,
}

impl PaymentEdit {
    pub fn validate(&self) -> CoreResult<PaymentCorrection> {
        let mut errors = FieldErrors::new();

        if self.payment_method.is_none()
            && self.payment_date.is_none()
            && self.transaction_reference.is_none()
        {
            errors.add(
                "body",
                "provide at least one of payment_method, payment_date, transaction_reference",
            );
        }
        let payment_date = match &self.payment_date {
            Some(raw) => parse_timestamp(raw)
                .map_err(|e| errors.add("payment_date", e.to_string()))
                .ok(),
            None => None,
        };
        if let Some(reference) = &self.transaction_reference {
            check_text(&mut errors, "transaction_reference", reference);
        }
        errors.into_result("invalid payment update")?;

        Ok(PaymentCorrection {
            payment_method: self.payment_method,
            payment_date,
            transaction_reference: self
                .transaction_reference
                .as_ref()
                .map(|r| r.trim().to_string()),
        })
    }
}
