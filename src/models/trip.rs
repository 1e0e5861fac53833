use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::submitted;

pub const MAX_NAME_LEN: usize = 128;

/// Date submissions accept unpadded months and days, e.g. `2024-3-5`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub destination_id: String,
}

/// Raw form submission for both trip creation and trip updates. Every
/// field is optional at the transport layer; which ones are required is
/// decided per operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub destination_id: Option<String>,
}

/// A fully validated trip ready for insertion.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub destination_id: Uuid,
}

/// Validated per-field changes for a trip update. `None` means the
/// caller did not submit that field and the stored value stays.
#[derive(Debug, Clone, Default)]
pub struct TripChanges {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub destination_id: Option<Uuid>,
}

impl TripChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.destination_id.is_none()
    }
}

pub fn parse_uuid(raw: &str, label: &'static str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidId(label))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| AppError::InvalidDate)
}

fn check_name(name: &str) -> Result<(), AppError> {
    // Byte length, so multibyte characters count more than once.
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::NameTooLong);
    }
    Ok(())
}

impl NewTrip {
    /// Validates a creation submission. All fields except `id` are
    /// required and the checks always run in the same order: presence,
    /// name length, start date, end date, destination id, then the trip
    /// id itself. The first failure wins.
    pub fn from_form(form: &TripForm) -> Result<NewTrip, AppError> {
        let (Some(name), Some(start), Some(end), Some(destination)) = (
            submitted(&form.name),
            submitted(&form.start_date),
            submitted(&form.end_date),
            submitted(&form.destination_id),
        ) else {
            return Err(AppError::MissingFields);
        };
        check_name(name)?;
        let start_date = parse_date(start)?;
        let end_date = parse_date(end)?;
        let destination_id = parse_uuid(destination, "destination id")?;
        let id = match submitted(&form.id) {
            Some(raw) => parse_uuid(raw, "trip id")?,
            None => Uuid::new_v4(),
        };
        Ok(NewTrip {
            id,
            name: name.to_owned(),
            start_date,
            end_date,
            destination_id,
        })
    }
}

impl TripChanges {
    /// Validates an update submission. Fields are individually optional
    /// but whatever was submitted goes through the same checks, in the
    /// same order, as a creation.
    pub fn from_form(form: &TripForm) -> Result<TripChanges, AppError> {
        let mut changes = TripChanges::default();
        if let Some(name) = submitted(&form.name) {
            check_name(name)?;
            changes.name = Some(name.to_owned());
        }
        if let Some(start) = submitted(&form.start_date) {
            changes.start_date = Some(parse_date(start)?);
        }
        if let Some(end) = submitted(&form.end_date) {
            changes.end_date = Some(parse_date(end)?);
        }
        if let Some(destination) = submitted(&form.destination_id) {
            changes.destination_id = Some(parse_uuid(destination, "destination id")?);
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> TripForm {
        TripForm {
            id: None,
            name: Some("Summer in Lisbon".into()),
            start_date: Some("2024-7-1".into()),
            end_date: Some("2024-07-14".into()),
            destination_id: Some(Uuid::new_v4().to_string()),
        }
    }

    #[test]
    fn create_accepts_full_form() {
        let trip = NewTrip::from_form(&full_form()).unwrap();
        assert_eq!(trip.name, "Summer in Lisbon");
        assert_eq!(trip.start_date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(trip.end_date, NaiveDate::from_ymd_opt(2024, 7, 14).unwrap());
    }

    #[test]
    fn create_rejects_missing_field() {
        let mut form = full_form();
        form.end_date = None;
        assert!(matches!(
            NewTrip::from_form(&form),
            Err(AppError::MissingFields)
        ));
    }

    #[test]
    fn create_treats_empty_string_as_missing() {
        let mut form = full_form();
        form.destination_id = Some(String::new());
        assert!(matches!(
            NewTrip::from_form(&form),
            Err(AppError::MissingFields)
        ));
    }

    #[test]
    fn create_generates_id_when_omitted() {
        let a = NewTrip::from_form(&full_form()).unwrap();
        let b = NewTrip::from_form(&full_form()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn create_honours_submitted_id() {
        let id = Uuid::new_v4();
        let mut form = full_form();
        form.id = Some(id.to_string());
        let trip = NewTrip::from_form(&form).unwrap();
        assert_eq!(trip.id, id);
    }

    #[test]
    fn bad_submitted_id_is_rejected() {
        let mut form = full_form();
        form.id = Some("not-a-uuid".into());
        assert!(matches!(
            NewTrip::from_form(&form),
            Err(AppError::InvalidId("trip id"))
        ));
    }

    #[test]
    fn whitespace_is_not_empty() {
        let mut form = full_form();
        form.name = Some(" ".into());
        let trip = NewTrip::from_form(&form).unwrap();
        assert_eq!(trip.name, " ");
    }

    #[test]
    fn create_rejects_long_name() {
        let mut form = full_form();
        form.name = Some("x".repeat(MAX_NAME_LEN + 1));
        assert!(matches!(
            NewTrip::from_form(&form),
            Err(AppError::NameTooLong)
        ));
    }

    #[test]
    fn name_limit_counts_bytes_not_chars() {
        let mut form = full_form();
        // 43 three-byte characters: 43 chars but 129 bytes.
        form.name = Some("\u{20AC}".repeat(43));
        assert!(matches!(
            NewTrip::from_form(&form),
            Err(AppError::NameTooLong)
        ));
    }

    #[test]
    fn name_at_limit_passes() {
        let mut form = full_form();
        form.name = Some("x".repeat(MAX_NAME_LEN));
        assert!(NewTrip::from_form(&form).is_ok());
    }

    #[test]
    fn presence_check_runs_before_name_check() {
        let mut form = full_form();
        form.name = Some("x".repeat(MAX_NAME_LEN + 1));
        form.start_date = None;
        assert!(matches!(
            NewTrip::from_form(&form),
            Err(AppError::MissingFields)
        ));
    }

    #[test]
    fn start_date_checked_before_end_date() {
        let mut form = full_form();
        form.start_date = Some("not-a-date".into());
        form.end_date = Some("also-bad".into());
        assert!(matches!(NewTrip::from_form(&form), Err(AppError::InvalidDate)));
    }

    #[test]
    fn dates_checked_before_destination_id() {
        let mut form = full_form();
        form.end_date = Some("14-07-2024".into());
        form.destination_id = Some("not-a-uuid".into());
        assert!(matches!(NewTrip::from_form(&form), Err(AppError::InvalidDate)));
    }

    #[test]
    fn destination_id_checked_before_trip_id() {
        let mut form = full_form();
        form.destination_id = Some("not-a-uuid".into());
        form.id = Some("also-not-a-uuid".into());
        assert!(matches!(
            NewTrip::from_form(&form),
            Err(AppError::InvalidId("destination id"))
        ));
    }

    #[test]
    fn unpadded_dates_parse() {
        assert_eq!(
            parse_date("2024-3-5").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn impossible_date_rejected() {
        assert!(matches!(parse_date("2024-2-30"), Err(AppError::InvalidDate)));
    }

    #[test]
    fn update_with_no_fields_is_empty() {
        let changes = TripChanges::from_form(&TripForm::default()).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn update_keeps_unsubmitted_fields_out() {
        let form = TripForm {
            name: Some("Renamed".into()),
            ..TripForm::default()
        };
        let changes = TripChanges::from_form(&form).unwrap();
        assert_eq!(changes.name.as_deref(), Some("Renamed"));
        assert!(changes.start_date.is_none());
        assert!(changes.end_date.is_none());
        assert!(changes.destination_id.is_none());
    }

    #[test]
    fn update_empty_string_means_untouched() {
        let form = TripForm {
            name: Some(String::new()),
            start_date: Some("2025-1-1".into()),
            ..TripForm::default()
        };
        let changes = TripChanges::from_form(&form).unwrap();
        assert!(changes.name.is_none());
        assert!(changes.start_date.is_some());
    }

    #[test]
    fn update_validates_submitted_fields() {
        let form = TripForm {
            start_date: Some("2024/01/01".into()),
            ..TripForm::default()
        };
        assert!(matches!(
            TripChanges::from_form(&form),
            Err(AppError::InvalidDate)
        ));
    }

    #[test]
    fn update_validation_order_matches_create() {
        let form = TripForm {
            name: Some("y".repeat(MAX_NAME_LEN + 1)),
            start_date: Some("bogus".into()),
            ..TripForm::default()
        };
        assert!(matches!(
            TripChanges::from_form(&form),
            Err(AppError::NameTooLong)
        ));
    }
}
