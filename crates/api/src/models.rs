use crate::error::ApiError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use services::subscription::{NewSubscription, Subscription, SubscriptionPatch};
use utoipa::ToSchema;
use uuid::Uuid;

/// Parse a `"MM-YYYY"` month string into a date anchored to the first day of
/// that month, naming the offending field on failure.
pub fn parse_month(field: &'static str, raw: &str) -> Result<NaiveDate, ApiError> {
    let invalid = || {
        ApiError::bad_request(format!(
            "Invalid {}: expected MM-YYYY format, got '{}'",
            field, raw
        ))
    };

    let (month_part, year_part) = raw.split_once('-').ok_or_else(invalid)?;
    if month_part.len() != 2 || year_part.len() != 4 {
        return Err(invalid());
    }
    // Integer parsing accepts sign characters, so require bare digits
    if !month_part.chars().all(|c| c.is_ascii_digit())
        || !year_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    let month: u32 = month_part.parse().map_err(|_| invalid())?;
    let year: i32 = year_part.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// Render a first-of-month date back to the `"MM-YYYY"` wire format
pub fn format_month(date: NaiveDate) -> String {
    format!("{:02}-{:04}", date.month(), date.year())
}

pub fn parse_user_id(field: &'static str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| {
        ApiError::bad_request(format!("Invalid {}: not a valid UUID ({})", field, e))
    })
}

/// Subscription wire representation. Dates are `"MM-YYYY"` strings; an empty
/// `end_date` means the subscription is open-ended.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub user_id: String,
    pub service_name: String,
    pub price: i64,
    pub start_date: String,
    pub end_date: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id,
            user_id: sub.user_id.to_string(),
            service_name: sub.service_name,
            price: sub.price,
            start_date: format_month(sub.start_date),
            end_date: sub.end_date.map(format_month).unwrap_or_default(),
        }
    }
}

/// Request to create a new subscription
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    /// Subscribing user id (UUID)
    pub user_id: String,
    /// Name of the subscribed service
    pub service_name: String,
    /// Monthly cost in whole cost units; must be non-negative
    pub price: i64,
    /// Start month in MM-YYYY format
    pub start_date: String,
    /// End month in MM-YYYY format; empty or absent = open-ended
    #[serde(default)]
    pub end_date: String,
}

impl CreateSubscriptionRequest {
    pub fn into_domain(self) -> Result<NewSubscription, ApiError> {
        let user_id = parse_user_id("user_id", &self.user_id)?;
        let start_date = parse_month("start_date", &self.start_date)?;
        let end_date = if self.end_date.is_empty() {
            None
        } else {
            Some(parse_month("end_date", &self.end_date)?)
        };

        Ok(NewSubscription {
            user_id,
            service_name: self.service_name,
            price: self.price,
            start_date,
            end_date,
        })
    }
}

/// Request to partially update a subscription. Absent fields (and empty
/// strings, for compatibility with the wire format) leave the stored value
/// unchanged; supplied fields overwrite it, including `price: 0`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateSubscriptionRequest {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub price: Option<i64>,
    /// Start month in MM-YYYY format
    pub start_date: Option<String>,
    /// End month in MM-YYYY format
    pub end_date: Option<String>,
}

impl UpdateSubscriptionRequest {
    pub fn into_patch(self) -> Result<SubscriptionPatch, ApiError> {
        let present = |value: Option<String>| value.filter(|s| !s.is_empty());

        let user_id = present(self.user_id)
            .map(|raw| parse_user_id("user_id", &raw))
            .transpose()?;
        let start_date = present(self.start_date)
            .map(|raw| parse_month("start_date", &raw))
            .transpose()?;
        let end_date = present(self.end_date)
            .map(|raw| parse_month("end_date", &raw))
            .transpose()?;

        Ok(SubscriptionPatch {
            user_id,
            service_name: present(self.service_name),
            price: self.price,
            start_date,
            end_date,
        })
    }
}

/// Response containing the id assigned to a created subscription
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionIdResponse {
    pub id: i64,
}

/// Response containing the aggregated cost
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AggregateResponse {
    /// Total price of all subscriptions matching the filter
    pub sum: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_valid() {
        let date = parse_month("start_date", "07-2025").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    }

    #[test]
    fn test_parse_month_anchors_to_first_day() {
        let date = parse_month("start_date", "12-2024").unwrap();
        assert_eq!(date.day(), 1);
    }

    #[test]
    fn test_parse_month_rejects_day_format() {
        let err = parse_month("start_date", "2025-07-01").unwrap_err();
        assert!(err.response.message.contains("start_date"));
        assert!(err.response.message.contains("MM-YYYY"));
    }

    #[test]
    fn test_parse_month_rejects_out_of_range_month() {
        assert!(parse_month("end_date", "13-2025").is_err());
        assert!(parse_month("end_date", "00-2025").is_err());
    }

    #[test]
    fn test_parse_month_rejects_signed_year() {
        // A leading '-' in the year would otherwise read as a negative year
        let err = parse_month("start_date", "07--999").unwrap_err();
        assert!(err.response.message.contains("start_date"));
        assert!(parse_month("start_date", "07-+999").is_err());
    }

    #[test]
    fn test_parse_month_rejects_garbage() {
        assert!(parse_month("start_date", "july").is_err());
        assert!(parse_month("start_date", "").is_err());
    }

    #[test]
    fn test_format_month_round_trip() {
        let date = parse_month("start_date", "01-2024").unwrap();
        assert_eq!(format_month(date), "01-2024");
    }

    #[test]
    fn test_parse_user_id_names_field() {
        let err = parse_user_id("user_id", "not-a-uuid").unwrap_err();
        assert!(err.response.message.contains("user_id"));
    }

    #[test]
    fn test_create_request_rejects_bad_end_date() {
        let req = CreateSubscriptionRequest {
            user_id: Uuid::new_v4().to_string(),
            service_name: "Netflix".to_string(),
            price: 400,
            start_date: "07-2025".to_string(),
            end_date: "soon".to_string(),
        };
        let err = req.into_domain().unwrap_err();
        assert!(err.response.message.contains("end_date"));
    }

    #[test]
    fn test_create_request_empty_end_date_is_open_ended() {
        let req = CreateSubscriptionRequest {
            user_id: Uuid::new_v4().to_string(),
            service_name: "Netflix".to_string(),
            price: 400,
            start_date: "07-2025".to_string(),
            end_date: String::new(),
        };
        assert_eq!(req.into_domain().unwrap().end_date, None);
    }

    #[test]
    fn test_update_request_empty_strings_are_absent() {
        let req = UpdateSubscriptionRequest {
            user_id: Some(String::new()),
            service_name: Some(String::new()),
            price: None,
            start_date: Some(String::new()),
            end_date: None,
        };
        let patch = req.into_patch().unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_update_request_keeps_zero_price() {
        let req = UpdateSubscriptionRequest {
            price: Some(0),
            ..Default::default()
        };
        let patch = req.into_patch().unwrap();
        assert_eq!(patch.price, Some(0));
    }
}
