//! Wire types for the Eventbrite v3 API.
//!
//! Only the fields this service reads or writes are modelled; everything
//! else in the payloads is ignored.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Currency, Money, Timestamp};
use crate::domain::publication::{EventSpec, MultipartText, TicketClassSpec};

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct CreateEventRequest<'a> {
    pub event: EventBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct EventBody<'a> {
    pub name: &'a MultipartText,
    pub description: &'a MultipartText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a str>,
    pub start: OutboundDateTime<'a>,
    pub end: OutboundDateTime<'a>,
    pub currency: &'a str,
    pub capacity: u16,
}

/// Eventbrite's `{timezone, utc}` pair. The API rejects fractional seconds.
#[derive(Debug, Serialize)]
pub struct OutboundDateTime<'a> {
    pub timezone: &'a str,
    pub utc: String,
}

impl<'a> CreateEventRequest<'a> {
    pub fn from_spec(spec: &'a EventSpec) -> Self {
        let at = |utc: Timestamp| OutboundDateTime {
            timezone: &spec.timezone,
            utc: utc.to_utc_seconds_string(),
        };
        Self {
            event: EventBody {
                name: &spec.name,
                description: &spec.description,
                summary: spec.summary.as_ref().map(|s| s.text.as_str()),
                start: at(spec.start),
                end: at(spec.end),
                currency: spec.currency.as_str(),
                capacity: spec.capacity,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateTicketClassRequest<'a> {
    pub ticket_class: TicketClassBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct TicketClassBody<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub quantity_total: u16,
    /// `CUR,minor` encoding, e.g. `USD,5000`.
    pub cost: String,
    pub donation: bool,
    pub free: bool,
    pub include_fee: bool,
}

impl<'a> CreateTicketClassRequest<'a> {
    pub fn from_spec(spec: &'a TicketClassSpec) -> Self {
        Self {
            ticket_class: TicketClassBody {
                name: &spec.name,
                description: &spec.description,
                quantity_total: spec.quantity_total,
                cost: spec.cost.to_gateway_string(),
                donation: spec.donation,
                free: spec.free,
                include_fee: spec.include_fee,
            },
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct DateTimeTz {
    #[serde(default)]
    pub timezone: Option<String>,
    pub utc: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct EbEvent {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub name: Option<EbMultipart>,
    #[serde(default)]
    pub description: Option<EbMultipart>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub start: Option<DateTimeTz>,
    #[serde(default)]
    pub end: Option<DateTimeTz>,
    #[serde(default)]
    pub ticket_classes: Vec<EbTicketClass>,
}

/// Multipart text where either part may be missing or null.
#[derive(Debug, Default, Deserialize)]
pub struct EbMultipart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

impl From<Option<EbMultipart>> for MultipartText {
    fn from(value: Option<EbMultipart>) -> Self {
        let value = value.unwrap_or_default();
        MultipartText {
            text: value.text.unwrap_or_default(),
            html: value.html.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EbTicketClass {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cost: Option<EbCost>,
    #[serde(default)]
    pub quantity_total: u32,
}

#[derive(Debug, Deserialize)]
pub struct EbCost {
    pub currency: String,
    /// Minor units.
    pub value: i64,
}

impl EbCost {
    pub fn to_money(&self) -> Option<Money> {
        let currency = Currency::new(&self.currency).ok()?;
        Money::new(self.value, currency).ok()
    }
}

#[derive(Debug, Deserialize)]
pub struct EbAttendeePage {
    #[serde(default)]
    pub attendees: Vec<EbAttendee>,
    #[serde(default)]
    pub pagination: Option<EbPagination>,
}

#[derive(Debug, Deserialize)]
pub struct EbPagination {
    #[serde(default)]
    pub has_more_items: bool,
    #[serde(default)]
    pub continuation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EbAttendee {
    pub id: String,
    #[serde(default)]
    pub profile: EbProfile,
    #[serde(default)]
    pub ticket_class_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub checked_in: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct EbProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Error body, e.g. `{"error": "VENUE_REQUIRED", "error_description": "..."}`.
#[derive(Debug, Deserialize)]
pub struct EbError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl EbError {
    /// Best human-readable message from an error body.
    pub fn describe(body: &str) -> String {
        match serde_json::from_str::<EbError>(body) {
            Ok(EbError {
                error: Some(code),
                error_description: Some(description),
            }) => format!("{}: {}", code, description),
            Ok(EbError {
                error_description: Some(description),
                ..
            }) => description,
            Ok(EbError {
                error: Some(code), ..
            }) => code,
            _ if body.trim().is_empty() => "empty response body".to_string(),
            _ => body.chars().take(200).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{CourseDetails, EnrollmentBounds, MaterialCostCollection};
    use serde_json::json;

    #[test]
    fn event_request_uses_timezone_and_utc_pairs() {
        let start: Timestamp = serde_json::from_value(json!("2025-06-02T18:00:00.250Z")).unwrap();
        let spec = EventSpec {
            name: MultipartText::plain("Forge"),
            description: MultipartText::from_markdown("**Hot**"),
            summary: Some(MultipartText::from_markdown("Hit *metal*.")),
            start,
            end: start.add_hours(3),
            timezone: "America/Chicago".to_string(),
            capacity: 12,
            currency: Currency::usd(),
            idempotency_key: "k".to_string(),
        };

        let body = serde_json::to_value(CreateEventRequest::from_spec(&spec)).unwrap();

        assert_eq!(body["event"]["start"]["timezone"], "America/Chicago");
        assert_eq!(body["event"]["start"]["utc"], "2025-06-02T18:00:00Z");
        assert_eq!(body["event"]["end"]["utc"], "2025-06-02T21:00:00Z");
        assert!(body["event"].get("idempotency_key").is_none());
        assert_eq!(body["event"]["name"]["text"], "Forge");
        assert_eq!(body["event"]["description"]["html"], "<p><strong>Hot</strong></p>\n");
        assert_eq!(body["event"]["currency"], "USD");
        assert_eq!(body["event"]["capacity"], 12);
        assert_eq!(body["event"]["summary"], "Hit *metal*.");
    }

    #[test]
    fn ticket_class_request_matches_gateway_shape() {
        let details = CourseDetails::new(
            "Forge",
            "Hot.",
            EnrollmentBounds::new(2, 20).unwrap(),
            Money::new(5000, Currency::usd()).unwrap(),
        )
        .unwrap()
        .with_material_cost(Money::zero(Currency::usd()), MaterialCostCollection::Ticket);
        let spec = TicketClassSpec::general_admission(&details);

        let body = serde_json::to_value(CreateTicketClassRequest::from_spec(&spec)).unwrap();

        assert_eq!(
            body,
            json!({
                "ticket_class": {
                    "name": "General Admission + Materials",
                    "description": "",
                    "quantity_total": 20,
                    "cost": "USD,5000",
                    "donation": false,
                    "free": false,
                    "include_fee": false
                }
            })
        );
    }

    #[test]
    fn event_response_tolerates_missing_fields() {
        let event: EbEvent = serde_json::from_value(json!({
            "id": "771",
            "name": {"text": "Forge", "html": "Forge"},
            "description": {"text": null, "html": null},
            "ticket_classes": [
                {"id": "t1", "name": "GA", "cost": {"currency": "USD", "value": 4500, "display": "$45.00"}, "quantity_total": 10},
                {"id": "t2", "name": "Free", "cost": null}
            ]
        }))
        .unwrap();

        assert_eq!(MultipartText::from(event.name).text, "Forge");
        assert_eq!(MultipartText::from(event.description).text, "");
        assert_eq!(
            event.ticket_classes[0].cost.as_ref().and_then(EbCost::to_money),
            Some(Money::new(4500, Currency::usd()).unwrap())
        );
        assert!(event.ticket_classes[1].cost.is_none());
    }

    #[test]
    fn error_body_is_summarised() {
        assert_eq!(
            EbError::describe(r#"{"error":"VENUE_REQUIRED","error_description":"Add a venue"}"#),
            "VENUE_REQUIRED: Add a venue"
        );
        assert_eq!(EbError::describe(""), "empty response body");
        assert_eq!(EbError::describe("<html>oops</html>"), "<html>oops</html>");
    }
}
