//! Request and response bodies of the `web` module, and the parsing that validates them.
//! The validated types are the only way for data to reach an upstream provider.

use serde::{Deserialize, Serialize};

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable checkout request. Every field is optional here so that a missing field is a
/// validation error with a specific message rather than a deserialization failure.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeserCheckout {
    pub email: Option<String>,
    pub price_id: Option<String>,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
}

/// Validated checkout request
#[derive(Debug, Clone)]
pub struct ValidCheckout {
    pub email: ValidEmail,
    pub price_id: PriceId,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
}

impl TryFrom<DeserCheckout> for ValidCheckout {
    type Error = DataParsingError;

    fn try_from(deser: DeserCheckout) -> Result<Self, Self::Error> {
        // The email is checked first so its message wins when both fields are bad.
        let email = ValidEmail::parse_opt(deser.email)?;
        let price_id = PriceId::parse_opt(deser.price_id)?;

        Ok(ValidCheckout {
            email,
            price_id,
            product_name: deser.product_name.filter(|s| !s.is_empty()),
            product_description: deser.product_description.filter(|s| !s.is_empty()),
        })
    }
}

/// Deserializable subscribe request
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeserSubscribe {
    pub email: Option<String>,
    pub use_case: Option<String>,
}

/// Validated subscribe request
#[derive(Debug, Clone)]
pub struct ValidSubscribe {
    pub email: ValidEmail,
    pub use_case: Option<String>,
}

impl TryFrom<DeserSubscribe> for ValidSubscribe {
    type Error = DataParsingError;

    fn try_from(deser: DeserSubscribe) -> Result<Self, Self::Error> {
        Ok(ValidSubscribe {
            email: ValidEmail::parse_opt(deser.email)?,
            use_case: deser.use_case.filter(|s| !s.is_empty()),
        })
    }
}

/// An email address that contains an `@`.
///
/// This is deliberately the weakest check that still catches typos in the input field: the
/// upstream providers do their own validation and report it back as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ValidEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.contains('@') {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }

    fn parse_opt(value: Option<String>) -> Result<Self, DataParsingError> {
        value
            .ok_or(DataParsingError::EmailInvalid)
            .and_then(Self::parse)
    }
}

/// A non-empty identifier of a price at the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceId(String);

impl AsRef<str> for PriceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PriceId {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();
        if value.is_empty() {
            return Err(DataParsingError::PriceIdMissing);
        }

        Ok(PriceId(value.to_owned()))
    }

    fn parse_opt(value: Option<String>) -> Result<Self, DataParsingError> {
        value
            .ok_or(DataParsingError::PriceIdMissing)
            .and_then(Self::parse)
    }
}

/// Successful checkout response: the id of the session the browser gets redirected to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutCreated {
    pub id: String,
}

/// Successful subscribe response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscribed {
    pub success: bool,
    pub message: String,
}

impl Subscribed {
    pub fn ok() -> Self {
        Subscribed {
            success: true,
            message: "Subscribed successfully".to_string(),
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
/// The `Display` output of these errors is shown to the client as-is.
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("Valid email is required")]
    EmailInvalid,
    #[error("Price ID is required")]
    PriceIdMissing,
}
