use reqwest::Url;

/// Query keys the payment provider appends when it sends the browser back.
pub const REDIRECT_MARKERS: [&str; 3] = ["success", "canceled", "session_id"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded,
    Canceled,
}

impl PaymentOutcome {
    /// Reads the outcome left in the query string by the checkout redirect.
    pub fn from_url(url: &Url) -> Option<Self> {
        let is_set = |marker: &str| {
            url.query_pairs()
                .any(|(key, value)| key == marker && value == "true")
        };

        if is_set("success") {
            Some(PaymentOutcome::Succeeded)
        } else if is_set("canceled") {
            Some(PaymentOutcome::Canceled)
        } else {
            None
        }
    }
}

/// The same URL without the redirect markers; other query parameters and the fragment stay.
pub fn strip_markers(url: &Url) -> Url {
    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !REDIRECT_MARKERS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut stripped = url.clone();
    if remaining.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(remaining);
    }
    stripped
}
