//! Canned bot lines for each step of the guide flow.

/// Static greeting appended when a session is created.
pub const GREETING: &str =
    "Hello! I'm your historical monument guide. Where are you traveling?";

/// Re-prompt when no location could be extracted.
pub const LOCATION_RETRY: &str =
    "I couldn't detect a location. Can you mention it explicitly?";

/// Confirmation once a location is stored, asking for the email next.
pub fn location_confirmed(location: &str) -> String {
    format!("Got it! You are interested in {location}. Can I have your email for verification?")
}

/// Re-prompt when the input doesn't look like an email address.
pub const EMAIL_RETRY: &str = "Please enter a valid email address.";

/// Code delivered; asking the user to type it back.
pub const OTP_SENT: &str = "OTP sent to your email. Please enter the OTP.";

/// Transport delivery failed.
pub const OTP_SEND_FAILED: &str = "Failed to send OTP. Try again.";

/// Code mismatch or no code on record.
pub const OTP_INVALID: &str = "Invalid OTP. Try again.";

/// Verification succeeded; the monument info follows in the same reply.
pub const OTP_VERIFIED: &str =
    "OTP verified successfully! Fetching historical information...";

/// Generation backend unavailable; the next message retries the fetch.
pub const INFO_UNAVAILABLE: &str =
    "Sorry, I couldn't fetch historical information right now. Try again.";

/// Closing line once the info has been delivered.
pub const SESSION_COMPLETE: &str =
    "Hope that helps! Start a new session to plan another trip.";
