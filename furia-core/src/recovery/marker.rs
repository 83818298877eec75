use crate::api::ApiResponse;

/// Answer of `auth/email/confirmed` meaning the reset link was clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationMarker {
    pub status: u16,
    /// Compared against the trimmed, lowercased server message
    pub message: &'static str,
}

pub const CONFIRMATION_MARKER: ConfirmationMarker = ConfirmationMarker {
    status: 200,
    message: "email activated.",
};

impl ConfirmationMarker {
    pub fn matches(&self, response: &ApiResponse) -> bool {
        response.status == self.status
            && response
                .message()
                .map(|m| m.trim().to_lowercase() == self.message)
                .unwrap_or(false)
    }
}
