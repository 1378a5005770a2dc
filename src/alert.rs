//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are rendered into the page shell's `#alert-container`, either as the
//! direct response to an htmx request (via `hx-target-*` on the triggering
//! element) or appended to a partial as an out-of-band swap.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

const SUCCESS_BOX_STYLE: &str = "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg border \
    text-green-800 border-green-300 bg-green-50 \
    dark:bg-gray-800 dark:text-green-400 dark:border-green-800";

const ERROR_BOX_STYLE: &str = "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg border \
    text-red-800 border-red-300 bg-red-50 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

/// A success or error message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// The operation succeeded.
    Success {
        /// A short headline, e.g. "Transactions deleted".
        message: String,
        /// Extra detail shown under the headline.
        details: String,
    },
    /// The operation failed.
    Error {
        /// A short headline, e.g. "Could not delete transaction".
        message: String,
        /// What the user can do about it.
        details: String,
    },
}

impl Alert {
    /// Create a new success alert.
    pub fn success(message: &str, details: &str) -> Self {
        Self::Success {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert box itself.
    pub fn markup(&self) -> Markup {
        let (style, role, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_BOX_STYLE, "status", message, details),
            Alert::Error { message, details } => (ERROR_BOX_STYLE, "alert", message, details),
        };

        html!(
            div class=(style) role=(role)
            {
                div
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto font-bold cursor-pointer"
                    aria-label="Dismiss"
                    onclick="this.closest('[role]').remove()"
                {
                    "✕"
                }
            }
        )
    }

    /// Render the alert wrapped for an htmx out-of-band swap into the page
    /// shell's alert container.
    ///
    /// Append this to a partial response so the alert shows up alongside the
    /// swapped content.
    pub fn oob_markup(&self) -> Markup {
        html!(
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                (self.markup())
            }
        )
    }

    /// Convert the alert into a response with the given status code.
    ///
    /// The body is the bare alert box; the triggering element is expected to
    /// direct it into `#alert-container` with `hx-target-*` attributes.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.markup()).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}

#[cfg(test)]
mod tests {
    use super::Alert;

    #[test]
    fn success_alert_contains_message_and_details() {
        let markup = Alert::success("It worked", "All done.").markup();

        let html = markup.into_string();
        assert!(html.contains("It worked"));
        assert!(html.contains("All done."));
        assert!(html.contains("role=\"status\""));
    }

    #[test]
    fn error_alert_uses_alert_role() {
        let markup = Alert::error("It broke", "Try again.").markup();

        assert!(markup.into_string().contains("role=\"alert\""));
    }

    #[test]
    fn oob_markup_targets_alert_container() {
        let markup = Alert::success("It worked", "").oob_markup();

        let html = markup.into_string();
        assert!(html.contains("id=\"alert-container\""));
        assert!(html.contains("hx-swap-oob"));
    }
}
