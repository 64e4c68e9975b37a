//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the alert container at the bottom of every page,
//! either as the target of a failed htmx request or as an out-of-band swap
//! alongside a successful one.

use maud::{Markup, html};

use crate::html::ALERT_CONTAINER_ID;

/// A message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// The action succeeded.
    SuccessSimple { message: String },
    /// The action failed, with an explanation of how to fix it.
    Error { message: String, details: String },
    /// The action failed.
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::SuccessSimple { message } => (
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400",
                message,
                String::new(),
            ),
            Alert::Error { message, details } => (
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400",
                message,
                details,
            ),
            Alert::ErrorSimple { message } => (
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400",
                message,
                String::new(),
            ),
        };

        html! {
            div
                role="alert"
                class=(container_style)
                onclick="this.remove()"
            {
                p class="font-medium" { (message) }

                @if !details.is_empty() {
                    span class="block mt-1" { (details) }
                }
            }
        }
    }

    /// Render the alert so that htmx swaps it into the alert container, no
    /// matter which element the request targeted.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id=(ALERT_CONTAINER_ID) hx-swap-oob="innerHTML" { (self.into_html()) }
        }
    }
}
