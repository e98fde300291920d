//! Alert messages that are swapped into the page's alert container by htmx.

use maud::{Markup, html};

/// A success or error message with some details for the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The request worked.
    Success {
        /// The headline.
        message: String,
        /// Extra information about what happened.
        details: String,
    },
    /// The request failed.
    Error {
        /// The headline.
        message: String,
        /// What went wrong and how to fix it.
        details: String,
    },
}

impl Alert {
    /// Create a new success alert
    pub fn success(message: &str, details: &str) -> Self {
        Self::Success {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as an out-of-band swap for the `#alert-container` element.
    pub fn into_html(self) -> Markup {
        let (message, details, style) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "text-green-800 border-green-300 bg-green-50 dark:bg-gray-800 \
                dark:text-green-400 dark:border-green-800",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
                dark:text-red-400 dark:border-red-800",
            ),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    role="alert"
                    class={"p-4 mb-4 text-sm border rounded-lg " (style)}
                {
                    div class="flex items-center justify-between"
                    {
                        span class="font-semibold" { (message) }

                        button
                            type="button"
                            aria-label="Dismiss"
                            class="ms-3 font-bold"
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                        {
                            "×"
                        }
                    }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let html = Alert::error("Could not predict", "Try again later.")
            .into_html()
            .into_string();

        let fragment = Html::parse_fragment(&html);
        let alert = fragment
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("alert not found");
        let text = alert.text().collect::<String>();
        assert!(text.contains("Could not predict"));
        assert!(text.contains("Try again later."));
        assert!(
            alert.value().attr("class").unwrap().contains("text-red-800"),
            "error alerts should be red"
        );
    }

    #[test]
    fn alert_omits_empty_details() {
        let html = Alert::error("Something broke", "").into_html().into_string();

        let fragment = Html::parse_fragment(&html);
        let paragraphs = fragment.select(&Selector::parse("p").unwrap()).count();
        assert_eq!(paragraphs, 0);
    }
}
