//! Error alerts that are swapped into the page's alert container by htmx.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// An error message shown on top of the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    message: String,
    details: String,
}

impl Alert {
    /// Create an error alert with a short `message` and longer `details`.
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    pub fn into_html(self) -> Markup {
        html! {
            div
                id="alert"
                role="alert"
                class="flex items-start gap-3 p-4 mb-4 text-red-800 border
                    border-red-300 rounded-lg bg-red-50 dark:bg-gray-800
                    dark:text-red-400 dark:border-red-800 shadow-lg"
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty()
                    {
                        p class="text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="text-red-500 hover:text-red-700 dark:hover:text-red-300"
                    onclick="this.closest('#alert').remove()"
                {
                    "✕"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::{Html, Selector};

    use crate::test_utils::{assert_content_type, assert_valid_html, parse_html_fragment};

    use super::Alert;

    #[test]
    fn renders_message_and_details() {
        let html = Html::parse_fragment(
            &Alert::error("Error fetching data", "Check the logs.")
                .into_html()
                .into_string(),
        );

        let paragraphs: Vec<String> = html
            .select(&Selector::parse("#alert p").unwrap())
            .map(|p| p.text().collect())
            .collect();
        assert_eq!(paragraphs, ["Error fetching data", "Check the logs."]);
    }

    #[test]
    fn omits_empty_details() {
        let html = Html::parse_fragment(&Alert::error("Oops", "").into_html().into_string());

        let paragraph_count = html.select(&Selector::parse("#alert p").unwrap()).count();
        assert_eq!(paragraph_count, 1);
    }

    #[tokio::test]
    async fn response_is_html_fragment() {
        let response = Alert::error("Error fetching data", "").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert!(html.select(&Selector::parse("#alert").unwrap()).next().is_some());
    }
}
