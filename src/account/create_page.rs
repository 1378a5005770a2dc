//! Defines the page with the form for creating a new account.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
};

use super::core::AccountKind;

/// Render the page for creating a new account.
pub async fn get_create_account_page() -> Response {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
    let content = html!(
        (nav_bar)

        main class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Create Account" }

            form
                class="space-y-4 w-full"
                hx-post=(endpoints::ACCOUNTS_API)
                hx-target-error="#alert-container"
                hx-disabled-elt="find button[type='submit']"
            {
                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }
                    input
                        type="text"
                        name="name"
                        id="name"
                        class=(FORM_TEXT_INPUT_STYLE)
                        placeholder="e.g. Everyday Checking"
                        required;
                }

                div
                {
                    label for="kind" class=(FORM_LABEL_STYLE) { "Type" }
                    select name="kind" id="kind" class=(FORM_SELECT_STYLE) required
                    {
                        @for kind in AccountKind::all() {
                            option value=(kind.as_str()) { (kind.label()) }
                        }
                    }
                }

                div
                {
                    label for="balance" class=(FORM_LABEL_STYLE) { "Current balance" }
                    input
                        type="number"
                        name="balance"
                        id="balance"
                        class=(FORM_TEXT_INPUT_STYLE)
                        step="0.01"
                        value="0"
                        required;
                }

                div class="flex items-center gap-2"
                {
                    input
                        type="checkbox"
                        name="is_default"
                        id="is_default"
                        value="true"
                        class=(FORM_CHECKBOX_STYLE);
                    label for="is_default" class="text-sm font-medium"
                    {
                        "Make this the default account"
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE)
                {
                    (loading_spinner())
                    "Create Account"
                }
            }
        }
    );

    base("Create Account", &[], &content).into_response()
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::get_create_account_page;

    #[tokio::test]
    async fn page_has_the_account_form() {
        let response = get_create_account_page().await;

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = Html::parse_document(&String::from_utf8_lossy(&body));

        let name_selector = Selector::parse("input[name='name']").unwrap();
        assert!(html.select(&name_selector).next().is_some());

        let kind_selector = Selector::parse("select[name='kind'] option").unwrap();
        assert_eq!(html.select(&kind_selector).count(), 2);
    }
}
