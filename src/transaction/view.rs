//! HTML rendering for the transaction table.
//!
//! The table is rendered as one self-contained section (`#transaction-table`)
//! that every control swaps wholesale via htmx: filter inputs submit the
//! filter form, while sort headers, pagination, and the selection checkboxes
//! carry prebuilt URLs that encode the next view state.

use maud::{Markup, html};
use time::{format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints,
    html::{
        BUTTON_DANGER_STYLE, BUTTON_DELETE_LINK_STYLE, CATEGORY_BADGE_STYLE, FORM_CHECKBOX_STYLE,
        FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, ONE_TIME_BADGE_STYLE,
        RECURRING_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency, loading_spinner,
    },
    pagination::{PaginationIndicator, create_pagination_indicators},
    transaction::models::TransactionKind,
};

use super::{
    categories::{category_color, category_label},
    models::Transaction,
    table::{RecurringFilter, Selection, SortDirection, SortField, TableOptions, TableView},
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none], [year]");

fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => "text-red-700 dark:text-red-300",
        TransactionKind::Income => "text-green-700 dark:text-green-300",
    }
}

fn format_date(date: time::Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

fn truncate_description(description: &str) -> String {
    let graphemes: Vec<&str> = description.graphemes(true).collect();

    if graphemes.len() <= MAX_DESCRIPTION_GRAPHEMES {
        description.to_owned()
    } else {
        format!("{}…", graphemes[..MAX_DESCRIPTION_GRAPHEMES].concat())
    }
}

/// Render the table section for the given view state.
///
/// `route` is the page the table lives on (the transactions page or an
/// account page); every control's URL is built against it so partial swaps
/// land back on the right handler.
pub(crate) fn transaction_table(
    route: &str,
    options: &TableOptions,
    view: &TableView,
) -> Markup {
    html!(
        section id="transaction-table" class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden lg:max-w-5xl lg:w-full lg:mx-auto"
        {
            (filter_bar(route, options))

            div class="overflow-x-auto"
            {
                table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    (table_head(route, options, view))

                    tbody
                    {
                        @if view.rows.is_empty() {
                            tr
                            {
                                td
                                    colspan="7"
                                    data-empty-state="true"
                                    class="px-6 py-4 text-center"
                                {
                                    "No transactions found"
                                }
                            }
                        } @else {
                            @for transaction in &view.rows {
                                (transaction_row(route, options, transaction))
                            }
                        }
                    }
                }
            }

            (table_footer(route, options, view))
        }
    )
}

fn filter_bar(route: &str, options: &TableOptions) -> Markup {
    // The form deliberately has no page field: submitting any filter change
    // lands back on page 1.
    html!(
        form id="transaction-filters" class="flex flex-wrap items-end gap-2 px-4 py-3"
        {
            input type="hidden" name="sort" value=(options.sort.field.as_str());
            input type="hidden" name="dir" value=(options.sort.direction.as_str());

            @if let Some(account_id) = options.account_id {
                input type="hidden" name="account_id" value=(account_id);
            }

            @for id in options.selected.ids() {
                input type="hidden" name="selected" value=(id);
            }

            input
                type="search"
                name="search"
                value=(options.search)
                placeholder="Search descriptions..."
                aria-label="Search descriptions"
                class={"flex-1 min-w-48 " (FORM_TEXT_INPUT_STYLE)}
                hx-get=(route)
                hx-include="#transaction-filters"
                hx-target="#transaction-table"
                hx-swap="outerHTML"
                hx-trigger="keyup changed delay:300ms, search";

            select
                name="kind"
                aria-label="Filter by type"
                class=(FORM_SELECT_STYLE)
                hx-get=(route)
                hx-include="#transaction-filters"
                hx-target="#transaction-table"
                hx-swap="outerHTML"
                hx-trigger="change"
            {
                option value="" selected[options.kind.is_none()] { "All Types" }
                option
                    value=(TransactionKind::Income.as_str())
                    selected[options.kind == Some(TransactionKind::Income)]
                {
                    "Income"
                }
                option
                    value=(TransactionKind::Expense.as_str())
                    selected[options.kind == Some(TransactionKind::Expense)]
                {
                    "Expense"
                }
            }

            select
                name="recurring"
                aria-label="Filter by recurrence"
                class=(FORM_SELECT_STYLE)
                hx-get=(route)
                hx-include="#transaction-filters"
                hx-target="#transaction-table"
                hx-swap="outerHTML"
                hx-trigger="change"
            {
                option value="" selected[options.recurring.is_none()] { "All Transactions" }
                option
                    value="recurring"
                    selected[options.recurring == Some(RecurringFilter::Recurring)]
                {
                    "Recurring Only"
                }
                option
                    value="non-recurring"
                    selected[options.recurring == Some(RecurringFilter::NonRecurring)]
                {
                    "Non-recurring Only"
                }
            }

            @if !options.selected.is_empty() {
                button
                    type="button"
                    data-bulk-delete="true"
                    class=(BUTTON_DANGER_STYLE)
                    hx-post=(endpoints::BULK_DELETE_TRANSACTIONS)
                    hx-include="#transaction-filters"
                    hx-target="#transaction-table"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    hx-disabled-elt="this"
                    hx-confirm={"Delete " (options.selected.len()) " selected transaction(s)? This cannot be undone."}
                {
                    (loading_spinner())
                    "Delete Selected (" (options.selected.len()) ")"
                }
            }

            @if options.has_filters() {
                a
                    href="#"
                    class=(LINK_STYLE)
                    hx-get=(options.clone().cleared().to_url(route))
                    hx-target="#transaction-table"
                    hx-swap="outerHTML"
                {
                    "Clear Filters"
                }
            }
        }
    )
}

fn sortable_header(
    route: &str,
    options: &TableOptions,
    field: SortField,
    label: &str,
) -> Markup {
    let target = options.clone().toggle_sort(field);
    let is_active = options.sort.field == field;
    let arrow = match (is_active, options.sort.direction) {
        (false, _) => "",
        (true, SortDirection::Asc) => " ▲",
        (true, SortDirection::Desc) => " ▼",
    };

    html!(
        a
            href="#"
            class="cursor-pointer select-none"
            data-sort-field=(field.as_str())
            hx-get=(target.to_url(route))
            hx-target="#transaction-table"
            hx-swap="outerHTML"
        {
            (label) (arrow)
        }
    )
}

fn table_head(route: &str, options: &TableOptions, view: &TableView) -> Markup {
    let all_selected = view.all_visible_selected(&options.selected);
    let select_all_target = if all_selected {
        options.clone().with_selection(Selection::default())
    } else {
        options
            .clone()
            .with_selection(Selection::select_page(&view.visible_ids()))
    };

    html!(
        thead class=(TABLE_HEADER_STYLE)
        {
            tr
            {
                th scope="col" class="px-4 py-3 w-4"
                {
                    input
                        type="checkbox"
                        aria-label="Select all rows on this page"
                        class=(FORM_CHECKBOX_STYLE)
                        checked[all_selected]
                        disabled[view.rows.is_empty()]
                        hx-get=(select_all_target.to_url(route))
                        hx-target="#transaction-table"
                        hx-swap="outerHTML";
                }
                th scope="col" class=(TABLE_CELL_STYLE)
                {
                    (sortable_header(route, options, SortField::Date, "Date"))
                }
                th scope="col" class=(TABLE_CELL_STYLE)
                {
                    "Description"
                }
                th scope="col" class=(TABLE_CELL_STYLE)
                {
                    (sortable_header(route, options, SortField::Category, "Category"))
                }
                th scope="col" class="px-6 py-3 text-right"
                {
                    (sortable_header(route, options, SortField::Amount, "Amount"))
                }
                th scope="col" class=(TABLE_CELL_STYLE)
                {
                    "Recurring"
                }
                th scope="col" class=(TABLE_CELL_STYLE)
                {
                    span class="sr-only" { "Actions" }
                }
            }
        }
    )
}

fn transaction_row(route: &str, options: &TableOptions, transaction: &Transaction) -> Markup {
    let toggle_target = options
        .clone()
        .with_selection(options.selected.toggle(transaction.id));
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = format!(
        "{}?{}",
        endpoints::format_endpoint(endpoints::TRANSACTION, transaction.id),
        options.to_query_string()
    );
    let sign = match transaction.kind {
        TransactionKind::Expense => "-",
        TransactionKind::Income => "+",
    };

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class="px-4 py-4 w-4"
            {
                input
                    type="checkbox"
                    aria-label="Select row"
                    class=(FORM_CHECKBOX_STYLE)
                    checked[options.selected.contains(transaction.id)]
                    hx-get=(toggle_target.to_url(route))
                    hx-target="#transaction-table"
                    hx-swap="outerHTML";
            }

            td class=(TABLE_CELL_STYLE)
            {
                (format_date(transaction.date))
            }

            td class=(TABLE_CELL_STYLE)
            {
                (truncate_description(&transaction.description))
            }

            td class=(TABLE_CELL_STYLE)
            {
                span
                    class=(CATEGORY_BADGE_STYLE)
                    style={"background-color: " (category_color(&transaction.category))}
                {
                    (category_label(&transaction.category))
                }
            }

            td class={"px-6 py-4 text-right font-medium " (amount_class(transaction.kind))}
            {
                (sign) (format_currency(transaction.amount))
            }

            td class=(TABLE_CELL_STYLE)
            {
                @if transaction.is_recurring {
                    span
                        class=(RECURRING_BADGE_STYLE)
                        title=[transaction
                            .next_recurring_date
                            .map(|date| format!("Next date: {}", format_date(date)))]
                    {
                        @if let Some(interval) = transaction.recurring_interval {
                            (interval.label())
                        } @else {
                            "Recurring"
                        }
                    }
                } @else {
                    span class=(ONE_TIME_BADGE_STYLE) { "One-time" }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-3"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        class=(BUTTON_DELETE_LINK_STYLE)
                        hx-delete=(delete_url)
                        hx-target="#transaction-table"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        hx-disabled-elt="this"
                        hx-confirm="Delete this transaction? This cannot be undone."
                    {
                        "Delete"
                    }
                }
            }
        }
    )
}

fn table_footer(route: &str, options: &TableOptions, view: &TableView) -> Markup {
    let indicators = create_pagination_indicators(view.page, view.page_count, 5);
    let page_link_style = "px-3 py-1 rounded hover:bg-gray-200 dark:hover:bg-gray-700";

    html!(
        nav class="flex flex-wrap items-center justify-between gap-2 px-4 py-3" aria-label="Pagination"
        {
            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                "Page " (view.page) " of " (view.page_count)
                " (" (view.filtered_count) " transactions)"
            }

            ul class="pagination flex items-center gap-1 text-sm"
            {
                @for indicator in &indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::BackButton(page) => {
                                a
                                    href="#"
                                    class=(page_link_style)
                                    aria-label="Previous page"
                                    hx-get=(options.clone().with_page(*page).to_url(route))
                                    hx-target="#transaction-table"
                                    hx-swap="outerHTML"
                                {
                                    "‹"
                                }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a
                                    href="#"
                                    class=(page_link_style)
                                    aria-label="Next page"
                                    hx-get=(options.clone().with_page(*page).to_url(route))
                                    hx-target="#transaction-table"
                                    hx-swap="outerHTML"
                                {
                                    "›"
                                }
                            }
                            PaginationIndicator::Page(page) => {
                                a
                                    href="#"
                                    class=(page_link_style)
                                    hx-get=(options.clone().with_page(*page).to_url(route))
                                    hx-target="#transaction-table"
                                    hx-swap="outerHTML"
                                {
                                    (page)
                                }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span
                                    class="px-3 py-1 rounded bg-blue-600 text-white"
                                    aria-current="page"
                                {
                                    (page)
                                }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="px-2" { "…" }
                            }
                        }
                    }
                }
            }
        }
    )
}
