//! The shared form used by the create and edit transaction pages.

use maud::{Markup, html};
use time::Date;

use crate::{
    account::Account,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
};

use super::{
    categories::CATEGORIES,
    models::{RecurringInterval, Transaction, TransactionId, TransactionKind},
};

/// Whether the form creates a new transaction or updates an existing one.
pub(crate) enum FormAction {
    /// POST to the transactions collection.
    Create,
    /// PUT to the transaction with this ID.
    Edit(TransactionId),
}

/// Render the transaction form.
///
/// `prefill` populates the fields when editing; `default_date` is used for
/// new transactions so the date field starts on today.
pub(crate) fn transaction_form(
    accounts: &[Account],
    prefill: Option<&Transaction>,
    default_date: Date,
    action: FormAction,
) -> Markup {
    let (submit_label, method_attr_url) = match &action {
        FormAction::Create => ("Create Transaction", None),
        FormAction::Edit(id) => (
            "Save Changes",
            Some(endpoints::format_endpoint(endpoints::TRANSACTION, *id)),
        ),
    };
    let kind = prefill.map(|t| t.kind).unwrap_or(TransactionKind::Expense);
    let date = prefill.map(|t| t.date).unwrap_or(default_date);
    let is_recurring = prefill.is_some_and(|t| t.is_recurring);

    html!(
        form
            class="space-y-4 w-full"
            hx-post=[matches!(action, FormAction::Create).then_some(endpoints::TRANSACTIONS_API)]
            hx-put=[method_attr_url]
            hx-target-error="#alert-container"
            hx-disabled-elt="find button[type='submit']"
        {
            fieldset class="flex gap-4"
            {
                legend class=(FORM_LABEL_STYLE) { "Type" }

                @for option in [TransactionKind::Expense, TransactionKind::Income] {
                    label class="flex items-center gap-2"
                    {
                        input
                            type="radio"
                            name="kind"
                            value=(option.as_str())
                            checked[kind == option]
                            required;
                        (option.label())
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    type="number"
                    name="amount"
                    id="amount"
                    class=(FORM_TEXT_INPUT_STYLE)
                    min="0"
                    step="0.01"
                    value=[prefill.map(|t| t.amount)]
                    required;
            }

            div
            {
                label for="account_id" class=(FORM_LABEL_STYLE) { "Account" }
                select name="account_id" id="account_id" class=(FORM_SELECT_STYLE) required
                {
                    @for account in accounts {
                        option
                            value=(account.id)
                            selected[prefill.is_some_and(|t| t.account_id == account.id)
                                || (prefill.is_none() && account.is_default)]
                        {
                            (account.name)
                        }
                    }
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select name="category" id="category" class=(FORM_SELECT_STYLE) required
                {
                    @for group in [TransactionKind::Expense, TransactionKind::Income] {
                        optgroup label=(group.label())
                        {
                            @for category in CATEGORIES.iter().filter(|c| c.kind == group) {
                                option
                                    value=(category.key)
                                    selected[prefill.is_some_and(|t| t.category == category.key)]
                                {
                                    (category.label)
                                }
                            }
                        }
                    }
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    type="date"
                    name="date"
                    id="date"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(date)
                    required;
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    type="text"
                    name="description"
                    id="description"
                    class=(FORM_TEXT_INPUT_STYLE)
                    placeholder="e.g. Weekly groceries"
                    value=[prefill.map(|t| t.description.as_str())];
            }

            div class="flex items-center gap-2"
            {
                input
                    type="checkbox"
                    name="is_recurring"
                    id="is_recurring"
                    value="true"
                    class=(FORM_CHECKBOX_STYLE)
                    checked[is_recurring];
                label for="is_recurring" class="text-sm font-medium" { "Recurring transaction" }
            }

            div class="flex gap-4"
            {
                div class="flex-1"
                {
                    label for="recurring_interval" class=(FORM_LABEL_STYLE) { "Repeats" }
                    select
                        name="recurring_interval"
                        id="recurring_interval"
                        class=(FORM_SELECT_STYLE)
                    {
                        option value="" { "Not recurring" }

                        @for interval in RecurringInterval::all() {
                            option
                                value=(interval.as_str())
                                selected[prefill
                                    .is_some_and(|t| t.recurring_interval == Some(interval))]
                            {
                                (interval.label())
                            }
                        }
                    }
                }

                div class="flex-1"
                {
                    label for="next_recurring_date" class=(FORM_LABEL_STYLE) { "Next date" }
                    input
                        type="date"
                        name="next_recurring_date"
                        id="next_recurring_date"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=[prefill.and_then(|t| t.next_recurring_date)];
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                (loading_spinner())
                (submit_label)
            }
        }
    )
}
