//! The account summary cards shown at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    account::Account,
    endpoints,
    html::{CARD_STYLE, format_currency},
};

pub(super) fn account_cards(accounts: &[Account]) -> Markup {
    html!(
        section class="grid grid-cols-1 sm:grid-cols-2 xl:grid-cols-4 gap-4 w-full"
        {
            @for account in accounts {
                a
                    href=(endpoints::format_endpoint(endpoints::ACCOUNT_VIEW, account.id))
                    class={(CARD_STYLE) " hover:border-blue-500 dark:hover:border-blue-500"}
                    data-account-card="true"
                {
                    div class="flex items-center justify-between"
                    {
                        h2 class="text-sm font-medium" { (account.name) }

                        @if account.is_default {
                            span class="text-xs font-semibold text-blue-700 dark:text-blue-300"
                            {
                                "Default"
                            }
                        }
                    }

                    p class="text-2xl font-bold" { (format_currency(account.balance)) }

                    p class="text-xs text-gray-500 dark:text-gray-400"
                    {
                        (account.kind.label()) " Account"
                    }
                }
            }
        }
    )
}
