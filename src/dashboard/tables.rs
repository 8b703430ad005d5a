//! The statistics card, transaction table and pagination controls.

use maud::{Markup, html};
use time::Month;

use crate::{
    html::{LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    pagination::PaginationIndicator,
    transaction::{Statistics, Transaction},
};

const STAT_LABEL_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400";
const STAT_VALUE_STYLE: &str = "text-2xl font-bold";

/// Renders the month's sales totals.
///
/// A month without transactions shows zero for every total.
pub(super) fn statistics_card(month: Month, statistics: Option<Statistics>) -> Markup {
    let statistics = statistics.unwrap_or(Statistics {
        total_amount: 0.0,
        total_sold: 0,
        total_not_sold: 0,
    });

    html! {
        section
            id="statistics"
            class="w-full bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md mb-4"
        {
            h3 class="text-xl font-semibold mb-4" { "Statistics - " (month.to_string()) }

            dl class="grid grid-cols-1 sm:grid-cols-3 gap-4"
            {
                div
                {
                    dt class=(STAT_LABEL_STYLE) { "Total Sales" }
                    dd id="total-amount" class=(STAT_VALUE_STYLE)
                    {
                        (format_currency(statistics.total_amount))
                    }
                }

                div
                {
                    dt class=(STAT_LABEL_STYLE) { "Total Sold Items" }
                    dd id="total-sold" class=(STAT_VALUE_STYLE) { (statistics.total_sold) }
                }

                div
                {
                    dt class=(STAT_LABEL_STYLE) { "Total Not Sold Items" }
                    dd id="total-not-sold" class=(STAT_VALUE_STYLE) { (statistics.total_not_sold) }
                }
            }
        }
    }
}

/// Renders one page of transactions.
pub(super) fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Sold" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date of Sale" }
                    }
                }

                tbody
                {
                    @for transaction in transactions
                    {
                        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                        {
                            td class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                            {
                                (transaction.title)
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.description) }
                            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"}
                            {
                                (format_currency(transaction.price))
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @if transaction.sold { "Yes" } @else { "No" }
                            }
                            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"}
                            {
                                (transaction.date_of_sale.date().to_string())
                            }
                        }
                    }

                    @if transactions.is_empty()
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="6" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No transactions found for this month."
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the page navigation below the transaction table.
///
/// `page_url` maps a page number to the URL that shows that page.
pub(super) fn pagination_view(
    curr_page: u64,
    page_count: u64,
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
) -> Markup {
    html! {
        nav
            id="pagination"
            aria-label="Transaction table pages"
            class="flex flex-col items-center gap-2 mt-4"
        {
            p class="text-sm text-gray-700 dark:text-gray-400"
            {
                "Page " (curr_page) " of " (page_count)
            }

            ul class="inline-flex items-center gap-2 text-sm"
            {
                @for indicator in indicators
                {
                    li
                    {
                        @match indicator
                        {
                            PaginationIndicator::BackButton(page) => {
                                (page_link(&page_url(*page), "Previous"))
                            }
                            PaginationIndicator::Page(page) => {
                                (page_link(&page_url(*page), &page.to_string()))
                            }
                            PaginationIndicator::CurrPage(page) => {
                                p aria-current="page" class="px-2 font-bold" { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="px-2" { "..." }
                            }
                            PaginationIndicator::NextButton(page) => {
                                (page_link(&page_url(*page), "Next"))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// A link that swaps in another page of the dashboard content.
fn page_link(url: &str, text: &str) -> Markup {
    html! {
        a
            href=(url)
            hx-get=(url)
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-push-url="true"
            class={"px-2 " (LINK_STYLE)}
        {
            (text)
        }
    }
}
