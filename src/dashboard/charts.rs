//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations of a month's sales:
//! - **Price Range Chart**: Bar chart of how many transactions fall in each price range
//! - **Category Chart**: Pie chart of how many transactions are in each category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Label, Tooltip, Trigger},
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};
use time::Month;

use crate::transaction::{CategoryCount, PriceRangeCount};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the chart containers followed by the script that draws the charts.
///
/// The script is inline so that it also runs when the dashboard content is
/// swapped in by htmx.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }

            script { (charts_script(charts)) }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Chart options contain text from the seed data, so `</` is escaped to stop
/// a category name from closing the script element.
fn charts_script(charts: &[DashboardChart]) -> PreEscaped<String> {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chart = echarts.init(document.getElementById("{}"));
                    chart.setOption({});
                    dashboardCharts.push(chart);
                }})();"#,
                chart.id,
                escape_script_text(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PreEscaped(format!(
        "(function() {{
            const dashboardCharts = [];
            {script_content}
            window.onresize = () => dashboardCharts.forEach((chart) => chart.resize());
        }})();"
    ))
}

/// Escape `text` for use inside a script element.
///
/// `<\/` is equivalent to `</` inside JavaScript strings, but HTML parsers do
/// not treat it as the start of a closing tag.
fn escape_script_text(text: &str) -> String {
    text.replace("</", "<\\/")
}

/// How many transactions fall into each price range.
pub(super) fn price_range_chart(month: Month, price_ranges: &[PriceRangeCount]) -> Chart {
    let labels: Vec<String> = price_ranges
        .iter()
        .map(|price_range| price_range.range.to_string())
        .collect();
    let counts: Vec<f64> = price_ranges
        .iter()
        .map(|price_range| price_range.count as f64)
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Price Ranges")
                .subtext(format!("Transactions in {month} by price")),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(bar::Bar::new().name("Transactions").data(counts))
}

/// How many transactions are in each category.
///
/// Each slice is labelled with the count, the category and its share of the
/// month's transactions.
pub(super) fn category_chart(month: Month, categories: &[CategoryCount]) -> Chart {
    let data: Vec<(f64, &str)> = categories
        .iter()
        .map(|category| (category.count as f64, category.category.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Categories")
                .subtext(format!("Transactions in {month} by category")),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Categories")
                .radius("60%")
                .label(Label::new().formatter("{c} {b} ({d}%)"))
                .data(data),
        )
}
