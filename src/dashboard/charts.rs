//! The spending by category chart.
//!
//! The chart is generated as JSON configuration for the ECharts library and
//! rendered with an HTML container and JavaScript initialization code. The
//! legend is plain HTML so it can show the signed totals.

use charming::{
    Chart,
    element::{Color, JsFunction, Label, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::CategorySummary,
    html::{HeadElement, format_currency},
};

/// The HTML element ID of the category chart.
pub(super) const CATEGORY_CHART_ID: &str = "category-chart";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the category chart container next to its legend.
pub(super) fn category_chart_view(chart: &DashboardChart, categories: &[CategorySummary]) -> Markup {
    html!(
        section
            id="category-breakdown"
            class="w-full p-6 mb-8 bg-white dark:bg-gray-800 rounded-lg shadow"
        {
            h3 class="text-xl font-semibold" { "Spending by Category" }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400" {
                "Breakdown of your expenses this month"
            }

            div class="grid grid-cols-1 lg:grid-cols-2 gap-4 items-center"
            {
                div
                    id=(chart.id)
                    class="min-h-[320px] rounded dark:bg-gray-100"
                {}

                (category_legend(categories))
            }
        }
    )
}

fn category_legend(categories: &[CategorySummary]) -> Markup {
    html!(
        ul id="category-legend" class="space-y-2"
        {
            @for category in categories {
                li class="flex items-center justify-between gap-4"
                {
                    div class="flex items-center gap-2"
                    {
                        span
                            class="inline-block w-3 h-3 rounded-full"
                            style={ "background-color: " (category.color) }
                        {}
                        span class="capitalize" { (category.name) }
                    }
                    span class="font-medium" { (format_currency(category.value)) }
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A donut chart of how much was spent in each category.
///
/// Slices are sized by the magnitude of each category's total and keep the
/// colour assigned to the category.
pub(super) fn category_chart(categories: &[CategorySummary]) -> Chart {
    let colors: Vec<Color> = categories
        .iter()
        .map(|category| Color::from(category.color))
        .collect();
    let data: Vec<(f64, &str)> = categories
        .iter()
        .map(|category| (category.value.abs(), category.name.as_str()))
        .collect();

    Chart::new()
        .color(colors)
        .tooltip(currency_tooltip())
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["40%", "70%"])
                .label(Label::new().show(false))
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Item)
        .value_formatter(currency_formatter())
}
