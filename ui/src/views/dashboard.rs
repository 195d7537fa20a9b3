use dioxus::prelude::*;

use crate::chart::geometry::build_chart;
use crate::chart::SeriesChart;
use crate::core::context::AppContext;
use crate::core::storage::{LocalVoteMemory, VoteMemory};
use crate::data::{available_drugs, default_selection, monthly_rows, parse_dataset, Record};
use crate::vote::tally::VoteKind;
use crate::vote::VotePanel;

#[cfg(debug_assertions)]
fn log_dashboard_render(selected: usize, months: usize) {
    // Lightweight render trace for diagnosing selection/aggregation churn.
    println!("[dashboard] render (selected={selected} months={months})");
}

/// The single page: dataset chart with drug toggles plus the vote panel.
#[component]
pub fn Dashboard() -> Element {
    let ctx = use_context::<AppContext>();

    // Last cast vote kind, shared with the vote panel for page theming.
    let mood = use_context_provider(|| Signal::new(LocalVoteMemory.load().mood));

    let mut records = use_signal(Vec::<Record>::new);
    let mut available = use_signal(Vec::<String>::new);
    let mut selection = use_signal(Vec::<String>::new);
    let mut loading = use_signal(|| true);
    let mut load_error = use_signal(|| Option::<String>::None);

    let dataset = ctx.dataset.clone();
    use_future(move || {
        let dataset = dataset.clone();
        async move {
            match dataset.load().await {
                Ok(text) => {
                    let parsed = parse_dataset(&text);
                    let drugs = available_drugs(&parsed);
                    selection.set(default_selection(&drugs));
                    available.set(drugs);
                    records.set(parsed);
                }
                Err(err) => {
                    // Aggregation state stays empty; only the pill reports it.
                    load_error.set(Some(err.to_string()));
                }
            }
            loading.set(false);
        }
    });

    let current_selection = selection();
    let rows = monthly_rows(&records.read(), &current_selection);
    let model = build_chart(&rows, &current_selection);

    #[cfg(debug_assertions)]
    {
        log_dashboard_render(current_selection.len(), model.months.len());
    }

    let theme = match mood() {
        Some(VoteKind::Support) => "theme-support",
        Some(VoteKind::Burn) => "theme-burn",
        None => "",
    };
    let is_loading = loading();
    let has_selection = !current_selection.is_empty();
    let selected_count = current_selection.len();
    let error_message = load_error();

    rsx! {
        div { class: "page {theme}",
            if mood() == Some(VoteKind::Support) {
                div { class: "fx fx--confetti", aria_hidden: true }
                div { class: "fx fx--sparkles", aria_hidden: true }
            }
            if mood() == Some(VoteKind::Burn) {
                div { class: "fx fx--flames", aria_hidden: true }
            }

            header { class: "page__header",
                div {
                    p { class: "eyebrow", "Provisional overdose deaths" }
                    h1 { "Monthly deaths by drug" }
                    p { class: "lede",
                        "Explore 12-month-ending overdose death counts by drug. Select one or more drugs to see how totals change over time."
                    }
                }
                div { class: "pill",
                    "Source: "
                    a {
                        href: "https://catalog.data.gov/dataset/provisional-drug-overdose-death-counts-for-specific-drugs",
                        target: "_blank",
                        rel: "noreferrer",
                        "Provisional drug overdose death counts for specific drugs"
                    }
                }
            }

            section { class: "panel",
                div { class: "panel__header",
                    div {
                        h2 { "Segment by drug" }
                        p { class: "helper",
                            "Toggle one or more drugs to update the monthly time series."
                        }
                    }
                    div { class: "summary",
                        span { class: "summary__label", "Drugs shown" }
                        span { class: "summary__value", "{selected_count}" }
                    }
                }

                div { class: "filters",
                    for drug in available().into_iter() {
                        label { key: "{drug}", class: "filter-pill",
                            input {
                                r#type: "checkbox",
                                checked: current_selection.contains(&drug),
                                onchange: {
                                    let drug = drug.clone();
                                    move |_| selection.with_mut(|sel| toggle_drug(sel, &drug))
                                },
                            }
                            span { "{drug}" }
                        }
                    }
                }
            }

            section { class: "panel",
                div { class: "panel__header",
                    div {
                        h2 { "Monthly deaths" }
                        p { class: "helper",
                            "Counts are 12-month-ending totals for the United States."
                        }
                    }
                    if is_loading {
                        span { class: "pill pill--muted", "Loading data…" }
                    }
                    if let Some(message) = error_message {
                        span { class: "pill pill--error", "{message}" }
                    }
                }

                if !is_loading && !has_selection {
                    p { class: "helper", "Select at least one drug to see the chart." }
                }

                if !is_loading && has_selection {
                    div { class: "chart-wrap",
                        SeriesChart { model: model.clone() }
                        div { class: "chart-legend",
                            for line in model.series.iter() {
                                div { key: "{line.drug}", class: "legend-item",
                                    span {
                                        class: "legend-swatch",
                                        style: "background-color: {line.color}",
                                    }
                                    span { "{line.drug}" }
                                }
                            }
                        }
                    }
                }
            }

            VotePanel {}

            footer { class: "page__footer",
                "Counts are provisional and subject to revision as reporting completes."
            }
        }
    }
}

fn toggle_drug(selection: &mut Vec<String>, drug: &str) {
    if let Some(position) = selection.iter().position(|item| item == drug) {
        selection.remove(position);
    } else {
        selection.push(drug.to_string());
    }
}
