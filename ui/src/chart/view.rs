use std::collections::HashMap;

use dioxus::prelude::*;

use crate::core::format;

use super::geometry::{gridline_values, label_stride, ChartLayout, ChartModel};

/// SVG rendering of a [`ChartModel`]: one path per series, point markers
/// with tooltips, dashed gridlines, and rotated month labels.
#[component]
pub fn SeriesChart(model: ChartModel) -> Element {
    if model.months.is_empty() {
        return rsx! {};
    }

    let layout = ChartLayout::default();
    let month_count = model.months.len();
    let month_index: HashMap<&str, usize> = model
        .months
        .iter()
        .enumerate()
        .map(|(index, month)| (month.as_str(), index))
        .collect();
    let x_for_month = |month: &str| {
        let index = month_index.get(month).copied().unwrap_or(0);
        layout.x_for_index(index, month_count)
    };

    let lines: Vec<(String, &'static str, String, Vec<(f64, f64, String)>)> = model
        .series
        .iter()
        .map(|series| {
            let path = series
                .points
                .iter()
                .enumerate()
                .map(|(index, point)| {
                    let prefix = if index == 0 { 'M' } else { 'L' };
                    format!(
                        "{prefix} {} {}",
                        x_for_month(&point.month),
                        layout.y_for_value(point.value, model.y_max)
                    )
                })
                .collect::<Vec<_>>()
                .join(" ");

            let markers = series
                .points
                .iter()
                .map(|point| {
                    (
                        x_for_month(&point.month),
                        layout.y_for_value(point.value, model.y_max),
                        format!(
                            "{} · {}: {}",
                            series.drug,
                            point.month,
                            format::format_value(point.value)
                        ),
                    )
                })
                .collect();

            (series.drug.clone(), series.color, path, markers)
        })
        .collect();

    let stride = label_stride(month_count);
    let month_labels: Vec<(f64, String)> = model
        .months
        .iter()
        .enumerate()
        .filter(|(index, _)| index % stride == 0)
        .map(|(index, month)| (layout.x_for_index(index, month_count), month.clone()))
        .collect();

    let gridlines: Vec<(f64, String)> = gridline_values(model.y_max)
        .iter()
        .map(|value| {
            (
                layout.y_for_value(*value, model.y_max),
                format::format_value(*value),
            )
        })
        .collect();

    let axis_right = layout.padding_left + layout.plot_width();
    let label_baseline = layout.baseline_y() + 18.0;

    rsx! {
        svg {
            view_box: "0 0 {layout.width} {layout.height}",
            role: "img",
            "aria-label": "Monthly overdose deaths by drug",

            g {
                // Axes.
                line {
                    x1: layout.padding_left,
                    y1: layout.baseline_y(),
                    x2: axis_right,
                    y2: layout.baseline_y(),
                    stroke: "#cbd5e1",
                }
                line {
                    x1: layout.padding_left,
                    y1: layout.padding_top,
                    x2: layout.padding_left,
                    y2: layout.baseline_y(),
                    stroke: "#cbd5e1",
                }

                for (y, label) in gridlines.iter() {
                    g { key: "{label}-{y}",
                        line {
                            x1: layout.padding_left,
                            y1: *y,
                            x2: axis_right,
                            y2: *y,
                            stroke: "#e2e8f0",
                            stroke_dasharray: "4 4",
                        }
                        text {
                            x: layout.padding_left - 10.0,
                            y: y + 4.0,
                            text_anchor: "end",
                            font_size: "11",
                            fill: "#475569",
                            "{label}"
                        }
                    }
                }

                for (drug, color, path, markers) in lines.iter() {
                    g { key: "{drug}",
                        path {
                            d: "{path}",
                            fill: "none",
                            stroke: "{color}",
                            stroke_width: "2.5",
                        }
                        for (index, (cx, cy, tooltip)) in markers.iter().enumerate() {
                            circle {
                                key: "{drug}-{index}",
                                cx: *cx,
                                cy: *cy,
                                r: 3.5,
                                fill: "{color}",
                                stroke: "#fff",
                                stroke_width: "1",
                                title { "{tooltip}" }
                            }
                        }
                    }
                }

                for (x, month) in month_labels.iter() {
                    g {
                        key: "{month}",
                        transform: "translate({x}, {label_baseline})",
                        text {
                            text_anchor: "middle",
                            font_size: "11",
                            fill: "#475569",
                            transform: "rotate(35)",
                            "{month}"
                        }
                    }
                }
            }
        }
    }
}
