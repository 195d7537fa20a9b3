//! Chart geometry: turns aggregated monthly rows into plot coordinates,
//! axis ticks, and a shared vertical scale.

use crate::data::aggregate::MonthlyCounts;

/// Cyclic palette assigned by selection order, not drug identity; toggling
/// drugs in a different order recolors the lines, which is accepted.
pub const PALETTE: [&str; 7] = [
    "#2563eb", "#16a34a", "#f97316", "#a855f7", "#0ea5e9", "#e11d48", "#1e293b",
];

/// Number of horizontal gridline levels, 0 through `y_max` inclusive.
pub const GRIDLINE_LEVELS: usize = 5;

/// Label-density cap for the x axis: at most ~12 month labels render.
const MAX_MONTH_LABELS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub month: String,
    pub value: f64,
}

/// One drug's plotted line: only months with data produce points, so a path
/// drawn through them skips gaps without interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub drug: String,
    pub color: &'static str,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartModel {
    /// Shared x-axis domain for all series, even those missing data at some
    /// months.
    pub months: Vec<String>,
    pub series: Vec<SeriesLine>,
    pub y_max: f64,
}

pub fn build_chart(rows: &[MonthlyCounts], selection: &[String]) -> ChartModel {
    let months: Vec<String> = rows.iter().map(|row| row.month.clone()).collect();

    let series: Vec<SeriesLine> = selection
        .iter()
        .enumerate()
        .map(|(index, drug)| SeriesLine {
            drug: drug.clone(),
            color: PALETTE[index % PALETTE.len()],
            points: rows
                .iter()
                .filter_map(|row| {
                    row.value_for(drug).map(|value| SeriesPoint {
                        month: row.month.clone(),
                        value,
                    })
                })
                .collect(),
        })
        .collect();

    // Floor of 1 keeps the scale sane when every series is empty or zero.
    // f64::max skips NaN sentinels from malformed cells.
    let y_max = series
        .iter()
        .flat_map(|line| line.points.iter())
        .fold(1.0_f64, |acc, point| acc.max(point.value));

    ChartModel {
        months,
        series,
        y_max,
    }
}

/// Fixed plot frame matching the 960×360 viewBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 360.0,
            padding_left: 70.0,
            padding_right: 30.0,
            padding_top: 20.0,
            padding_bottom: 60.0,
        }
    }
}

impl ChartLayout {
    pub fn plot_width(&self) -> f64 {
        self.width - self.padding_left - self.padding_right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.padding_top - self.padding_bottom
    }

    pub fn baseline_y(&self) -> f64 {
        self.padding_top + self.plot_height()
    }

    /// Horizontal distance between adjacent months. A single month degrades
    /// to the full plot width instead of dividing by zero.
    pub fn x_step(&self, month_count: usize) -> f64 {
        if month_count > 1 {
            self.plot_width() / (month_count as f64 - 1.0)
        } else {
            self.plot_width()
        }
    }

    pub fn x_for_index(&self, index: usize, month_count: usize) -> f64 {
        self.padding_left + index as f64 * self.x_step(month_count)
    }

    /// Linear scale, origin at the bottom of the plot.
    pub fn y_for_value(&self, value: f64, y_max: f64) -> f64 {
        self.padding_top + self.plot_height() - (value / y_max) * self.plot_height()
    }
}

/// Emit a month label every `stride` months so long datasets stay readable.
/// The last partial group may render fewer than twelve labels.
pub fn label_stride(month_count: usize) -> usize {
    (month_count.div_ceil(MAX_MONTH_LABELS)).max(1)
}

/// Five evenly spaced tick values from 0 to `y_max`, rounded for display.
/// Rounding can nudge the top tick off the true max when `y_max` is not
/// divisible by four.
pub fn gridline_values(y_max: f64) -> [f64; GRIDLINE_LEVELS] {
    let mut levels = [0.0; GRIDLINE_LEVELS];
    for (index, level) in levels.iter_mut().enumerate() {
        *level = (y_max / 4.0 * index as f64).round();
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::monthly_rows;
    use crate::data::parse::parse_dataset;

    fn rows_for(text: &str, selection: &[&str]) -> Vec<MonthlyCounts> {
        let selection: Vec<String> = selection.iter().map(|s| s.to_string()).collect();
        monthly_rows(&parse_dataset(text), &selection)
    }

    #[test]
    fn series_skip_months_without_data() {
        let text = "header\n\
x,2022,1,US,A,12mo,2022-01-31,10\n\
x,2022,2,US,B,12mo,2022-02-28,20\n\
x,2022,3,US,A,12mo,2022-03-31,30\n\
x,2022,3,US,B,12mo,2022-03-31,25\n";
        let rows = rows_for(text, &["A", "B"]);
        let model = build_chart(&rows, &["A".into(), "B".into()]);

        assert_eq!(model.months, ["2022-01", "2022-02", "2022-03"]);
        let months_a: Vec<&str> = model.series[0]
            .points
            .iter()
            .map(|p| p.month.as_str())
            .collect();
        let months_b: Vec<&str> = model.series[1]
            .points
            .iter()
            .map(|p| p.month.as_str())
            .collect();
        assert_eq!(months_a, ["2022-01", "2022-03"]);
        assert_eq!(months_b, ["2022-02", "2022-03"]);
        assert_eq!(model.y_max, 30.0);
    }

    #[test]
    fn y_max_floors_at_one() {
        let model = build_chart(&[], &[]);
        assert_eq!(model.y_max, 1.0);

        let text = "header\nx,2022,1,US,A,12mo,2022-01-31,0\n";
        let rows = rows_for(text, &["A"]);
        let model = build_chart(&rows, &["A".into()]);
        assert_eq!(model.y_max, 1.0);
    }

    #[test]
    fn nan_values_do_not_poison_the_scale() {
        let text = "header\n\
x,2022,1,US,A,12mo,2022-01-31,bad\n\
x,2022,2,US,A,12mo,2022-02-28,12\n";
        let rows = rows_for(text, &["A"]);
        let model = build_chart(&rows, &["A".into()]);
        assert_eq!(model.y_max, 12.0);
    }

    #[test]
    fn colors_cycle_by_selection_order() {
        let selection: Vec<String> = (0..9).map(|i| format!("drug-{i}")).collect();
        let model = build_chart(&[], &selection);
        assert_eq!(model.series[0].color, PALETTE[0]);
        assert_eq!(model.series[7].color, PALETTE[0]);
        assert_eq!(model.series[8].color, PALETTE[1]);
    }

    #[test]
    fn single_month_sits_on_the_left_boundary() {
        let layout = ChartLayout::default();
        assert_eq!(layout.x_for_index(0, 1), layout.padding_left);
        assert!(layout.x_step(1).is_finite());
    }

    #[test]
    fn x_spans_the_plot_for_multiple_months() {
        let layout = ChartLayout::default();
        let last = layout.x_for_index(23, 24);
        assert!((last - (layout.padding_left + layout.plot_width())).abs() < 1e-9);
    }

    #[test]
    fn label_stride_caps_density() {
        assert_eq!(label_stride(1), 1);
        assert_eq!(label_stride(12), 1);
        assert_eq!(label_stride(13), 2);
        assert_eq!(label_stride(36), 3);
        // Never more than ~12 labels regardless of dataset length.
        for count in 1..200usize {
            assert!(count.div_ceil(label_stride(count)) <= 12);
        }
    }

    #[test]
    fn gridlines_quarter_the_scale() {
        assert_eq!(gridline_values(100.0), [0.0, 25.0, 50.0, 75.0, 100.0]);
        // Rounded display ticks: 10/4 = 2.5 rounds away from the true
        // quarter.
        assert_eq!(gridline_values(10.0), [0.0, 3.0, 5.0, 8.0, 10.0]);
    }
}
