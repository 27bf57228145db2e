// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Chart geometry
//!
//! Backend-free layout for the demo's four visualizations: two
//! horizontal diverging bar charts (attribution map, key factors), a
//! metrics column chart, and the confusion-matrix grid. Each function
//! turns already-computed numbers into positioned rectangles, lines and
//! labels; rendering them is a frontend concern and out of scope here.

use crate::explain::{AttributionEntry, LocalFactor};
use crate::metrics::{ConfusionMatrix, ModelMetrics};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub align: Align,
}

/// One bar of a diverging chart. Positive bars extend right of the zero
/// line, negative bars extend left; `rect` already accounts for that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub feature: String,
    pub value: f64,
    pub rect: Rect,
    pub name_label: TextLabel,
    pub value_label: TextLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegendEntry {
    pub swatch: Rect,
    pub label: TextLabel,
}

/// A horizontal diverging bar chart, bars stacked top to bottom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivergingBarChart {
    pub width: f64,
    pub height: f64,
    pub bars: Vec<Bar>,
    pub zero_line: Line,
    pub legend: Vec<LegendEntry>,
}

/// One column of the metrics chart, anchored to the baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub value: f64,
    pub rect: Rect,
    pub name_label: TextLabel,
    pub value_label: TextLabel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnChart {
    pub width: f64,
    pub height: f64,
    pub columns: Vec<Column>,
    pub baseline: Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// ROC curve layout: axes, the dashed random-classifier diagonal, and
/// the curve polyline in canvas coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocChart {
    pub width: f64,
    pub height: f64,
    pub y_axis: Line,
    pub x_axis: Line,
    /// Rendered dashed; marks random-classifier performance.
    pub diagonal: Line,
    pub curve: Vec<Point>,
    pub title: TextLabel,
    pub x_label: TextLabel,
    pub y_label: TextLabel,
    pub auc_label: TextLabel,
}

/// One cell of the confusion grid; `intensity` in [0, 1] drives the
/// fill shade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCell {
    pub label: String,
    pub count: usize,
    pub intensity: f64,
    pub rect: Rect,
    pub count_label: TextLabel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfusionGrid {
    pub width: f64,
    pub height: f64,
    pub cells: Vec<GridCell>,
    pub column_headers: Vec<TextLabel>,
    pub row_headers: Vec<TextLabel>,
}

const BAR_HEIGHT: f64 = 35.0;
const BAR_SPACING: f64 = 60.0;
const BAR_START_Y: f64 = 80.0;
const LEGEND_SWATCH: f64 = 15.0;

/// Lay out the attribution-map chart (700x450 canvas).
pub fn attribution_chart(entries: &[AttributionEntry]) -> DivergingBarChart {
    let height = 450.0;
    diverging_chart(
        700.0,
        height,
        350.0,
        250.0,
        height - 60.0,
        entries
            .iter()
            .map(|e| (e.feature.clone(), e.value))
            .collect(),
        ("Bot indicator", "Human indicator"),
    )
}

/// Lay out the key-factor chart (700x400 canvas). Bar length follows
/// the factor's weight magnitude, not its raw value.
pub fn local_factor_chart(factors: &[LocalFactor]) -> DivergingBarChart {
    let height = 400.0;
    diverging_chart(
        700.0,
        height,
        300.0,
        280.0,
        height - 40.0,
        factors
            .iter()
            .map(|f| (f.feature.clone(), f.weight))
            .collect(),
        ("Increases bot score", "Decreases bot score"),
    )
}

fn diverging_chart(
    width: f64,
    height: f64,
    chart_width: f64,
    start_x: f64,
    legend_y: f64,
    values: Vec<(String, f64)>,
    legend_labels: (&str, &str),
) -> DivergingBarChart {
    let max_abs = values
        .iter()
        .map(|(_, v)| v.abs())
        .fold(0.0_f64, f64::max);

    let bars = values
        .iter()
        .enumerate()
        .map(|(i, (feature, value))| {
            let y = BAR_START_Y + i as f64 * BAR_SPACING;
            let bar_width = if max_abs > 0.0 {
                value.abs() / max_abs * chart_width
            } else {
                0.0
            };
            let rect = if *value >= 0.0 {
                Rect::new(start_x, y, bar_width, BAR_HEIGHT)
            } else {
                Rect::new(start_x - bar_width, y, bar_width, BAR_HEIGHT)
            };
            Bar {
                feature: feature.clone(),
                value: *value,
                rect,
                name_label: TextLabel {
                    text: feature.clone(),
                    x: start_x - 15.0,
                    y: y + BAR_HEIGHT / 2.0 + 5.0,
                    align: Align::Right,
                },
                value_label: TextLabel {
                    text: format!("{value:+.3}"),
                    x: start_x + chart_width + 15.0,
                    y: y + BAR_HEIGHT / 2.0 + 4.0,
                    align: Align::Left,
                },
            }
        })
        .collect::<Vec<_>>();

    let zero_line = Line {
        x1: start_x,
        y1: BAR_START_Y - 15.0,
        x2: start_x,
        y2: BAR_START_Y + values.len() as f64 * BAR_SPACING - 25.0,
    };

    let legend = vec![
        LegendEntry {
            swatch: Rect::new(20.0, legend_y, LEGEND_SWATCH, LEGEND_SWATCH),
            label: TextLabel {
                text: legend_labels.0.to_string(),
                x: 45.0,
                y: legend_y + 12.0,
                align: Align::Left,
            },
        },
        LegendEntry {
            swatch: Rect::new(200.0, legend_y, LEGEND_SWATCH, LEGEND_SWATCH),
            label: TextLabel {
                text: legend_labels.1.to_string(),
                x: 225.0,
                y: legend_y + 12.0,
                align: Align::Left,
            },
        },
    ];

    DivergingBarChart {
        width,
        height,
        bars,
        zero_line,
        legend,
    }
}

const COLUMN_WIDTH: f64 = 60.0;
const COLUMN_SPACING: f64 = 20.0;
const COLUMN_START_X: f64 = 50.0;
const COLUMN_BASELINE_Y: f64 = 250.0;
const COLUMN_MAX_HEIGHT: f64 = 200.0;

/// Lay out the headline-metrics column chart (500x300 canvas). All five
/// metrics are fractions of 1, so column height maps value onto the
/// full 200px scale.
pub fn metrics_chart(metrics: &ModelMetrics) -> ColumnChart {
    let values = [
        ("Accuracy", metrics.accuracy),
        ("Precision", metrics.precision),
        ("Recall", metrics.recall),
        ("F1", metrics.f1_score),
        ("AUC", metrics.auc),
    ];

    let columns = values
        .iter()
        .enumerate()
        .map(|(i, (name, value))| {
            let x = COLUMN_START_X + i as f64 * (COLUMN_WIDTH + COLUMN_SPACING);
            let col_height = value.clamp(0.0, 1.0) * COLUMN_MAX_HEIGHT;
            Column {
                name: name.to_string(),
                value: *value,
                rect: Rect::new(x, COLUMN_BASELINE_Y - col_height, COLUMN_WIDTH, col_height),
                name_label: TextLabel {
                    text: name.to_string(),
                    x: x + COLUMN_WIDTH / 2.0,
                    y: COLUMN_BASELINE_Y + 20.0,
                    align: Align::Center,
                },
                value_label: TextLabel {
                    text: format!("{:.1}%", value * 100.0),
                    x: x + COLUMN_WIDTH / 2.0,
                    y: COLUMN_BASELINE_Y - col_height - 8.0,
                    align: Align::Center,
                },
            }
        })
        .collect();

    ColumnChart {
        width: 500.0,
        height: 300.0,
        columns,
        baseline: Line {
            x1: COLUMN_START_X,
            y1: COLUMN_BASELINE_Y,
            x2: COLUMN_START_X + 5.0 * (COLUMN_WIDTH + COLUMN_SPACING) - COLUMN_SPACING,
            y2: COLUMN_BASELINE_Y,
        },
    }
}

const ROC_PADDING: f64 = 40.0;
const ROC_CHART_SIZE: f64 = 220.0;

/// Fixed demo curve as (false positive rate, true positive rate)
/// pairs. Display data only; not derived from the AUC shown next to it.
const ROC_POINTS: [(f64, f64); 11] = [
    (0.0, 1.0),
    (0.05, 0.92),
    (0.12, 0.87),
    (0.18, 0.82),
    (0.25, 0.76),
    (0.32, 0.68),
    (0.41, 0.58),
    (0.52, 0.45),
    (0.68, 0.32),
    (0.85, 0.18),
    (1.0, 0.0),
];

/// Lay out the ROC curve panel (300x300 canvas). FPR maps left to
/// right, TPR bottom to top; the curve itself is the fixed demo
/// polyline.
pub fn roc_chart(metrics: &ModelMetrics) -> RocChart {
    let origin = ROC_PADDING;
    let extent = ROC_PADDING + ROC_CHART_SIZE;

    let curve = ROC_POINTS
        .iter()
        .map(|(fpr, tpr)| Point {
            x: origin + fpr * ROC_CHART_SIZE,
            y: origin + (1.0 - tpr) * ROC_CHART_SIZE,
        })
        .collect();

    RocChart {
        width: 300.0,
        height: 300.0,
        y_axis: Line {
            x1: origin,
            y1: origin,
            x2: origin,
            y2: extent,
        },
        x_axis: Line {
            x1: origin,
            y1: extent,
            x2: extent,
            y2: extent,
        },
        diagonal: Line {
            x1: origin,
            y1: extent,
            x2: extent,
            y2: origin,
        },
        curve,
        title: TextLabel {
            text: "ROC Curve".to_string(),
            x: 150.0,
            y: 25.0,
            align: Align::Center,
        },
        x_label: TextLabel {
            text: "False Positive Rate".to_string(),
            x: origin + ROC_CHART_SIZE / 2.0,
            y: 295.0,
            align: Align::Center,
        },
        y_label: TextLabel {
            text: "True Positive Rate".to_string(),
            x: 15.0,
            y: origin + ROC_CHART_SIZE / 2.0,
            align: Align::Center,
        },
        auc_label: TextLabel {
            text: format!("AUC = {:.3}", metrics.auc),
            x: origin + 10.0,
            y: origin + 20.0,
            align: Align::Left,
        },
    }
}

const GRID_CELL: f64 = 80.0;
const GRID_ORIGIN_X: f64 = 80.0;
const GRID_ORIGIN_Y: f64 = 80.0;

/// Lay out the 2x2 confusion grid (300x300 canvas). Cell intensity is
/// the count relative to the largest cell.
pub fn confusion_grid(cm: &ConfusionMatrix) -> ConfusionGrid {
    let cells_src = [
        ("True Positive", cm.tp, 0, 0),
        ("False Negative", cm.fn_, 1, 0),
        ("False Positive", cm.fp, 0, 1),
        ("True Negative", cm.tn, 1, 1),
    ];
    let max = cells_src
        .iter()
        .map(|(_, count, _, _)| *count)
        .max()
        .unwrap_or(0);

    let cells = cells_src
        .iter()
        .map(|(label, count, col, row)| {
            let x = GRID_ORIGIN_X + *col as f64 * GRID_CELL;
            let y = GRID_ORIGIN_Y + *row as f64 * GRID_CELL;
            GridCell {
                label: label.to_string(),
                count: *count,
                intensity: if max > 0 {
                    *count as f64 / max as f64
                } else {
                    0.0
                },
                rect: Rect::new(x, y, GRID_CELL, GRID_CELL),
                count_label: TextLabel {
                    text: count.to_string(),
                    x: x + GRID_CELL / 2.0,
                    y: y + GRID_CELL / 2.0 + 5.0,
                    align: Align::Center,
                },
            }
        })
        .collect();

    let column_headers = ["Bot", "Human"]
        .iter()
        .enumerate()
        .map(|(i, text)| TextLabel {
            text: text.to_string(),
            x: GRID_ORIGIN_X + i as f64 * GRID_CELL + GRID_CELL / 2.0,
            y: GRID_ORIGIN_Y - 15.0,
            align: Align::Center,
        })
        .collect();

    let row_headers = ["Bot", "Human"]
        .iter()
        .enumerate()
        .map(|(i, text)| TextLabel {
            text: text.to_string(),
            x: GRID_ORIGIN_X - 15.0,
            y: GRID_ORIGIN_Y + i as f64 * GRID_CELL + GRID_CELL / 2.0 + 5.0,
            align: Align::Right,
        })
        .collect();

    ConfusionGrid {
        width: 300.0,
        height: 300.0,
        cells,
        column_headers,
        row_headers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::AttributionEntry;

    fn entries(values: &[(&str, f64)]) -> Vec<AttributionEntry> {
        values
            .iter()
            .map(|(feature, value)| AttributionEntry {
                feature: feature.to_string(),
                value: *value,
            })
            .collect()
    }

    #[test]
    fn test_attribution_chart_canvas_and_bar_count() {
        let chart = attribution_chart(&entries(&[("A", 0.8), ("B", -0.3), ("C", 0.1)]));
        assert_eq!(chart.width, 700.0);
        assert_eq!(chart.height, 450.0);
        assert_eq!(chart.bars.len(), 3);
        assert_eq!(chart.legend.len(), 2);
    }

    #[test]
    fn test_largest_magnitude_fills_chart_width() {
        let chart = attribution_chart(&entries(&[("A", 0.8), ("B", -0.4)]));
        assert!((chart.bars[0].rect.width - 350.0).abs() < 1e-9);
        assert!((chart.bars[1].rect.width - 175.0).abs() < 1e-9);
    }

    #[test]
    fn test_bars_diverge_around_zero_line() {
        let chart = attribution_chart(&entries(&[("A", 0.5), ("B", -0.5)]));
        let start_x = chart.zero_line.x1;

        // positive bar grows right, negative bar grows left
        assert_eq!(chart.bars[0].rect.x, start_x);
        assert!((chart.bars[1].rect.x + chart.bars[1].rect.width - start_x).abs() < 1e-9);
    }

    #[test]
    fn test_bars_stack_with_fixed_spacing() {
        let chart = attribution_chart(&entries(&[("A", 0.1), ("B", 0.2), ("C", 0.3)]));
        assert_eq!(chart.bars[0].rect.y, 80.0);
        assert_eq!(chart.bars[1].rect.y, 140.0);
        assert_eq!(chart.bars[2].rect.y, 200.0);
        for bar in &chart.bars {
            assert_eq!(bar.rect.height, 35.0);
        }
    }

    #[test]
    fn test_all_zero_values_yield_empty_bars() {
        let chart = attribution_chart(&entries(&[("A", 0.0), ("B", 0.0)]));
        for bar in &chart.bars {
            assert_eq!(bar.rect.width, 0.0);
        }
    }

    #[test]
    fn test_label_alignment() {
        let chart = attribution_chart(&entries(&[("A", 0.5)]));
        let bar = &chart.bars[0];
        assert_eq!(bar.name_label.align, Align::Right);
        assert_eq!(bar.value_label.align, Align::Left);
        assert!(bar.name_label.x < chart.zero_line.x1);
        assert!(bar.value_label.x > chart.zero_line.x1);
    }

    #[test]
    fn test_local_factor_chart_uses_weight_for_length() {
        let factors = vec![
            LocalFactor {
                feature: "A".to_string(),
                value: 500.0,
                weight: 0.4,
            },
            LocalFactor {
                feature: "B".to_string(),
                value: 1.0,
                weight: -0.8,
            },
        ];
        let chart = local_factor_chart(&factors);
        assert_eq!(chart.height, 400.0);
        // B has twice the |weight| of A, so twice the bar length
        assert!((chart.bars[1].rect.width - 300.0).abs() < 1e-9);
        assert!((chart.bars[0].rect.width - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_chart_column_heights() {
        let chart = metrics_chart(&ModelMetrics::published());
        assert_eq!(chart.columns.len(), 5);
        assert_eq!(chart.width, 500.0);

        for col in &chart.columns {
            // columns sit on the baseline
            assert!((col.rect.y + col.rect.height - 250.0).abs() < 1e-9);
            assert!((col.rect.height - col.value * 200.0).abs() < 1e-9);
        }
        assert_eq!(chart.columns[0].name, "Accuracy");
        assert_eq!(chart.columns[4].name, "AUC");
    }

    #[test]
    fn test_roc_chart_point_mapping() {
        let chart = roc_chart(&ModelMetrics::published());
        assert_eq!(chart.width, 300.0);
        assert_eq!(chart.height, 300.0);
        assert_eq!(chart.curve.len(), 11);

        // (fpr 0, tpr 1) is the top-left chart corner, (1, 0) the
        // bottom-right one
        assert_eq!(chart.curve[0], Point { x: 40.0, y: 40.0 });
        assert_eq!(chart.curve[10], Point { x: 260.0, y: 260.0 });

        // interior point: x = 40 + fpr*220, y = 40 + (1 - tpr)*220
        assert!((chart.curve[4].x - (40.0 + 0.25 * 220.0)).abs() < 1e-9);
        assert!((chart.curve[4].y - (40.0 + 0.24 * 220.0)).abs() < 1e-9);

        for point in &chart.curve {
            assert!(point.x >= 40.0 && point.x <= 260.0);
            assert!(point.y >= 40.0 && point.y <= 260.0);
        }
    }

    #[test]
    fn test_roc_chart_axes_and_diagonal() {
        let chart = roc_chart(&ModelMetrics::published());

        // axes meet at the bottom-left chart corner
        assert_eq!(chart.y_axis.x1, chart.x_axis.x1);
        assert_eq!(chart.y_axis.y2, chart.x_axis.y1);

        // diagonal runs bottom-left to top-right
        assert_eq!((chart.diagonal.x1, chart.diagonal.y1), (40.0, 260.0));
        assert_eq!((chart.diagonal.x2, chart.diagonal.y2), (260.0, 40.0));

        assert_eq!(chart.auc_label.text, "AUC = 0.945");
    }

    #[test]
    fn test_confusion_grid_cells_and_intensity() {
        let grid = confusion_grid(&ConfusionMatrix::published());
        assert_eq!(grid.cells.len(), 4);

        let tn = grid.cells.iter().find(|c| c.label == "True Negative");
        let tn = tn.expect("grid should have a TN cell");
        assert_eq!(tn.count, 1847);
        assert!((tn.intensity - 1.0).abs() < 1e-9); // largest cell

        for cell in &grid.cells {
            assert_eq!(cell.rect.width, 80.0);
            assert!(cell.intensity >= 0.0 && cell.intensity <= 1.0);
        }
    }

    #[test]
    fn test_confusion_grid_empty_matrix() {
        let grid = confusion_grid(&ConfusionMatrix::default());
        for cell in &grid.cells {
            assert_eq!(cell.intensity, 0.0);
        }
    }
}
