use crate::services::Logger;
use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use shared::money::cents_to_units;
use shared::stats::ChartData;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

const CANVAS_WIDTH: u32 = 860;
const CANVAS_HEIGHT: u32 = 360;

/// Share of a label slot left empty on each side of its bar group
const SLOT_PADDING: f64 = 0.1;

const PALETTE: [RGBColor; 4] = [
    RGBColor(102, 126, 234),
    RGBColor(240, 128, 128),
    RGBColor(72, 187, 120),
    RGBColor(237, 180, 60),
];

fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Horizontal extent of bar `series` inside the slot centred on `slot`
pub fn bar_span(slot: usize, series: usize, series_count: usize) -> (f64, f64) {
    let count = series_count.max(1) as f64;
    let width = (1.0 - 2.0 * SLOT_PADDING) / count;
    let left = slot as f64 - 0.5 + SLOT_PADDING + width * series as f64;
    (left, left + width)
}

/// Value axis in currency units, always including zero with some headroom
pub fn value_bounds(data: &ChartData) -> (f64, f64) {
    let min = data
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .min()
        .unwrap_or(0)
        .min(0);
    let max = data.max_cents();
    let top = cents_to_units(max).max(1.0) * 1.1;
    let bottom = if min < 0 { cents_to_units(min) * 1.1 } else { 0.0 };
    (bottom, top)
}

/// Label under the tick at `value`; ticks between slots stay blank
pub fn axis_label(labels: &[String], value: f64) -> String {
    let slot = value.round();
    if (value - slot).abs() > 0.05 || slot < 0.0 {
        return String::new();
    }
    labels.get(slot as usize).cloned().unwrap_or_default()
}

#[derive(Properties, PartialEq)]
pub struct BarChartProps {
    pub title: AttrValue,
    pub data: ChartData,
    #[prop_or_default]
    pub loading: bool,
    #[prop_or(AttrValue::Static("¥"))]
    pub currency_symbol: AttrValue,
}

/// Grouped bar chart drawn with plotters onto a canvas
pub struct BarChart {
    canvas_ref: NodeRef,
}

impl Component for BarChart {
    type Message = ();
    type Properties = BarChartProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            canvas_ref: NodeRef::default(),
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if let Err(e) = self.draw_chart(ctx.props()) {
            Logger::warn_with_component("bar_chart", &format!("chart not drawn: {}", e));
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();

        html! {
            <div class="chart-container">
                <div class="chart-title-header">
                    <h3 class="chart-title">{props.title.clone()}</h3>
                    <div class="chart-legend">
                        {for props.data.series.iter().enumerate().map(|(i, series)| {
                            let RGBColor(r, g, b) = series_color(i);
                            html! {
                                <span class="legend-item">
                                    <span class="legend-swatch" style={format!("background: rgb({}, {}, {})", r, g, b)}></span>
                                    {series.name.clone()}
                                </span>
                            }
                        })}
                    </div>
                </div>
                {if props.data.is_empty() && props.loading {
                    html! {
                        <div class="chart-loading">
                            <div class="loading-spinner"></div>
                            <p>{"Loading chart data..."}</p>
                        </div>
                    }
                } else if props.data.is_empty() {
                    html! {
                        <div class="chart-empty">
                            <p>{"No data for this period"}</p>
                        </div>
                    }
                } else {
                    html! {
                        <div class="chart-content">
                            <canvas
                                ref={self.canvas_ref.clone()}
                                class="chart-canvas"
                                width={CANVAS_WIDTH.to_string()}
                                height={CANVAS_HEIGHT.to_string()}
                            ></canvas>
                        </div>
                    }
                }}
            </div>
        }
    }
}

impl BarChart {
    /// Draws `props.data`; an empty data set draws nothing
    fn draw_chart(&self, props: &BarChartProps) -> Result<(), String> {
        let data = &props.data;
        if data.is_empty() {
            return Ok(());
        }

        let canvas = self
            .canvas_ref
            .cast::<HtmlCanvasElement>()
            .ok_or("canvas element is not mounted")?;
        canvas.set_width(CANVAS_WIDTH);
        canvas.set_height(CANVAS_HEIGHT);

        let backend =
            CanvasBackend::with_canvas_object(canvas).ok_or("canvas has no 2d context")?;
        let root = backend.into_drawing_area();
        root.fill(&WHITE).map_err(|e| format!("clearing canvas: {}", e))?;

        let slots = data.labels.len();
        let (y_min, y_max) = value_bounds(data);
        let x_range = -0.5..(slots as f64 - 0.5);

        let mut chart = ChartBuilder::on(&root)
            .margin(15)
            .x_label_area_size(if slots > 12 { 70 } else { 40 })
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, y_min..y_max)
            .map_err(|e| format!("building axes: {}", e))?;

        let symbol = props.currency_symbol.to_string();
        let labels = &data.labels;
        let y_formatter = |v: &f64| format!("{}{:.0}", symbol, v);
        let x_formatter = |v: &f64| axis_label(labels, *v);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots.max(2))
            .y_labels(8)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .label_style(("sans-serif", 12, &RGBColor(90, 90, 90)))
            .axis_style(&RGBColor(230, 230, 230))
            .bold_line_style(&RGBColor(240, 240, 240))
            .light_line_style(&RGBColor(250, 250, 250))
            .draw()
            .map_err(|e| format!("drawing mesh: {}", e))?;

        let series_count = data.series.len();
        for (index, series) in data.series.iter().enumerate() {
            let color = series_color(index);
            let bars = series.values.iter().enumerate().map(move |(slot, cents)| {
                let (x0, x1) = bar_span(slot, index, series_count);
                Rectangle::new([(x0, 0.0), (x1, cents_to_units(*cents))], color.filled())
            });
            chart
                .draw_series(bars)
                .map_err(|e| format!("drawing series {}: {}", series.name, e))?;
        }

        root.present().map_err(|e| format!("presenting chart: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::stats::ChartSeries;

    fn data(values: Vec<i64>) -> ChartData {
        ChartData {
            labels: (1..=values.len()).map(|i| format!("M{}", i)).collect(),
            series: vec![ChartSeries {
                name: "Expense".to_string(),
                values,
            }],
        }
    }

    #[test]
    fn test_bars_stay_inside_their_slot() {
        for series in 0..3 {
            let (left, right) = bar_span(4, series, 3);
            assert!(left >= 3.5 && right <= 4.5, "bar {} spans {}..{}", series, left, right);
            assert!(right > left);
        }
        let (_, first_right) = bar_span(0, 0, 2);
        let (second_left, _) = bar_span(0, 1, 2);
        assert!((first_right - second_left).abs() < 1e-9);
    }

    #[test]
    fn test_value_bounds_include_zero() {
        let (bottom, top) = value_bounds(&data(vec![10_000, 25_000]));
        assert_eq!(bottom, 0.0);
        assert!(top > 250.0);

        let (bottom, _) = value_bounds(&data(vec![-5_000, 1_000]));
        assert!(bottom < -50.0);
    }

    #[test]
    fn test_unmounted_canvas_is_reported() {
        let chart = BarChart {
            canvas_ref: NodeRef::default(),
        };
        let props = BarChartProps {
            title: AttrValue::Static("Expense"),
            data: data(vec![10_000]),
            loading: false,
            currency_symbol: AttrValue::Static("¥"),
        };
        let error = chart.draw_chart(&props).unwrap_err();
        assert!(error.contains("not mounted"), "{}", error);
    }

    #[test]
    fn test_axis_label_only_on_slot_centres() {
        let labels = vec!["Jan".to_string(), "Feb".to_string()];
        assert_eq!(axis_label(&labels, 1.0), "Feb");
        assert_eq!(axis_label(&labels, 0.5), "");
        assert_eq!(axis_label(&labels, 2.0), "");
        assert_eq!(axis_label(&labels, -1.0), "");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_draw_empty_data_without_canvas_is_a_no_op() {
        let chart = BarChart {
            canvas_ref: NodeRef::default(),
        };
        let props = BarChartProps {
            title: AttrValue::Static("Expense"),
            data: ChartData::default(),
            loading: false,
            currency_symbol: AttrValue::Static("¥"),
        };
        assert_eq!(chart.draw_chart(&props), Ok(()));
    }
}
