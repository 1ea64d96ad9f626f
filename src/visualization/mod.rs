//! Scatter-plot artifact: true vs predicted SOH as standalone SVG

use ndarray::Array1;

/// Geometry knobs for the scatter rendering, passed explicitly rather than
/// held as process-wide state.
#[derive(Debug, Clone)]
pub struct ScatterConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub point_radius: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 480,
            margin: 48,
            point_radius: 4.0,
        }
    }
}

/// Render a scatter of true vs predicted SOH with a dashed diagonal
/// reference line.
pub fn render_soh_scatter(
    y_true: &Array1<f64>,
    y_pred: &Array1<f64>,
    config: &ScatterConfig,
) -> String {
    let (lo, hi) = value_range(y_true, y_pred);
    let inner_w = (config.width - 2 * config.margin) as f64;
    let inner_h = (config.height - 2 * config.margin) as f64;
    let m = config.margin as f64;

    let to_x = |v: f64| m + (v - lo) / (hi - lo) * inner_w;
    let to_y = |v: f64| m + inner_h - (v - lo) / (hi - lo) * inner_h;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = config.width,
        h = config.height
    ));
    svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

    // Plot frame
    svg.push_str(&format!(
        "  <rect x=\"{m}\" y=\"{m}\" width=\"{inner_w}\" height=\"{inner_h}\" fill=\"none\" stroke=\"#333\" stroke-width=\"1\"/>\n"
    ));

    // Diagonal reference: perfect prediction
    svg.push_str(&format!(
        "  <line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"#d33\" stroke-width=\"1.5\" stroke-dasharray=\"6 4\"/>\n",
        x1 = to_x(lo),
        y1 = to_y(lo),
        x2 = to_x(hi),
        y2 = to_y(hi)
    ));

    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        svg.push_str(&format!(
            "  <circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r}\" fill=\"#4477cc\" fill-opacity=\"0.7\" stroke=\"black\" stroke-width=\"0.5\"/>\n",
            cx = to_x(*t),
            cy = to_y(*p),
            r = config.point_radius
        ));
    }

    // Axis labels and range ticks
    svg.push_str(&format!(
        "  <text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"12\">true soh</text>\n",
        x = config.width / 2,
        y = config.height - 10
    ));
    svg.push_str(&format!(
        "  <text x=\"14\" y=\"{y}\" text-anchor=\"middle\" font-size=\"12\" transform=\"rotate(-90 14 {y})\">predicted soh</text>\n",
        y = config.height / 2
    ));
    svg.push_str(&format!(
        "  <text x=\"{m}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"10\">{lo:.2}</text>\n",
        y = config.height - 28
    ));
    svg.push_str(&format!(
        "  <text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"10\">{hi:.2}</text>\n",
        x = config.width as f64 - m,
        y = config.height - 28
    ));

    svg.push_str("</svg>\n");
    svg
}

fn value_range(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in y_true.iter().chain(y_pred.iter()) {
        lo = lo.min(*v);
        hi = hi.max(*v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo < 1e-12 {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = 0.05 * (hi - lo);
    (lo - pad, hi + pad)
}
