//! SVG charts rendered with plotters. Presentational only: nothing
//! downstream reads these files.

use crate::{
    aggregate::{Aggregates, CategoryPerformance, LiteracyBracket},
    error::{AnalysisError, AnalysisResult},
    generator::{transactions::TransactionRecord, Dataset},
    modeling::{risk::RiskModelOutcome, ModelingReport},
    types::{IncomeBracket, PaymentMethod, Tier},
};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

const PANEL: (u32, u32) = (1200, 900);
const DASHBOARD: (u32, u32) = (1800, 1200);
const SINGLE: (u32, u32) = (900, 600);
const MAX_PURCHASES_SHOWN: u32 = 20;
const DISTANCE_BINS: usize = 30;
const SCATTER_POINTS_PER_TIER: usize = 3000;

fn chart_err<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::Chart(e.to_string())
}

fn color(i: usize) -> RGBColor {
    PALETTE[i % PALETTE.len()]
}

/// Range from zero (or the most negative value) to the largest value, padded.
fn bar_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (mut lo, mut hi) = (0.0f64, 0.0f64);
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let pad = ((hi - lo) * 0.1).max(1e-6);
    let lo = if lo < 0.0 { lo - pad } else { 0.0 };
    lo..hi + pad
}

/// Range spanning the data only, padded.
fn span_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((hi - lo) * 0.1).max(1e-6);
    lo - pad..hi + pad
}

fn label_at(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

fn tier_labels() -> Vec<String> {
    Tier::ALL.iter().map(|t| t.label().to_string()).collect()
}

/// Equal-width bin counts over `range` as (bin centre, count). Values
/// outside the range are dropped; the upper edge lands in the last bin.
fn histogram(values: impl IntoIterator<Item = f64>, range: Range<f64>, bins: usize) -> Vec<(f64, f64)> {
    let bins = bins.max(1);
    let width = (range.end - range.start) / bins as f64;
    let mut counts = vec![0usize; bins];
    if width > 0.0 {
        for v in values.into_iter().filter(|v| range.start <= *v && *v <= range.end) {
            let i = (((v - range.start) / width) as usize).min(bins - 1);
            counts[i] += 1;
        }
    }
    counts
        .iter()
        .enumerate()
        .map(|(i, &n)| (range.start + width * (i as f64 + 0.5), n as f64))
        .collect()
}

fn bar_panel(area: &Area<'_>, title: &str, y_desc: &str, labels: &[String], values: &[f64]) -> AnalysisResult<()> {
    let n = labels.len().max(1);
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..n as f64 - 0.5, bar_range(values.iter().copied()))
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| label_at(labels, *x))
        .y_desc(y_desc)
        .draw()
        .map_err(chart_err)?;
    chart
        .draw_series(values.iter().enumerate().map(|(i, &v)| {
            let x = i as f64;
            Rectangle::new([(x - 0.35, 0.0), (x + 0.35, v)], color(i).filled())
        }))
        .map_err(chart_err)?;
    Ok(())
}

/// Horizontal bars, first label at the top.
fn hbar_panel(area: &Area<'_>, title: &str, x_desc: &str, labels: &[String], values: &[f64]) -> AnalysisResult<()> {
    let n = labels.len().max(1);
    let flipped: Vec<String> = labels.iter().rev().cloned().collect();
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(180)
        .build_cartesian_2d(bar_range(values.iter().copied()), -0.5f64..n as f64 - 0.5)
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|y| label_at(&flipped, *y))
        .x_desc(x_desc)
        .draw()
        .map_err(chart_err)?;
    chart
        .draw_series(values.iter().rev().enumerate().map(|(i, &v)| {
            let y = i as f64;
            Rectangle::new([(0.0, y - 0.35), (v, y + 0.35)], color(0).filled())
        }))
        .map_err(chart_err)?;
    Ok(())
}

/// One group per category, one bar per series inside each group.
fn grouped_bar_panel(
    area: &Area<'_>,
    title: &str,
    y_desc: &str,
    categories: &[String],
    series: &[(String, Vec<f64>)],
) -> AnalysisResult<()> {
    let n = categories.len().max(1);
    let width = 0.8 / series.len().max(1) as f64;
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            -0.5f64..n as f64 - 0.5,
            bar_range(series.iter().flat_map(|(_, v)| v.iter().copied())),
        )
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| label_at(categories, *x))
        .y_desc(y_desc)
        .draw()
        .map_err(chart_err)?;

    for (s, (name, values)) in series.iter().enumerate() {
        let c = color(s);
        chart
            .draw_series(values.iter().enumerate().map(move |(i, &v)| {
                let left = i as f64 - 0.4 + s as f64 * width;
                Rectangle::new([(left, 0.0), (left + width, v)], c.filled())
            }))
            .map_err(chart_err)?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], c.filled()));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;
    Ok(())
}

/// Stacked bars: `layers[l][i]` is layer `l` of bar `i`.
fn stacked_bar_panel(
    area: &Area<'_>,
    title: &str,
    y_desc: &str,
    labels: &[String],
    layers: &[(String, Vec<f64>)],
) -> AnalysisResult<()> {
    let n = labels.len().max(1);
    let totals: Vec<f64> = (0..labels.len())
        .map(|i| layers.iter().map(|(_, v)| v.get(i).copied().unwrap_or(0.0)).sum())
        .collect();
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..n as f64 - 0.5, bar_range(totals))
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| label_at(labels, *x))
        .y_desc(y_desc)
        .draw()
        .map_err(chart_err)?;

    let mut base = vec![0.0; labels.len()];
    for (l, (name, values)) in layers.iter().enumerate() {
        let c = color(l + 3);
        let bars: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let x = i as f64;
                let bottom = base[i];
                base[i] += v;
                Rectangle::new([(x - 0.35, bottom), (x + 0.35, bottom + v)], c.filled())
            })
            .collect();
        chart
            .draw_series(bars)
            .map_err(chart_err)?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], c.filled()));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;
    Ok(())
}

fn line_panel(
    area: &Area<'_>,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    series: &[(String, Vec<(f64, f64)>)],
    from_zero: bool,
) -> AnalysisResult<()> {
    let xs = span_range(series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.0)));
    let ys_iter = series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.1));
    let ys = if from_zero { bar_range(ys_iter) } else { span_range(ys_iter) };
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(xs, ys)
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(chart_err)?;

    for (s, (name, points)) in series.iter().enumerate() {
        let c = color(s);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), c.stroke_width(2)))
            .map_err(chart_err)?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], c));
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 3, c.filled())))
            .map_err(chart_err)?;
    }
    if series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_err)?;
    }
    Ok(())
}

fn scatter_panel(
    area: &Area<'_>,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    series: &[(String, Vec<(f64, f64)>)],
) -> AnalysisResult<()> {
    let xs = span_range(series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.0)));
    let ys = bar_range(series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.1)));
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(xs, ys)
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(chart_err)?;
    for (s, (name, points)) in series.iter().enumerate() {
        let c = color(s);
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 2, c.mix(0.4).filled())))
            .map_err(chart_err)?
            .label(name.as_str())
            .legend(move |(x, y)| Circle::new((x + 5, y), 4, c.filled()));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;
    Ok(())
}

// ── Individual charts ─────────────────────────────────────────────

/// One column of a per-tier table, in `Tier::ALL` order.
fn tier_values<T>(rows: &[T], f: impl Fn(&T) -> f64) -> Vec<f64> {
    rows.iter().map(f).collect()
}

fn regional_dashboard(path: &Path, agg: &Aggregates) -> AnalysisResult<()> {
    let root = SVGBackend::new(path, DASHBOARD).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let (top, rest) = root.split_vertically(DASHBOARD.1 / 3);
    let panels = rest.split_evenly((2, 3));
    let labels = tier_labels();

    bar_panel(
        &top,
        "Total Revenue by Region (₹M)",
        "Revenue (₹M)",
        &labels,
        &tier_values(&agg.regional, |r| r.total_revenue / 1_000_000.0),
    )?;
    bar_panel(&panels[0], "Profit Margin %", "Margin %", &labels, &tier_values(&agg.regional, |r| r.margin_pct))?;
    bar_panel(
        &panels[1],
        "Avg Delivery Time (hours)",
        "Hours",
        &labels,
        &tier_values(&agg.regional, |r| r.avg_delivery_hours),
    )?;
    bar_panel(
        &panels[2],
        "Avg Logistics Cost (₹)",
        "Cost (₹)",
        &labels,
        &tier_values(&agg.regional, |r| r.avg_logistics_cost),
    )?;

    let layers: Vec<(String, Vec<f64>)> = PaymentMethod::ALL
        .iter()
        .map(|&method| {
            let counts = Tier::ALL
                .iter()
                .map(|&tier| {
                    agg.payments
                        .iter()
                        .find(|m| m.tier == tier && m.method == method)
                        .map_or(0.0, |m| m.transactions as f64)
                })
                .collect();
            (method.label().to_string(), counts)
        })
        .collect();
    stacked_bar_panel(&panels[3], "Payment Methods by Region", "Transactions", &labels, &layers)?;

    let perishable = tier_values(&agg.perishables, |p| p.perishable_pct);
    let non_perishable: Vec<f64> = agg
        .perishables
        .iter()
        .map(|p| if p.transactions > 0 { 100.0 - p.perishable_pct } else { 0.0 })
        .collect();
    grouped_bar_panel(
        &panels[4],
        "Perishable vs Non-Perishable Sales",
        "% of Transactions",
        &labels,
        &[("Non-Perishable".to_string(), non_perishable), ("Perishable".to_string(), perishable)],
    )?;
    bar_panel(
        &panels[5],
        "Revenue per Customer (₹)",
        "Revenue (₹)",
        &labels,
        &tier_values(&agg.regional, |r| r.revenue_per_customer),
    )?;
    root.present().map_err(chart_err)?;
    Ok(())
}

/// Category axis plus one series per tier for a category-table column.
fn category_series(
    agg: &Aggregates,
    f: fn(&CategoryPerformance) -> f64,
) -> (Vec<String>, Vec<(String, Vec<f64>)>) {
    let mut categories: Vec<String> = agg.categories.iter().map(|c| c.category.clone()).collect();
    categories.sort();
    categories.dedup();
    let series = Tier::ALL
        .iter()
        .map(|&tier| {
            let values = categories
                .iter()
                .map(|cat| {
                    agg.categories
                        .iter()
                        .find(|c| c.tier == tier && &c.category == cat)
                        .map_or(0.0, f)
                })
                .collect();
            (tier.label().to_string(), values)
        })
        .collect();
    (categories, series)
}

fn category_analysis(path: &Path, agg: &Aggregates) -> AnalysisResult<()> {
    let root = SVGBackend::new(path, DASHBOARD).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let panels = root.split_evenly((2, 2));

    let (categories, revenue) = category_series(agg, |c| c.revenue / 1_000.0);
    grouped_bar_panel(&panels[0], "Revenue by Category & Region (₹K)", "Revenue (₹K)", &categories, &revenue)?;
    let (categories, margin) = category_series(agg, |c| c.margin_pct);
    grouped_bar_panel(&panels[1], "Margin % by Category & Region", "Margin %", &categories, &margin)?;

    let names: Vec<String> = agg.top_products.iter().map(|p| p.product_name.clone()).collect();
    let revenue: Vec<f64> = agg.top_products.iter().map(|p| p.revenue / 1_000.0).collect();
    hbar_panel(
        &panels[2],
        &format!("Top {} Products by Revenue", names.len()),
        "Revenue (₹K)",
        &names,
        &revenue,
    )?;

    let discount_points: Vec<(f64, f64)> = agg
        .discounts
        .iter()
        .map(|d| (d.discount_pct as f64, d.avg_margin_pct))
        .collect();
    line_panel(
        &panels[3],
        "Impact of Discount on Margin %",
        "Discount %",
        "Avg Margin %",
        &[("Avg margin %".to_string(), discount_points)],
        false,
    )?;
    root.present().map_err(chart_err)?;
    Ok(())
}

fn logistics_supply_chain(path: &Path, agg: &Aggregates, transactions: &[TransactionRecord]) -> AnalysisResult<()> {
    let root = SVGBackend::new(path, PANEL).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let panels = root.split_evenly((2, 2));
    let labels = tier_labels();

    let max_km = transactions
        .iter()
        .map(|t| t.delivery_distance_km)
        .fold(0.0f64, f64::max);
    let distances: Vec<(String, Vec<(f64, f64)>)> = Tier::ALL
        .iter()
        .map(|&tier| {
            let km = transactions
                .iter()
                .filter(|t| t.region_tier == tier)
                .map(|t| t.delivery_distance_km);
            (tier.label().to_string(), histogram(km, 0.0..max_km.max(1.0), DISTANCE_BINS))
        })
        .collect();
    line_panel(
        &panels[0],
        "Delivery Distance Distribution",
        "Distance (km)",
        "Transactions",
        &distances,
        true,
    )?;

    let times: Vec<(String, Vec<(f64, f64)>)> = Tier::ALL
        .iter()
        .map(|&tier| {
            let points = transactions
                .iter()
                .filter(|t| t.region_tier == tier)
                .take(SCATTER_POINTS_PER_TIER)
                .map(|t| (t.delivery_distance_km, t.delivery_time_hours))
                .collect();
            (tier.label().to_string(), points)
        })
        .collect();
    scatter_panel(&panels[1], "Delivery Time vs Distance", "Distance (km)", "Delivery Time (hours)", &times)?;

    let layers = vec![
        ("Product Cost".to_string(), tier_values(&agg.costs, |c| c.avg_product_cost)),
        ("Logistics Cost".to_string(), tier_values(&agg.costs, |c| c.avg_logistics_cost)),
        ("Spoilage Cost".to_string(), tier_values(&agg.costs, |c| c.avg_spoilage_cost)),
    ];
    stacked_bar_panel(&panels[2], "Cost Breakdown by Region", "Avg Cost (₹)", &labels, &layers)?;

    let stockouts = tier_values(&agg.stockouts, |s| s.avg_stockout_days);
    bar_panel(&panels[3], "Avg Stockout Days per Month", "Days", &labels, &stockouts)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

fn customer_insights(path: &Path, agg: &Aggregates) -> AnalysisResult<()> {
    let root = SVGBackend::new(path, PANEL).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let panels = root.split_evenly((2, 2));
    let labels = tier_labels();

    let series: Vec<(String, Vec<(f64, f64)>)> = Tier::ALL
        .iter()
        .map(|&tier| {
            let mut counts = vec![0usize; MAX_PURCHASES_SHOWN as usize + 1];
            for c in agg.customers.iter().filter(|c| c.region_tier == tier) {
                if c.purchase_count <= MAX_PURCHASES_SHOWN {
                    counts[c.purchase_count as usize] += 1;
                }
            }
            let points = counts
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, &n)| (k as f64, n as f64))
                .collect();
            (tier.label().to_string(), points)
        })
        .collect();
    line_panel(
        &panels[0],
        "Purchase Frequency Distribution",
        "Number of Purchases",
        "Number of Customers",
        &series,
        true,
    )?;

    let income: Vec<(String, Vec<f64>)> = IncomeBracket::ALL
        .iter()
        .map(|&bracket| {
            let values = Tier::ALL
                .iter()
                .map(|&tier| {
                    agg.income_revenue
                        .iter()
                        .find(|r| r.tier == tier && r.income_bracket == bracket)
                        .map_or(0.0, |r| r.avg_revenue)
                })
                .collect();
            (bracket.label().to_string(), values)
        })
        .collect();
    grouped_bar_panel(&panels[1], "Avg Revenue by Region & Income", "Avg Revenue (₹)", &labels, &income)?;

    let repeat = tier_values(&agg.behavior, |b| b.repeat_rate_pct);
    bar_panel(&panels[2], "Repeat Purchase Rate (3+ orders)", "Repeat Rate %", &labels, &repeat)?;

    let literacy: Vec<(String, Vec<f64>)> = LiteracyBracket::ALL
        .iter()
        .map(|&bracket| {
            let values = Tier::ALL
                .iter()
                .map(|&tier| {
                    agg.literacy_purchases
                        .iter()
                        .find(|r| r.tier == tier && r.bracket == bracket)
                        .map_or(0.0, |r| r.avg_purchases)
                })
                .collect();
            (format!("{} literacy", bracket.label()), values)
        })
        .collect();
    grouped_bar_panel(
        &panels[3],
        "Digital Literacy vs Purchase Frequency",
        "Avg Purchases",
        &labels,
        &literacy,
    )?;
    root.present().map_err(chart_err)?;
    Ok(())
}

fn feature_importance(path: &Path, importance: &[(String, f64)]) -> AnalysisResult<()> {
    let root = SVGBackend::new(path, SINGLE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let top: Vec<&(String, f64)> = importance.iter().take(10).collect();
    let labels: Vec<String> = top.iter().map(|(name, _)| name.clone()).collect();
    let values: Vec<f64> = top.iter().map(|(_, v)| *v).collect();
    bar_panel(&root, "Top Features for Margin Risk Prediction", "Importance", &labels, &values)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

fn clv_prediction(path: &Path, actual: &[f64], predicted: &[f64]) -> AnalysisResult<()> {
    let root = SVGBackend::new(path, SINGLE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let span = span_range(actual.iter().chain(predicted).copied());
    let mut chart = ChartBuilder::on(&root)
        .caption("Customer Lifetime Value: Predicted vs Actual", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(span.clone(), span.clone())
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .x_desc("Actual Revenue (₹)")
        .y_desc("Predicted Revenue (₹)")
        .draw()
        .map_err(chart_err)?;
    chart
        .draw_series(
            actual
                .iter()
                .zip(predicted)
                .map(|(&a, &p)| Circle::new((a, p), 2, color(0).mix(0.5).filled())),
        )
        .map_err(chart_err)?;
    chart
        .draw_series(LineSeries::new(
            [(span.start, span.start), (span.end, span.end)],
            RED.stroke_width(2),
        ))
        .map_err(chart_err)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

fn clustering_optimization(path: &Path, models: &ModelingReport) -> AnalysisResult<()> {
    let root = SVGBackend::new(path, (1200, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let (left, right) = root.split_horizontally(600);
    let elbow = &models.segments.elbow;
    let inertia: Vec<(f64, f64)> = elbow.iter().map(|e| (e.k as f64, e.inertia)).collect();
    let silhouette: Vec<(f64, f64)> = elbow.iter().map(|e| (e.k as f64, e.silhouette)).collect();
    line_panel(&left, "Elbow Method", "Number of Clusters", "Inertia", &[("Inertia".into(), inertia)], false)?;
    line_panel(
        &right,
        "Silhouette Score",
        "Number of Clusters",
        "Silhouette",
        &[("Silhouette".into(), silhouette)],
        false,
    )?;
    root.present().map_err(chart_err)?;
    Ok(())
}

fn customer_segmentation(path: &Path, models: &ModelingReport) -> AnalysisResult<()> {
    let root = SVGBackend::new(path, SINGLE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let mut profiles: Vec<_> = models.segments.profiles.iter().collect();
    profiles.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
    let labels: Vec<String> = profiles
        .iter()
        .map(|p| format!("{} (#{})", p.name, p.cluster))
        .collect();
    let values: Vec<f64> = profiles.iter().map(|p| p.total_revenue / 1_000.0).collect();
    bar_panel(&root, "Total Revenue by Customer Segment (₹K)", "Revenue (₹K)", &labels, &values)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

/// Render every chart into `dir`. The feature-importance chart is only
/// drawn when the risk classifier was trained.
pub fn render_all(
    dir: &Path,
    dataset: &Dataset,
    agg: &Aggregates,
    models: &ModelingReport,
) -> AnalysisResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    let mut save = |name: &str, draw: &dyn Fn(&Path) -> AnalysisResult<()>| -> AnalysisResult<()> {
        let path = dir.join(name);
        draw(&path)?;
        log::info!("charts: saved {}", path.display());
        written.push(path);
        Ok(())
    };

    save("regional_performance_dashboard.svg", &|p| regional_dashboard(p, agg))?;
    save("category_analysis.svg", &|p| category_analysis(p, agg))?;
    save("logistics_supply_chain.svg", &|p| logistics_supply_chain(p, agg, &dataset.transactions))?;
    save("customer_insights.svg", &|p| customer_insights(p, agg))?;
    match &models.risk {
        RiskModelOutcome::Trained(report) => save("feature_importance_margin_risk.svg", &|p| {
            feature_importance(p, &report.feature_importance)
        })?,
        RiskModelOutcome::Skipped { .. } => {
            log::warn!("charts: risk model skipped, no feature importance chart")
        }
    }
    save("clv_prediction.svg", &|p| clv_prediction(p, &models.clv.actual, &models.clv.predicted))?;
    save("clustering_optimization.svg", &|p| clustering_optimization(p, models))?;
    save("customer_segmentation.svg", &|p| customer_segmentation(p, models))?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_range_includes_zero_and_negatives() {
        let r = bar_range([5.0, 10.0]);
        assert_eq!(r.start, 0.0);
        assert!(r.end > 10.0);
        let r = bar_range([-4.0, 6.0]);
        assert!(r.start < -4.0);
    }

    #[test]
    fn labels_only_on_integer_ticks() {
        let labels = tier_labels();
        assert_eq!(label_at(&labels, 1.0), "Tier 2");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, 7.0), "");
    }

    #[test]
    fn histogram_bins_cover_the_range() {
        let bins = histogram([0.0, 0.5, 1.0, 9.9, 10.0, 12.0, -1.0], 0.0..10.0, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0], (0.5, 2.0));
        assert_eq!(bins[1].1, 1.0);
        assert_eq!(bins[9], (9.5, 2.0));
        let total: f64 = bins.iter().map(|b| b.1).sum();
        assert_eq!(total, 5.0);
    }

    #[test]
    fn empty_range_histogram_counts_nothing() {
        let bins = histogram([3.0, 3.0], 3.0..3.0, 4);
        assert_eq!(bins.len(), 4);
        assert!(bins.iter().all(|b| b.1 == 0.0));
    }
}
