use std::collections::BTreeMap;
use std::f32::consts::TAU;

use eframe::egui::{self, Color32, Mesh, RichText, Sense, Shape, Ui, Vec2};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Points};

use crate::color::{generate_palette, ColorMap};
use crate::data::analysis::Bucket;
use crate::data::model::Movie;

const PLOT_HEIGHT: f32 = 320.0;
const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

/// Shorten long axis labels so neighbouring bars stay readable.
fn short_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

// ---------------------------------------------------------------------------
// Bar chart (category / value pairs)
// ---------------------------------------------------------------------------

/// Vertical bars, one per `(label, value)` pair, labelled on the x axis.
pub fn bar_chart(ui: &mut Ui, id: &str, items: &[(String, f64)], y_label: &str) {
    let bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(i, (label, value))| Bar::new(i as f64, *value).name(label).width(0.7))
        .collect();
    let labels: Vec<String> = items.iter().map(|(l, _)| short_label(l, 14)).collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .y_axis_label(y_label)
        .allow_scroll(false)
        .allow_drag(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
        });
}

// ---------------------------------------------------------------------------
// Histogram (value distribution)
// ---------------------------------------------------------------------------

/// Buckets drawn edge to edge. With `log_counts` the bar heights are
/// `log10(count + 1)` and the y axis is labelled back in counts.
pub fn histogram(ui: &mut Ui, id: &str, buckets: &[Bucket], x_label: &str, log_counts: bool) {
    let bars: Vec<Bar> = buckets
        .iter()
        .map(|b| {
            let height = if log_counts {
                (b.count as f64 + 1.0).log10()
            } else {
                b.count as f64
            };
            // A single-value bucket has no width; give it a visible one.
            let width = if b.width() > 0.0 { b.width() } else { 1.0 };
            Bar::new(b.center(), height)
                .width(width)
                .name(format!("{:.2} to {:.2}: {}", b.start, b.end, b.count))
        })
        .collect();

    let mut plot = Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(x_label)
        .allow_scroll(false)
        .allow_drag(false);
    if log_counts {
        plot = plot
            .y_axis_label("count (log scale)")
            .y_axis_formatter(|mark, _range| format!("{:.0}", 10f64.powf(mark.value) - 1.0));
    } else {
        plot = plot.y_axis_label("count");
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
    });
}

// ---------------------------------------------------------------------------
// Pie chart (category / proportion pairs)
// ---------------------------------------------------------------------------

/// Cumulative `(start, end)` fractions of the whole for each value.
/// Non-positive values get an empty slice; an all-zero input yields all
/// empty slices.
pub fn pie_slices(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let mut acc = 0.0;
    values
        .iter()
        .map(|v| {
            let share = if total > 0.0 && *v > 0.0 { v / total } else { 0.0 };
            let slice = (acc, acc + share);
            acc += share;
            slice
        })
        .collect()
}

/// Index of the slice containing `fraction` of a full turn.
pub fn slice_at(slices: &[(f64, f64)], fraction: f64) -> Option<usize> {
    slices
        .iter()
        .position(|(start, end)| end > start && fraction >= *start && fraction < *end)
}

/// Pie chart painted directly, with a legend of label and share.
pub fn pie_chart(ui: &mut Ui, items: &[(String, f64)]) {
    let values: Vec<f64> = items.iter().map(|(_, v)| *v).collect();
    let slices = pie_slices(&values);
    let colors = generate_palette(items.len());

    ui.horizontal(|ui: &mut Ui| {
        let size = Vec2::splat(PLOT_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.45;
        let painter = ui.painter_at(rect);

        for ((start, end), color) in slices.iter().zip(&colors) {
            if end <= start {
                continue;
            }
            let mut mesh = Mesh::default();
            mesh.colored_vertex(center, *color);
            let steps = (((end - start) * 180.0).ceil() as usize).max(1);
            for s in 0..=steps {
                let t = start + (end - start) * s as f64 / steps as f64;
                // Start at twelve o'clock and go clockwise.
                let angle = t as f32 * TAU - TAU / 4.0;
                mesh.colored_vertex(center + radius * Vec2::angled(angle), *color);
            }
            for s in 0..steps as u32 {
                mesh.add_triangle(0, s + 1, s + 2);
            }
            painter.add(Shape::mesh(mesh));
        }

        if let Some(pos) = response.hover_pos() {
            let d = pos - center;
            if d.length() <= radius {
                let fraction = ((d.angle() + TAU / 4.0).rem_euclid(TAU) / TAU) as f64;
                if let Some(i) = slice_at(&slices, fraction) {
                    let (start, end) = slices[i];
                    let (label, value) = &items[i];
                    response.on_hover_text_at_pointer(format!(
                        "{label}\n{value:.0} ({:.1}%)",
                        (end - start) * 100.0
                    ));
                }
            }
        }

        ui.vertical(|ui: &mut Ui| {
            for (((label, _), (start, end)), color) in items.iter().zip(&slices).zip(&colors) {
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, *color);
                    ui.label(format!("{label} ({:.1}%)", (end - start) * 100.0));
                });
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Scatter plot (two numeric axes, colour and size encodings)
// ---------------------------------------------------------------------------

/// One point of a scatter plot with its encodings resolved.
pub struct ScatterPoint<'a> {
    pub movie: &'a Movie,
    pub x: f64,
    pub y: f64,
    /// Category used for colour and legend grouping.
    pub group: Option<&'a str>,
    /// Value driving the marker size.
    pub size: f64,
}

/// Marker radius in points, scaled by the square root of `size / max_size`.
pub fn marker_radius(size: f64, max_size: f64) -> f32 {
    const MIN: f32 = 2.0;
    const MAX: f32 = 12.0;
    if max_size <= 0.0 || size <= 0.0 {
        return MIN;
    }
    MIN + (MAX - MIN) * (size / max_size).clamp(0.0, 1.0).sqrt() as f32
}

/// Legend name of a group, with a placeholder for a missing category.
fn group_label(group: Option<&str>) -> &str {
    group.unwrap_or(MISSING_GROUP)
}

const MISSING_GROUP: &str = "n/a";

/// Points of one group drawn with one marker radius.
#[derive(Debug, PartialEq)]
struct ScatterSeries<'a> {
    group: Option<&'a str>,
    radius: f32,
    coords: Vec<[f64; 2]>,
}

/// Bucket points by group and whole-point marker radius, so each bucket is
/// drawn as a single `Points` item.
fn group_series<'a>(points: &[ScatterPoint<'a>]) -> Vec<ScatterSeries<'a>> {
    let max_size = points.iter().map(|p| p.size).fold(0.0, f64::max);
    let mut buckets: BTreeMap<(Option<&'a str>, u8), Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        let radius = marker_radius(p.size, max_size).round() as u8;
        buckets.entry((p.group, radius)).or_default().push([p.x, p.y]);
    }
    buckets
        .into_iter()
        .map(|((group, radius), coords)| ScatterSeries {
            group,
            radius: f32::from(radius),
            coords,
        })
        .collect()
}

/// Hover lookup entry for one plotted movie.
struct HoverEntry {
    group: String,
    x: f64,
    y: f64,
    text: String,
}

/// The entry of `group` closest to `at`, with each axis scaled by its span.
fn nearest_in_group<'h>(
    entries: &'h [HoverEntry],
    group: &str,
    at: (f64, f64),
    span: (f64, f64),
) -> Option<&'h HoverEntry> {
    let distance = |e: &HoverEntry| ((e.x - at.0) / span.0).abs() + ((e.y - at.1) / span.1).abs();
    entries
        .iter()
        .filter(|e| e.group == group)
        .min_by(|a, b| distance(a).total_cmp(&distance(b)))
}

pub fn scatter_plot(
    ui: &mut Ui,
    id: &str,
    points: &[ScatterPoint<'_>],
    colors: &ColorMap,
    axis_labels: (&str, &str),
) {
    let hover: Vec<HoverEntry> = points
        .iter()
        .map(|p| {
            let genre = p.movie.genre.as_deref().unwrap_or("n/a");
            HoverEntry {
                group: group_label(p.group).to_string(),
                x: p.x,
                y: p.y,
                text: format!("{}\nGenre: {genre}", p.movie.display_name()),
            }
        })
        .collect();
    let span = spans(&hover);
    let series = group_series(points);
    let (x_label, y_label) = axis_labels;
    let (x_name, y_name) = (x_label.to_string(), y_label.to_string());

    Plot::new(id)
        .height(PLOT_HEIGHT + 80.0)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .label_formatter(move |name: &str, value: &PlotPoint| {
            if name.is_empty() {
                return String::new();
            }
            match nearest_in_group(&hover, name, (value.x, value.y), span) {
                Some(entry) => format!(
                    "{}\nLanguage: {name}\n{x_name}: {:.0}\n{y_name}: {:.1}",
                    entry.text, value.x, value.y
                ),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            for s in series {
                // Series sharing a name share one legend entry.
                plot_ui.points(
                    Points::new(s.coords)
                        .radius(s.radius)
                        .color(colors.color_for(s.group).gamma_multiply(0.8))
                        .filled(true)
                        .name(group_label(s.group)),
                );
            }
        });
}

fn spans(entries: &[HoverEntry]) -> (f64, f64) {
    let span = |get: fn(&HoverEntry) -> f64| {
        let lo = entries.iter().map(get).fold(f64::INFINITY, f64::min);
        let hi = entries.iter().map(get).fold(f64::NEG_INFINITY, f64::max);
        if hi > lo {
            hi - lo
        } else {
            1.0
        }
    };
    (span(|e| e.x), span(|e| e.y))
}

/// Informational placeholder shown instead of a chart.
pub fn no_data(ui: &mut Ui, message: &str) {
    ui.add_space(8.0);
    ui.label(RichText::new(message).italics().color(egui::Color32::GRAY));
    ui.add_space(8.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::movie;

    #[test]
    fn slices_partition_the_circle() {
        let s = pie_slices(&[2.0, 1.0, 1.0]);
        assert_eq!(s, vec![(0.0, 0.5), (0.5, 0.75), (0.75, 1.0)]);
        assert_eq!(slice_at(&s, 0.6), Some(1));
        assert_eq!(slice_at(&s, 0.0), Some(0));
    }

    #[test]
    fn non_positive_values_get_empty_slices() {
        let s = pie_slices(&[0.0, 3.0]);
        assert_eq!(s, vec![(0.0, 0.0), (0.0, 1.0)]);
        assert_eq!(slice_at(&s, 0.0), Some(1));
        assert!(pie_slices(&[0.0, 0.0]).iter().all(|(a, b)| a == b));
    }

    #[test]
    fn marker_radius_grows_with_size() {
        assert_eq!(marker_radius(0.0, 100.0), 2.0);
        assert_eq!(marker_radius(100.0, 100.0), 12.0);
        assert!(marker_radius(25.0, 100.0) > marker_radius(4.0, 100.0));
        assert_eq!(marker_radius(5.0, 0.0), 2.0);
    }

    #[test]
    fn scatter_points_share_series_by_group_and_radius() {
        fn point(m: &Movie) -> ScatterPoint<'_> {
            let votes = m.votes.unwrap_or(0) as f64;
            ScatterPoint {
                movie: m,
                x: votes,
                y: m.rating.unwrap_or(0.0),
                group: m.language.as_deref(),
                size: votes,
            }
        }
        let small = movie("Anbe Sivam", 2003, "Drama", 8.6, 100, "Tamil");
        let big = movie("Shawshank", 1994, "Drama", 9.3, 10_000, "English");
        let points = [point(&small), point(&small), point(&big)];

        let series = group_series(&points);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].group, Some("English"));
        assert_eq!(series[0].radius, 12.0);
        assert_eq!(series[1].group, Some("Tamil"));
        assert_eq!(series[1].coords, vec![[100.0, 8.6], [100.0, 8.6]]);
    }

    #[test]
    fn hover_lookup_stays_within_the_hovered_group() {
        let entry = |group: &str, x: f64, y: f64, text: &str| HoverEntry {
            group: group.to_string(),
            x,
            y,
            text: text.to_string(),
        };
        let entries = [
            entry("Hindi", 1_000.0, 8.0, "Andhadhun"),
            entry("Tamil", 1_010.0, 8.0, "Anbe Sivam"),
            entry("Tamil", 9_000.0, 6.0, "Far away"),
        ];
        let span = spans(&entries);

        let hit = nearest_in_group(&entries, "Tamil", (1_000.0, 8.0), span).unwrap();
        assert_eq!(hit.text, "Anbe Sivam");
        let hit = nearest_in_group(&entries, "Hindi", (1_010.0, 8.0), span).unwrap();
        assert_eq!(hit.text, "Andhadhun");
        assert!(nearest_in_group(&entries, "Telugu", (1_000.0, 8.0), span).is_none());
    }

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(short_label("Drishyam", 14), "Drishyam");
        assert_eq!(short_label("The Shawshank Redemption", 8), "The Sha…");
    }
}
