use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::epaint::Mesh;
use eframe::egui::{Color32, RichText, Sense, Shape, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints};

use crate::color::ColorMap;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dashboard layout
// ---------------------------------------------------------------------------

/// Render the four charts for the current filtered view.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV to view appointments  (File → Open…)");
        });
        return;
    }

    let agg = &state.aggregates;
    let empty = state.visible_indices.is_empty();

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].heading("Appointments by Staff");
        if empty {
            empty_placeholder(&mut cols[0]);
        } else {
            counts_bar_chart(&mut cols[0], "staff_chart", &agg.staff, &state.staff_colors);
        }

        cols[1].heading("DSS Students Distribution");
        if empty {
            empty_placeholder(&mut cols[1]);
        } else {
            donut_chart(&mut cols[1], &agg.dss);
        }
    });

    ui.add_space(12.0);
    ui.heading("Appointments Timeline");
    if empty {
        empty_placeholder(ui);
    } else {
        timeline_chart(ui, &agg.daily);
    }

    ui.add_space(12.0);
    ui.heading("Common Project Types");
    if empty {
        empty_placeholder(ui);
    } else if agg.keywords.is_empty() {
        ui.label(RichText::new("No vocabulary keywords in the current statements.").italics());
    } else {
        let labels: Vec<(String, usize)> = agg
            .keywords
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        let colors = ColorMap::new(labels.iter().map(|(k, _)| k.as_str()));
        let counts: BTreeMap<String, usize> = labels.into_iter().collect();
        counts_bar_chart(ui, "keyword_chart", &counts, &colors);
    }
}

fn empty_placeholder(ui: &mut Ui) {
    ui.label(RichText::new("No appointments match the current filters.").italics());
}

// ---------------------------------------------------------------------------
// Bar chart over labelled counts
// ---------------------------------------------------------------------------

fn counts_bar_chart(ui: &mut Ui, id: &str, counts: &BTreeMap<String, usize>, colors: &ColorMap) {
    let labels: Vec<String> = counts.keys().cloned().collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (label, &count))| {
            Bar::new(i as f64, count as f64)
                .width(0.6)
                .name(label)
                .fill(colors.color_for(label))
        })
        .collect();

    let axis_labels = labels.clone();
    Plot::new(id)
        .height(280.0)
        .y_axis_label("Appointments")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            axis_labels
                .get(rounded as usize)
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Timeline (appointments per day)
// ---------------------------------------------------------------------------

fn timeline_chart(ui: &mut Ui, daily: &[(NaiveDate, usize)]) {
    // Dates map to their day number so gaps keep their true width.
    let points: PlotPoints = daily
        .iter()
        .map(|&(d, c)| [d.num_days_from_ce() as f64, c as f64])
        .collect();

    Plot::new("timeline_chart")
        .height(240.0)
        .y_axis_label("Appointments")
        .allow_scroll(false)
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.format("%b %e").to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .color(Color32::from_rgb(0x2e, 0x86, 0xc1))
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Donut chart (categorical distribution)
// ---------------------------------------------------------------------------

/// egui_plot has no pie chart, so the distribution is drawn directly as a
/// triangle-fan ring with a wrapped legend underneath.
fn donut_chart(ui: &mut Ui, counts: &BTreeMap<String, usize>) {
    let total: usize = counts.values().sum();
    if total == 0 {
        empty_placeholder(ui);
        return;
    }
    let colors = ColorMap::new(counts.keys().map(String::as_str));

    let side = ui.available_width().min(280.0);
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(side), Sense::hover());
    let painter = ui.painter();
    let center = rect.center();
    let outer = side * 0.45;
    let inner = outer * 0.55;

    let mut angle = -std::f32::consts::FRAC_PI_2;
    for (label, &count) in counts {
        let sweep = count as f32 / total as f32 * std::f32::consts::TAU;
        let color = colors.color_for(label);
        let steps = ((sweep / 0.05).ceil() as usize).max(2);

        let mut mesh = Mesh::default();
        for s in 0..=steps {
            let a = angle + sweep * s as f32 / steps as f32;
            let dir = Vec2::new(a.cos(), a.sin());
            mesh.colored_vertex(center + dir * outer, color);
            mesh.colored_vertex(center + dir * inner, color);
        }
        for s in 0..steps as u32 {
            let i = 2 * s;
            mesh.add_triangle(i, i + 1, i + 2);
            mesh.add_triangle(i + 1, i + 3, i + 2);
        }
        painter.add(Shape::mesh(mesh));
        angle += sweep;
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (label, count) in counts {
            let (swatch, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
            ui.painter().rect_filled(swatch, 2, colors.color_for(label));
            ui.label(format!("{label}: {count}"));
        }
    });
}
