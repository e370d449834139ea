//! Bar Charts
//!
//! Plain HTML/CSS bars: a horizontal distribution chart and a per-day
//! activity chart.

use leptos::prelude::*;

use crate::format::format_number;
use crate::models::{series_max, NamedValue, TimelinePoint};

pub const COLORS: [&str; 8] = [
    "#4f46e5", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#6366f1", "#14b8a6",
];

/// Width of a bar as a percentage of the largest one
pub fn bar_percent(value: f64, max: f64) -> f64 {
    if max <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / max * 100.0).clamp(0.0, 100.0)
}

pub fn color_at(index: usize) -> &'static str {
    COLORS[index % COLORS.len()]
}

/// Series names of a timeline, in first-seen order
pub fn timeline_series(points: &[TimelinePoint]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for point in points {
        for name in point.counts.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names
}

#[component]
pub fn BarChart(
    #[prop(into)] data: Signal<Vec<NamedValue>>,
    #[prop(default = "אין נתונים להצגה")] empty_text: &'static str,
) -> impl IntoView {
    move || {
        let series = data.get();
        if series.is_empty() {
            return view! { <div class="no-data">{empty_text}</div> }.into_any();
        }
        let max = series_max(&series);
        view! {
            <div class="bar-chart">
                {series
                    .into_iter()
                    .enumerate()
                    .map(|(i, entry)| {
                        let style = format!(
                            "width: {:.1}%; background: {}",
                            bar_percent(entry.value, max),
                            color_at(i)
                        );
                        view! {
                            <div class="bar-row" title=entry.name.clone()>
                                <span class="bar-label">{entry.name.clone()}</span>
                                <div class="bar-track">
                                    <div class="bar-fill" style=style></div>
                                </div>
                                <span class="bar-value">{format_number(entry.value)}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        }
            .into_any()
    }
}

/// One column per day, stacked by series
#[component]
pub fn TimelineChart(#[prop(into)] points: Signal<Vec<TimelinePoint>>) -> impl IntoView {
    move || {
        let points = points.get();
        if points.is_empty() {
            return view! { <div class="no-data">"אין נתוני פעילות"</div> }.into_any();
        }
        let series = timeline_series(&points);
        let max = points
            .iter()
            .map(|p| p.counts.values().sum::<f64>())
            .fold(0.0, f64::max);
        let legend = series
            .iter()
            .enumerate()
            .map(|(i, name)| {
                view! {
                    <span class="legend-item">
                        <span class="legend-swatch" style=format!("background: {}", color_at(i))></span>
                        {name.clone()}
                    </span>
                }
            })
            .collect_view();
        let columns = points
            .into_iter()
            .map(|point| {
                let total: f64 = point.counts.values().sum();
                let segments = series
                    .iter()
                    .enumerate()
                    .filter_map(|(i, name)| {
                        let value = point.counts.get(name).copied().unwrap_or(0.0);
                        (value > 0.0).then(|| {
                            let style = format!(
                                "height: {:.1}%; background: {}",
                                bar_percent(value, max),
                                color_at(i)
                            );
                            view! { <div class="timeline-segment" style=style title=format!("{}: {}", name, value)></div> }
                        })
                    })
                    .collect_view();
                view! {
                    <div class="timeline-column" title=format!("{}: {}", point.date, format_number(total))>
                        <div class="timeline-stack">{segments}</div>
                        <span class="timeline-date">{point.date.clone()}</span>
                    </div>
                }
            })
            .collect_view();
        view! {
            <div class="timeline-chart">
                <div class="timeline-legend">{legend}</div>
                <div class="timeline-columns">{columns}</div>
            </div>
        }
            .into_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_bar_percent() {
        assert_eq!(bar_percent(5.0, 10.0), 50.0);
        assert_eq!(bar_percent(10.0, 10.0), 100.0);
        assert_eq!(bar_percent(3.0, 0.0), 0.0);
        assert_eq!(bar_percent(f64::NAN, 10.0), 0.0);
    }

    #[test]
    fn test_colors_wrap() {
        assert_eq!(color_at(0), color_at(COLORS.len()));
    }

    #[test]
    fn test_timeline_series_first_seen() {
        let point = |pairs: &[(&str, f64)]| TimelinePoint {
            date: "2024-01-01".into(),
            counts: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect::<BTreeMap<_, _>>(),
        };
        let points = vec![point(&[("update", 2.0)]), point(&[("create", 1.0), ("update", 1.0)])];
        assert_eq!(timeline_series(&points), vec!["update".to_string(), "create".to_string()]);
    }
}
