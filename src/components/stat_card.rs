use leptos::prelude::*;

/// Headline number on the dashboard
#[component]
pub fn StatCard(
    title: &'static str,
    #[prop(into)] value: Signal<String>,
    /// One of blue, red, green, purple, amber, gray
    #[prop(default = "blue")]
    color: &'static str,
    #[prop(default = "▣")] icon: &'static str,
) -> impl IntoView {
    view! {
        <div class="stat-card">
            <div class=format!("stat-icon-wrapper {}", color)>
                <span class="stat-icon">{icon}</span>
            </div>
            <div class="stat-info">
                <h3>{title}</h3>
                <p class="stat-value">{move || value.get()}</p>
            </div>
        </div>
    }
}

/// Titled frame around a chart
#[component]
pub fn ChartCard(title: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="chart-card">
            <h3 class="chart-title">{title}</h3>
            <div class="chart-body">{children()}</div>
        </div>
    }
}
