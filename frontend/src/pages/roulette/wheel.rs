use yew::prelude::*;
use regret_shared::WheelLayout;
use crate::styles;

// Cubic-bezier used for the landing deceleration.
const SPIN_EASING: &str = "cubic-bezier(0.12, 0.82, 0.18, 1)";

#[derive(Properties, PartialEq)]
pub struct WheelFaceProps {
    /// CSS background from `WheelLayout::conic_gradient`.
    pub gradient: AttrValue,
    pub segment_count: usize,
    /// Absolute clockwise rotation in degrees.
    #[prop_or_default]
    pub rotation: f64,
    /// Transition length; 0 renders without animation.
    #[prop_or_default]
    pub animate_ms: u64,
    #[prop_or_default]
    pub icons: Vec<AttrValue>,
    #[prop_or_default]
    pub children: Html,
}

#[function_component(WheelFace)]
pub fn wheel_face(props: &WheelFaceProps) -> Html {
    let transition = if props.animate_ms > 0 {
        format!("transform {}ms {}", props.animate_ms, SPIN_EASING)
    } else {
        "none".to_string()
    };
    let style = format!(
        "background: {}; transform: rotate({}deg); transition: {}; box-shadow: inset 0 0 30px rgba(0,0,0,0.7), 0 0 0 6px #1a1408, 0 0 0 8px #c5a059, 0 0 0 11px #1a1408;",
        props.gradient, props.rotation, transition
    );
    let segment_angle = 360.0 / props.segment_count.max(1) as f64;

    html! {
        <div class={styles::WHEEL_FACE} style={style}>
            { for (0..props.segment_count).map(|i| html! {
                <div
                    key={i}
                    class={styles::WHEEL_DIVIDER}
                    style={format!("transform: translateX(-50%) rotate({}deg);", i as f64 * segment_angle + segment_angle / 2.0)}
                />
            }) }
            { for props.icons.iter().enumerate().map(|(i, icon)| html! {
                <div
                    key={format!("icon-{}", i)}
                    class="absolute inset-0"
                    style={format!("transform: rotate({}deg);", i as f64 * segment_angle)}
                >
                    <span class={styles::WHEEL_ICON}>{ icon.clone() }</span>
                </div>
            }) }
            { props.children.clone() }
        </div>
    }
}

/// Glyph per segment, when the catalog provides one.
pub fn segment_icons(layout: &WheelLayout, icon_for: impl Fn(usize) -> Option<String>) -> Vec<AttrValue> {
    let icons: Vec<Option<String>> = layout
        .segments()
        .iter()
        .map(|segment| icon_for(segment.scenario_index))
        .collect();
    if icons.iter().any(Option::is_none) {
        return Vec::new();
    }
    icons.into_iter().flatten().map(AttrValue::from).collect()
}
