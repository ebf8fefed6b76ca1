use gloo_timers::callback::Timeout;
use regret_shared::narrative::NarrativeSchedule;
use regret_shared::{MediaKind, MediaSlot, ScenarioRecord, SceneKind};
use web_sys::KeyboardEvent;
use yew::prelude::*;

use super::wheel::WheelFace;
use crate::config::get_asset_url;
use crate::styles;

#[derive(Properties, PartialEq)]
pub struct LandingStageProps {
    pub gradient: AttrValue,
    pub segment_count: usize,
    /// Resting angle left by the previous spin.
    pub rotation: f64,
    pub icons: Vec<AttrValue>,
    pub on_spin: Callback<()>,
}

#[function_component(LandingStage)]
pub fn landing_stage(props: &LandingStageProps) -> Html {
    let onclick = props.on_spin.reform(|_: MouseEvent| ());
    let onkeydown = {
        let on_spin = props.on_spin.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" || e.key() == " " {
                e.prevent_default();
                on_spin.emit(());
            }
        })
    };

    html! {
        <div class={styles::LANDING}>
            <div class={styles::EYEBROW}>{ "The Indian What-If Engine" }</div>
            <h1 class={styles::LANDING_TITLE}>{ "REGRET" }<br />{ "ROULETTE" }</h1>
            <div
                class={styles::WHEEL_BUTTON}
                {onclick}
                {onkeydown}
                tabindex="0"
                role="button"
                aria-label="Spin the roulette wheel"
            >
                <WheelFace
                    gradient={props.gradient.clone()}
                    segment_count={props.segment_count}
                    rotation={props.rotation}
                    icons={props.icons.clone()}
                >
                    <div class={styles::WHEEL_HUB}>
                        <span class={styles::WHEEL_HUB_TEXT}>{ "SPIN" }</span>
                        <span class="text-[8px] md:text-[10px] text-white/40 uppercase tracking-widest">{ "Your Fate" }</span>
                    </div>
                </WheelFace>
            </div>
            <p class={styles::LANDING_TAGLINE}>{ "Place your bet on a better life" }</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SpinningStageProps {
    pub gradient: AttrValue,
    pub segment_count: usize,
    pub start_rotation: f64,
    pub rotation: f64,
    pub animate_ms: u64,
    pub revealed: bool,
    pub record: ScenarioRecord,
}

#[function_component(SpinningStage)]
pub fn spinning_stage(props: &SpinningStageProps) -> Html {
    // Mount at rest, then rotate on the next frame so the transition runs.
    let start = props.start_rotation;
    let rotation = use_state(move || start);
    {
        let rotation = rotation.clone();
        let target = props.rotation;
        use_effect_with(target, move |target| {
            let target = *target;
            let timeout = Timeout::new(20, move || rotation.set(target));
            move || drop(timeout)
        });
    }

    html! {
        <div class={styles::SPINNING}>
            <div class="relative">
                <div class={styles::POINTER} />
                <WheelFace
                    gradient={props.gradient.clone()}
                    segment_count={props.segment_count}
                    rotation={*rotation}
                    animate_ms={props.animate_ms}
                >
                    <div class={styles::WHEEL_HUB} />
                </WheelFace>
            </div>
            <p class={styles::DECIDING}>{ "Fate is deciding..." }</p>
            if props.revealed {
                <div class={styles::REVEAL_OVERLAY}>
                    <div class={styles::REVEAL_CARD}>
                        <p class={styles::REVEAL_EYEBROW}>{ "The wheel has spoken" }</p>
                        <h2 class={styles::REVEAL_TITLE}>{ &props.record.title }</h2>
                        if let Some(tagline) = props.record.tagline() {
                            <p class={styles::REVEAL_SUBTITLE}>{ format!("\u{201C}{}\u{201D}", tagline) }</p>
                        }
                    </div>
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StoryboardStageProps {
    pub record: ScenarioRecord,
    pub scene: SceneKind,
    pub media: MediaSlot,
    pub on_next: Callback<()>,
    pub on_reset: Callback<()>,
}

#[function_component(StoryboardStage)]
pub fn storyboard_stage(props: &StoryboardStageProps) -> Html {
    let scene = props.scene;
    let text = props.record.scene(scene).text.clone().unwrap_or_default();
    let schedule = NarrativeSchedule::new(&text);
    let visible = use_state(|| 0usize);
    let actions_ready = use_state(|| false);

    // Line-by-line reveal, restarted whenever the scene changes.
    {
        let visible = visible.clone();
        let actions_ready = actions_ready.clone();
        let schedule = schedule.clone();
        use_effect_with((props.record.id.clone(), scene), move |_| {
            visible.set(0);
            actions_ready.set(false);

            let mut timers = Vec::with_capacity(schedule.lines().len() + 1);
            for i in 0..schedule.lines().len() {
                let visible = visible.clone();
                timers.push(Timeout::new(schedule.line_at(i) as u32, move || visible.set(i + 1)));
            }
            timers.push(Timeout::new(schedule.actions_at() as u32, move || actions_ready.set(true)));

            move || drop(timers)
        });
    }

    let accent = scene.accent();
    let media = match &props.media {
        MediaSlot::Ready(media) => {
            let src = get_asset_url(&media.url);
            match media.kind {
                MediaKind::Image => html! { <img class={styles::SCENE_MEDIA} src={src} alt="" /> },
                MediaKind::Video => html! {
                    <video class={styles::SCENE_MEDIA} src={src} autoplay={true} muted={true} loop={true} playsinline={true} />
                },
            }
        }
        MediaSlot::Pending => html! { <div class={styles::SCENE_PLACEHOLDER} /> },
        MediaSlot::Absent => html! {},
    };

    let lines = schedule.lines().iter().enumerate().take(*visible).map(|(i, line)| {
        let active = i + 1 == *visible;
        let class = if active { styles::LINE_ACTIVE } else { styles::LINE_PAST };
        let style = if active && line.is_quote {
            format!("color: {}; border-left: 2px solid {}60; padding-left: 1rem;", accent, accent)
        } else {
            String::new()
        };
        html! { <p key={i} class={class} style={style}>{ &line.text }</p> }
    });

    let action = if scene.is_terminal() {
        let onclick = props.on_reset.reform(|_: MouseEvent| ());
        html! {
            <button class={styles::BUTTON_SPIN_AGAIN} {onclick} aria-label="Spin again">{ "Spin Again" }</button>
        }
    } else {
        let onclick = props.on_next.reform(|_: MouseEvent| ());
        html! {
            <button class={styles::BUTTON_CONTINUE} {onclick} aria-label="Continue to next scene">{ "Continue \u{2192}" }</button>
        }
    };

    html! {
        <div class={styles::STORYBOARD}>
            { media }
            <div class={styles::SCENE_CONTENT}>
                <div class={styles::PROGRESS}>
                    { for SceneKind::ALL.iter().map(|step| {
                        let reached = step.index() <= scene.index();
                        let style = if reached {
                            format!("border-color: {}; color: {};", accent, accent)
                        } else {
                            "border-color: rgba(255,255,255,0.1); color: rgba(255,255,255,0.2);".to_string()
                        };
                        html! {
                            <>
                                <div class={styles::PROGRESS_STEP} style={style}>{ step.numeral() }</div>
                                if !step.is_terminal() {
                                    <div
                                        class={styles::PROGRESS_BAR}
                                        style={if step.index() < scene.index() { format!("background-color: {};", accent) } else { "background-color: rgba(255,255,255,0.08);".to_string() }}
                                    />
                                }
                            </>
                        }
                    }) }
                </div>

                <div>
                    <span class={styles::SCENE_LABEL} style={format!("color: {};", accent)}>{ scene.label() }</span>
                    <span class={styles::SCENE_SUBLABEL}>{ scene.sublabel() }</span>
                </div>

                <h2 class={styles::SCENE_TITLE}>{ &props.record.title }</h2>
                if let Some(tagline) = props.record.tagline() {
                    <p class={styles::SCENE_TAGLINE}>{ format!("\u{201C}{}\u{201D}", tagline) }</p>
                }

                <div class={styles::NARRATIVE_CARD} style={format!("border-color: {}26;", accent)}>
                    { for lines }
                </div>

                if *actions_ready {
                    <div class={styles::ACTIONS}>
                        <span class={styles::CATEGORY}>{ &props.record.category }</span>
                        { action }
                    </div>
                }
            </div>
        </div>
    }
}
