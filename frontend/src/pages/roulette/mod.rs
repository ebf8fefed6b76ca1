mod media_fetch;
mod stages;
mod wheel;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use regret_shared::{Catalog, MediaTicket, SpinPlan, Stage, StageController};
use wasm_bindgen_futures::spawn_local;
use web_sys::window;
use yew::prelude::*;

use crate::config::app_config;
use crate::styles;
use media_fetch::fetch_media;
use stages::{LandingStage, SpinningStage, StoryboardStage};
use wheel::segment_icons;

type SharedController = Rc<RefCell<Result<StageController, String>>>;
type SharedTimers = Rc<RefCell<Vec<Timeout>>>;

fn build_controller() -> Result<StageController, String> {
    let catalog = Catalog::builtin().map_err(|e| format!("Error loading scenarios: {}", e))?;
    StageController::new(catalog, app_config()).map_err(|e| format!("Error building wheel: {}", e))
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Schedules the reveal and storyboard transitions for a fresh spin.
/// Dropping the returned timers cancels them.
fn arm_stage_timers(
    controller: &SharedController,
    spun_at: u64,
    update: &UseForceUpdateHandle,
) -> Vec<Timeout> {
    let timings = match controller.borrow().as_ref() {
        Ok(ctl) => ctl.config().timings,
        Err(_) => return Vec::new(),
    };

    [timings.reveal_ms, timings.storyboard_ms]
        .into_iter()
        .map(|delay| {
            let controller = controller.clone();
            let update = update.clone();
            let deadline = spun_at + delay;
            Timeout::new(delay as u32, move || {
                let changed = match controller.borrow_mut().as_mut() {
                    Ok(ctl) => !ctl.tick(now_ms().max(deadline)).is_empty(),
                    Err(_) => false,
                };
                if changed {
                    update.force_update();
                }
            })
        })
        .collect()
}

fn spawn_media(controller: &SharedController, ticket: MediaTicket, update: &UseForceUpdateHandle) {
    let controller = controller.clone();
    let update = update.clone();
    spawn_local(async move {
        let outcome = fetch_media(&ticket.request, &ticket.token).await;
        let applied = match controller.borrow_mut().as_mut() {
            Ok(ctl) => ctl.deliver(&ticket, outcome),
            Err(_) => false,
        };
        if applied {
            update.force_update();
        }
    });
}

#[function_component(RegretRoulette)]
pub fn regret_roulette() -> Html {
    // Apply custom CSS
    {
        use_effect_with((), move |_| {
            let style_element = window()
                .and_then(|window| window.document())
                .and_then(|document| {
                    let head = document.head()?;
                    let style = document.create_element("style").ok()?;
                    style.set_text_content(Some(styles::CUSTOM_CSS));
                    let _ = head.append_child(&style);
                    Some(style)
                });

            move || {
                if let Some(style) = style_element {
                    if let Some(parent) = style.parent_node() {
                        let _ = parent.remove_child(&style);
                    }
                }
            }
        });
    }

    let controller: SharedController = use_mut_ref(build_controller);
    let timers: SharedTimers = use_mut_ref(Vec::new);
    // Wheel angle before the current spin, so the animation starts where it rested.
    let start_rotation = use_mut_ref(|| 0.0_f64);
    let update = use_force_update();

    let on_spin = {
        let controller = controller.clone();
        let timers = timers.clone();
        let start_rotation = start_rotation.clone();
        let update = update.clone();
        Callback::from(move |_: ()| {
            let now = now_ms();
            let plan: Option<SpinPlan> = match controller.borrow_mut().as_mut() {
                Ok(ctl) => {
                    *start_rotation.borrow_mut() = ctl.wheel_rotation();
                    ctl.spin(now, &mut rand::thread_rng())
                }
                Err(_) => None,
            };
            let Some(plan) = plan else {
                return;
            };

            *timers.borrow_mut() = arm_stage_timers(&controller, now, &update);
            for ticket in plan.tickets {
                spawn_media(&controller, ticket, &update);
            }
            update.force_update();
        })
    };

    let on_next = {
        let controller = controller.clone();
        let update = update.clone();
        Callback::from(move |_: ()| {
            let advanced = match controller.borrow_mut().as_mut() {
                Ok(ctl) => ctl.advance(),
                Err(_) => false,
            };
            if advanced {
                update.force_update();
            }
        })
    };

    let on_reset = {
        let controller = controller.clone();
        let timers = timers.clone();
        let update = update.clone();
        Callback::from(move |_: ()| {
            timers.borrow_mut().clear();
            if let Ok(ctl) = controller.borrow_mut().as_mut() {
                ctl.reset();
            }
            update.force_update();
        })
    };

    let guard = controller.borrow();
    let ctl = match guard.as_ref() {
        Ok(ctl) => ctl,
        Err(e) => {
            return html! {
                <div class={styles::CARD_ERROR}>{ e.clone() }</div>
            };
        }
    };

    let layout = ctl.layout();
    let gradient = AttrValue::from(layout.conic_gradient());

    let body = match (ctl.stage(), ctl.scenario()) {
        (Stage::Spinning, Some(record)) => html! {
            <SpinningStage
                gradient={gradient}
                segment_count={layout.len()}
                start_rotation={*start_rotation.borrow()}
                rotation={ctl.wheel_rotation()}
                animate_ms={ctl.config().timings.spin_animation_ms}
                revealed={ctl.result_revealed()}
                record={record.clone()}
            />
        },
        (Stage::Storyboard(scene), Some(record)) => html! {
            <StoryboardStage
                record={record.clone()}
                scene={scene}
                media={ctl.media(scene).cloned().unwrap_or_default()}
                on_next={on_next}
                on_reset={on_reset}
            />
        },
        _ => {
            let catalog = ctl.catalog();
            let icons = segment_icons(layout, |i| catalog.get(i).and_then(|r| r.wheel_icon.clone()));
            html! {
                <LandingStage
                    gradient={gradient}
                    segment_count={layout.len()}
                    rotation={ctl.wheel_rotation()}
                    icons={icons}
                    on_spin={on_spin}
                />
            }
        }
    };

    html! {
        <>{ body }</>
    }
}
