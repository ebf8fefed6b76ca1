pub mod config;
pub mod pages;
pub mod styles;

use yew::prelude::*;
use crate::pages::roulette::RegretRoulette;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <div class={styles::SHELL}>
            <RegretRoulette />
        </div>
    }
}
