mod config;
mod esri;
mod lifecycle;
mod sdk;

use yew::prelude::*;

use crate::esri::MapComponent;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <main>
            <MapComponent />
        </main>
    }
}
