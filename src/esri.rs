pub mod layers;
pub mod loader;
pub mod modules;
pub mod popup;
pub mod renderer;
pub mod view;
pub mod widgets;

use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::JsValue;
use web_sys::HtmlElement;
use yew::{platform::spawn_local, prelude::*};
use yew_hooks::use_effect_once;

use crate::{config::MapConfig, lifecycle::ViewLifecycle, sdk::MapSdk};
use loader::load_modules;
use modules::{EsriModules, MODULE_NAMES};
use view::{present, Presented};

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    #[prop_or_default]
    pub class: Classes,
}

#[function_component]
pub fn MapComponent(props: &Props) -> Html {
    let config = use_state(MapConfig::default);
    let container = use_node_ref();
    let lifecycle = use_mut_ref(ViewLifecycle::<JsValue>::default);
    let sdk: Rc<RefCell<Option<Rc<EsriModules>>>> = use_mut_ref(|| None);

    {
        let config = (*config).clone();
        let container = container.clone();
        use_effect_once(move || {
            let token = lifecycle.borrow_mut().mount();

            spawn_local({
                let lifecycle = lifecycle.clone();
                let sdk = sdk.clone();
                async move {
                    let modules = match load_modules(&MODULE_NAMES, &config.loader)
                        .await
                        .and_then(EsriModules::from_resolved)
                    {
                        Ok(modules) => Rc::new(modules),
                        Err(err) => {
                            log::error!("could not load the map SDK: {err:#}");
                            return;
                        }
                    };
                    *sdk.borrow_mut() = Some(modules.clone());

                    // The node is gone once the component has unmounted.
                    let Some(element) = container.cast::<HtmlElement>() else {
                        log::warn!("map container is not attached, skipping the map");
                        return;
                    };

                    let outcome = present(
                        &*modules,
                        &element,
                        &config,
                        &mut lifecycle.borrow_mut(),
                        token,
                    );
                    match outcome {
                        Ok(Presented::Shown { widgets }) => {
                            log::info!("earthquake map shown with {widgets} widgets")
                        }
                        Ok(Presented::Stale) => {
                            log::warn!("component unmounted while the SDK loaded, map not built")
                        }
                        Err(err) => log::error!("could not build the earthquake map: {err}"),
                    }
                }
            });

            move || {
                let released = lifecycle.borrow_mut().unmount();
                if let Some(view) = released {
                    match sdk.borrow().as_ref() {
                        Some(sdk) => sdk.destroy(view),
                        None => log::warn!("view outlived its SDK handle"),
                    }
                }
            }
        });
    }

    html! {
        <div
            ref={container}
            class={classes!("map-container", props.class.clone())}
            style={config.container_style()}
        />
    }
}
