use anyhow::anyhow;
use js_sys::{Array, Function, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

use super::{
    layers::GeoJsonLayerConfig,
    view::{BasemapConfig, ViewConfig},
    widgets::UiPosition,
};
use crate::sdk::{MapError, MapSdk, WidgetRequest};

/// SDK modules the map is built from, in the order [`EsriModules::from_resolved`] expects.
pub const MODULE_NAMES: [&str; 6] = [
    "esri/views/MapView",
    "esri/WebMap",
    "esri/widgets/Search",
    "esri/layers/GeoJSONLayer",
    "esri/widgets/Home",
    "esri/widgets/Legend",
];

/// Constructors resolved from the ArcGIS AMD loader.
pub struct EsriModules {
    map_view: Function,
    web_map: Function,
    search: Function,
    geojson_layer: Function,
    home: Function,
    legend: Function,
}

impl EsriModules {
    pub fn from_resolved(modules: Vec<Function>) -> anyhow::Result<Self> {
        let [map_view, web_map, search, geojson_layer, home, legend]: [Function; 6] =
            modules.try_into().map_err(|got: Vec<Function>| {
                anyhow!(
                    "expected {} SDK modules, got {}",
                    MODULE_NAMES.len(),
                    got.len()
                )
            })?;
        Ok(Self {
            map_view,
            web_map,
            search,
            geojson_layer,
            home,
            legend,
        })
    }
}

/// Best-effort text for a thrown JS value.
pub fn describe(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    match err.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => format!("{err:?}"),
    }
}

fn options<T: Serialize>(value: &T) -> Result<Object, MapError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|err| MapError::Serialize(err.to_string()))?
        .dyn_into()
        .map_err(|_| MapError::Serialize("options are not an object".to_string()))
}

fn empty_options() -> Object {
    Object::new()
}

fn set(target: &Object, key: &'static str, value: &JsValue) -> Result<(), MapError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(drop)
        .map_err(|err| MapError::Call {
            what: key,
            reason: describe(&err),
        })
}

fn construct(ctor: &Function, what: &'static str, options: &Object) -> Result<JsValue, MapError> {
    Reflect::construct(ctor, &Array::of1(options)).map_err(|err| MapError::Construct {
        what,
        reason: describe(&err),
    })
}

fn call(target: &JsValue, what: &'static str, method: &str, args: &Array) -> Result<JsValue, MapError> {
    let fail = |err: JsValue| MapError::Call {
        what,
        reason: describe(&err),
    };
    let function: Function = Reflect::get(target, &JsValue::from_str(method))
        .map_err(fail)?
        .dyn_into()
        .map_err(|_| MapError::Call {
            what,
            reason: format!("{method} is not a function"),
        })?;
    Reflect::apply(&function, target, args).map_err(fail)
}

fn get(target: &JsValue, what: &'static str, key: &str) -> Result<JsValue, MapError> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(|err| MapError::Call {
        what,
        reason: describe(&err),
    })
}

impl MapSdk for EsriModules {
    type Container = HtmlElement;
    type Layer = JsValue;
    type WebMap = JsValue;
    type View = JsValue;
    type Widget = JsValue;

    fn geojson_layer(&self, config: &GeoJsonLayerConfig) -> Result<JsValue, MapError> {
        construct(&self.geojson_layer, "GeoJSONLayer", &options(config)?)
    }

    fn web_map(&self, basemap: &BasemapConfig, layers: Vec<JsValue>) -> Result<JsValue, MapError> {
        let opts = options(basemap)?;
        set(&opts, "layers", &layers.into_iter().collect::<Array>())?;
        construct(&self.web_map, "WebMap", &opts)
    }

    fn map_view(
        &self,
        map: &JsValue,
        container: &HtmlElement,
        config: &ViewConfig,
    ) -> Result<JsValue, MapError> {
        let opts = options(config)?;
        set(&opts, "map", map)?;
        set(&opts, "container", container)?;
        construct(&self.map_view, "MapView", &opts)
    }

    fn layer_at(&self, map: &JsValue, index: usize) -> Result<Option<JsValue>, MapError> {
        let layers = get(map, "WebMap.layers", "layers")?;
        let layer = call(
            &layers,
            "WebMap.layers.getItemAt",
            "getItemAt",
            &Array::of1(&JsValue::from_f64(index as f64)),
        )?;
        Ok((!layer.is_undefined() && !layer.is_null()).then_some(layer))
    }

    fn widget(&self, view: &JsValue, request: WidgetRequest<'_, JsValue>) -> Result<JsValue, MapError> {
        let opts = empty_options();
        set(&opts, "view", view)?;
        match request {
            WidgetRequest::Search => construct(&self.search, "Search", &opts),
            WidgetRequest::Home => construct(&self.home, "Home", &opts),
            WidgetRequest::Legend { layer, title } => {
                let info = empty_options();
                set(&info, "layer", layer)?;
                set(&info, "title", &JsValue::from_str(title))?;
                set(&opts, "layerInfos", &Array::of1(&info))?;
                construct(&self.legend, "Legend", &opts)
            }
        }
    }

    fn add_to_ui(&self, view: &JsValue, widget: JsValue, position: UiPosition) -> Result<(), MapError> {
        let ui = get(view, "MapView.ui", "ui")?;
        call(
            &ui,
            "MapView.ui.add",
            "add",
            &Array::of2(&widget, &JsValue::from_str(position.as_str())),
        )
        .map(drop)
    }

    fn destroy(&self, view: JsValue) {
        match call(&view, "MapView.destroy", "destroy", &Array::new()) {
            Ok(_) => log::info!("map view destroyed"),
            Err(err) => log::error!("{err}"),
        }
    }
}
