use crate::esri::{
    layers::GeoJsonLayerConfig,
    loader::LoaderOptions,
    view::{BasemapConfig, ViewConfig},
    widgets::WidgetLayout,
};

/// Height of the block the view renders into, in CSS pixels.
pub const CONTAINER_HEIGHT: u32 = 730;

/// Everything the earthquake map is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub loader: LoaderOptions,
    pub layer: GeoJsonLayerConfig,
    pub basemap: BasemapConfig,
    pub view: ViewConfig,
    pub widgets: WidgetLayout,
    pub container_height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            loader: LoaderOptions::default(),
            layer: GeoJsonLayerConfig::default(),
            basemap: BasemapConfig::default(),
            view: ViewConfig::default(),
            widgets: WidgetLayout::default(),
            container_height: CONTAINER_HEIGHT,
        }
    }
}

impl MapConfig {
    pub fn container_style(&self) -> String {
        format!("height: {}px", self.container_height)
    }
}
