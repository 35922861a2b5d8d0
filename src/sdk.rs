use thiserror::Error;

use crate::esri::{
    layers::GeoJsonLayerConfig,
    view::{BasemapConfig, ViewConfig},
    widgets::UiPosition,
};

#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("could not construct {what}: {reason}")]
    Construct { what: &'static str, reason: String },
    #[error("call to {what} failed: {reason}")]
    Call { what: &'static str, reason: String },
    #[error("web map has no layer at index {index}")]
    MissingLayer { index: usize },
    #[error("could not serialize options: {0}")]
    Serialize(String),
}

/// A widget to construct, with whatever it needs besides the view.
#[derive(Debug)]
pub enum WidgetRequest<'a, L> {
    Search,
    Home,
    Legend { layer: &'a L, title: &'a str },
}

/// The slice of a mapping SDK the earthquake map is composed from.
///
/// Every method mirrors one constructor or call on the SDK side. The
/// composition functions in [`crate::esri`] only ever talk to this trait,
/// so the browser binding and the test recorder are interchangeable.
pub trait MapSdk {
    type Container: ?Sized;
    type Layer;
    type WebMap;
    type View;
    type Widget;

    fn geojson_layer(&self, config: &GeoJsonLayerConfig) -> Result<Self::Layer, MapError>;

    fn web_map(
        &self,
        basemap: &BasemapConfig,
        layers: Vec<Self::Layer>,
    ) -> Result<Self::WebMap, MapError>;

    fn map_view(
        &self,
        map: &Self::WebMap,
        container: &Self::Container,
        config: &ViewConfig,
    ) -> Result<Self::View, MapError>;

    /// Positional lookup into the web map's layer collection.
    fn layer_at(&self, map: &Self::WebMap, index: usize) -> Result<Option<Self::Layer>, MapError>;

    fn widget(
        &self,
        view: &Self::View,
        request: WidgetRequest<'_, Self::Layer>,
    ) -> Result<Self::Widget, MapError>;

    fn add_to_ui(
        &self,
        view: &Self::View,
        widget: Self::Widget,
        position: UiPosition,
    ) -> Result<(), MapError>;

    /// Releases everything the SDK holds for this view.
    fn destroy(&self, view: Self::View);
}
