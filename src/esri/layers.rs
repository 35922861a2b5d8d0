use serde::Serialize;

use super::{popup::PopupTemplate, renderer::SimpleRenderer};
use crate::sdk::{MapError, MapSdk};

pub const USGS_FEED: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.geojson";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoJsonLayerConfig {
    pub url: String,
    pub copyright: String,
    pub popup_template: PopupTemplate,
    pub renderer: SimpleRenderer,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

/// Features are drawn in ascending order of `field`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBy {
    pub field: String,
}

impl Default for GeoJsonLayerConfig {
    fn default() -> Self {
        Self {
            url: USGS_FEED.to_string(),
            copyright: "USGS Earthquakes".to_string(),
            popup_template: PopupTemplate::earthquakes(),
            renderer: SimpleRenderer::earthquakes(),
            order_by: vec![OrderBy {
                field: "mag".to_string(),
            }],
        }
    }
}

/// Builds the earthquake data layer. Fetching and parsing the feed is left
/// to the SDK.
pub fn build_layer<S: MapSdk>(sdk: &S, config: &GeoJsonLayerConfig) -> Result<S::Layer, MapError> {
    log::debug!(
        "building GeoJSON layer from {} (popup fields: {:?})",
        config.url,
        config.popup_template.placeholders()
    );
    if let Some(ramp) = config.renderer.size_variable() {
        for stop in ramp.stops() {
            log::debug!("{} {} drawn at {}", ramp.field, stop.value, stop.size);
        }
    }
    sdk.geojson_layer(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::recording::{Call, RecordingSdk};
    use serde_json::json;

    #[test]
    fn builds_one_layer_from_the_usgs_feed() {
        let sdk = RecordingSdk::new();
        let layer = build_layer(&sdk, &GeoJsonLayerConfig::default()).unwrap();
        assert_eq!(
            sdk.calls(),
            [Call::Layer {
                id: layer,
                url: USGS_FEED.to_string()
            }]
        );
    }

    #[test]
    fn construction_failures_propagate() {
        let sdk = RecordingSdk::failing("GeoJSONLayer");
        let err = build_layer(&sdk, &GeoJsonLayerConfig::default()).unwrap_err();
        assert!(matches!(err, MapError::Construct { what: "GeoJSONLayer", .. }));
    }

    #[test]
    fn renderer_without_size_ramp_still_builds() {
        let sdk = RecordingSdk::new();
        let mut config = GeoJsonLayerConfig::default();
        config.renderer.visual_variables.clear();

        build_layer(&sdk, &config).unwrap();

        assert_eq!(sdk.count(|call| matches!(call, Call::Layer { .. })), 1);
    }

    #[test]
    fn orders_features_by_magnitude() {
        let value = serde_json::to_value(GeoJsonLayerConfig::default()).unwrap();
        assert_eq!(value["copyright"], "USGS Earthquakes");
        assert_eq!(value["orderBy"], json!([{ "field": "mag" }]));
        assert_eq!(value["popupTemplate"]["title"], "Earthquake Info");
        assert_eq!(value["renderer"]["type"], "simple");
    }
}
