use serde::Serialize;

use super::{layers::build_layer, widgets::attach_widgets};
use crate::{
    config::MapConfig,
    lifecycle::{MountToken, ViewLifecycle},
    sdk::{MapError, MapSdk},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasemapConfig {
    pub basemap: String,
}

impl Default for BasemapConfig {
    fn default() -> Self {
        Self {
            basemap: "gray-vector".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewConfig {
    /// Longitude, latitude.
    pub center: [f64; 2],
    pub zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: [-168.0, 46.0],
            zoom: 2.0,
        }
    }
}

/// Wraps `layer` in a web map and binds a view of it to `container`.
pub fn compose_view<S: MapSdk>(
    sdk: &S,
    container: &S::Container,
    layer: S::Layer,
    basemap: &BasemapConfig,
    view: &ViewConfig,
) -> Result<(S::WebMap, S::View), MapError> {
    let web_map = sdk.web_map(basemap, vec![layer])?;
    let map_view = sdk.map_view(&web_map, container, view)?;
    log::info!(
        "map view created over {} at {:?}, zoom {}",
        basemap.basemap,
        view.center,
        view.zoom
    );
    Ok((web_map, map_view))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presented {
    Shown { widgets: usize },
    /// The mount this run belonged to was torn down first; nothing was built.
    Stale,
}

/// Runs the whole composition once the SDK is available: layer, web map
/// and view, then widgets. The view is handed to `lifecycle` before any
/// widget is attached so that a widget fault still leaves it releasable.
pub fn present<S: MapSdk>(
    sdk: &S,
    container: &S::Container,
    config: &MapConfig,
    lifecycle: &mut ViewLifecycle<S::View>,
    token: MountToken,
) -> Result<Presented, MapError> {
    if !lifecycle.is_live(token) {
        return Ok(Presented::Stale);
    }

    let layer = build_layer(sdk, &config.layer)?;
    let (web_map, view) = compose_view(sdk, container, layer, &config.basemap, &config.view)?;

    let view = match lifecycle.install(token, view) {
        Ok(view) => view,
        Err(orphan) => {
            sdk.destroy(orphan);
            return Ok(Presented::Stale);
        }
    };

    let widgets = attach_widgets(sdk, view, &web_map, &config.widgets)?;
    Ok(Presented::Shown { widgets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::recording::{Call, FakeView, RecordingSdk};

    fn mounted() -> (ViewLifecycle<FakeView>, MountToken) {
        let mut lifecycle = ViewLifecycle::default();
        let token = lifecycle.mount();
        (lifecycle, token)
    }

    #[test]
    fn mounting_constructs_exactly_one_view() {
        let sdk = RecordingSdk::new();
        let (mut lifecycle, token) = mounted();

        let presented =
            present(&sdk, "map", &MapConfig::default(), &mut lifecycle, token).unwrap();

        assert_eq!(presented, Presented::Shown { widgets: 3 });
        assert_eq!(sdk.count(|call| matches!(call, Call::View { .. })), 1);
        assert_eq!(
            sdk.count(|call| matches!(
                call,
                Call::View { container, center, zoom, .. }
                    if container == "map" && *center == [-168.0, 46.0] && *zoom == 2.0
            )),
            1
        );
        assert!(lifecycle.view().is_some());
    }

    #[test]
    fn web_map_holds_the_single_layer_on_gray_vector() {
        let sdk = RecordingSdk::new();
        let (mut lifecycle, token) = mounted();

        present(&sdk, "map", &MapConfig::default(), &mut lifecycle, token).unwrap();

        let calls = sdk.calls();
        let Call::Layer { id: layer, .. } = calls[0] else {
            panic!("layer must be built first, got {:?}", calls[0]);
        };
        assert_eq!(
            calls[1],
            Call::WebMap {
                id: 2,
                basemap: "gray-vector".to_string(),
                layers: vec![layer],
            }
        );
        assert!(matches!(calls[2], Call::View { web_map: 2, .. }));
    }

    #[test]
    fn stale_mount_builds_nothing() {
        let sdk = RecordingSdk::new();
        let (mut lifecycle, token) = mounted();
        lifecycle.unmount();

        let presented =
            present(&sdk, "map", &MapConfig::default(), &mut lifecycle, token).unwrap();

        assert_eq!(presented, Presented::Stale);
        assert!(sdk.calls().is_empty());
        assert!(lifecycle.view().is_none());
    }

    #[test]
    fn view_stays_releasable_when_widgets_fault() {
        let sdk = RecordingSdk::failing("Legend");
        let (mut lifecycle, token) = mounted();

        let err = present(&sdk, "map", &MapConfig::default(), &mut lifecycle, token).unwrap_err();
        assert!(matches!(err, MapError::Construct { what: "Legend", .. }));

        let view = lifecycle.unmount().unwrap();
        sdk.destroy(view);
        assert_eq!(sdk.count(|call| matches!(call, Call::Destroy { .. })), 1);
    }

    #[test]
    fn failed_view_construction_leaves_nothing_to_release() {
        let sdk = RecordingSdk::failing("MapView");
        let (mut lifecycle, token) = mounted();

        let err = present(&sdk, "map", &MapConfig::default(), &mut lifecycle, token).unwrap_err();

        assert!(matches!(err, MapError::Construct { what: "MapView", .. }));
        assert!(lifecycle.unmount().is_none());
        assert_eq!(sdk.count(|call| matches!(call, Call::AddToUi { .. })), 0);
    }

    #[test]
    fn unmount_releases_the_view_once() {
        let sdk = RecordingSdk::new();
        let (mut lifecycle, token) = mounted();
        present(&sdk, "map", &MapConfig::default(), &mut lifecycle, token).unwrap();

        for _ in 0..2 {
            if let Some(view) = lifecycle.unmount() {
                sdk.destroy(view);
            }
        }

        assert_eq!(sdk.count(|call| matches!(call, Call::Destroy { .. })), 1);
    }

    #[test]
    fn second_present_on_the_same_mount_is_discarded() {
        let sdk = RecordingSdk::new();
        let (mut lifecycle, token) = mounted();
        present(&sdk, "map", &MapConfig::default(), &mut lifecycle, token).unwrap();

        let again = present(&sdk, "map", &MapConfig::default(), &mut lifecycle, token).unwrap();

        assert_eq!(again, Presented::Stale);
        assert_eq!(sdk.count(|call| matches!(call, Call::Destroy { .. })), 1);
        assert_eq!(lifecycle.view(), Some(&FakeView { id: 3 }));
    }
}
