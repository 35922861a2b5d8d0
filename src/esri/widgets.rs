use std::fmt;

use serde::Serialize;

use crate::sdk::{MapError, MapSdk, WidgetRequest};

/// Slots of the view's UI overlay a widget can be registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UiPosition {
    TopLeft,
    TopRight,
    BottomRight,
}

impl UiPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            UiPosition::TopLeft => "top-left",
            UiPosition::TopRight => "top-right",
            UiPosition::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for UiPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Search,
    Home,
    /// Legend for a single layer, looked up by position in the web map.
    Legend { layer_index: usize, title: String },
}

impl WidgetKind {
    fn name(&self) -> &'static str {
        match self {
            WidgetKind::Search => "search",
            WidgetKind::Home => "home",
            WidgetKind::Legend { .. } => "legend",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetPlacement {
    pub kind: WidgetKind,
    pub position: UiPosition,
}

/// Widgets to attach, in attachment order.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetLayout(pub Vec<WidgetPlacement>);

impl Default for WidgetLayout {
    fn default() -> Self {
        Self(vec![
            WidgetPlacement {
                kind: WidgetKind::Search,
                position: UiPosition::TopRight,
            },
            WidgetPlacement {
                kind: WidgetKind::Home,
                position: UiPosition::TopLeft,
            },
            WidgetPlacement {
                kind: WidgetKind::Legend {
                    layer_index: 0,
                    title: "Earthquake Info".to_string(),
                },
                position: UiPosition::BottomRight,
            },
        ])
    }
}

/// Constructs each widget of `layout` against `view` and registers it in
/// its slot. Stops at the first failure; widgets already registered stay.
pub fn attach_widgets<S: MapSdk>(
    sdk: &S,
    view: &S::View,
    web_map: &S::WebMap,
    layout: &WidgetLayout,
) -> Result<usize, MapError> {
    let mut attached = 0;
    for placement in &layout.0 {
        let widget = match &placement.kind {
            WidgetKind::Search => sdk.widget(view, WidgetRequest::Search)?,
            WidgetKind::Home => sdk.widget(view, WidgetRequest::Home)?,
            WidgetKind::Legend { layer_index, title } => {
                let layer = sdk
                    .layer_at(web_map, *layer_index)?
                    .ok_or(MapError::MissingLayer {
                        index: *layer_index,
                    })?;
                sdk.widget(
                    view,
                    WidgetRequest::Legend {
                        layer: &layer,
                        title,
                    },
                )?
            }
        };
        sdk.add_to_ui(view, widget, placement.position)?;
        log::debug!(
            "attached {} widget at {}",
            placement.kind.name(),
            placement.position
        );
        attached += 1;
    }
    Ok(attached)
}
