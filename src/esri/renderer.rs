use std::fmt;

use serde::{Serialize, Serializer};

/// A screen size, serialized the way the SDK autocasts it: `"4px"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixels(pub f64);

impl fmt::Display for Pixels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

impl Serialize for Pixels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "simple", rename_all = "camelCase")]
pub struct SimpleRenderer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub symbol: SimpleMarkerSymbol,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub visual_variables: Vec<VisualVariable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "simple-marker")]
pub struct SimpleMarkerSymbol {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Pixels>,
    pub outline: Outline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outline {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Pixels>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum VisualVariable {
    Size(SizeVariable),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeStop {
    pub value: f64,
    pub size: Pixels,
}

/// Maps a numeric field onto marker size through a list of stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeVariable {
    pub field: String,
    stops: Vec<SizeStop>,
}

impl SizeVariable {
    pub fn new(field: impl Into<String>, mut stops: Vec<SizeStop>) -> Self {
        stops.sort_by(|a, b| a.value.total_cmp(&b.value));
        Self {
            field: field.into(),
            stops,
        }
    }

    pub fn stops(&self) -> &[SizeStop] {
        &self.stops
    }

    /// Pixel size for `value`: linear between neighbouring stops, clamped
    /// to the outermost stops beyond them.
    #[cfg(test)]
    pub fn size_for(&self, value: f64) -> Option<f64> {
        let first = self.stops.first()?;
        let last = self.stops.last()?;
        if value <= first.value {
            return Some(first.size.0);
        }
        if value >= last.value {
            return Some(last.size.0);
        }
        self.stops.windows(2).find_map(|pair| {
            let (low, high) = (pair[0], pair[1]);
            (value <= high.value).then(|| {
                let span = high.value - low.value;
                if span == 0.0 {
                    return high.size.0;
                }
                low.size.0 + (value - low.value) / span * (high.size.0 - low.size.0)
            })
        })
    }
}

impl SimpleRenderer {
    /// Teal markers with a white outline, sized by magnitude.
    pub fn earthquakes() -> Self {
        Self {
            field: Some("mag".to_string()),
            symbol: SimpleMarkerSymbol {
                color: "#14b9ad".to_string(),
                size: None,
                outline: Outline {
                    color: "white".to_string(),
                    width: None,
                },
            },
            visual_variables: vec![VisualVariable::Size(SizeVariable::new(
                "mag",
                vec![
                    SizeStop {
                        value: 2.5,
                        size: Pixels(4.0),
                    },
                    SizeStop {
                        value: 8.0,
                        size: Pixels(40.0),
                    },
                ],
            ))],
        }
    }

    pub fn size_variable(&self) -> Option<&SizeVariable> {
        self.visual_variables.iter().find_map(|variable| match variable {
            VisualVariable::Size(size) => Some(size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ramp() -> SizeVariable {
        SimpleRenderer::earthquakes().size_variable().unwrap().clone()
    }

    #[test]
    fn magnitude_stops_map_to_their_sizes() {
        let ramp = ramp();
        assert_eq!(ramp.size_for(2.5), Some(4.0));
        assert_eq!(ramp.size_for(8.0), Some(40.0));
    }

    #[test]
    fn sizes_interpolate_linearly_and_clamp() {
        let ramp = ramp();
        assert!((ramp.size_for(5.25).unwrap() - 22.0).abs() < 1e-9);
        assert_eq!(ramp.size_for(1.0), Some(4.0));
        assert_eq!(ramp.size_for(9.5), Some(40.0));
    }

    #[test]
    fn sizes_grow_monotonically_with_magnitude() {
        let ramp = ramp();
        let sizes: Vec<f64> = (0..=100)
            .map(|step| ramp.size_for(2.0 + f64::from(step) * 0.07).unwrap())
            .collect();
        assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn stops_are_sorted_on_construction() {
        let ramp = SizeVariable::new(
            "mag",
            vec![
                SizeStop {
                    value: 8.0,
                    size: Pixels(40.0),
                },
                SizeStop {
                    value: 2.5,
                    size: Pixels(4.0),
                },
            ],
        );
        assert_eq!(ramp.stops()[0].value, 2.5);
        assert_eq!(ramp.size_for(2.5), Some(4.0));
    }

    #[test]
    fn no_stops_means_no_size() {
        assert_eq!(SizeVariable::new("mag", Vec::new()).size_for(3.0), None);
    }

    #[test]
    fn serializes_to_sdk_renderer_shape() {
        let value = serde_json::to_value(SimpleRenderer::earthquakes()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "simple",
                "field": "mag",
                "symbol": {
                    "type": "simple-marker",
                    "color": "#14b9ad",
                    "outline": { "color": "white" }
                },
                "visualVariables": [{
                    "type": "size",
                    "field": "mag",
                    "stops": [
                        { "value": 2.5, "size": "4px" },
                        { "value": 8.0, "size": "40px" }
                    ]
                }]
            })
        );
    }
}
