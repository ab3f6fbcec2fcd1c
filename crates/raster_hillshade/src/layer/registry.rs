//! Keyed layer configuration store and the update messages it accepts.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::props::{Hillshading2DProps, PropertyValue};
use crate::error::{Error, Result};

/// A mutation delivered by an application-level layer store.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
#[derive(Clone, Debug, PartialEq)]
pub enum LayerUpdate {
    /// Toggle layer visibility.
    SetVisible { layer_id: String, visible: bool },
    /// Set a single named property.
    UpdateProperty {
        layer_id: String,
        property: String,
        value: PropertyValue,
    },
}

impl LayerUpdate {
    pub fn set_visible(layer_id: impl Into<String>, visible: bool) -> Self {
        LayerUpdate::SetVisible {
            layer_id: layer_id.into(),
            visible,
        }
    }

    pub fn update_property(
        layer_id: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        LayerUpdate::UpdateProperty {
            layer_id: layer_id.into(),
            property: property.into(),
            value: value.into(),
        }
    }

    /// Id of the layer this update targets.
    pub fn layer_id(&self) -> &str {
        match self {
            LayerUpdate::SetVisible { layer_id, .. } => layer_id,
            LayerUpdate::UpdateProperty { layer_id, .. } => layer_id,
        }
    }
}

/// Layer props keyed by layer id.
#[derive(Clone, Debug, Default)]
pub struct LayerRegistry {
    layers: BTreeMap<String, Hillshading2DProps>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts props under their id, returning the previous props for that id.
    pub fn insert(&mut self, props: Hillshading2DProps) -> Option<Hillshading2DProps> {
        self.layers.insert(props.id.clone(), props)
    }

    pub fn get(&self, id: &str) -> Option<&Hillshading2DProps> {
        self.layers.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Hillshading2DProps> {
        self.layers.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hillshading2DProps> {
        self.layers.values()
    }

    /// Applies one update. The props are left unchanged when the update fails.
    pub fn apply(&mut self, update: &LayerUpdate) -> Result<()> {
        let id = update.layer_id();
        let props = self.layers.get_mut(id).ok_or_else(|| Error::UnknownLayer {
            id: id.to_owned(),
        })?;

        match update {
            LayerUpdate::SetVisible { visible, .. } => props.visible = *visible,
            LayerUpdate::UpdateProperty {
                property, value, ..
            } => props.set_property(property, value.clone())?,
        }
        debug!(layer = id, "applied layer update");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LayerRegistry {
        let mut registry = LayerRegistry::new();
        registry.insert(Hillshading2DProps::new("hillshade"));
        registry
    }

    #[test]
    fn set_visible_toggles_layer() {
        let mut registry = registry();
        registry
            .apply(&LayerUpdate::set_visible("hillshade", false))
            .expect("known layer");
        assert!(!registry.get("hillshade").expect("present").visible);
    }

    #[test]
    fn update_property_routes_to_props() {
        let mut registry = registry();
        registry
            .apply(&LayerUpdate::update_property("hillshade", "rotDeg", 30.0))
            .expect("valid update");
        assert_eq!(registry.get("hillshade").expect("present").rot_deg, 30.0);
    }

    #[test]
    fn unknown_layer_is_an_error() {
        let mut registry = registry();
        let err = registry
            .apply(&LayerUpdate::set_visible("wells", true))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownLayer { ref id } if id == "wells"));
    }

    #[test]
    fn failed_update_leaves_props_untouched() {
        let mut registry = registry();
        let before = registry.get("hillshade").cloned();
        assert!(registry
            .apply(&LayerUpdate::update_property("hillshade", "opacity", "high"))
            .is_err());
        assert_eq!(registry.get("hillshade").cloned(), before);
    }
}
