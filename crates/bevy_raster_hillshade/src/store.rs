use bevy::prelude::*;
use raster_hillshade::prelude::{Hillshading2DProps, LayerRegistry, LayerUpdate};

/// Application-wide store of hillshading layer configurations, keyed by layer id.
#[derive(Resource, Default, Debug, Clone)]
pub struct HillshadingLayers(pub LayerRegistry);

impl HillshadingLayers {
    pub fn get(&self, id: &str) -> Option<&Hillshading2DProps> {
        self.0.get(id)
    }

    pub fn insert(&mut self, props: Hillshading2DProps) -> Option<Hillshading2DProps> {
        self.0.insert(props)
    }
}

/// Message carrying a store update (`setVisible` / `updateLayerProperty`).
#[derive(Message, Debug, Clone)]
pub struct LayerUpdateMessage(pub LayerUpdate);

impl LayerUpdateMessage {
    pub fn set_visible(layer_id: impl Into<String>, visible: bool) -> Self {
        Self(LayerUpdate::set_visible(layer_id, visible))
    }

    pub fn update_property(
        layer_id: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<raster_hillshade::prelude::PropertyValue>,
    ) -> Self {
        Self(LayerUpdate::update_property(layer_id, property, value))
    }
}

pub(crate) fn apply_layer_updates(
    mut updates: MessageReader<LayerUpdateMessage>,
    mut layers: ResMut<HillshadingLayers>,
) {
    for LayerUpdateMessage(update) in updates.read() {
        if let Err(err) = layers.0.apply(update) {
            warn!(
                "Rejected update for hillshading layer {:?}: {}",
                update.layer_id(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_app() -> App {
        let mut app = App::new();
        app.add_message::<LayerUpdateMessage>()
            .init_resource::<HillshadingLayers>()
            .add_systems(Update, apply_layer_updates);
        app.world_mut()
            .resource_mut::<HillshadingLayers>()
            .insert(Hillshading2DProps::new("porosity"));
        app
    }

    #[test]
    fn updates_are_applied_in_order() {
        let mut app = setup_app();
        app.world_mut()
            .write_message(LayerUpdateMessage::set_visible("porosity", false));
        app.world_mut()
            .write_message(LayerUpdateMessage::update_property("porosity", "rotDeg", 45.0));

        app.update();

        let layers = app.world().resource::<HillshadingLayers>();
        let props = layers.get("porosity").unwrap();
        assert!(!props.visible);
        assert_eq!(props.rot_deg, 45.0);
    }

    #[test]
    fn rejected_updates_leave_store_untouched() {
        let mut app = setup_app();
        app.world_mut()
            .write_message(LayerUpdateMessage::set_visible("missing", false));
        app.world_mut()
            .write_message(LayerUpdateMessage::update_property("porosity", "rotDeg", "north"));

        app.update();

        let layers = app.world().resource::<HillshadingLayers>();
        assert_eq!(layers.get("porosity"), Some(&Hillshading2DProps::new("porosity")));
    }
}
