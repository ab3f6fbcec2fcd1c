//! Bevy plugin for raster_hillshade providing assets, resources, message types, and systems.
#![forbid(unsafe_code)]

#[cfg(feature = "ron")]
pub use assets::{HillshadingLayerAsset, HillshadingLayerAssetLoader};
use bevy::prelude::*;
pub use events::{ChannelSink, HillshadingBus, HillshadingMessage};
pub use store::{HillshadingLayers, LayerUpdateMessage};
pub use textures::encoded_raster_from_image;

#[cfg(feature = "ron")]
mod assets;
mod events;
mod store;
mod textures;

/// Convenient re-exports for common types. Import with `use bevy_raster_hillshade::prelude::*;`.
pub mod prelude {
    pub use raster_hillshade::prelude::*;

    #[cfg(feature = "ron")]
    pub use crate::assets::{HillshadingLayerAsset, HillshadingLayerAssetLoader};
    pub use crate::events::{ChannelSink, HillshadingBus, HillshadingMessage};
    pub use crate::store::{HillshadingLayers, LayerUpdateMessage};
    pub use crate::textures::encoded_raster_from_image;
    pub use crate::HillshadingPlugin;
}

/// Bevy plugin providing the layer store, layer assets, message types, and systems.
pub struct HillshadingPlugin;

impl Plugin for HillshadingPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<HillshadingMessage>()
            .add_message::<LayerUpdateMessage>()
            .init_resource::<HillshadingBus>()
            .init_resource::<HillshadingLayers>()
            .add_systems(
                Update,
                (store::apply_layer_updates, events::drain_hillshading_messages),
            );

        #[cfg(feature = "ron")]
        app.init_asset::<HillshadingLayerAsset>()
            .init_asset_loader::<HillshadingLayerAssetLoader>()
            .add_systems(
                Update,
                assets::register_loaded_layers.before(store::apply_layer_updates),
            );
    }
}
