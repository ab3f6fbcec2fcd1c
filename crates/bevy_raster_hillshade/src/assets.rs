use core::result::Result;

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::tasks::ConditionalSendFuture;
use raster_hillshade::prelude::*;
use serde::{Deserialize, Serialize};

use crate::store::HillshadingLayers;

/// Asset describing a set of hillshading layer configurations.
#[derive(Asset, TypePath, Clone, Debug, Serialize, Deserialize)]
pub struct HillshadingLayerAsset {
    pub layers: Vec<Hillshading2DProps>,
}

impl HillshadingLayerAsset {
    /// Checks every layer configuration.
    pub fn validate(&self) -> raster_hillshade::error::Result<()> {
        self.layers.iter().try_for_each(Hillshading2DProps::validate)
    }
}

/// Asset loader for [`HillshadingLayerAsset`] using RON files with `.hillshade` extension.
#[derive(TypePath)]
pub struct HillshadingLayerAssetLoader;

impl AssetLoader for HillshadingLayerAssetLoader {
    type Asset = HillshadingLayerAsset;
    type Settings = ();
    type Error = anyhow::Error;

    fn extensions(&self) -> &[&str] {
        &["hillshade"]
    }

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let asset: HillshadingLayerAsset =
                ron::de::from_bytes(&bytes).map_err(|e| anyhow::anyhow!(e))?;
            asset.validate()?;
            Ok(asset)
        })
    }
}

impl FromWorld for HillshadingLayerAssetLoader {
    fn from_world(_: &mut World) -> Self {
        HillshadingLayerAssetLoader
    }
}

/// Registers the layers of added or modified assets in the [`HillshadingLayers`] store.
/// A re-registered layer replaces the stored configuration.
pub(crate) fn register_loaded_layers(
    mut events: MessageReader<AssetEvent<HillshadingLayerAsset>>,
    assets: Res<Assets<HillshadingLayerAsset>>,
    mut layers: ResMut<HillshadingLayers>,
) {
    for event in events.read() {
        let (AssetEvent::Added { id } | AssetEvent::Modified { id }) = event else {
            continue;
        };
        let Some(asset) = assets.get(*id) else {
            continue;
        };
        for props in &asset.layers {
            if layers.insert(props.clone()).is_some() {
                debug!("Replaced hillshading layer {:?} from asset", props.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYERS: &str = r#"(
        layers: [
            (
                id: "porosity",
                bounds: [432150.0, 6475800.0, 439400.0, 6481500.0],
                valueRange: (2782.0, 3513.0),
                rotDeg: 10.0,
                valueDecoder: (step: Some(0.5)),
            ),
            (
                id: "depth",
                visible: false,
                bounds: [[0.0, 0.0], [0.0, 5.0], [4.0, 5.0], [4.0, 0.0]],
            ),
        ],
    )"#;

    #[test]
    fn parses_ron_layer_descriptions() {
        let asset: HillshadingLayerAsset = ron::de::from_str(LAYERS).expect("valid ron");
        assert_eq!(asset.layers.len(), 2);
        assert!(asset.validate().is_ok());

        let porosity = &asset.layers[0];
        assert_eq!(porosity.value_range, ValueRange::new(2782.0, 3513.0));
        assert_eq!(porosity.value_decoder.step, Some(0.5));
        assert_eq!(porosity.ambient_light_intensity, 0.5);

        assert!(!asset.layers[1].visible);
        assert_eq!(asset.layers[1].bounds, Bounds::new(0.0, 0.0, 4.0, 5.0));
        assert_eq!(asset.layers[1].rot_deg, 0.0);
    }

    #[test]
    fn loaded_assets_populate_the_store() {
        let mut app = App::new();
        app.add_message::<AssetEvent<HillshadingLayerAsset>>()
            .init_resource::<HillshadingLayers>()
            .add_systems(Update, register_loaded_layers);

        let asset: HillshadingLayerAsset = ron::de::from_str(LAYERS).expect("valid ron");
        let mut assets = Assets::<HillshadingLayerAsset>::default();
        let handle = assets.add(asset);
        app.world_mut().insert_resource(assets);
        app.world_mut()
            .write_message(AssetEvent::<HillshadingLayerAsset>::Added { id: handle.id() });

        app.update();

        let layers = app.world().resource::<HillshadingLayers>();
        assert!(layers.get("porosity").is_some());
        assert!(layers.get("depth").is_some());
    }
}
