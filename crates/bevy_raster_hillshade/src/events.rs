use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use raster_hillshade::prelude::{EventSink, LayerEvent};

/// Bevy message wrapping a [`LayerEvent`] produced while rendering a hillshading layer.
#[derive(Message, Debug, Clone)]
pub struct HillshadingMessage {
    /// Entity the rendering layer belongs to, if any.
    pub entity: Option<Entity>,
    pub event: LayerEvent,
}

/// Global bus for layer events produced off the main thread (render or task code).
#[derive(Resource)]
pub struct HillshadingBus {
    tx: Sender<HillshadingMessage>,
    rx: Receiver<HillshadingMessage>,
}

impl Default for HillshadingBus {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }
}

impl HillshadingBus {
    pub fn sender(&self) -> &Sender<HillshadingMessage> {
        &self.tx
    }

    pub fn receiver(&self) -> &Receiver<HillshadingMessage> {
        &self.rx
    }

    /// Creates a sink tagging every event with `entity`.
    pub fn sink(&self, entity: Option<Entity>) -> ChannelSink {
        ChannelSink {
            entity,
            tx: self.tx.clone(),
        }
    }
}

/// Event sink that forwards layer events to the [`HillshadingBus`].
#[derive(Clone)]
pub struct ChannelSink {
    pub entity: Option<Entity>,
    pub tx: Sender<HillshadingMessage>,
}

impl EventSink for ChannelSink {
    #[inline]
    fn send(&mut self, event: LayerEvent) {
        let _ = self.tx.send(HillshadingMessage {
            entity: self.entity,
            event,
        });
    }
}

pub(crate) fn drain_hillshading_messages(
    bus: Res<HillshadingBus>,
    mut messages: ResMut<Messages<HillshadingMessage>>,
) {
    while let Ok(message) = bus.receiver().try_recv() {
        messages.write(message);
    }
}
