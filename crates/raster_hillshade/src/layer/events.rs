//! Event types and sinks for observing a layer across frames.
//!
//! [`LayerEvent`]s are emitted by
//! [`crate::layer::Hillshading2DLayer::render_frame_with_events`]. Sinks can discard them
//! (`()`), forward them to a closure ([`FnSink`]) or collect them ([`VecSink`]).
use crate::transform::BoundingBox;

/// Why a frame produced no draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// No raster image is bound.
    NoImage,
    /// The bound raster has zero width or height.
    EmptyImage,
    /// The layer is not visible.
    Hidden,
}

/// Describes events emitted while rendering a layer.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum LayerEvent {
    /// Emitted once per load cycle, on the first frame that draws a newly bound raster.
    BoundingBoxReported {
        /// Id of the reporting layer.
        layer_id: String,
        /// Unrotated extent with synthetic z thickness.
        bounding_box: BoundingBox,
    },

    /// Emitted after a draw call was submitted to the base primitive.
    FrameDrawn {
        /// Id of the layer.
        layer_id: String,
        /// Raster size in texels.
        resolution: (u32, u32),
    },

    /// Emitted when a frame was skipped without drawing.
    DrawSkipped {
        /// Id of the layer.
        layer_id: String,
        /// Cause of the skip.
        reason: SkipReason,
    },

    /// Non-fatal warning, e.g. a collapsed value range.
    Warning {
        /// Context string (e.g. layer id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// A generic event sink that accepts [`LayerEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: LayerEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: LayerEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(LayerEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(LayerEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(LayerEvent),
{
    #[inline]
    fn send(&mut self, event: LayerEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<LayerEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<LayerEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[LayerEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of bounding-box reports collected so far.
    pub fn bounding_box_reports(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, LayerEvent::BoundingBoxReported { .. }))
            .count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: LayerEvent) {
        self.events.push(event);
    }
}
