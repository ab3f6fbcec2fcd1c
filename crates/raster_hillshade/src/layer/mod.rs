//! The hillshading layer façade.
//!
//! [`Hillshading2DLayer`] owns the configuration and the bound raster, recomputes the decode
//! recipe, model transform and uniforms on every frame, and hands them to a
//! [`HillshadingPipeline`] wrapping the caller's base primitive. Picking decodes the raw
//! color returned by the base primitive's hit test, never the shaded output.
use glam::{DMat4, Vec2};
use mint::Point2;
use tracing::{debug, info, warn};

use crate::codec::decode_color;
use crate::error::Result;
use crate::raster::EncodedRaster;
use crate::shading::module::ModuleParameters;
use crate::shading::pipeline::{HillshadingPipeline, ImagePrimitive};
use crate::shading::uniforms::Uniforms;
use crate::transform::{model_matrix, rotated_bounds, BoundingBox};

pub mod events;
pub mod pick;
pub mod props;
pub mod registry;

use events::{EventSink, LayerEvent, SkipReason};
use pick::PickResult;
use props::{Hillshading2DProps, PropertyValue};
use registry::LayerUpdate;

/// Type name of the layer.
pub const LAYER_NAME: &str = "Hillshading2DLayer";

/// Callback receiving the load-time bounding-box report.
pub type BoundingBoxReporter = Box<dyn FnMut(BoundingBox) + Send>;

/// Per-frame input supplied by the render scheduler.
#[derive(Clone, Debug, Default)]
pub struct FrameContext {
    /// Uniforms owned by the scheduler (view/projection and the like).
    pub uniforms: Uniforms,
}

impl FrameContext {
    pub fn new(uniforms: Uniforms) -> Self {
        Self { uniforms }
    }
}

/// What a call to [`Hillshading2DLayer::render_frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    Skipped(SkipReason),
}

/// Property-map raster layer with hillshading and value picking.
pub struct Hillshading2DLayer<P> {
    props: Hillshading2DProps,
    image: Option<EncodedRaster>,
    pipeline: HillshadingPipeline<P>,
    loaded: bool,
    report_bounding_box: Option<BoundingBoxReporter>,
    decoder_issues: Vec<&'static str>,
}

impl<P: ImagePrimitive> Hillshading2DLayer<P> {
    /// Creates a layer drawing through `base`. Fails if `props` are structurally invalid.
    pub fn new(base: P, props: Hillshading2DProps) -> Result<Self> {
        props.validate()?;
        let mut layer = Self {
            props,
            image: None,
            pipeline: HillshadingPipeline::new(base),
            loaded: false,
            report_bounding_box: None,
            decoder_issues: Vec::new(),
        };
        layer.check_value_decoder();
        Ok(layer)
    }

    /// Binds `image`, starting a load cycle.
    pub fn with_image(mut self, image: EncodedRaster) -> Self {
        self.set_image(Some(image));
        self
    }

    /// Sets the callback receiving the bounding-box report.
    pub fn on_bounding_box(mut self, reporter: impl FnMut(BoundingBox) + Send + 'static) -> Self {
        self.report_bounding_box = Some(Box::new(reporter));
        self
    }

    /// Replaces the whole configuration.
    pub fn configure(&mut self, props: Hillshading2DProps) -> Result<()> {
        props.validate()?;
        self.props = props;
        self.check_value_decoder();
        Ok(())
    }

    /// Applies a single named property update.
    pub fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        self.props.set_property(name, value)?;
        self.check_value_decoder();
        Ok(())
    }

    /// Applies a store update addressed to this layer. Updates for other layers are ignored
    /// and yield `Ok(false)`.
    pub fn apply_update(&mut self, update: &LayerUpdate) -> Result<bool> {
        if update.layer_id() != self.props.id {
            return Ok(false);
        }
        match update {
            LayerUpdate::SetVisible { visible, .. } => self.props.visible = *visible,
            LayerUpdate::UpdateProperty {
                property, value, ..
            } => {
                self.props.set_property(property, value.clone())?;
                self.check_value_decoder();
            }
        }
        Ok(true)
    }

    /// Decoder fields currently replaced by defaults because they are malformed.
    pub fn decoder_issues(&self) -> &[&'static str] {
        &self.decoder_issues
    }

    /// Warns once per change of the malformed decoder fields, not per frame or pick.
    fn check_value_decoder(&mut self) {
        let issues = self.props.malformed_decoder_fields();
        if !issues.is_empty() && issues != self.decoder_issues {
            warn!(
                layer = %self.props.id,
                fields = ?issues,
                "malformed value decoder fields replaced by defaults"
            );
        }
        self.decoder_issues = issues;
    }

    pub fn props(&self) -> &Hillshading2DProps {
        &self.props
    }

    pub fn id(&self) -> &str {
        &self.props.id
    }

    /// Binds or unbinds the raster. Binding a raster re-arms the bounding-box report.
    pub fn set_image(&mut self, image: Option<EncodedRaster>) {
        self.image = image;
        self.loaded = false;
    }

    pub fn image(&self) -> Option<&EncodedRaster> {
        self.image.as_ref()
    }

    /// `true` once the bound raster has been drawn in the current load cycle.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Rotation about the upper-left bounds corner.
    pub fn model_matrix(&self) -> DMat4 {
        let anchor = self.props.bounds.upper_left();
        model_matrix(self.props.rot_deg, anchor.x, anchor.y)
    }

    /// Module parameters for the current configuration.
    pub fn module_parameters(&self) -> ModuleParameters {
        ModuleParameters {
            value_decoder: self.props.decode_recipe(),
            model_matrix: self.model_matrix(),
        }
    }

    /// Extent of the placed raster for spatial indexing, including rotation.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_bounds(&rotated_bounds(&self.props.bounds, self.props.rot_deg))
    }

    pub fn pipeline(&self) -> &HillshadingPipeline<P> {
        &self.pipeline
    }

    pub fn base(&self) -> &P {
        self.pipeline.base()
    }

    pub fn base_mut(&mut self) -> &mut P {
        self.pipeline.base_mut()
    }

    /// Draws one frame. See [`Hillshading2DLayer::render_frame_with_events`].
    pub fn render_frame(&mut self, frame: &FrameContext) -> Result<FrameOutcome> {
        self.render_frame_with_events(frame, &mut ())
    }

    /// Draws one frame and reports what happened to `sink`.
    ///
    /// Hidden layers and layers without a raster skip the draw. The first drawing frame of a
    /// load cycle reports the unrotated bounds.
    pub fn render_frame_with_events(
        &mut self,
        frame: &FrameContext,
        sink: &mut dyn EventSink,
    ) -> Result<FrameOutcome> {
        let skip = if !self.props.visible {
            Some(SkipReason::Hidden)
        } else {
            match &self.image {
                None => Some(SkipReason::NoImage),
                Some(image) if image.is_empty() => Some(SkipReason::EmptyImage),
                Some(_) => None,
            }
        };
        if let Some(reason) = skip {
            debug!(layer = %self.props.id, ?reason, "skipping draw");
            sink.send(LayerEvent::DrawSkipped {
                layer_id: self.props.id.clone(),
                reason,
            });
            return Ok(FrameOutcome::Skipped(reason));
        }

        if !self.loaded {
            self.loaded = true;
            self.report_load(sink);
        }

        let params = self.props.hillshade_params();
        let module_parameters = ModuleParameters {
            value_decoder: params.recipe,
            model_matrix: self.model_matrix(),
        };

        let image = self.image.as_ref();
        let resolution = image.map(EncodedRaster::resolution).unwrap_or_default();
        let layer_uniforms = params.uniforms(resolution);

        self.pipeline.draw(
            &frame.uniforms,
            &layer_uniforms,
            &module_parameters,
            image,
            &self.props.color_map,
        )?;

        debug!(
            layer = %self.props.id,
            width = resolution.0,
            height = resolution.1,
            min = self.props.value_range.min,
            max = self.props.value_range.max,
            "drew hillshading frame"
        );
        sink.send(LayerEvent::FrameDrawn {
            layer_id: self.props.id.clone(),
            resolution,
        });
        Ok(FrameOutcome::Drawn)
    }

    fn report_load(&mut self, sink: &mut dyn EventSink) {
        let bounding_box = BoundingBox::from_bounds(&self.props.bounds);
        info!(layer = %self.props.id, bbox = ?bounding_box.0, "reporting layer bounding box");
        if let Some(report) = self.report_bounding_box.as_mut() {
            report(bounding_box);
        }
        sink.send(LayerEvent::BoundingBoxReported {
            layer_id: self.props.id.clone(),
            bounding_box,
        });

        if self.props.value_range.is_degenerate() {
            let message = format!(
                "value range collapses to {}; shading is flat",
                self.props.value_range.min
            );
            warn!(layer = %self.props.id, "{}", message);
            sink.send(LayerEvent::Warning {
                context: self.props.id.clone(),
                message,
            });
        }
    }

    /// Decodes the property value under `screen`.
    ///
    /// The raw encoded color from the base primitive's hit test is decoded with the currently
    /// configured recipe and value range. No color, a transparent color, a non-pickable layer
    /// or an unbound raster all yield `property_value = None`.
    pub fn pick(&self, screen: impl Into<Point2<f32>>) -> PickResult {
        let screen = screen.into();
        let pixel = Vec2::new(screen.x, screen.y);
        if !self.props.pickable || self.image.is_none() {
            return PickResult::empty(self.props.id.clone(), pixel);
        }

        let color = self.pipeline.hit_test(screen);
        let property_value = decode_color(
            color,
            &self.props.decode_recipe(),
            &self.props.value_range,
        );
        PickResult {
            index: 0,
            property_value,
            color,
            pixel,
            layer_id: self.props.id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use glam::DVec3;

    use super::*;
    use crate::codec::Rgba;
    use crate::layer::events::VecSink;
    use crate::shading::module::ShaderSet;
    use crate::shading::pipeline::DrawCommand;
    use crate::transform::Bounds;

    #[derive(Default)]
    struct Stub {
        draws: usize,
        hit: Option<Rgba>,
    }

    impl ImagePrimitive for Stub {
        fn shaders(&self) -> ShaderSet {
            ShaderSet::new("void main() {}", "void main() {}")
        }

        fn draw(&mut self, _command: DrawCommand<'_>) -> Result<()> {
            self.draws += 1;
            Ok(())
        }

        fn hit_test(&self, _screen: Point2<f32>) -> Option<Rgba> {
            self.hit
        }
    }

    fn image() -> EncodedRaster {
        EncodedRaster::from_fn(2, 2, |_, _| Rgba::rgb(0, 0, 0))
    }

    #[test]
    fn hidden_layer_does_not_draw() {
        let props = Hillshading2DProps::default().with_visible(false);
        let mut layer = Hillshading2DLayer::new(Stub::default(), props)
            .expect("valid")
            .with_image(image());
        let outcome = layer.render_frame(&FrameContext::default()).expect("ok");
        assert_eq!(outcome, FrameOutcome::Skipped(SkipReason::Hidden));
        assert_eq!(layer.base().draws, 0);
        assert!(!layer.is_loaded());
    }

    #[test]
    fn rebinding_image_rearms_the_report() {
        let reports = Arc::new(Mutex::new(0));
        let counter = reports.clone();
        let mut layer = Hillshading2DLayer::new(Stub::default(), Hillshading2DProps::default())
            .expect("valid")
            .with_image(image())
            .on_bounding_box(move |_| *counter.lock().expect("lock") += 1);

        for _ in 0..3 {
            layer.render_frame(&FrameContext::default()).expect("draw");
        }
        layer.set_image(Some(image()));
        layer.render_frame(&FrameContext::default()).expect("draw");

        assert_eq!(*reports.lock().expect("lock"), 2);
        assert_eq!(layer.base().draws, 4);
    }

    #[test]
    fn degenerate_range_warns_on_load() {
        let props = Hillshading2DProps::default().with_value_range(5.0, 5.0);
        let mut layer = Hillshading2DLayer::new(Stub::default(), props)
            .expect("valid")
            .with_image(image());
        let mut sink = VecSink::new();
        layer
            .render_frame_with_events(&FrameContext::default(), &mut sink)
            .expect("draw");
        assert!(sink
            .as_slice()
            .iter()
            .any(|e| matches!(e, LayerEvent::Warning { .. })));
    }

    #[test]
    fn non_pickable_layer_returns_empty_pick() {
        let stub = Stub {
            hit: Some(Rgba::rgb(1, 2, 3)),
            ..Default::default()
        };
        let props = Hillshading2DProps::default().with_pickable(false);
        let layer = Hillshading2DLayer::new(stub, props)
            .expect("valid")
            .with_image(image());
        let pick = layer.pick([1.0f32, 1.0]);
        assert_eq!(pick.property_value, None);
        assert_eq!(pick.index, 0);
    }

    #[test]
    fn apply_update_ignores_other_layers() {
        let mut layer =
            Hillshading2DLayer::new(Stub::default(), Hillshading2DProps::new("a")).expect("valid");
        let applied = layer
            .apply_update(&LayerUpdate::set_visible("b", false))
            .expect("ok");
        assert!(!applied);
        assert!(layer.props().visible);

        let applied = layer
            .apply_update(&LayerUpdate::update_property("a", "rotDeg", 90.0))
            .expect("ok");
        assert!(applied);
        assert_eq!(layer.props().rot_deg, 90.0);
    }

    #[test]
    fn module_parameters_follow_rotation() {
        let props = Hillshading2DProps::default()
            .with_bounds(Bounds::new(0.0, 0.0, 10.0, 100.0))
            .with_rot_deg(90.0);
        let layer = Hillshading2DLayer::new(Stub::default(), props).expect("valid");
        let m = layer.module_parameters().model_matrix;
        let anchor = m.transform_point3(DVec3::new(0.0, 100.0, 0.0));
        assert!((anchor - DVec3::new(0.0, 100.0, 0.0)).length() < 1e-9);
        let bbox = layer.bounding_box();
        assert!((bbox.x_max() - 100.0).abs() < 1e-9);
        assert_eq!(bbox.z_min(), 1.0);
    }

    #[test]
    fn malformed_decoder_is_tracked_on_change_only() {
        let mut layer = Hillshading2DLayer::new(Stub::default(), Hillshading2DProps::default())
            .expect("valid")
            .with_image(image());
        assert!(layer.decoder_issues().is_empty());

        layer
            .set_property("valueDecoder.step", (-2.0).into())
            .expect("number");
        assert_eq!(layer.decoder_issues(), ["step"]);

        layer.render_frame(&FrameContext::default()).expect("draw");
        let _ = layer.pick([0.0f32, 0.0]);
        assert_eq!(layer.decoder_issues(), ["step"]);
        assert_eq!(layer.module_parameters().value_decoder.step, 0.0);

        layer
            .set_property("valueDecoder.step", PropertyValue::Null)
            .expect("unset");
        assert!(layer.decoder_issues().is_empty());
    }

    #[test]
    fn configure_rejects_invalid_props() {
        let mut layer =
            Hillshading2DLayer::new(Stub::default(), Hillshading2DProps::default()).expect("valid");
        let bad = Hillshading2DProps::default().with_rot_deg(f64::NAN);
        assert!(layer.configure(bad).is_err());
        assert_eq!(layer.props().rot_deg, 0.0);
    }
}
