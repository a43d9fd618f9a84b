use crate::{
    NodeId,
    error::Result,
    event::{Channel, Event, MouseButton, dispatch},
    geom::Axis,
    layout::{LayoutSpec, Sizing},
    scene::Scene,
    widgets::NodeKind,
};

/// Slider payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderState {
    /// Axis the knob travels along.
    pub axis: Axis,
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
    /// Current value, within `[min, max]`.
    pub value: f32,
    /// Knob travel in pixels from the last layout.
    pub(crate) track: f32,
}

impl Default for SliderState {
    fn default() -> Self {
        Self::new(Axis::Horizontal, 0.0, 1.0, 0.0)
    }
}

/// Usable bounds: non-finite values become zero and the pair is ordered.
fn ordered(min: f32, max: f32) -> (f32, f32) {
    let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
    let (min, max) = (finite(min), finite(max));
    if min <= max { (min, max) } else { (max, min) }
}

impl SliderState {
    /// A slider over `[min, max]` starting at `value`. Bounds are ordered;
    /// a non-finite bound is taken as zero.
    pub fn new(axis: Axis, min: f32, max: f32, value: f32) -> Self {
        let (min, max) = ordered(min, max);
        let mut state = Self {
            axis,
            min,
            max,
            value: min,
            track: 0.0,
        };
        state.value = state.clamp(value);
        state
    }

    /// The range actually used. The fields are public and may have been
    /// edited into disorder.
    pub fn bounds(&self) -> (f32, f32) {
        ordered(self.min, self.max)
    }

    /// A value forced into the range. NaN lands on the lower bound.
    pub fn clamp(&self, value: f32) -> f32 {
        let (min, max) = self.bounds();
        if value.is_nan() {
            min
        } else {
            value.max(min).min(max)
        }
    }

    /// Position of the value along the range, from 0 to 1.
    pub fn fraction(&self) -> f32 {
        let (min, max) = self.bounds();
        let span = max - min;
        if span <= 0.0 {
            0.0
        } else {
            ((self.clamp(self.value) - min) / span).clamp(0.0, 1.0)
        }
    }

    /// Knob travel from the last layout.
    pub fn track(&self) -> f32 {
        self.track
    }

    /// Value change for a pixel movement along the track.
    pub fn value_delta(&self, pixels: f32) -> f32 {
        let (min, max) = self.bounds();
        if self.track <= 0.0 {
            0.0
        } else {
            pixels / self.track * (max - min)
        }
    }
}

/// Build a detached slider with a knob of the given size.
pub fn build(
    scene: &mut Scene,
    name: &str,
    state: SliderState,
    knob_w: f32,
    knob_h: f32,
) -> Result<NodeId> {
    let mut layout = LayoutSpec::default();
    layout.set_sizing(state.axis, Sizing::Fill);
    layout.set_sizing(
        state.axis.cross(),
        Sizing::Pixel(match state.axis {
            Axis::Horizontal => knob_h,
            Axis::Vertical => knob_w,
        }),
    );
    let slider = scene.create_with(NodeKind::Slider(state), name, layout);
    let knob = scene.create_with(
        NodeKind::SliderKnob,
        "knob",
        LayoutSpec::fixed(knob_w, knob_h),
    );
    scene.append(slider, knob)?;
    Ok(slider)
}

/// Set a slider's value, clamped to its range. Emits `ValueChanged` if the
/// value moved.
pub fn set_value(scene: &mut Scene, node: NodeId, value: f32) -> Result<()> {
    let changed = scene.with_kind(node, |kind| match kind {
        NodeKind::Slider(state) => {
            let v = state.clamp(value);
            let changed = v != state.value;
            state.value = v;
            changed.then_some(v)
        }
        _ => None,
    })?;
    if let Some(v) = changed {
        dispatch(scene, node, &Event::ValueChanged(v), Channel::User)?;
    }
    Ok(())
}

/// Read a slider's value.
pub fn value(scene: &Scene, node: NodeId) -> Option<f32> {
    match scene.node(node).map(|n| n.kind()) {
        Some(NodeKind::Slider(state)) => Some(state.value),
        _ => None,
    }
}

/// A press on the track jumps the value to the pointer.
pub(crate) fn on_input(scene: &mut Scene, node: NodeId, event: &Event) -> Result<()> {
    let Event::MouseDown {
        button: MouseButton::Left,
        pos,
    } = event
    else {
        return Ok(());
    };
    let Some(n) = scene.node(node) else {
        return Ok(());
    };
    let NodeKind::Slider(state) = n.kind() else {
        return Ok(());
    };
    let knob = n
        .children()
        .first()
        .and_then(|k| scene.node(*k))
        .map_or(0.0, |k| k.rect().extent(state.axis));
    let start = n.content().start(state.axis) + knob / 2.0;
    let target = state.bounds().0 + state.value_delta(pos.along(state.axis) - start);
    set_value(scene, node, target)
}

/// Knob drags arrive here on the internal channel.
pub(crate) fn on_internal(scene: &mut Scene, node: NodeId, event: &Event) -> Result<()> {
    let Event::Drag { delta, .. } = event else {
        return Ok(());
    };
    let Some(NodeKind::Slider(state)) = scene.node(node).map(|n| n.kind()) else {
        return Ok(());
    };
    let target = state.value + state.value_delta(delta.along(state.axis));
    set_value(scene, node, target)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        event::EventKind,
        geom::{Point, Rect},
        testing::Harness,
    };

    #[test]
    fn construction_orders_bounds() {
        let s = SliderState::new(Axis::Horizontal, 10.0, 0.0, 20.0);
        assert_eq!((s.min, s.max, s.value), (0.0, 10.0, 10.0));
        assert_eq!(s.fraction(), 1.0);
    }

    #[test]
    fn bad_bounds_never_panic() -> Result<()> {
        let s = SliderState::new(Axis::Horizontal, f32::NAN, 5.0, 3.0);
        assert_eq!((s.min, s.max, s.value), (0.0, 5.0, 3.0));
        let s = SliderState::new(Axis::Horizontal, 0.0, f32::INFINITY, f32::NAN);
        assert_eq!((s.min, s.max, s.value), (0.0, 0.0, 0.0));

        let mut scene = Scene::default();
        let id = build(&mut scene, "gain", SliderState::default(), 8.0, 8.0)?;
        scene.with_kind(id, |kind| {
            if let NodeKind::Slider(state) = kind {
                state.min = 10.0;
                state.max = f32::NAN;
            }
        })?;
        set_value(&mut scene, id, 4.0)?;
        assert_eq!(value(&scene, id), Some(4.0));
        set_value(&mut scene, id, 40.0)?;
        assert_eq!(value(&scene, id), Some(10.0));
        set_value(&mut scene, id, f32::NAN)?;
        assert_eq!(value(&scene, id), Some(0.0));
        Ok(())
    }

    #[test]
    fn value_delta_uses_track() {
        let mut s = SliderState::new(Axis::Horizontal, 0.0, 100.0, 0.0);
        assert_eq!(s.value_delta(10.0), 0.0);
        s.track = 200.0;
        assert_eq!(s.value_delta(10.0), 5.0);
    }

    #[test]
    fn set_value_clamps() -> Result<()> {
        let mut scene = Scene::default();
        let s = build(
            &mut scene,
            "volume",
            SliderState::new(Axis::Horizontal, 0.0, 1.0, 0.5),
            8.0,
            8.0,
        )?;
        set_value(&mut scene, s, 3.0)?;
        assert_eq!(value(&scene, s), Some(1.0));
        assert_eq!(scene.children(s).len(), 1);
        Ok(())
    }

    #[test]
    fn knob_drag_moves_value() -> Result<()> {
        let mut h = Harness::new(200.0, 100.0)?;
        let state = SliderState::new(Axis::Horizontal, 0.0, 100.0, 0.0);
        let slider = build(h.scene_mut(), "volume", state, 10.0, 10.0)?;
        let root = h.root();
        h.scene_mut().append(root, slider)?;
        let changes = Rc::new(RefCell::new(Vec::new()));
        let c = changes.clone();
        h.scene_mut().listen(
            slider,
            EventKind::ValueChanged,
            Channel::User,
            Box::new(move |_, _, e| c.borrow_mut().push(e.clone())),
        )?;
        h.frame()?;
        let knob = h.scene().children(slider)[0];
        assert_eq!(h.rect(knob)?, Rect::new(0.0, 0.0, 10.0, 10.0));

        // 95 of 190 pixels of travel.
        h.drag(Point::new(5.0, 5.0), Point::new(100.0, 5.0))?;
        assert_eq!(value(h.scene(), slider), Some(50.0));
        assert_eq!(h.rect(knob)?.tl.x, 95.0);

        h.drag(Point::new(100.0, 5.0), Point::new(300.0, 5.0))?;
        assert_eq!(value(h.scene(), slider), Some(100.0));
        assert_eq!(
            *changes.borrow(),
            vec![Event::ValueChanged(50.0), Event::ValueChanged(100.0)]
        );
        Ok(())
    }
}
