use serde::{Deserialize, Serialize};

use crate::{
    NodeId,
    error::{Error, Result},
    event::{Channel, Event, MouseButton, dispatch},
    geom::{Point, Rect, Size},
    layout::LayoutSpec,
    scene::Scene,
    widgets::{NodeKind, NodeTag},
};

/// Side of the anchor a popup expands towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Below the anchor, left edges aligned.
    Down,
    /// Above the anchor, left edges aligned.
    Up,
    /// Right of the anchor, top edges aligned.
    Right,
    /// Left of the anchor, top edges aligned.
    Left,
}

impl Direction {
    /// Default preference order.
    pub const DEFAULT_ORDER: [Self; 4] = [Self::Down, Self::Up, Self::Right, Self::Left];

    /// Where a popup of `size` lands for this direction.
    pub fn place(self, anchor: Rect, size: Size) -> Rect {
        let tl = match self {
            Self::Down => Point::new(anchor.tl.x, anchor.bottom()),
            Self::Up => Point::new(anchor.tl.x, anchor.tl.y - size.h),
            Self::Right => Point::new(anchor.right(), anchor.tl.y),
            Self::Left => Point::new(anchor.tl.x - size.w, anchor.tl.y),
        };
        Rect::from_origin(tl, size)
    }
}

/// Dropdown payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownState {
    /// Is the popup shown?
    pub open: bool,
    /// Expansion directions, most preferred first.
    pub directions: Vec<Direction>,
    /// Selected option index.
    pub selected: Option<usize>,
    /// Direction chosen by the last layout.
    pub(crate) placed: Option<Direction>,
}

impl Default for DropdownState {
    fn default() -> Self {
        Self {
            open: false,
            directions: Direction::DEFAULT_ORDER.to_vec(),
            selected: None,
            placed: None,
        }
    }
}

impl DropdownState {
    /// Direction chosen by the last layout.
    pub fn placed(&self) -> Option<Direction> {
        self.placed
    }
}

/// Try each direction in order and return the first placement that stays
/// inside the window. If none fits, the last direction tried wins.
pub fn place_popup(
    anchor: Rect,
    size: Size,
    window: Rect,
    directions: &[Direction],
) -> (Direction, Rect) {
    let mut last = (Direction::Down, Direction::Down.place(anchor, size));
    for d in directions {
        let r = d.place(anchor, size);
        if window.contains_rect(r) {
            return (*d, r);
        }
        last = (*d, r);
    }
    last
}

/// Build a detached dropdown with an empty, closed popup container.
pub fn build(scene: &mut Scene, name: &str, layout: LayoutSpec) -> Result<NodeId> {
    let dropdown = scene.create_with(NodeKind::Dropdown(DropdownState::default()), name, layout);
    let container = scene.create_with(NodeKind::DropdownContainer, "options", LayoutSpec::column());
    scene.append(dropdown, container)?;
    scene.set_hidden(container, true)?;
    Ok(dropdown)
}

/// The dropdown's popup container.
pub fn container(scene: &Scene, dropdown: NodeId) -> Option<NodeId> {
    scene.children(dropdown).iter().copied().find(|c| {
        scene
            .node(*c)
            .is_some_and(|n| n.kind().tag() == NodeTag::DropdownContainer)
    })
}

/// Append an option. Options should be buttons; their clicks select them.
pub fn add_option(scene: &mut Scene, dropdown: NodeId, option: NodeId) -> Result<()> {
    let Some(c) = container(scene, dropdown) else {
        return Err(Error::Invalid(format!(
            "{dropdown:?} is not a dropdown"
        )));
    };
    scene.append(c, option)
}

/// Is the popup open?
pub fn is_open(scene: &Scene, dropdown: NodeId) -> bool {
    matches!(
        scene.node(dropdown).map(|n| n.kind()),
        Some(NodeKind::Dropdown(DropdownState { open: true, .. }))
    )
}

/// The selected option index.
pub fn selected(scene: &Scene, dropdown: NodeId) -> Option<usize> {
    match scene.node(dropdown).map(|n| n.kind()) {
        Some(NodeKind::Dropdown(state)) => state.selected,
        _ => None,
    }
}

/// Open or close the popup, emitting `Toggled` on change.
pub fn set_open(scene: &mut Scene, dropdown: NodeId, open: bool) -> Result<()> {
    if is_open(scene, dropdown) == open {
        return Ok(());
    }
    scene.with_kind(dropdown, |kind| {
        if let NodeKind::Dropdown(state) = kind {
            state.open = open;
            if !open {
                state.placed = None;
            }
        }
    })?;
    if let Some(c) = container(scene, dropdown) {
        scene.set_hidden(c, !open)?;
    }
    dispatch(scene, dropdown, &Event::Toggled(open), Channel::User)
}

/// Select an option and close the popup, emitting `Selected`.
pub fn select(scene: &mut Scene, dropdown: NodeId, index: usize) -> Result<()> {
    scene.with_kind(dropdown, |kind| {
        if let NodeKind::Dropdown(state) = kind {
            state.selected = Some(index);
        }
    })?;
    set_open(scene, dropdown, false)?;
    dispatch(scene, dropdown, &Event::Selected(index), Channel::User)
}

/// Pressing the dropdown toggles it.
pub(crate) fn on_input(scene: &mut Scene, node: NodeId, event: &Event) -> Result<()> {
    if let Event::MouseDown {
        button: MouseButton::Left,
        ..
    } = event
    {
        let open = is_open(scene, node);
        set_open(scene, node, !open)?;
    }
    Ok(())
}

/// Option clicks arrive here through the container.
pub(crate) fn on_internal(scene: &mut Scene, node: NodeId, event: &Event) -> Result<()> {
    let Event::Click { source } = event else {
        return Ok(());
    };
    let Some(c) = container(scene, node) else {
        return Ok(());
    };
    if let Some(index) = scene.children(c).iter().position(|o| o == source) {
        select(scene, node, index)?;
    }
    Ok(())
}
