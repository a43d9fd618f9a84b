//! The closed set of node kinds, their payloads and built-in behaviors.

/// Push buttons.
pub mod button;
/// Resizable split panes.
pub mod divider;
/// Popup selectors.
pub mod dropdown;
/// Virtualized lists.
pub mod list;
/// Scroll bars and scroll offsets.
pub mod scrollbar;
/// Value sliders.
pub mod slider;
/// Collapsible trees.
pub mod tree_view;

use std::fmt;

use serde::Serialize;

pub use divider::DividerState;
pub use dropdown::{Direction, DropdownState};
pub use list::VirtualListState;
pub use scrollbar::ScrollbarState;
pub use slider::SliderState;
pub use tree_view::TreeViewState;

use crate::{
    NodeId,
    error::Result,
    event::{Channel, Event, dispatch},
    scene::Scene,
};

/// Paint band added to scrollbar depth.
pub const SCROLLBAR_BAND: u32 = 10_000;
/// Paint band added to dropdown container depth.
pub const DROPDOWN_BAND: u32 = 20_000;
/// Paint band added to floating box depth.
pub const FLOATING_BAND: u32 = 30_000;

/// A node's type, with any per-kind state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeKind {
    /// A generic container.
    #[default]
    Box,
    /// A clickable node.
    Button,
    /// Panes separated by draggable separators.
    Divider(DividerState),
    /// A divider's draggable separator.
    DividerSeparator,
    /// A value slider.
    Slider(SliderState),
    /// A slider's draggable knob.
    SliderKnob,
    /// A scrollbar attached to a scroll container.
    Scrollbar(ScrollbarState),
    /// A scrollbar's draggable knob.
    ScrollbarKnob,
    /// A list that only lays out visible rows.
    VirtualList(VirtualListState),
    /// A collapsible header plus items.
    TreeView(TreeViewState),
    /// A selector with a popup container.
    Dropdown(DropdownState),
    /// A dropdown's popup.
    DropdownContainer,
    /// A box positioned by offset, outside its parent's flow.
    FloatingBox,
}

/// Fieldless node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeTag {
    /// See [`NodeKind::Box`].
    Box,
    /// See [`NodeKind::Button`].
    Button,
    /// See [`NodeKind::Divider`].
    Divider,
    /// See [`NodeKind::DividerSeparator`].
    DividerSeparator,
    /// See [`NodeKind::Slider`].
    Slider,
    /// See [`NodeKind::SliderKnob`].
    SliderKnob,
    /// See [`NodeKind::Scrollbar`].
    Scrollbar,
    /// See [`NodeKind::ScrollbarKnob`].
    ScrollbarKnob,
    /// See [`NodeKind::VirtualList`].
    VirtualList,
    /// See [`NodeKind::TreeView`].
    TreeView,
    /// See [`NodeKind::Dropdown`].
    Dropdown,
    /// See [`NodeKind::DropdownContainer`].
    DropdownContainer,
    /// See [`NodeKind::FloatingBox`].
    FloatingBox,
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl NodeKind {
    /// The kind without its payload.
    pub fn tag(&self) -> NodeTag {
        match self {
            Self::Box => NodeTag::Box,
            Self::Button => NodeTag::Button,
            Self::Divider(_) => NodeTag::Divider,
            Self::DividerSeparator => NodeTag::DividerSeparator,
            Self::Slider(_) => NodeTag::Slider,
            Self::SliderKnob => NodeTag::SliderKnob,
            Self::Scrollbar(_) => NodeTag::Scrollbar,
            Self::ScrollbarKnob => NodeTag::ScrollbarKnob,
            Self::VirtualList(_) => NodeTag::VirtualList,
            Self::TreeView(_) => NodeTag::TreeView,
            Self::Dropdown(_) => NodeTag::Dropdown,
            Self::DropdownContainer => NodeTag::DropdownContainer,
            Self::FloatingBox => NodeTag::FloatingBox,
        }
    }

    /// Paint-order band added on top of the parent's depth.
    pub fn band(&self) -> u32 {
        match self {
            Self::Scrollbar(_) => SCROLLBAR_BAND,
            Self::DropdownContainer => DROPDOWN_BAND,
            Self::FloatingBox => FLOATING_BAND,
            _ => 0,
        }
    }

    /// Does the parent's flow place this node?
    pub fn in_flow(&self) -> bool {
        !matches!(
            self,
            Self::Scrollbar(_) | Self::DropdownContainer | Self::FloatingBox
        )
    }

    /// Overlays clip against the window instead of their ancestors.
    pub fn is_overlay(&self) -> bool {
        matches!(self, Self::DropdownContainer | Self::FloatingBox)
    }

    /// Whether a freshly created node of this kind receives pointer events.
    pub(crate) fn default_hit_target(&self) -> bool {
        !matches!(self, Self::DropdownContainer)
    }
}

/// Run a node kind's built-in behavior for an event on a channel.
pub(crate) fn behave(scene: &mut Scene, node: NodeId, event: &Event, channel: Channel) -> Result<()> {
    let Some(tag) = scene.node(node).map(|n| n.kind().tag()) else {
        return Ok(());
    };
    match (tag, channel) {
        (NodeTag::Button, Channel::Input) => button::on_input(scene, node, event),
        (NodeTag::SliderKnob | NodeTag::ScrollbarKnob | NodeTag::DividerSeparator, Channel::Input) => {
            forward_drag(scene, node, event)
        }
        (NodeTag::Slider, Channel::Input) => slider::on_input(scene, node, event),
        (NodeTag::Slider, Channel::Internal) => slider::on_internal(scene, node, event),
        (NodeTag::Scrollbar, Channel::Internal) => scrollbar::on_internal(scene, node, event),
        (NodeTag::Divider, Channel::Internal) => divider::on_internal(scene, node, event),
        (NodeTag::Dropdown, Channel::Input) => dropdown::on_input(scene, node, event),
        (NodeTag::Dropdown, Channel::Internal) => dropdown::on_internal(scene, node, event),
        (NodeTag::DropdownContainer, Channel::Internal) => forward_to_parent(scene, node, event),
        (NodeTag::TreeView, Channel::Internal) => tree_view::on_internal(scene, node, event),
        _ => Ok(()),
    }
}

/// Knobs and separators hand their drags to their owner.
fn forward_drag(scene: &mut Scene, node: NodeId, event: &Event) -> Result<()> {
    if matches!(event, Event::Drag { .. }) {
        forward_to_parent(scene, node, event)?;
    }
    Ok(())
}

/// Re-dispatch an event at the node's parent on the internal channel.
fn forward_to_parent(scene: &mut Scene, node: NodeId, event: &Event) -> Result<()> {
    if let Some(parent) = scene.parent(node) {
        dispatch(scene, parent, event, Channel::Internal)?;
    }
    Ok(())
}
