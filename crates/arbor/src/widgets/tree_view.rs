use crate::{
    NodeId,
    error::Result,
    event::{Channel, Event, dispatch},
    layout::LayoutSpec,
    scene::Scene,
    widgets::NodeKind,
};

/// Tree view payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeViewState {
    /// Are items shown?
    pub expanded: bool,
    /// Horizontal indent applied to items.
    pub indent: f32,
}

impl Default for TreeViewState {
    fn default() -> Self {
        Self {
            expanded: true,
            indent: 16.0,
        }
    }
}

/// Build a detached tree view whose first child is a clickable header.
/// Returns the tree id; the header is its first child.
pub fn build(scene: &mut Scene, name: &str, state: TreeViewState) -> Result<NodeId> {
    let tree = scene.create_with(NodeKind::TreeView(state), name, LayoutSpec::column());
    let header = scene.create(NodeKind::Button, "header");
    scene.append(tree, header)?;
    Ok(tree)
}

/// The tree's header.
pub fn header(scene: &Scene, tree: NodeId) -> Option<NodeId> {
    scene.children(tree).first().copied()
}

/// Append an item, hidden if the tree is collapsed.
pub fn add_item(scene: &mut Scene, tree: NodeId, item: NodeId) -> Result<()> {
    let expanded = is_expanded(scene, tree);
    scene.append(tree, item)?;
    scene.set_hidden(item, !expanded)
}

/// Is the tree expanded?
pub fn is_expanded(scene: &Scene, tree: NodeId) -> bool {
    matches!(
        scene.node(tree).map(|n| n.kind()),
        Some(NodeKind::TreeView(TreeViewState { expanded: true, .. }))
    )
}

/// Expand or collapse, emitting `Toggled` on change.
pub fn set_expanded(scene: &mut Scene, tree: NodeId, expanded: bool) -> Result<()> {
    if is_expanded(scene, tree) == expanded {
        return Ok(());
    }
    scene.with_kind(tree, |kind| {
        if let NodeKind::TreeView(state) = kind {
            state.expanded = expanded;
        }
    })?;
    let items: Vec<NodeId> = scene.children(tree).iter().skip(1).copied().collect();
    for item in items {
        scene.set_hidden(item, !expanded)?;
    }
    dispatch(scene, tree, &Event::Toggled(expanded), Channel::User)
}

/// Header clicks arrive here on the internal channel.
pub(crate) fn on_internal(scene: &mut Scene, node: NodeId, event: &Event) -> Result<()> {
    let Event::Click { source } = event else {
        return Ok(());
    };
    if header(scene, node) != Some(*source) {
        return Ok(());
    }
    let expanded = is_expanded(scene, node);
    set_expanded(scene, node, !expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_hides_items() -> Result<()> {
        let mut scene = Scene::default();
        let tree = build(&mut scene, "files", TreeViewState::default())?;
        let a = scene.create(NodeKind::Box, "a");
        add_item(&mut scene, tree, a)?;
        assert!(!scene.get(a)?.hidden());

        let h = header(&scene, tree);
        assert!(h.is_some());
        if let Some(h) = h {
            on_internal(&mut scene, tree, &Event::Click { source: h })?;
        }
        assert!(!is_expanded(&scene, tree));
        assert!(scene.get(a)?.hidden());

        let b = scene.create(NodeKind::Box, "b");
        add_item(&mut scene, tree, b)?;
        assert!(scene.get(b)?.hidden());
        Ok(())
    }

    #[test]
    fn clicks_from_items_are_ignored() -> Result<()> {
        let mut scene = Scene::default();
        let tree = build(&mut scene, "files", TreeViewState::default())?;
        let a = scene.create(NodeKind::Button, "a");
        add_item(&mut scene, tree, a)?;
        on_internal(&mut scene, tree, &Event::Click { source: a })?;
        assert!(is_expanded(&scene, tree));
        Ok(())
    }
}
