//! Debug views of a scene: a colored tree, a paint-order table and a JSON
//! snapshot of resolved geometry.

use std::io::{self, Write};

use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    NodeId,
    error::{Error, Result},
    geom::Rect,
    scene::Scene,
    solver::Overflow,
    widgets::NodeTag,
};

/// Map a buffer write failure.
fn io_err(e: io::Error) -> Error {
    Error::Internal(e.to_string())
}

/// Format a rect compactly.
fn fmt_rect(r: Rect) -> String {
    format!("({}, {}) {}x{}", r.tl.x, r.tl.y, r.w, r.h)
}

/// Traverse a subtree and return an indented, colored listing of node names,
/// kinds and boxes. This is a debug function.
pub fn dump(scene: &Scene, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, scene, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Write a labelled field under a node.
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) -> Result<()> {
    write!(buffer, "{indent}  ").map_err(io_err)?;
    buffer
        .set_color(ColorSpec::new().set_fg(Some(Color::Green)))
        .map_err(io_err)?;
    write!(buffer, "{label}").map_err(io_err)?;
    buffer.reset().map_err(io_err)?;
    writeln!(buffer, " {value}").map_err(io_err)
}

fn dump_node(buffer: &mut Buffer, scene: &Scene, id: NodeId, level: usize) -> Result<()> {
    let node = scene.get(id)?;
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}").map_err(io_err)?;
    buffer
        .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))
        .map_err(io_err)?;
    write!(buffer, "{}", node.name()).map_err(io_err)?;
    buffer.reset().map_err(io_err)?;
    write!(buffer, " {}", node.kind().tag()).map_err(io_err)?;
    for (flag, label) in [(node.hidden(), "hidden"), (node.culled(), "culled")] {
        if flag {
            buffer
                .set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))
                .map_err(io_err)?;
            write!(buffer, " ({label})").map_err(io_err)?;
            buffer.reset().map_err(io_err)?;
        }
    }
    writeln!(buffer).map_err(io_err)?;

    write_field(buffer, &indent, "rect:", &fmt_rect(node.rect()))?;
    let viewable = node.viewable().map_or_else(|| "none".into(), fmt_rect);
    write_field(buffer, &indent, "viewable:", &viewable)?;

    for child in node.children() {
        dump_node(buffer, scene, *child, level + 1)?;
    }
    Ok(())
}

/// A table of the paint list, back to front.
pub fn layout_table(scene: &Scene) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["depth", "name", "kind", "rect", "viewable", "overflow"]);
    for id in scene.paint_order() {
        let Some(n) = scene.node(*id) else {
            continue;
        };
        let overflow = n.overflow();
        table.add_row(vec![
            Cell::new(n.depth()),
            Cell::new(n.name()).fg(TableColor::Green),
            Cell::new(n.kind().tag()),
            Cell::new(fmt_rect(n.rect())),
            Cell::new(n.viewable().map_or_else(|| "none".into(), fmt_rect)),
            Cell::new(format!("{}, {}", overflow.x, overflow.y)),
        ]);
    }
    table.to_string()
}

/// Resolved geometry of one node and its subtree.
#[derive(Debug, Serialize)]
pub struct NodeSnapshot {
    /// Node name.
    pub name: String,
    /// Node kind.
    pub kind: NodeTag,
    /// Outer box.
    pub rect: Rect,
    /// Visible area.
    pub viewable: Option<Rect>,
    /// Paint depth.
    pub depth: u32,
    /// Hidden flag.
    pub hidden: bool,
    /// Culled flag.
    pub culled: bool,
    /// Last overflow.
    pub overflow: Overflow,
    /// Children, in order.
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Capture a subtree.
    pub fn capture(scene: &Scene, id: NodeId) -> Result<Self> {
        let n = scene.get(id)?;
        let mut children = Vec::with_capacity(n.children().len());
        for c in n.children() {
            children.push(Self::capture(scene, *c)?);
        }
        Ok(Self {
            name: n.name().to_string(),
            kind: n.kind().tag(),
            rect: n.rect(),
            viewable: n.viewable(),
            depth: n.depth(),
            hidden: n.hidden(),
            culled: n.culled(),
            overflow: n.overflow(),
            children,
        })
    }
}

/// A pretty-printed JSON snapshot of the whole scene.
pub fn snapshot(scene: &Scene) -> Result<String> {
    let snap = NodeSnapshot::capture(scene, scene.root())?;
    Ok(serde_json::to_string_pretty(&snap)?)
}
