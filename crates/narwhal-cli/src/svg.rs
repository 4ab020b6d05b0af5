//! Static SVG snapshot of an engine frame.

use std::fmt::Write as _;

use narwhal::{Engine, NodeId, Vec2};
use rustc_hash::FxHashMap;

/// matplotlib's `bgrcmyk`, cycled in node creation order.
const COLORS: [&str; 7] = [
    "#0000ff", "#008000", "#ff0000", "#00bfbf", "#bf00bf", "#bfbf00", "#000000",
];

/// Hands out colors to nodes the first time they are seen and remembers them afterwards.
#[derive(Debug, Default)]
pub struct Palette {
    assigned: FxHashMap<NodeId, usize>,
    next: usize,
}

impl Palette {
    pub fn color_of(&mut self, id: &NodeId) -> &'static str {
        if let Some(&slot) = self.assigned.get(id) {
            return COLORS[slot];
        }
        let slot = self.next % COLORS.len();
        self.next += 1;
        self.assigned.insert(id.clone(), slot);
        COLORS[slot]
    }

    /// Assigns colors to nodes created since the last call and forgets removed ones.
    pub fn observe<L>(&mut self, engine: &Engine<L>) {
        let graph = engine.graph();
        self.assigned.retain(|id, _| graph.has_node(id.as_str()));
        for node in graph.nodes() {
            self.color_of(node.id());
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SvgOptions {
    /// Pixels per world unit.
    pub scale: f64,
    pub padding: f64,
    pub node_radius: f64,
    pub labels: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            scale: 100.0,
            padding: 24.0,
            node_radius: 6.0,
            labels: true,
        }
    }
}

/// Renders links as lines and nodes as filled circles, y axis pointing up.
pub fn render<L>(engine: &Engine<L>, palette: &mut Palette, opts: &SvgOptions) -> String {
    let graph = engine.graph();
    let (min, max) = bounds(engine.positions());
    let width = (max.x - min.x) * opts.scale + 2.0 * opts.padding;
    let height = (max.y - min.y) * opts.scale + 2.0 * opts.padding;
    let project = |p: Vec2| {
        (
            (p.x - min.x) * opts.scale + opts.padding,
            (max.y - p.y) * opts.scale + opts.padding,
        )
    };

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" data-frame="{frame}">"#,
        w = fmt(width),
        h = fmt(height),
        frame = engine.frame(),
    );
    out.push_str(r##"<rect width="100%" height="100%" fill="#ffffff"/>"##);

    out.push_str(r##"<g class="links" stroke="#555555" stroke-width="1.5">"##);
    for (key, link) in graph.links() {
        let (x1, y1) = project(link.a());
        let (x2, y2) = project(link.b());
        let _ = write!(
            &mut out,
            r#"<line data-a="{}" data-b="{}" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            escape_xml(key.a().as_str()),
            escape_xml(key.b().as_str()),
            fmt(x1),
            fmt(y1),
            fmt(x2),
            fmt(y2),
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for node in graph.nodes() {
        let (cx, cy) = project(node.position());
        let id = escape_xml(node.id().as_str());
        let _ = write!(
            &mut out,
            r#"<circle id="node-{id}" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            fmt(cx),
            fmt(cy),
            fmt(opts.node_radius),
            palette.color_of(node.id()),
        );
        if opts.labels {
            let _ = write!(
                &mut out,
                r#"<text x="{}" y="{}" font-family="sans-serif" font-size="10">{id}</text>"#,
                fmt(cx + opts.node_radius + 2.0),
                fmt(cy - opts.node_radius),
            );
        }
    }
    out.push_str("</g></svg>\n");
    out
}

fn bounds(points: &[Vec2]) -> (Vec2, Vec2) {
    let mut it = points.iter();
    let Some(first) = it.next() else {
        return (Vec2::zeros(), Vec2::zeros());
    };
    it.fold((*first, *first), |(lo, hi), p| {
        (lo.zip_map(p, f64::min), hi.zip_map(p, f64::max))
    })
}

/// Three decimals, trailing zeros trimmed, no negative zero.
fn fmt(v: f64) -> String {
    let mut s = format!("{v:.3}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use narwhal::{EngineOptions, NodeOptions, vec2};

    #[test]
    fn fmt_trims_and_normalizes() {
        assert_eq!(fmt(1.0), "1");
        assert_eq!(fmt(1.25), "1.25");
        assert_eq!(fmt(-0.0001), "0");
        assert_eq!(fmt(12.3456), "12.346");
    }

    #[test]
    fn palette_cycles_and_is_stable() {
        let mut palette = Palette::default();
        let ids: Vec<NodeId> = (0..8usize).map(NodeId::from).collect();
        let colors: Vec<_> = ids.iter().map(|id| palette.color_of(id)).collect();
        assert_eq!(colors[0], "#0000ff");
        assert_eq!(colors[6], "#000000");
        assert_eq!(colors[7], colors[0]);
        assert_eq!(palette.color_of(&ids[2]), "#ff0000");
    }

    #[test]
    fn renders_nodes_and_links() {
        let mut engine = Engine::<()>::new(EngineOptions::default()).unwrap();
        engine
            .add_node("a<1>", vec2(0.0, 0.0), NodeOptions::default())
            .unwrap();
        engine
            .add_node("b", vec2(1.0, 1.0), NodeOptions::default())
            .unwrap();
        engine.add_link("a<1>", "b", ()).unwrap();

        let svg = render(&engine, &mut Palette::default(), &SvgOptions::default());
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("<line").count(), 1);
        assert!(svg.contains("a&lt;1&gt;"));
        assert!(svg.contains(r#"width="148""#));
    }
}
