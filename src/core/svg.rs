//! SVG export of a scene

use super::scene::{Glyph, Link, Scene, EM_PX, NODE_HEIGHT_EM};
use super::state::ViewTransform;
use std::fmt::{self, Write};

const STYLE: &str = "\
.tree-link{fill:none;stroke:#888;stroke-width:1.5px}\
.tree-link-canonical{stroke:#2b7bb9;stroke-width:3px}\
.node rect{stroke:#333;stroke-width:1px}\
.node-final{stroke-width:2.5px}\
.node-justified{stroke-dasharray:4 2}\
.node-root rect{stroke:#000}\
.node text{font:12px monospace;fill:#111}";

impl Scene {
    /// Standalone SVG document, viewport sized, with `transform` applied
    pub fn to_svg(&self, transform: &ViewTransform) -> String {
        let mut out = String::with_capacity(256 + self.glyphs.len() * 200);
        match self.write_svg(&mut out, transform) {
            Ok(()) => out,
            Err(fmt::Error) => String::new(),
        }
    }

    fn write_svg(&self, out: &mut String, t: &ViewTransform) -> fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(self.viewport.width),
            h = num(self.viewport.height),
        )?;
        writeln!(out, "<style>{}</style>", STYLE)?;
        writeln!(
            out,
            r#"<g transform="translate({},{}) scale({})">"#,
            num(t.tx),
            num(t.ty),
            num(t.k)
        )?;
        for link in &self.links {
            write_link(out, link)?;
        }
        for glyph in self.painted() {
            write_glyph(out, glyph)?;
        }
        writeln!(out, "</g>")?;
        writeln!(out, "</svg>")
    }
}

fn write_link(out: &mut String, link: &Link) -> fmt::Result {
    let [a, b, c, d] = link.curve;
    writeln!(
        out,
        r#"<path class="{}" d="M{},{}C{},{} {},{} {},{}"/>"#,
        link.class(),
        num(a.x),
        num(a.y),
        num(b.x),
        num(b.y),
        num(c.x),
        num(c.y),
        num(d.x),
        num(d.y)
    )
}

fn write_glyph(out: &mut String, glyph: &Glyph) -> fmt::Result {
    let names = glyph.class.names();
    let rect = glyph.rect();
    writeln!(
        out,
        r#"<g class="{} {} {}" data-root="{}">"#,
        names[0],
        names[1],
        names[2],
        escape(&glyph.block_root)
    )?;
    writeln!(
        out,
        r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
        names[3],
        num(rect.min.x),
        num(rect.min.y),
        num(glyph.width_units as f64 * EM_PX),
        num(NODE_HEIGHT_EM * EM_PX),
        glyph.fill.css()
    )?;
    if let Some(label) = &glyph.label {
        writeln!(
            out,
            r#"<text x="{}" y="{}">{}</text>"#,
            num(label.anchor.x),
            num(label.anchor.y),
            escape(&label.text)
        )?;
    }
    writeln!(out, "</g>")
}

fn num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::{layout, Viewport};
    use crate::core::scene::render;
    use crate::core::snapshot::{parse, tests::FORKED};
    use crate::core::state::UiState;

    fn forked_scene(ui: &UiState) -> Scene {
        let snapshot = parse(FORKED).unwrap();
        let tree = layout(
            snapshot.proto_array.as_ref().unwrap(),
            ui.layout_style,
            Viewport::new(800.0, 400.0),
        );
        render(&tree, &snapshot, ui)
    }

    #[test]
    fn test_svg_elements() {
        let svg = forked_scene(&UiState::default()).to_svg(&ViewTransform::IDENTITY);
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"width="800" height="400""#));
        assert_eq!(svg.matches("<path ").count(), 3);
        assert_eq!(svg.matches("tree-link tree-link-canonical").count(), 2);
        assert_eq!(svg.matches("<rect ").count(), 4);
        assert_eq!(svg.matches("<text ").count(), 4);
        assert_eq!(svg.matches("node-root\"").count(), 1);
        assert!(svg.contains(r#"class="node-justified""#));
        assert!(svg.contains(">96</text>"));
        assert!(svg.contains(r#"transform="translate(0,0) scale(1)""#));
    }

    #[test]
    fn test_svg_hidden_labels_and_transform() {
        let ui = UiState {
            labels_hidden: true,
            ..UiState::default()
        };
        let mut t = ViewTransform::IDENTITY;
        t.pan(12.5, -3.0);
        let svg = forked_scene(&ui).to_svg(&t);
        assert_eq!(svg.matches("<text ").count(), 0);
        assert!(svg.contains("translate(12.5,-3) scale(1)"));
    }

    #[test]
    fn test_num_and_escape() {
        assert_eq!(num(3.0), "3");
        assert_eq!(num(2.126), "2.13");
        assert_eq!(num(-0.001), "0");
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
