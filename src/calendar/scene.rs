//! Retained scene graph
//!
//! The renderer rebuilds the node list every draw; hosts read it back to
//! rasterize and to hit-test pointer positions. Coordinates are surface
//! pixels with the origin at the top-left of the drawing area.

use chrono::NaiveDate;

use crate::calendar::palette::Rgba;
use crate::types::{Bounds, Point};

/// Average glyph advance as a fraction of the font size, used to size text
const GLYPH_ADVANCE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Text centered on `center`
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub center: Point,
    pub text: String,
    pub font_size: f64,
    pub weight: FontWeight,
    pub fill: Rgba,
}

impl TextNode {
    /// Approximate box occupied by the text
    pub fn bounds(&self) -> Bounds {
        let width = self.text.chars().count() as f64 * self.font_size * GLYPH_ADVANCE;
        let height = self.font_size;
        Bounds::new(
            self.center.x - width / 2.0,
            self.center.y - height / 2.0,
            width,
            height,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineNode {
    pub from: Point,
    pub to: Point,
    pub stroke: Rgba,
    pub width: f64,
}

/// Rounded rectangle; `fill: None` is transparent but still hit-testable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectNode {
    pub bounds: Bounds,
    pub corner_radius: f64,
    pub fill: Option<Rgba>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Text(TextNode),
    Line(LineNode),
    Rect(RectNode),
}

impl Shape {
    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Text(t) => t.bounds(),
            Shape::Line(l) => {
                let x = l.from.x.min(l.to.x);
                let y = l.from.y.min(l.to.y);
                Bounds::new(
                    x,
                    y - l.width / 2.0,
                    (l.from.x - l.to.x).abs(),
                    (l.from.y - l.to.y).abs() + l.width,
                )
            }
            Shape::Rect(r) => r.bounds,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub shape: Shape,
    /// Day this node stands for, when it reacts to the pointer
    pub day: Option<NaiveDate>,
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    next_id: u64,
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, shape: Shape) -> NodeId {
        self.push(shape, None)
    }

    /// Add a node that pointer hover resolves to `day`
    pub fn add_interactive(&mut self, shape: Shape, day: NaiveDate) -> NodeId {
        self.push(shape, Some(day))
    }

    fn push(&mut self, shape: Shape, day: Option<NaiveDate>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node { id, shape, day });
        id
    }

    /// Remove every node
    pub fn destroy_children(&mut self) {
        self.nodes.clear();
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Topmost interactive node under `point`
    pub fn hit_test(&self, point: Point) -> Option<&Node> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.day.is_some() && n.shape.bounds().contains(point))
    }

    /// Commit the current node list; hosts repaint when the revision moves
    pub fn batch_draw(&mut self) {
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextNode> {
        self.nodes.iter().filter_map(|n| match &n.shape {
            Shape::Text(t) => Some(t),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64) -> Shape {
        Shape::Rect(RectNode {
            bounds: Bounds::new(x, y, 40.0, 40.0),
            corner_radius: 20.0,
            fill: None,
        })
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_add_and_destroy_children() {
        let mut scene = Scene::new();
        let a = scene.add(rect(0.0, 0.0));
        let b = scene.add(rect(50.0, 0.0));
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
        scene.destroy_children();
        assert!(scene.is_empty());
        assert!(scene.get(a).is_none());
    }

    #[test]
    fn test_hit_test_only_interactive() {
        let mut scene = Scene::new();
        scene.add(rect(0.0, 0.0));
        assert!(scene.hit_test(Point::new(10.0, 10.0)).is_none());
        scene.add_interactive(rect(0.0, 0.0), day(1));
        let hit = scene.hit_test(Point::new(10.0, 10.0)).unwrap();
        assert_eq!(hit.day, Some(day(1)));
        assert!(scene.hit_test(Point::new(45.0, 10.0)).is_none());
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut scene = Scene::new();
        scene.add_interactive(rect(0.0, 0.0), day(1));
        scene.add_interactive(rect(20.0, 0.0), day(2));
        let hit = scene.hit_test(Point::new(30.0, 5.0)).unwrap();
        assert_eq!(hit.day, Some(day(2)));
    }

    #[test]
    fn test_text_bounds_centered() {
        let t = TextNode {
            center: Point::new(100.0, 50.0),
            text: "Mar".into(),
            font_size: 20.0,
            weight: FontWeight::Bold,
            fill: Rgba::BLACK,
        };
        let b = t.bounds();
        assert_eq!(b.width, 36.0);
        assert_eq!(b.x, 82.0);
        assert_eq!(b.y, 40.0);
    }

    #[test]
    fn test_batch_draw_bumps_revision() {
        let mut scene = Scene::new();
        assert_eq!(scene.revision(), 0);
        scene.batch_draw();
        scene.batch_draw();
        assert_eq!(scene.revision(), 2);
    }
}
