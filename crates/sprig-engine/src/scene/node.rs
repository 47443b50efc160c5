use crate::pixels::PixelBuffer;
use crate::surface::RasterSurface;

use super::{Camera, Sprite, SpriteId};

/// Capability shared by every node kind.
pub trait Drawable {
    fn draw(&self, camera: &Camera, surface: &mut dyn RasterSurface);
}

/// Scene tree node.
///
/// Extending the tree:
/// - add a node type implementing `Drawable`
/// - add a variant here and a match arm in `Node::draw`
///
/// `Scene::draw` only talks to `Drawable` and never changes.
#[derive(Debug, Clone)]
pub enum Node {
    Sprite(Sprite),
    Group(Group),
}

impl Drawable for Node {
    fn draw(&self, camera: &Camera, surface: &mut dyn RasterSurface) {
        match self {
            Node::Sprite(s) => s.draw(camera, surface),
            Node::Group(g) => g.draw(camera, surface),
        }
    }
}

impl From<Sprite> for Node {
    fn from(s: Sprite) -> Self {
        Node::Sprite(s)
    }
}

impl From<Group> for Node {
    fn from(g: Group) -> Self {
        Node::Group(g)
    }
}

/// Ordered container node. Children draw depth-first in insertion order.
#[derive(Debug, Clone)]
pub struct Group {
    pub visible: bool,
    pub children: Nodes,
}

impl Group {
    pub fn new() -> Self {
        Self { visible: true, children: Nodes::default() }
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node);
        self
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawable for Group {
    fn draw(&self, camera: &Camera, surface: &mut dyn RasterSurface) {
        if self.visible {
            self.children.draw(camera, surface);
        }
    }
}

/// Source/destination buffers handed to a pixel effect.
#[derive(Debug)]
pub enum BufferPair<'a> {
    /// Source and destination are the same sprite.
    Same(&'a mut PixelBuffer),
    Split {
        src: &'a PixelBuffer,
        dst: &'a mut PixelBuffer,
    },
}

/// Insertion-ordered node list.
///
/// Ownership keeps the tree acyclic: a node lives in exactly one list.
#[derive(Debug, Clone, Default)]
pub struct Nodes {
    items: Vec<Node>,
}

impl Nodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.items.push(node.into());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }

    /// Depth-first search for a sprite anywhere in the subtree.
    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.items.iter().find_map(|n| match n {
            Node::Sprite(s) if s.id() == id => Some(s),
            Node::Sprite(_) => None,
            Node::Group(g) => g.children.sprite(id),
        })
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.items.iter_mut().find_map(|n| match n {
            Node::Sprite(s) if s.id() == id => Some(s),
            Node::Sprite(_) => None,
            Node::Group(g) => g.children.sprite_mut(id),
        })
    }

    /// Sprite ids in draw order.
    pub fn sprite_ids(&self) -> Vec<SpriteId> {
        let mut out = Vec::new();
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids(&self, out: &mut Vec<SpriteId>) {
        for n in &self.items {
            match n {
                Node::Sprite(s) => out.push(s.id()),
                Node::Group(g) => g.children.collect_ids(out),
            }
        }
    }

    /// Detaches a sprite from the tree.
    pub fn remove_sprite(&mut self, id: SpriteId) -> Option<Sprite> {
        if let Some(i) = self
            .items
            .iter()
            .position(|n| matches!(n, Node::Sprite(s) if s.id() == id))
        {
            return match self.items.remove(i) {
                Node::Sprite(s) => Some(s),
                Node::Group(_) => None,
            };
        }
        self.items.iter_mut().find_map(|n| match n {
            Node::Group(g) => g.children.remove_sprite(id),
            Node::Sprite(_) => None,
        })
    }

    /// Runs `f` with the buffers of `src` and `dst`.
    ///
    /// The destination buffer is moved out of its sprite for the duration of
    /// the call and swapped back afterwards. `None` when either sprite is
    /// missing.
    pub fn with_buffers<R>(
        &mut self,
        src: SpriteId,
        dst: SpriteId,
        f: impl FnOnce(BufferPair<'_>) -> R,
    ) -> Option<R> {
        if src == dst {
            let sprite = self.sprite_mut(dst)?;
            let mut buf = sprite.take_buffer();
            let out = f(BufferPair::Same(&mut buf));
            sprite.replace_buffer(buf);
            return Some(out);
        }

        if self.sprite(src).is_none() {
            return None;
        }
        let mut buf = self.sprite_mut(dst)?.take_buffer();
        let out = self.sprite(src).map(|s| f(BufferPair::Split { src: s.buffer(), dst: &mut buf }));
        if let Some(sprite) = self.sprite_mut(dst) {
            sprite.replace_buffer(buf);
        }
        out
    }

    pub(crate) fn draw(&self, camera: &Camera, surface: &mut dyn RasterSurface) {
        for node in &self.items {
            node.draw(camera, surface);
        }
    }
}

impl<'a> IntoIterator for &'a Nodes {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::pixels::Rgba;

    fn loaded(c: Rgba) -> Sprite {
        Sprite::with_buffer(Vec2::zero(), PixelBuffer::filled(2, 2, c))
    }

    #[test]
    fn finds_sprites_inside_groups() {
        let inner = loaded(Rgba::WHITE);
        let id = inner.id();
        let mut nodes = Nodes::new();
        nodes.push(loaded(Rgba::BLACK));
        nodes.push(Group::new().child(Group::new().child(inner)));

        assert!(nodes.sprite(id).is_some());
        assert_eq!(nodes.sprite_ids().len(), 2);
        assert_eq!(nodes.sprite_ids()[1], id);
    }

    #[test]
    fn remove_sprite_from_nested_group() {
        let inner = loaded(Rgba::WHITE);
        let id = inner.id();
        let mut nodes = Nodes::new();
        nodes.push(Group::new().child(inner));

        assert!(nodes.remove_sprite(id).is_some());
        assert!(nodes.sprite(id).is_none());
        assert!(nodes.remove_sprite(id).is_none());
    }

    #[test]
    fn with_buffers_split_restores_destination() {
        let a = loaded(Rgba::WHITE);
        let b = loaded(Rgba::BLACK);
        let (ida, idb) = (a.id(), b.id());
        let mut nodes = Nodes::new();
        nodes.push(a);
        nodes.push(b);

        let copied = nodes.with_buffers(ida, idb, |pair| match pair {
            BufferPair::Split { src, dst } => {
                dst.as_bytes_mut().copy_from_slice(src.as_bytes());
                true
            }
            BufferPair::Same(_) => false,
        });

        assert_eq!(copied, Some(true));
        assert_eq!(nodes.sprite(idb).unwrap().buffer().pixel(1, 1), Some(Rgba::WHITE));
    }

    #[test]
    fn with_buffers_same_sprite_is_in_place() {
        let a = loaded(Rgba::WHITE);
        let id = a.id();
        let mut nodes = Nodes::new();
        nodes.push(a);

        let same = nodes.with_buffers(id, id, |pair| {
            if let BufferPair::Same(buf) = pair {
                buf.set_pixel(0, 0, Rgba::BLACK);
                true
            } else {
                false
            }
        });

        assert_eq!(same, Some(true));
        assert_eq!(nodes.sprite(id).unwrap().buffer().pixel(0, 0), Some(Rgba::BLACK));
    }

    #[test]
    fn with_buffers_missing_sprite_is_none() {
        let a = loaded(Rgba::WHITE);
        let id = a.id();
        let mut nodes = Nodes::new();
        nodes.push(a);
        let ghost = Sprite::new(Vec2::zero()).id();

        assert!(nodes.with_buffers(ghost, id, |_| ()).is_none());
        assert!(nodes.with_buffers(id, ghost, |_| ()).is_none());
        assert_eq!(nodes.sprite(id).unwrap().size(), Vec2::new(2.0, 2.0));
    }
}
