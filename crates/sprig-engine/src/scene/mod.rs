//! Scene graph.
//!
//! Responsibilities:
//! - own the node tree, camera and target surface
//! - run the per-frame cycle: load completions, update hook, draw
//! - keep exactly one host tick outstanding while running
//!
//! Draw order is insertion order (painter's algorithm). There is no z-index.

mod camera;
mod node;
mod sprite;
mod stage;

pub use camera::Camera;
pub use node::{BufferPair, Drawable, Group, Node, Nodes};
pub use sprite::{LoadState, Sprite, SpriteId};
pub use stage::{Scene, SceneConfig, SceneError, UpdateCtx, UpdateFn};
