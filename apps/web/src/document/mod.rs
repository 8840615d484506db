// Document Assembly Pipeline
// Content Source → Record Normalizer → Section Visibility Filter → Page Renderer.
// Everything between the fetch and the HTML is pure and synchronous.

pub mod handlers;
pub mod normalize;
pub mod render;
pub mod text;
pub mod view;
pub mod visibility;
