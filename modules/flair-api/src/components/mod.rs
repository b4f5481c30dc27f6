pub mod index;

pub use index::render_index;
