pub mod movement;
pub mod product;

pub use movement::{Movement, MovementKind, RecordMovement};
pub use product::{CreateProduct, Product, ProductDetail};
