// storefront/src/models/mod.rs

//! Data structures representing database entities and their views.

pub mod cart;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;

// Re-export the model structs for convenient access
pub use cart::{Cart, CartItem, CartLine, Customization};
pub use order::{Order, OrderStatus, ShippingAddress, StatusEntry};
pub use order_item::OrderItem;
pub use product::{Product, Review};
pub use user::User;
