//! Catalog hierarchy: categories contain products, products contain items.

mod category;
mod item;
mod product;
mod service;

pub use category::Category;
pub use item::Item;
pub use product::Product;
pub use service::CatalogService;
