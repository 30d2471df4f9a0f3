//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod client;
pub mod delivery_location;
pub mod product;
pub mod sale;
pub mod session;
pub mod store;
pub mod user;
pub mod user_profile;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use delivery_location::{
    Column as DeliveryLocationColumn, Entity as DeliveryLocation, Model as DeliveryLocationModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use store::{Column as StoreColumn, Entity as Store, Model as StoreModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use user_profile::{
    Column as UserProfileColumn, Entity as UserProfile, Model as UserProfileModel,
};
