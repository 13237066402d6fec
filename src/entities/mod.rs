//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod operation;
pub mod user;

// Re-export specific types to avoid conflicts
pub use category::{
    CategoryType, Column as CategoryColumn, Entity as Category, Model as CategoryModel,
};
pub use operation::{Column as OperationColumn, Entity as Operation, Model as OperationModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
