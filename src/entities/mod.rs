pub mod consent;
pub mod scope;

pub use consent::Entity as Consent;
pub use scope::Entity as Scope;
