//! Fieldmap Core - Declarative field mapping between record types
//!
//! This crate copies field values between instances of two unrelated record
//! types, driven by correspondences declared on the fields of one of them
//! (the "view" type). The same correspondences serve both directions.
//!
//! # Main Components
//!
//! - **Error Handling**: schema errors and loading errors using `thiserror`
//! - **Field Metadata**: [`FieldType`], [`Access`] and [`FieldDescriptor`]
//! - **Registration**: [`Record`] and [`RecordDescriptor`] for native structs
//! - **Profiles**: record types declared in YAML, JSON or TOML files
//! - **Mapping Engine**: [`MappingPlan`] resolution and execution, and the
//!   caching [`Mapper`] service
//!
//! # Example
//!
//! ```
//! use fieldmap_core::{Field, Record, RecordDescriptor, Result};
//!
//! #[derive(Debug, Default)]
//! struct Customer {
//!     id: i32,
//!     name: Option<String>,
//! }
//!
//! impl Record for Customer {
//!     fn describe() -> Result<RecordDescriptor<Self>> {
//!         RecordDescriptor::builder("Customer")
//!             .field(Field::new("id", |c: &Customer| &c.id, |c, v| c.id = v))
//!             .field(Field::optional("name", |c: &Customer| &c.name, |c, v| c.name = v))
//!             .build()
//!     }
//! }
//!
//! #[derive(Debug, Default)]
//! struct CustomerView {
//!     my_id: i32,
//!     my_name: Option<String>,
//! }
//!
//! impl Record for CustomerView {
//!     fn describe() -> Result<RecordDescriptor<Self>> {
//!         RecordDescriptor::builder("CustomerView")
//!             .field(Field::new("my_id", |v: &CustomerView| &v.my_id, |v, x| v.my_id = x).from("id"))
//!             .field(
//!                 Field::optional("my_name", |v: &CustomerView| &v.my_name, |v, x| v.my_name = x)
//!                     .from("name"),
//!             )
//!             .build()
//!     }
//! }
//!
//! fn example() -> Result<()> {
//!     let customer = Customer { id: 1, name: Some("Ada".into()) };
//!     let view: CustomerView = fieldmap_core::class_to_view_model(&customer)?;
//!     assert_eq!(view.my_id, 1);
//!
//!     let back: Customer = fieldmap_core::view_model_to_class(&view)?;
//!     assert_eq!(back.name.as_deref(), Some("Ada"));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod descriptor;
pub mod error;
pub mod mapping;
pub mod profile;
pub mod record;
pub mod types;

// Re-export main types for convenience
pub use descriptor::TypeDescriptor;
pub use error::{Error, ErrorCode, Result};
pub use types::{Access, FieldDescriptor, FieldType, TypeKey};

pub use record::{Field, FieldValue, Record, RecordDescriptor, RecordDescriptorBuilder};

pub use mapping::{map, map_reverse, Bridge, Direction, Mapper, MappingPlan, ObjectMapper, PlanStep};

pub use profile::{
    DynamicDescriptor, DynamicRecord, FieldSpec, Profile, ProfileFormat, RecordSpec, ScalarKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Copy a class instance into a new view instance using the process-wide
/// [`Mapper`].
///
/// Correspondences are declared on the fields of `V` and name fields of `C`.
pub fn class_to_view_model<C: Record, V: Record>(class: &C) -> Result<V> {
    Mapper::global().class_to_view_model(class)
}

/// Copy a view instance back into a new class instance using the
/// process-wide [`Mapper`].
pub fn view_model_to_class<C: Record, V: Record>(view: &V) -> Result<C> {
    Mapper::global().view_model_to_class(view)
}
