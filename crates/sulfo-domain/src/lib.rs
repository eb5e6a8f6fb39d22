// sulfo-domain library entry point
pub mod annotate;
pub mod dispense;
pub mod enumerate;
pub mod error;
pub mod indexing;
pub mod plate;
pub mod product;
pub mod reagent;
pub use annotate::{annotate, AnnotatedProduct};
pub use dispense::{
    reconcile, AuthoritativeRecord, DispenseRecord, MissingWell, ProductIndex, ProductInfo,
    QcReport,
};
pub use enumerate::enumerate;
pub use error::DomainError;
pub use indexing::{pair_index, pair_positions, product_id};
pub use plate::{assign_wells, PlateAssignment, WellPosition, PLATE_CAPACITY};
pub use product::{Product, ProductStatus};
pub use reagent::{RawReagentRow, Reagent, ReagentCollection, ReagentRole};
