//! Entity structs for the DataLink business tables.
//!
//! Each entity has a `New*` counterpart carrying the fields an operator
//! supplies when adding a record; ids, timestamps, and defaults are filled
//! in by the store.

mod audit;
mod customer;
mod deal;
mod employee;
mod finance;
mod inventory;
mod lead;
mod project;

pub use audit::AuditLogEntry;
pub use customer::{Customer, NewCustomer};
pub use deal::{Deal, NewDeal};
pub use employee::{Employee, NewEmployee};
pub use finance::{Account, Expense, Invoice, NewAccount, NewExpense, NewInvoice};
pub use inventory::{InventoryItem, NewInventoryItem};
pub use lead::{Lead, NewLead};
pub use project::Project;
