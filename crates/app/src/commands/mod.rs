//! Commands behind the `budgetlink` binary

mod check;
mod run;
mod schema;

pub use check::*;
pub use run::*;
pub use schema::*;
