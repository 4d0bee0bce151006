pub mod branch;

pub use branch::{branch_name, branch_name_at};
