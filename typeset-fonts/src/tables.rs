//! The various font tables

pub mod cff;
pub mod cmap;
pub mod glyf;
pub mod gpos;
pub mod gsub;
pub mod head;
pub mod layout;
pub mod loca;
pub mod maxp;
pub mod name;
pub mod postscript;
