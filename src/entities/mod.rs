//! Sea-ORM entity definitions for the stockbook schema.
//!
//! One module per table. The three movement streams each get a header/line
//! pair; lines always reference their owning header and a product.

pub mod adjustment_header;
pub mod adjustment_line;
pub mod cost_center;
pub mod incoming_header;
pub mod incoming_line;
pub mod outgoing_header;
pub mod outgoing_line;
pub mod product;
pub mod user;
