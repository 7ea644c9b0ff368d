//! Line-level tests for the parser
//!
//! Exercises `map_line` against realistic log lines: well-formed samples and
//! the ways real files go wrong.

pub mod log_lines;
pub mod malformed_lines;

/// Well-formed line used as the base for most cases
pub const VALID_LINE: &str = "b1c76ea92a0ccb8f44c2230846a50fa4 :: 08/04/2017 13:47:23 (023),account-id=20fe9c40a0d2b1eb070723e6fa169d9c,gateway-id=a78dec0c5254e20a2dae44c76bd0ec18,country=JO,status=submitted,price={message-price=0.0624015},cost={transit-cost=0.02, route-cost=0.12}";
