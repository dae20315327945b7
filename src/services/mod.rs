// Author: Dustin Pilgrim
// License: MIT

pub mod persist;
pub mod signals;
pub mod store;
pub mod ticker;
