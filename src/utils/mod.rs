/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Small cross-cutting helpers: logging setup today, a natural home for
//! anything else that doesn't belong to one pricing or analytics module.

pub mod logger;

pub use logger::{setup_logger, setup_logger_with_level};
