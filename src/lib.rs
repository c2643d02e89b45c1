//! Small numeric, string and list utilities, composable function wrappers,
//! and a self-check harness that exercises all of them.
//!
//! ```
//! use utilkit::{lists, numeric, strings};
//!
//! assert_eq!(numeric::factorial(5)?.to_string(), "120");
//! assert_eq!(strings::title_case("hello world"), "Hello World");
//! assert_eq!(lists::rotate(&[1, 2, 3, 4, 5], 2), vec![4, 5, 1, 2, 3]);
//! # Ok::<(), utilkit::error::Error>(())
//! ```

pub mod config;
pub mod decorators;
pub mod error;
pub mod lists;
pub mod numeric;
pub mod output;
pub mod strings;
pub mod suite;

pub use decorators::{Callable, CallableExt};
pub use error::{Error, Result};
